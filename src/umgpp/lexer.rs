//! Lexical analysis: source text to an ordered token sequence.
//!
//! The scanner walks each line left to right and tries a fixed, ordered
//! list of matchers at every position; the first match wins. Word-shaped
//! text is reclassified as a keyword or function name by exact match
//! against the closed sets, otherwise it stays an identifier. A position
//! where no matcher fires is recorded as a lexical error and scanning
//! resumes one character later, so a single pass accounts for every
//! character of the input and collects every error.

use super::error::LexicalError;
use super::token::{Token, TokenKind, FUNCTIONS, KEYWORDS};

type Matcher = fn(&str) -> Option<usize>;

/// Matchers tried in order at each cursor position. `None` as the kind
/// marks matched-but-discarded text (whitespace).
const MATCHERS: [(Option<TokenKind>, Matcher); 10] = [
    (Some(TokenKind::Keyword), match_keyword),
    (Some(TokenKind::Function), match_function),
    (Some(TokenKind::Identifier), match_word),
    (Some(TokenKind::Number), match_number),
    (Some(TokenKind::LParen), match_lparen),
    (Some(TokenKind::RParen), match_rparen),
    (Some(TokenKind::Semicolon), match_semicolon),
    (Some(TokenKind::Plus), match_plus),
    (Some(TokenKind::Dot), match_dot),
    (None, match_whitespace),
];

/// Tokenize a whole source text.
///
/// Returns the tokens in source order together with every lexical error
/// found; the two never overlap on a character. Line numbers and columns
/// are 1-based, columns counted in bytes.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<LexicalError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    for (line_index, line) in source.split('\n').enumerate() {
        let line_number = line_index + 1;
        let mut position = 0;

        while position < line.len() {
            let rest = &line[position..];
            match match_at(rest) {
                Some((kind, length)) => {
                    if let Some(kind) = kind {
                        tokens.push(Token::new(
                            kind,
                            &rest[..length],
                            line_number,
                            position + 1,
                        ));
                    }
                    position += length;
                }
                None => {
                    if let Some(character) = rest.chars().next() {
                        errors.push(LexicalError::new(character, line_number, position + 1));
                        position += character.len_utf8();
                    } else {
                        break;
                    }
                }
            }
        }
    }

    (tokens, errors)
}

fn match_at(rest: &str) -> Option<(Option<TokenKind>, usize)> {
    for (kind, matcher) in MATCHERS {
        if let Some(length) = matcher(rest) {
            return Some((kind, length));
        }
    }
    None
}

/// Length of a leading identifier-shaped word, if any.
fn match_word(rest: &str) -> Option<usize> {
    let mut chars = rest.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() && first != '_' {
        return None;
    }
    let length = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .count();
    Some(length)
}

fn match_keyword(rest: &str) -> Option<usize> {
    let length = match_word(rest)?;
    KEYWORDS.contains(&&rest[..length]).then_some(length)
}

fn match_function(rest: &str) -> Option<usize> {
    let length = match_word(rest)?;
    FUNCTIONS.contains(&&rest[..length]).then_some(length)
}

/// Optional leading minus directly followed by one or more digits. A bare
/// minus never matches, so `+` and `-` stay unambiguous combinators.
fn match_number(rest: &str) -> Option<usize> {
    let digits_from = if rest.starts_with('-') { 1 } else { 0 };
    let digits = rest[digits_from..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .count();
    (digits > 0).then_some(digits_from + digits)
}

fn match_lparen(rest: &str) -> Option<usize> {
    rest.starts_with('(').then_some(1)
}

fn match_rparen(rest: &str) -> Option<usize> {
    rest.starts_with(')').then_some(1)
}

fn match_semicolon(rest: &str) -> Option<usize> {
    rest.starts_with(';').then_some(1)
}

fn match_plus(rest: &str) -> Option<usize> {
    rest.starts_with('+').then_some(1)
}

fn match_dot(rest: &str) -> Option<usize> {
    rest.starts_with('.').then_some(1)
}

fn match_whitespace(rest: &str) -> Option<usize> {
    let length: usize = rest
        .chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| c.len_utf8())
        .sum();
    (length > 0).then_some(length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let (tokens, errors) = tokenize("PROGRAM demo BEGIN END.");
        assert!(errors.is_empty());
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["PROGRAM", "demo", "BEGIN", "END", "."]);
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[4].kind, TokenKind::Dot);
    }

    #[test]
    fn function_call_with_negative_parameter() {
        let (tokens, errors) = tokenize("girar(-1);");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Function);
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].text, "-1");
    }

    #[test]
    fn detached_sign_is_not_a_number() {
        let (tokens, errors) = tokenize("- 5");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].character, '-');
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "5");
    }

    #[test]
    fn keyword_needs_exact_word() {
        let (tokens, errors) = tokenize("PROGRAMx ENDing");
        assert!(errors.is_empty());
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Identifier));
    }

    #[test]
    fn positions_are_one_based() {
        let (tokens, _) = tokenize("girar(1)");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[0].column, 1);
        assert_eq!(tokens[1].column, 6);
        assert_eq!(tokens[2].column, 7);
    }
}
