//! Syntax analysis: token sequence to a program tree.
//!
//! Recursive descent with one token of lookahead and a single forward
//! cursor; no backtracking. Every expectation mismatch records a syntax
//! error and moves the cursor one token forward, which guarantees
//! termination. When an instruction fails, the parser skips to the next
//! `;` before trying the next one, so one bad statement does not swallow
//! the rest of the program. The whole stream is always consumed once and
//! every error found along the way is kept.

use super::ast::{AdvanceCall, Instruction, Opcode, Program};
use super::error::SyntaxError;
use super::token::{Token, TokenKind};

/// Parse a token sequence into a program.
///
/// Returns the tree when one could be built (possibly alongside recovered
/// errors) and every syntax error encountered. A failed parse is signalled
/// by a non-empty error list, never by a panic.
pub fn parse(tokens: &[Token]) -> (Option<Program>, Vec<SyntaxError>) {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();

    if let Some(token) = tokens.get(parser.cursor) {
        parser.errors.push(SyntaxError::trailing(token.line, token.column));
    }

    (program, parser.errors)
}

struct Parser<'a> {
    tokens: &'a [Token],
    cursor: usize,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            cursor: 0,
            errors: Vec::new(),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.cursor)
    }

    /// Consume the current token when it has the given kind.
    fn match_kind(&mut self, kind: TokenKind) -> Option<&'a Token> {
        let token = self.peek().filter(|t| t.kind == kind)?;
        self.cursor += 1;
        Some(token)
    }

    /// Consume the current token when it is exactly this keyword.
    fn match_keyword(&mut self, word: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_keyword(word)) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Record a mismatch at the current position and step over one token.
    ///
    /// Past the end of the stream the last token supplies the reported
    /// position; an empty stream reports "end of input" at 1:1.
    fn syntax_error(&mut self, expected: &str) {
        let error = match self.peek().or_else(|| self.tokens.last()) {
            Some(token) => SyntaxError::expected(expected, &token.text, token.line, token.column),
            None => SyntaxError::expected(expected, "end of input", 1, 1),
        };
        self.errors.push(error);
        self.cursor += 1;
    }

    /// Skip forward through the next `;` to resynchronize at a statement
    /// boundary.
    fn resync(&mut self) {
        while let Some(token) = self.peek() {
            self.cursor += 1;
            if token.kind == TokenKind::Semicolon {
                break;
            }
        }
    }

    fn parse_program(&mut self) -> Option<Program> {
        if !self.match_keyword("PROGRAM") {
            self.syntax_error("PROGRAM");
            return None;
        }

        let name = match self.match_kind(TokenKind::Identifier) {
            Some(token) => token.text.clone(),
            None => {
                self.syntax_error("a program name");
                return None;
            }
        };

        if !self.match_keyword("BEGIN") {
            self.syntax_error("BEGIN");
            return None;
        }

        let mut instructions = Vec::new();
        while let Some(token) = self.peek() {
            if token.is_keyword("END") {
                break;
            }
            match self.parse_instruction() {
                Some(instruction) => instructions.push(instruction),
                None => self.resync(),
            }
        }

        if !self.match_keyword("END") {
            self.syntax_error("END");
            return None;
        }

        if self.match_kind(TokenKind::Dot).is_none() {
            self.syntax_error("a dot '.' to end the program");
            return None;
        }

        Some(Program { name, instructions })
    }

    fn parse_instruction(&mut self) -> Option<Instruction> {
        if let Some(token) = self.peek() {
            if token.is_function("girar") {
                return self.parse_turn_combination();
            }
            if token.kind == TokenKind::Function {
                return self.parse_simple();
            }
        }
        self.syntax_error("a valid instruction");
        None
    }

    fn parse_simple(&mut self) -> Option<Instruction> {
        let function = self.match_kind(TokenKind::Function)?;
        let opcode = match Opcode::parse(&function.text) {
            Some(opcode) => opcode,
            None => {
                self.errors.push(SyntaxError::expected(
                    "a valid instruction",
                    &function.text,
                    function.line,
                    function.column,
                ));
                return None;
            }
        };

        if self.match_kind(TokenKind::LParen).is_none() {
            self.syntax_error("an opening parenthesis '('");
            return None;
        }
        let parameter = self.parse_parameter()?;
        if self.match_kind(TokenKind::RParen).is_none() {
            self.syntax_error("a closing parenthesis ')'");
            return None;
        }
        if self.match_kind(TokenKind::Semicolon).is_none() {
            self.syntax_error("a semicolon ';' to end the instruction");
            return None;
        }

        Some(Instruction::Simple { opcode, parameter })
    }

    /// One mandatory `girar(INT)`, then any number of `+ girar(INT)`.
    /// An `+ avanzar_*(INT)` closes the combination at once; a `+` after
    /// it fails at the `;` expectation. Any other verb after `+` fails
    /// outright.
    fn parse_turn_combination(&mut self) -> Option<Instruction> {
        // Leading girar, guaranteed by the caller's lookahead.
        self.match_kind(TokenKind::Function)?;
        if self.match_kind(TokenKind::LParen).is_none() {
            self.syntax_error("an opening parenthesis '('");
            return None;
        }
        let first = self.parse_parameter()?;
        if self.match_kind(TokenKind::RParen).is_none() {
            self.syntax_error("a closing parenthesis ')'");
            return None;
        }

        let mut turns = vec![first];
        let mut advance = None;

        while self.match_kind(TokenKind::Plus).is_some() {
            let function = match self.match_kind(TokenKind::Function) {
                Some(token) => token,
                None => {
                    self.syntax_error("a function after '+'");
                    return None;
                }
            };
            if self.match_kind(TokenKind::LParen).is_none() {
                self.syntax_error("an opening parenthesis '('");
                return None;
            }
            let parameter = self.parse_parameter()?;
            if self.match_kind(TokenKind::RParen).is_none() {
                self.syntax_error("a closing parenthesis ')'");
                return None;
            }

            if function.is_function("girar") {
                turns.push(parameter);
            } else if let Some(opcode) = Opcode::parse(&function.text).filter(|op| op.is_advance())
            {
                advance = Some(AdvanceCall { opcode, parameter });
                break;
            } else {
                self.errors.push(SyntaxError::expected(
                    "a girar or avanzar_* function after '+'",
                    &function.text,
                    function.line,
                    function.column,
                ));
                return None;
            }
        }

        if self.match_kind(TokenKind::Semicolon).is_none() {
            self.syntax_error("a semicolon ';' to end the instruction");
            return None;
        }

        Some(Instruction::TurnCombination { turns, advance })
    }

    /// The integer inside a call. The token is consumed either way; a
    /// literal too large for i64 is reported at the token itself.
    fn parse_parameter(&mut self) -> Option<i64> {
        let token = match self.match_kind(TokenKind::Number) {
            Some(token) => token,
            None => {
                self.syntax_error("an integer");
                return None;
            }
        };
        match token.text.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                self.errors.push(SyntaxError::expected(
                    "an integer",
                    &token.text,
                    token.line,
                    token.column,
                ));
                None
            }
        }
    }
}
