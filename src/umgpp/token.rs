use serde::{Deserialize, Serialize};

/// Reserved words that open and close a program.
pub const KEYWORDS: [&str; 3] = ["PROGRAM", "BEGIN", "END"];

/// The nine motion verbs of the language.
pub const FUNCTIONS: [&str; 9] = [
    "avanzar_vlts",
    "avanzar_ctms",
    "avanzar_mts",
    "girar",
    "circulo",
    "cuadrado",
    "rotar",
    "caminar",
    "moonwalk",
];

/// The subset of verbs allowed to close a turn combination.
pub const ADVANCE_FUNCTIONS: [&str; 3] = ["avanzar_vlts", "avanzar_ctms", "avanzar_mts"];

/// Closed set of token categories produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// One of `PROGRAM`, `BEGIN`, `END`.
    Keyword,
    /// One of the nine motion verbs.
    Function,
    /// Any other identifier-shaped word (program names).
    Identifier,
    /// Integer literal, optionally signed (`-` must touch the digits).
    Number,
    LParen,
    RParen,
    Semicolon,
    Plus,
    Dot,
}

/// A single token with its position in the source.
///
/// `line` and `column` are 1-based; `column` is the byte offset within the
/// line. Whitespace is recognized during scanning but never tokenized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// True for keyword tokens with exactly this text.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == word
    }

    /// True for function tokens with exactly this text.
    pub fn is_function(&self, name: &str) -> bool {
        self.kind == TokenKind::Function && self.text == name
    }
}
