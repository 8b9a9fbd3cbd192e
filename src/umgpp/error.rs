use std::{error, fmt};

use serde::{Deserialize, Serialize};

use super::ast::Instruction;

/// A character no matcher recognized. Scanning continues past it, so one
/// source can carry several of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexicalError {
    pub message: String,
    pub character: char,
    pub line: usize,
    pub column: usize,
}

impl LexicalError {
    pub fn new(character: char, line: usize, column: usize) -> Self {
        LexicalError {
            message: format!("unrecognized character: '{}'", character),
            character,
            line,
            column,
        }
    }
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}: {}", self.line, self.column, self.message)
    }
}

impl error::Error for LexicalError {}

/// A grammar mismatch. The parser records one of these and resynchronizes
/// at the next instruction boundary instead of stopping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        SyntaxError {
            message: message.into(),
            line,
            column,
        }
    }

    /// The standard mismatch shape: what was expected, what was found.
    pub fn expected(expected: &str, found: &str, line: usize, column: usize) -> Self {
        SyntaxError::new(
            format!("expected {}, found '{}'", expected, found),
            line,
            column,
        )
    }

    /// Tokens left over after the closing dot of the program.
    pub fn trailing(line: usize, column: usize) -> Self {
        SyntaxError::new("extra tokens after the end of the program", line, column)
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}: {}", self.line, self.column, self.message)
    }
}

impl error::Error for SyntaxError {}

/// A parameter outside the domain its verb declares. Carries a copy of
/// the offending instruction for downstream reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticError {
    pub message: String,
    pub instruction: Instruction,
}

impl SemanticError {
    pub fn new(message: impl Into<String>, instruction: &Instruction) -> Self {
        SemanticError {
            message: message.into(),
            instruction: instruction.clone(),
        }
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl error::Error for SemanticError {}
