//! # UMG++ Language
//!
//! A tiny imperative language for driving the UMG Basic Rover 2.0,
//! built around Spanish motion verbs. One program, one parameterized
//! instruction per statement, no control flow.
//!
//! ## Shape
//!
//! - **One block**: `PROGRAM <name> BEGIN ... END.`
//! - **Verb calls**: `avanzar_mts(2);`, `circulo(50);`, `moonwalk(4);`
//! - **Turn combinations**: `girar(1) + girar(-1) + avanzar_ctms(30);`
//!   (`girar` only ever appears in this chained form)
//!
//! ## Quick Example
//!
//! ```text
//! PROGRAM demo
//! BEGIN
//!     avanzar_ctms(40);
//!     girar(1) + avanzar_mts(1);
//!     cuadrado(25);
//! END.
//! ```
//!
//! Compilation runs four ordered stages over the source text and stops at
//! the first stage that finds errors. On success it yields the syntax tree
//! plus two artifacts generated from it: a Python driver script for the
//! host-side rover library and a flat `opcode:parameter` command list for
//! the ESP8266 firmware. See [`compile`].

pub mod ast;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod semantics;
pub mod token;

pub use ast::{AdvanceCall, Instruction, Opcode, Program};
pub use error::{LexicalError, SemanticError, SyntaxError};

#[cfg(test)]
mod tests;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

/// The pipeline's ordered phases. A failed compilation names the phase
/// that rejected the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Lexical,
    Syntax,
    Semantic,
    Codegen,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Lexical => "lexical",
            Stage::Syntax => "syntax",
            Stage::Semantic => "semantic",
            Stage::Codegen => "codegen",
        };
        write!(f, "{name}")
    }
}

/// The error list of exactly one failed stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompileErrors {
    Lexical(Vec<LexicalError>),
    Syntax(Vec<SyntaxError>),
    Semantic(Vec<SemanticError>),
}

impl CompileErrors {
    pub fn len(&self) -> usize {
        match self {
            CompileErrors::Lexical(errors) => errors.len(),
            CompileErrors::Syntax(errors) => errors.len(),
            CompileErrors::Semantic(errors) => errors.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One rendered line per error, in source order.
    pub fn messages(&self) -> Vec<String> {
        match self {
            CompileErrors::Lexical(errors) => errors.iter().map(|e| e.to_string()).collect(),
            CompileErrors::Syntax(errors) => errors.iter().map(|e| e.to_string()).collect(),
            CompileErrors::Semantic(errors) => errors.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Result of one compilation. Success carries the tree and both generated
/// artifacts; failure carries the first failing stage and everything that
/// stage found. There is no partial output.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileOutcome {
    Success {
        tree: Program,
        driver_script: String,
        commands: Vec<String>,
    },
    Failure {
        stage: Stage,
        errors: CompileErrors,
    },
}

impl CompileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CompileOutcome::Success { .. })
    }

    /// The structured shape handed to calling layers (web endpoints, the
    /// CLI's JSON output).
    pub fn to_report(&self) -> serde_json::Value {
        match self {
            CompileOutcome::Success {
                tree,
                driver_script,
                commands,
            } => json!({
                "success": true,
                "tree": tree,
                "driver_script": driver_script,
                "commands": commands,
            }),
            CompileOutcome::Failure { stage, errors } => json!({
                "success": false,
                "stage": stage,
                "errors": errors,
            }),
        }
    }
}

/// Run the full pipeline over one source text.
///
/// Stages run in order: lexing, parsing, semantic checks, code
/// generation. Within a stage every error is collected; between stages
/// the first non-empty error list terminates the pipeline, so the caller
/// always sees exactly one stage's errors. Compiling the same text twice
/// yields byte-identical artifacts.
pub fn compile(source: &str) -> CompileOutcome {
    let (tokens, lex_errors) = lexer::tokenize(source);
    if !lex_errors.is_empty() {
        return CompileOutcome::Failure {
            stage: Stage::Lexical,
            errors: CompileErrors::Lexical(lex_errors),
        };
    }

    let (tree, parse_errors) = parser::parse(&tokens);
    let tree = match tree {
        Some(tree) if parse_errors.is_empty() => tree,
        _ => {
            return CompileOutcome::Failure {
                stage: Stage::Syntax,
                errors: CompileErrors::Syntax(parse_errors),
            }
        }
    };

    let semantic_errors = semantics::analyze(&tree);
    if !semantic_errors.is_empty() {
        return CompileOutcome::Failure {
            stage: Stage::Semantic,
            errors: CompileErrors::Semantic(semantic_errors),
        };
    }

    let generated = codegen::generate(&tree);
    CompileOutcome::Success {
        tree,
        driver_script: generated.driver_script,
        commands: generated.commands,
    }
}
