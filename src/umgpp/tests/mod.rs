use crate::umgpp::{compile, CompileErrors, CompileOutcome, Program, Stage};

mod codegen;
mod parser;
mod semantics;

/// Compile source expected to be valid; panics with the failing stage and
/// its messages otherwise.
pub fn compile_ok(source: &str) -> (Program, String, Vec<String>) {
    match compile(source) {
        CompileOutcome::Success {
            tree,
            driver_script,
            commands,
        } => (tree, driver_script, commands),
        CompileOutcome::Failure { stage, errors } => {
            panic!("compilation failed at {stage} stage: {:?}", errors.messages())
        }
    }
}

/// Compile source expected to be rejected; panics if it compiles.
pub fn compile_err(source: &str) -> (Stage, CompileErrors) {
    match compile(source) {
        CompileOutcome::Success { .. } => panic!("compilation unexpectedly succeeded"),
        CompileOutcome::Failure { stage, errors } => (stage, errors),
    }
}
