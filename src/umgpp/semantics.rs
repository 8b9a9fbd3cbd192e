//! Semantic analysis: parameter range checks over a parsed program.
//!
//! The tree is visited instruction by instruction and every violation is
//! collected, so a program with three bad parameters reports all three in
//! source order.

use super::ast::{Instruction, Opcode, Program};
use super::error::SemanticError;

/// Check every instruction's parameter against its allowed range.
pub fn analyze(program: &Program) -> Vec<SemanticError> {
    let mut errors = Vec::new();
    for instruction in &program.instructions {
        check_instruction(instruction, &mut errors);
    }
    errors
}

fn check_instruction(instruction: &Instruction, errors: &mut Vec<SemanticError>) {
    match instruction {
        Instruction::Simple { opcode, parameter } => match opcode {
            Opcode::AvanzarVlts
            | Opcode::AvanzarCtms
            | Opcode::AvanzarMts
            | Opcode::Rotar
            | Opcode::Caminar
            | Opcode::Moonwalk => {
                if *parameter == 0 {
                    errors.push(SemanticError::new(
                        format!("parameter for {opcode} cannot be 0"),
                        instruction,
                    ));
                }
            }
            Opcode::Circulo | Opcode::Cuadrado => {
                if !(10..=200).contains(parameter) {
                    errors.push(SemanticError::new(
                        format!("parameter for {opcode} must be between 10 and 200 centimeters"),
                        instruction,
                    ));
                }
            }
            // The parser only ever builds girar as a turn combination;
            // this arm stays for the day the grammar grows a bare girar
            // form.
            Opcode::Girar => {
                if !(-1..=1).contains(parameter) {
                    errors.push(SemanticError::new(
                        "parameter for girar must be -1, 0, or 1".to_string(),
                        instruction,
                    ));
                }
            }
        },
        Instruction::TurnCombination { turns, advance } => {
            for turn in turns {
                if !(-1..=1).contains(turn) {
                    errors.push(SemanticError::new(
                        "parameter for girar must be -1, 0, or 1".to_string(),
                        instruction,
                    ));
                }
            }
            if let Some(advance) = advance {
                if advance.parameter == 0 {
                    errors.push(SemanticError::new(
                        format!("parameter for {} cannot be 0", advance.opcode),
                        instruction,
                    ));
                }
            }
        }
    }
}
