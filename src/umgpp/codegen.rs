//! Code generation: one validated tree, two artifacts.
//!
//! The driver script is a Python program for the host-side rover library;
//! the command list is the flat `opcode:parameter` form the ESP8266
//! firmware consumes. Both are produced in a single pass over the
//! instruction sequence and are deterministic for a given tree.

use super::ast::{AdvanceCall, Instruction, Opcode, Program};

/// The two artifacts generated from one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    pub driver_script: String,
    pub commands: Vec<String>,
}

pub fn generate(program: &Program) -> GeneratedCode {
    GeneratedCode {
        driver_script: driver_script(program),
        commands: commands(program),
    }
}

fn driver_script(program: &Program) -> String {
    let mut lines = vec![
        "# Código Python generado a partir de UMG++ para el UMG Basic Rover 2.0".to_string(),
        format!("# Programa: {}", program.name),
        String::new(),
        "import time".to_string(),
        "import math".to_string(),
        "import rover_control".to_string(),
        String::new(),
        "def main():".to_string(),
        format!("    print('Iniciando programa: {}')", program.name),
        "    rover = rover_control.Rover()".to_string(),
        "    rover.initialize()".to_string(),
        String::new(),
    ];

    for instruction in &program.instructions {
        lines.push(match instruction {
            Instruction::Simple { opcode, parameter } => simple_line(*opcode, *parameter),
            Instruction::TurnCombination { turns, advance } => {
                combination_line(turns, advance.as_ref())
            }
        });
    }

    lines.extend([
        String::new(),
        "    rover.finalize()".to_string(),
        "    print('Programa finalizado')".to_string(),
        String::new(),
        "if __name__ == '__main__':".to_string(),
        "    main()".to_string(),
    ]);

    lines.join("\n")
}

/// The rover-library call for one primitive action. `girar` dispatches on
/// its parameter; every other opcode passes the parameter through.
fn call_expression(opcode: Opcode, parameter: i64) -> String {
    match opcode {
        Opcode::AvanzarVlts => format!("rover.move_wheels({parameter})"),
        Opcode::AvanzarCtms => format!("rover.move_cm({parameter})"),
        Opcode::AvanzarMts => format!("rover.move_meters({parameter})"),
        Opcode::Girar => match parameter {
            1 => "rover.turn_right()".to_string(),
            -1 => "rover.turn_left()".to_string(),
            _ => "rover.move_straight()".to_string(),
        },
        Opcode::Circulo => format!("rover.draw_circle({parameter})"),
        Opcode::Cuadrado => format!("rover.draw_square({parameter})"),
        Opcode::Rotar => format!("rover.rotate({parameter})"),
        Opcode::Caminar => format!("rover.walk({parameter})"),
        Opcode::Moonwalk => format!("rover.moonwalk({parameter})"),
    }
}

fn simple_line(opcode: Opcode, parameter: i64) -> String {
    let call = call_expression(opcode, parameter);
    let comment = match opcode {
        Opcode::AvanzarVlts => format!("Avanzar {parameter} vueltas"),
        Opcode::AvanzarCtms => format!("Avanzar {parameter} centímetros"),
        Opcode::AvanzarMts => format!("Avanzar {parameter} metros"),
        Opcode::Girar => match parameter {
            1 => "Girar a la derecha".to_string(),
            -1 => "Girar a la izquierda".to_string(),
            _ => "Avanzar en línea recta".to_string(),
        },
        Opcode::Circulo => format!("Dibujar círculo de radio {parameter} cm"),
        Opcode::Cuadrado => format!("Dibujar cuadrado de lado {parameter} cm"),
        Opcode::Rotar => format!("Rotar {parameter} vueltas"),
        Opcode::Caminar => format!("Caminar {parameter} pasos"),
        Opcode::Moonwalk => format!("Moonwalk de {parameter} pasos"),
    };
    format!("    {call}  # {comment}")
}

/// All calls of a combination share one line, joined by `; `, with a
/// trailing comment that spells the combination back out.
fn combination_line(turns: &[i64], advance: Option<&AdvanceCall>) -> String {
    let mut calls: Vec<String> = turns
        .iter()
        .map(|&turn| call_expression(Opcode::Girar, turn))
        .collect();
    if let Some(advance) = advance {
        calls.push(call_expression(advance.opcode, advance.parameter));
    }

    let mut comment = turns
        .iter()
        .map(|turn| format!("girar({turn})"))
        .collect::<Vec<_>>()
        .join(" + ");
    if let Some(advance) = advance {
        comment.push_str(&format!(" + {}({})", advance.opcode, advance.parameter));
    }

    format!("    {} # {comment}", calls.join("; "))
}

/// Flatten the program into `opcode:parameter` entries. Combinations are
/// fully expanded, one entry per turn plus one for the advance; nothing of
/// the `+` syntax survives.
fn commands(program: &Program) -> Vec<String> {
    let mut commands = Vec::new();
    for instruction in &program.instructions {
        match instruction {
            Instruction::Simple { opcode, parameter } => {
                commands.push(format!("{opcode}:{parameter}"));
            }
            Instruction::TurnCombination { turns, advance } => {
                for turn in turns {
                    commands.push(format!("girar:{turn}"));
                }
                if let Some(advance) = advance {
                    commands.push(format!("{}:{}", advance.opcode, advance.parameter));
                }
            }
        }
    }
    commands
}
