//! Syntax tree types for UMG++ programs.
//!
//! A program is a name plus a flat, ordered list of instructions. There
//! are exactly two instruction shapes: a plain opcode call, and a turn
//! combination. `girar` never appears as a plain call; a lone turn is a
//! combination with a single element and no advance. That property is
//! part of the grammar and keeps code generation on a single dispatch
//! path per shape.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the nine verbs of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opcode {
    /// Advance by wheel turns.
    AvanzarVlts,
    /// Advance by centimeters.
    AvanzarCtms,
    /// Advance by meters.
    AvanzarMts,
    /// Turn: -1 left, 1 right, 0 straight.
    Girar,
    /// Draw a circle of the given radius in centimeters.
    Circulo,
    /// Draw a square with the given side in centimeters.
    Cuadrado,
    /// Rotate in place a number of full turns.
    Rotar,
    /// Walk gait, one unit per step.
    Caminar,
    /// Moonwalk gait, slides backward while appearing to advance.
    Moonwalk,
}

impl Opcode {
    /// Look up a verb by its source spelling.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "avanzar_vlts" => Some(Opcode::AvanzarVlts),
            "avanzar_ctms" => Some(Opcode::AvanzarCtms),
            "avanzar_mts" => Some(Opcode::AvanzarMts),
            "girar" => Some(Opcode::Girar),
            "circulo" => Some(Opcode::Circulo),
            "cuadrado" => Some(Opcode::Cuadrado),
            "rotar" => Some(Opcode::Rotar),
            "caminar" => Some(Opcode::Caminar),
            "moonwalk" => Some(Opcode::Moonwalk),
            _ => None,
        }
    }

    /// The source spelling, also used in generated command strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Opcode::AvanzarVlts => "avanzar_vlts",
            Opcode::AvanzarCtms => "avanzar_ctms",
            Opcode::AvanzarMts => "avanzar_mts",
            Opcode::Girar => "girar",
            Opcode::Circulo => "circulo",
            Opcode::Cuadrado => "cuadrado",
            Opcode::Rotar => "rotar",
            Opcode::Caminar => "caminar",
            Opcode::Moonwalk => "moonwalk",
        }
    }

    /// True for the three verbs allowed to close a turn combination.
    pub fn is_advance(&self) -> bool {
        matches!(
            self,
            Opcode::AvanzarVlts | Opcode::AvanzarCtms | Opcode::AvanzarMts
        )
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The advance call that may close a turn combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceCall {
    /// Always one of the three `avanzar_*` verbs.
    pub opcode: Opcode,
    pub parameter: i64,
}

/// A single statement of a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instruction {
    /// A plain call: any verb except `girar`.
    Simple { opcode: Opcode, parameter: i64 },

    /// One or more `girar` applications chained with `+`, optionally
    /// closed by a single advance call. `turns` is never empty.
    TurnCombination {
        turns: Vec<i64>,
        advance: Option<AdvanceCall>,
    },
}

/// Root of the syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    pub instructions: Vec<Instruction>,
}
