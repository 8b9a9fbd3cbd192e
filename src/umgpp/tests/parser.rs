use super::{compile_err, compile_ok};
use crate::umgpp::ast::{AdvanceCall, Instruction, Opcode};
use crate::umgpp::{CompileErrors, Stage};

fn syntax_messages(errors: CompileErrors) -> Vec<String> {
    match errors {
        CompileErrors::Syntax(_) => errors.messages(),
        other => panic!("expected syntax errors, got {other:?}"),
    }
}

#[test]
fn girar_alone_is_a_turn_combination() {
    let (tree, _, _) = compile_ok("PROGRAM demo BEGIN girar(1); END.");
    assert_eq!(
        tree.instructions,
        vec![Instruction::TurnCombination {
            turns: vec![1],
            advance: None,
        }]
    );
}

#[test]
fn turn_chain_collects_every_girar() {
    let (tree, _, _) = compile_ok("PROGRAM demo BEGIN girar(1) + girar(-1) + girar(0); END.");
    assert_eq!(
        tree.instructions,
        vec![Instruction::TurnCombination {
            turns: vec![1, -1, 0],
            advance: None,
        }]
    );
}

#[test]
fn advance_closes_the_combination() {
    let (tree, _, _) = compile_ok("PROGRAM demo BEGIN girar(1) + avanzar_mts(2); END.");
    assert_eq!(
        tree.instructions,
        vec![Instruction::TurnCombination {
            turns: vec![1],
            advance: Some(AdvanceCall {
                opcode: Opcode::AvanzarMts,
                parameter: 2,
            }),
        }]
    );
}

#[test]
fn nothing_chains_after_the_advance() {
    let (stage, errors) = compile_err("PROGRAM demo BEGIN girar(1) + avanzar_mts(2) + girar(0); END.");
    assert_eq!(stage, Stage::Syntax);
    let messages = syntax_messages(errors);
    assert!(messages[0].contains("expected a semicolon"), "{messages:?}");
}

#[test]
fn other_verbs_cannot_join_a_combination() {
    let (stage, errors) = compile_err("PROGRAM demo BEGIN girar(1) + rotar(3); END.");
    assert_eq!(stage, Stage::Syntax);
    let messages = syntax_messages(errors);
    assert!(
        messages[0].contains("expected a girar or avanzar_* function after '+', found 'rotar'"),
        "{messages:?}"
    );
}

#[test]
fn instruction_count_matches_statement_count() {
    let (tree, _, _) = compile_ok(
        "PROGRAM demo BEGIN avanzar_ctms(10); girar(1) + girar(-1); caminar(3); END.",
    );
    assert_eq!(tree.instructions.len(), 3);
}

#[test]
fn missing_semicolon_is_reported() {
    let (stage, errors) = compile_err("PROGRAM demo BEGIN avanzar_ctms(10) END.");
    assert_eq!(stage, Stage::Syntax);
    let messages = syntax_messages(errors);
    assert!(
        messages[0].contains("expected a semicolon ';' to end the instruction, found 'END'"),
        "{messages:?}"
    );
}

#[test]
fn one_bad_statement_does_not_cascade() {
    let (stage, errors) = compile_err("PROGRAM demo BEGIN rotar(); avanzar_ctms(5); END.");
    assert_eq!(stage, Stage::Syntax);
    assert_eq!(errors.len(), 1, "{:?}", errors.messages());
    assert!(errors.messages()[0].contains("expected an integer, found ')'"));
}

#[test]
fn misspelled_keyword_is_reported_where_it_sits() {
    let (stage, errors) = compile_err("PROGRAMA demo BEGIN END.");
    assert_eq!(stage, Stage::Syntax);
    let messages = syntax_messages(errors);
    assert_eq!(messages[0], "line 1, column 1: expected PROGRAM, found 'PROGRAMA'");
}

#[test]
fn empty_source_reports_end_of_input() {
    let (stage, errors) = compile_err("");
    assert_eq!(stage, Stage::Syntax);
    let messages = syntax_messages(errors);
    assert_eq!(messages[0], "line 1, column 1: expected PROGRAM, found 'end of input'");
}

#[test]
fn tokens_after_the_final_dot_are_rejected() {
    let (stage, errors) = compile_err("PROGRAM demo BEGIN END. caminar(1);");
    assert_eq!(stage, Stage::Syntax);
    let messages = syntax_messages(errors);
    assert!(
        messages[0].contains("extra tokens after the end of the program"),
        "{messages:?}"
    );
}

#[test]
fn literal_too_large_for_i64_is_a_syntax_error() {
    let (stage, errors) = compile_err("PROGRAM demo BEGIN avanzar_ctms(99999999999999999999); END.");
    assert_eq!(stage, Stage::Syntax);
    let messages = syntax_messages(errors);
    assert!(
        messages[0].contains("expected an integer, found '99999999999999999999'"),
        "{messages:?}"
    );
}
