use super::{compile_err, compile_ok};
use crate::umgpp::{CompileErrors, Stage};

fn semantic_messages(source: &str) -> Vec<String> {
    let (stage, errors) = compile_err(source);
    assert_eq!(stage, Stage::Semantic);
    match errors {
        CompileErrors::Semantic(_) => errors.messages(),
        other => panic!("expected semantic errors, got {other:?}"),
    }
}

#[test]
fn zero_is_rejected_for_every_simple_verb() {
    for verb in ["avanzar_vlts", "avanzar_ctms", "avanzar_mts", "rotar", "caminar", "moonwalk"] {
        let source = format!("PROGRAM demo BEGIN {verb}(0); END.");
        let messages = semantic_messages(&source);
        assert_eq!(messages, vec![format!("parameter for {verb} cannot be 0")]);
    }
}

#[test]
fn negative_parameters_are_fine_outside_the_shapes() {
    compile_ok("PROGRAM demo BEGIN avanzar_mts(-2); rotar(-3); caminar(-5); END.");
}

#[test]
fn small_circle_is_out_of_range() {
    let messages = semantic_messages("PROGRAM demo BEGIN circulo(5); END.");
    assert_eq!(
        messages,
        vec!["parameter for circulo must be between 10 and 200 centimeters".to_string()]
    );
}

#[test]
fn negative_circle_is_out_of_range() {
    let messages = semantic_messages("PROGRAM demo BEGIN circulo(-50); END.");
    assert_eq!(
        messages,
        vec!["parameter for circulo must be between 10 and 200 centimeters".to_string()]
    );
}

#[test]
fn oversized_square_is_out_of_range() {
    let messages = semantic_messages("PROGRAM demo BEGIN cuadrado(201); END.");
    assert_eq!(
        messages,
        vec!["parameter for cuadrado must be between 10 and 200 centimeters".to_string()]
    );
}

#[test]
fn shape_boundaries_are_inclusive() {
    compile_ok("PROGRAM demo BEGIN circulo(10); circulo(200); cuadrado(10); cuadrado(200); END.");
}

#[test]
fn turn_parameter_must_be_a_direction() {
    let messages = semantic_messages("PROGRAM demo BEGIN girar(2); END.");
    assert_eq!(messages, vec!["parameter for girar must be -1, 0, or 1".to_string()]);
}

#[test]
fn every_turn_in_a_chain_is_checked() {
    let messages = semantic_messages("PROGRAM demo BEGIN girar(5) + girar(1) + girar(-9); END.");
    assert_eq!(messages.len(), 2);
}

#[test]
fn advance_inside_a_combination_cannot_be_zero() {
    let messages = semantic_messages("PROGRAM demo BEGIN girar(1) + avanzar_mts(0); END.");
    assert_eq!(messages, vec!["parameter for avanzar_mts cannot be 0".to_string()]);
}

#[test]
fn violations_are_collected_in_source_order() {
    let messages = semantic_messages(
        "PROGRAM demo BEGIN circulo(5); rotar(0); girar(7); END.",
    );
    assert_eq!(
        messages,
        vec![
            "parameter for circulo must be between 10 and 200 centimeters".to_string(),
            "parameter for rotar cannot be 0".to_string(),
            "parameter for girar must be -1, 0, or 1".to_string(),
        ]
    );
}
