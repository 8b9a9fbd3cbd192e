use super::compile_ok;

#[test]
fn one_instruction_one_command() {
    let (_, _, commands) = compile_ok("PROGRAM demo BEGIN avanzar_ctms(10); END.");
    assert_eq!(commands, vec!["avanzar_ctms:10".to_string()]);
}

#[test]
fn combination_commands_are_fully_expanded() {
    let (_, _, commands) = compile_ok("PROGRAM demo BEGIN girar(1) + girar(-1) + avanzar_mts(2); END.");
    assert_eq!(
        commands,
        vec![
            "girar:1".to_string(),
            "girar:-1".to_string(),
            "avanzar_mts:2".to_string(),
        ]
    );
}

#[test]
fn every_verb_maps_to_its_call_and_command() {
    let (_, script, commands) = compile_ok(
        "PROGRAM todo BEGIN \
         avanzar_vlts(1); avanzar_ctms(40); avanzar_mts(2); circulo(50); \
         cuadrado(20); rotar(2); caminar(5); moonwalk(3); END.",
    );
    assert_eq!(
        commands,
        vec![
            "avanzar_vlts:1".to_string(),
            "avanzar_ctms:40".to_string(),
            "avanzar_mts:2".to_string(),
            "circulo:50".to_string(),
            "cuadrado:20".to_string(),
            "rotar:2".to_string(),
            "caminar:5".to_string(),
            "moonwalk:3".to_string(),
        ]
    );
    let lines: Vec<&str> = script.lines().collect();
    assert!(lines.contains(&"    rover.move_wheels(1)  # Avanzar 1 vueltas"));
    assert!(lines.contains(&"    rover.move_cm(40)  # Avanzar 40 centímetros"));
    assert!(lines.contains(&"    rover.move_meters(2)  # Avanzar 2 metros"));
    assert!(lines.contains(&"    rover.draw_circle(50)  # Dibujar círculo de radio 50 cm"));
    assert!(lines.contains(&"    rover.draw_square(20)  # Dibujar cuadrado de lado 20 cm"));
    assert!(lines.contains(&"    rover.rotate(2)  # Rotar 2 vueltas"));
    assert!(lines.contains(&"    rover.walk(5)  # Caminar 5 pasos"));
    assert!(lines.contains(&"    rover.moonwalk(3)  # Moonwalk de 3 pasos"));
}

#[test]
fn turn_directions_dispatch_to_their_calls() {
    let (_, script, commands) = compile_ok(
        "PROGRAM giros BEGIN girar(1); girar(-1); girar(0); END.",
    );
    assert_eq!(
        commands,
        vec!["girar:1".to_string(), "girar:-1".to_string(), "girar:0".to_string()]
    );
    let lines: Vec<&str> = script.lines().collect();
    assert!(lines.contains(&"    rover.turn_right() # girar(1)"));
    assert!(lines.contains(&"    rover.turn_left() # girar(-1)"));
    assert!(lines.contains(&"    rover.move_straight() # girar(0)"));
}

#[test]
fn combination_line_reconstructs_the_chain() {
    let (_, script, _) = compile_ok("PROGRAM demo BEGIN girar(1) + girar(-1) + avanzar_mts(2); END.");
    let lines: Vec<&str> = script.lines().collect();
    assert!(lines.contains(
        &"    rover.turn_right(); rover.turn_left(); rover.move_meters(2) # girar(1) + girar(-1) + avanzar_mts(2)"
    ));
}

#[test]
fn driver_script_frame_is_complete() {
    let (_, script, _) = compile_ok("PROGRAM figuras BEGIN circulo(50); END.");
    let lines: Vec<&str> = script.lines().collect();
    assert_eq!(
        lines[0],
        "# Código Python generado a partir de UMG++ para el UMG Basic Rover 2.0"
    );
    assert_eq!(lines[1], "# Programa: figuras");
    assert_eq!(lines[2], "");
    assert_eq!(lines[3], "import time");
    assert_eq!(lines[4], "import math");
    assert_eq!(lines[5], "import rover_control");
    assert_eq!(lines[7], "def main():");
    assert_eq!(lines[8], "    print('Iniciando programa: figuras')");
    assert_eq!(lines[9], "    rover = rover_control.Rover()");
    assert_eq!(lines[10], "    rover.initialize()");
    assert_eq!(lines[12], "    rover.draw_circle(50)  # Dibujar círculo de radio 50 cm");
    assert_eq!(lines[14], "    rover.finalize()");
    assert_eq!(lines[15], "    print('Programa finalizado')");
    assert_eq!(lines[17], "if __name__ == '__main__':");
    assert_eq!(lines[18], "    main()");
    assert!(!script.ends_with('\n'));
}

#[test]
fn empty_body_still_frames_the_script() {
    let (_, script, commands) = compile_ok("PROGRAM nada BEGIN END.");
    assert!(commands.is_empty());
    let lines: Vec<&str> = script.lines().collect();
    assert_eq!(lines[10], "    rover.initialize()");
    assert_eq!(lines[13], "    rover.finalize()");
}
