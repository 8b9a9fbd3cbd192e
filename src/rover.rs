//! Kinematic simulator for the UMG Basic Rover 2.0.
//!
//! This module provides the `VirtualRover` struct, a software stand-in for
//! the physical chassis. It tracks:
//! - Position in centimeters on a flat plane and heading in degrees,
//!   normalized to `[0, 360)`.
//! - The enable state of the left and right drive motors. Turning works the
//!   way the hardware does: one motor is cut, and subsequent moves drag the
//!   heading around while covering half the distance.
//! - Cumulative distance travelled across all moves.
//!
//! The method surface mirrors the calls emitted in generated driver scripts
//! (`move_wheels`, `draw_circle`, `moonwalk`, ...), and `execute` drives the
//! same surface from a flat `"opcode:parameter"` command list, which makes it
//! the local twin of the controller firmware.

use std::{error, fmt};

use serde::Serialize;

use crate::log_debug;
use crate::umgpp::Opcode;

/// Distance covered by one full wheel turn, in centimeters.
pub const WHEEL_CIRCUMFERENCE_CM: f64 = 20.0;

/// Distance between the two drive wheels, in centimeters.
pub const ROVER_WIDTH_CM: f64 = 15.0;

/// Heading drift added by each move while only one motor is enabled.
const TURN_DRIFT_DEGREES: f64 = 10.0;

/// Where the rover is and which way it points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Heading in degrees, `0` = along the positive x axis, in `[0, 360)`.
    pub orientation: f64,
}

/// Represents errors raised while executing a raw command list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command string is not of the form `opcode:parameter`.
    Malformed(String),

    /// The opcode half of the command names no known instruction.
    UnknownOpcode(String),

    /// The parameter half of the command is not an integer.
    InvalidParameter { opcode: String, value: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Malformed(command) => {
                write!(f, "malformed command '{}': expected opcode:parameter", command)
            }
            CommandError::UnknownOpcode(opcode) => {
                write!(f, "unknown opcode: '{}'", opcode)
            }
            CommandError::InvalidParameter { opcode, value } => {
                write!(f, "invalid parameter '{}' for {}: not an integer", value, opcode)
            }
        }
    }
}

impl error::Error for CommandError {}

/// Summary of a completed `execute` run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionReport {
    /// Number of commands dispatched.
    pub executed: usize,
    /// Pose after the last command.
    pub pose: Pose,
    /// Cumulative centimeters covered, including everything before this run.
    pub distance_travelled: f64,
}

/// Simulated UMG Basic Rover 2.0.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualRover {
    position_x: f64,
    position_y: f64,
    orientation: f64,
    left_motor_enabled: bool,
    right_motor_enabled: bool,
    distance_travelled: f64,
}

impl Default for VirtualRover {
    fn default() -> Self {
        Self {
            position_x: 0.0,
            position_y: 0.0,
            orientation: 0.0,
            left_motor_enabled: true,
            right_motor_enabled: true,
            distance_travelled: 0.0,
        }
    }
}

impl VirtualRover {
    /// Create a rover at the origin, facing along the positive x axis,
    /// with both motors enabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> Pose {
        Pose {
            x: self.position_x,
            y: self.position_y,
            orientation: self.orientation,
        }
    }

    pub fn distance_travelled(&self) -> f64 {
        self.distance_travelled
    }

    /// Bring the hardware up. Purely informational in the simulator.
    pub fn initialize(&mut self) {
        log_debug!("virtual rover initialized");
    }

    /// Release the hardware. Purely informational in the simulator.
    pub fn finalize(&mut self) {
        log_debug!("virtual rover finalized");
    }

    /// Advance by a number of wheel turns.
    pub fn move_wheels(&mut self, turns: i64) {
        self.move_distance(turns as f64 * WHEEL_CIRCUMFERENCE_CM);
    }

    /// Advance by a number of centimeters.
    pub fn move_cm(&mut self, centimeters: i64) {
        self.move_distance(centimeters as f64);
    }

    /// Advance by a number of meters.
    pub fn move_meters(&mut self, meters: i64) {
        self.move_distance(meters as f64 * 100.0);
    }

    /// Cut the right motor so that subsequent moves curve to the right.
    /// Does not change the pose by itself.
    pub fn turn_right(&mut self) {
        self.right_motor_enabled = false;
        self.left_motor_enabled = true;
    }

    /// Cut the left motor so that subsequent moves curve to the left.
    /// Does not change the pose by itself.
    pub fn turn_left(&mut self) {
        self.left_motor_enabled = false;
        self.right_motor_enabled = true;
    }

    /// Re-enable both motors for straight driving.
    pub fn move_straight(&mut self) {
        self.left_motor_enabled = true;
        self.right_motor_enabled = true;
    }

    /// Drive a full circle of the given radius around the current position.
    ///
    /// The sweep ends one step short of the starting angle, so the final
    /// position sits at 355 degrees on the circle. The heading is reset to 0
    /// afterwards, matching the hardware routine.
    pub fn draw_circle(&mut self, radius: i64) {
        let radius = radius as f64;
        let start_x = self.position_x;
        let start_y = self.position_y;

        for angle in (0..360).step_by(5) {
            let rad = f64::from(angle).to_radians();
            self.position_x = start_x + radius * rad.cos();
            self.position_y = start_y + radius * rad.sin();
            // Tangent to the circle at this angle.
            self.orientation = f64::from(angle + 90);
        }

        self.orientation = 0.0;
        self.distance_travelled += 2.0 * std::f64::consts::PI * radius.abs();
    }

    /// Drive the four sides of a square, turning 90 degrees right after each.
    /// The heading is restored afterwards; the position ends wherever the
    /// last side left it.
    pub fn draw_square(&mut self, side: i64) {
        let original_orientation = self.orientation;

        for _ in 0..4 {
            self.move_distance(side as f64);
            self.orientation += 90.0;
            if self.orientation >= 360.0 {
                self.orientation -= 360.0;
            }
        }

        self.orientation = original_orientation;
    }

    /// Spin in place a number of full turns. Any whole number of turns lands
    /// back on the starting heading.
    pub fn rotate(&mut self, times: i64) {
        self.orientation += times as f64 * 360.0;
        self.orientation = self.orientation.rem_euclid(360.0);
    }

    /// Take `steps` walking steps of 10 cm each, swaying 5 cm side to side.
    /// Negative steps walk backwards.
    pub fn walk(&mut self, steps: i64) {
        let direction = if steps > 0 { 1.0 } else { -1.0 };

        for step in 0..steps.unsigned_abs() {
            self.move_distance(10.0 * direction);
            if step % 2 == 0 {
                self.position_x += 5.0;
            } else {
                self.position_x -= 5.0;
            }
        }
    }

    /// Moonwalk: each step slides 10 cm opposite to the apparent direction,
    /// with an 8 cm lateral glide.
    pub fn moonwalk(&mut self, steps: i64) {
        let direction = if steps > 0 { 1.0 } else { -1.0 };

        for step in 0..steps.unsigned_abs() {
            self.move_distance(-10.0 * direction);
            if step % 2 == 0 {
                self.position_x += 8.0;
            } else {
                self.position_x -= 8.0;
            }
        }
    }

    /// Run a flat command list against this rover.
    ///
    /// Each entry must be `opcode:parameter` with one of the nine known
    /// opcodes and an integer parameter. `girar:1` cuts over to a right
    /// turn, `girar:-1` to a left turn, and any other turn parameter
    /// re-enables straight driving. Execution stops at the first bad
    /// command.
    pub fn execute(&mut self, commands: &[String]) -> Result<ExecutionReport, CommandError> {
        self.initialize();

        let mut executed = 0;
        for command in commands {
            let (opcode, parameter) = command
                .split_once(':')
                .ok_or_else(|| CommandError::Malformed(command.clone()))?;
            let opcode = Opcode::parse(opcode)
                .ok_or_else(|| CommandError::UnknownOpcode(opcode.to_string()))?;
            let parameter: i64 =
                parameter
                    .parse()
                    .map_err(|_| CommandError::InvalidParameter {
                        opcode: opcode.as_str().to_string(),
                        value: parameter.to_string(),
                    })?;

            self.dispatch(opcode, parameter);
            executed += 1;
        }

        self.finalize();

        Ok(ExecutionReport {
            executed,
            pose: self.pose(),
            distance_travelled: self.distance_travelled,
        })
    }

    fn dispatch(&mut self, opcode: Opcode, parameter: i64) {
        match opcode {
            Opcode::AvanzarVlts => self.move_wheels(parameter),
            Opcode::AvanzarCtms => self.move_cm(parameter),
            Opcode::AvanzarMts => self.move_meters(parameter),
            Opcode::Girar => match parameter {
                1 => self.turn_right(),
                -1 => self.turn_left(),
                _ => self.move_straight(),
            },
            Opcode::Circulo => self.draw_circle(parameter),
            Opcode::Cuadrado => self.draw_square(parameter),
            Opcode::Rotar => self.rotate(parameter),
            Opcode::Caminar => self.walk(parameter),
            Opcode::Moonwalk => self.moonwalk(parameter),
        }
    }

    /// Straight move along the current heading, honoring the motor flags.
    ///
    /// With both motors the rover translates the full distance. With one
    /// motor the heading drifts by [`TURN_DRIFT_DEGREES`] and the rover
    /// covers half the distance; the displacement is computed from the
    /// heading before the drift. With neither motor nothing moves.
    fn move_distance(&mut self, distance: f64) {
        let heading = self.orientation.to_radians();
        let delta_x = distance * heading.cos();
        let delta_y = distance * heading.sin();

        if self.left_motor_enabled && self.right_motor_enabled {
            self.position_x += delta_x;
            self.position_y += delta_y;
            self.distance_travelled += distance.abs();
        } else if self.left_motor_enabled {
            self.orientation += TURN_DRIFT_DEGREES;
            self.position_x += delta_x * 0.5;
            self.position_y += delta_y * 0.5;
            self.distance_travelled += distance.abs() * 0.5;
        } else if self.right_motor_enabled {
            self.orientation -= TURN_DRIFT_DEGREES;
            self.position_x += delta_x * 0.5;
            self.position_y += delta_y * 0.5;
            self.distance_travelled += distance.abs() * 0.5;
        }

        self.orientation = self.orientation.rem_euclid(360.0);

        log_debug!(
            "rover at ({:.2}, {:.2}), heading {:.1}",
            self.position_x,
            self.position_y,
            self.orientation
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn run(commands: &[&str]) -> (VirtualRover, ExecutionReport) {
        let mut rover = VirtualRover::new();
        let commands: Vec<String> = commands.iter().map(|c| c.to_string()).collect();
        let report = rover.execute(&commands).expect("execution failed");
        (rover, report)
    }

    #[test]
    fn straight_move_lands_on_the_x_axis() {
        let (rover, report) = run(&["avanzar_ctms:40"]);

        let pose = rover.pose();
        assert!((pose.x - 40.0).abs() < EPSILON);
        assert!(pose.y.abs() < EPSILON);
        assert!(pose.orientation.abs() < EPSILON);
        assert_eq!(report.executed, 1);
        assert!((report.distance_travelled - 40.0).abs() < EPSILON);
    }

    #[test]
    fn every_advance_unit_converts_to_centimeters() {
        let (wheels, _) = run(&["avanzar_vlts:3"]);
        let (meters, _) = run(&["avanzar_mts:2"]);

        assert!((wheels.pose().x - 60.0).abs() < EPSILON);
        assert!((meters.pose().x - 200.0).abs() < EPSILON);
    }

    #[test]
    fn turning_halves_the_distance_and_drifts_the_heading() {
        let (rover, report) = run(&["girar:1", "avanzar_ctms:40"]);

        let pose = rover.pose();
        // Displacement uses the pre-drift heading, so it stays on the x axis.
        assert!((pose.x - 20.0).abs() < EPSILON);
        assert!(pose.y.abs() < EPSILON);
        assert!((pose.orientation - 10.0).abs() < EPSILON);
        assert!((report.distance_travelled - 20.0).abs() < EPSILON);
    }

    #[test]
    fn left_and_right_turns_drift_in_opposite_directions() {
        let (right, _) = run(&["girar:1", "avanzar_ctms:10"]);
        let (left, _) = run(&["girar:-1", "avanzar_ctms:10"]);

        // Heading grows toward 90 = right in this convention.
        assert!((right.pose().orientation - 10.0).abs() < EPSILON);
        assert!((left.pose().orientation - 350.0).abs() < EPSILON);
    }

    #[test]
    fn going_straight_restores_full_speed() {
        let (rover, _) = run(&["girar:1", "girar:0", "avanzar_ctms:40"]);

        assert!((rover.pose().x - 40.0).abs() < EPSILON);
        assert!(rover.pose().orientation.abs() < EPSILON);
    }

    #[test]
    fn rotation_keeps_the_heading_modulo_full_turns() {
        let (forward, _) = run(&["rotar:3"]);
        let (backward, _) = run(&["rotar:-2"]);

        assert!(forward.pose().orientation.abs() < EPSILON);
        assert!(backward.pose().orientation.abs() < EPSILON);
    }

    #[test]
    fn square_returns_to_its_starting_corner() {
        let (rover, report) = run(&["cuadrado:50"]);

        let pose = rover.pose();
        assert!(pose.x.abs() < EPSILON);
        assert!(pose.y.abs() < EPSILON);
        assert!(pose.orientation.abs() < EPSILON);
        assert!(rover.left_motor_enabled && rover.right_motor_enabled);
        assert!((report.distance_travelled - 200.0).abs() < EPSILON);
    }

    #[test]
    fn circle_ends_just_short_of_closing() {
        let (rover, report) = run(&["circulo:100"]);

        let pose = rover.pose();
        let rad = 355.0_f64.to_radians();
        assert!((pose.x - 100.0 * rad.cos()).abs() < EPSILON);
        assert!((pose.y - 100.0 * rad.sin()).abs() < EPSILON);
        assert!(pose.orientation.abs() < EPSILON);

        let circumference = 2.0 * std::f64::consts::PI * 100.0;
        assert!((report.distance_travelled - circumference).abs() < EPSILON);
    }

    #[test]
    fn walking_sways_but_keeps_moving_forward() {
        let (rover, _) = run(&["caminar:4"]);

        // Four 10 cm steps forward, sways cancelling in pairs.
        assert!((rover.pose().x - 40.0).abs() < EPSILON);
        assert!(rover.pose().y.abs() < EPSILON);
    }

    #[test]
    fn odd_walk_leaves_one_sway_uncancelled() {
        let (rover, _) = run(&["caminar:3"]);

        assert!((rover.pose().x - 35.0).abs() < EPSILON);
    }

    #[test]
    fn moonwalk_slides_backwards() {
        let (rover, _) = run(&["moonwalk:2"]);

        // Two -10 cm slides, the 8 cm glides cancelling in pairs.
        assert!((rover.pose().x + 20.0).abs() < EPSILON);
    }

    #[test]
    fn distance_accumulates_across_commands() {
        let (_, report) = run(&["avanzar_ctms:30", "caminar:2", "avanzar_mts:1"]);

        assert!((report.distance_travelled - 150.0).abs() < EPSILON);
    }

    #[test]
    fn unknown_opcode_is_rejected() {
        let mut rover = VirtualRover::new();
        let err = rover
            .execute(&["saltar:3".to_string()])
            .expect_err("executed an unknown opcode");

        assert_eq!(err, CommandError::UnknownOpcode("saltar".to_string()));
    }

    #[test]
    fn command_without_separator_is_malformed() {
        let mut rover = VirtualRover::new();
        let err = rover
            .execute(&["avanzar_ctms".to_string()])
            .expect_err("executed a malformed command");

        assert_eq!(err, CommandError::Malformed("avanzar_ctms".to_string()));
    }

    #[test]
    fn non_numeric_parameter_is_rejected() {
        let mut rover = VirtualRover::new();
        let err = rover
            .execute(&["girar:derecha".to_string()])
            .expect_err("executed a non-numeric parameter");

        assert_eq!(
            err,
            CommandError::InvalidParameter {
                opcode: "girar".to_string(),
                value: "derecha".to_string(),
            }
        );
    }

    #[test]
    fn execution_stops_at_the_first_bad_command() {
        let mut rover = VirtualRover::new();
        let commands = vec!["avanzar_ctms:10".to_string(), "volar:1".to_string()];

        rover.execute(&commands).expect_err("bad command went through");

        // The first command still ran.
        assert!((rover.pose().x - 10.0).abs() < EPSILON);
    }
}
