pub mod config;
pub mod logger;
pub mod rover;
pub mod rover_link;
pub mod store;
pub mod umgpp;

pub use logger::{LogMessage, Severity};
pub use rover::VirtualRover;
pub use umgpp::{CompileOutcome, Stage, compile};
