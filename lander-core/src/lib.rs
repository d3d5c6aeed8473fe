pub mod constants;
pub mod rng;
pub mod sim;

pub use sim::{Action, Environment, LanderSim, Observation, StepOutcome, TerminalKind};
