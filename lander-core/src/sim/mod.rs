use serde::{Deserialize, Serialize};

use crate::constants::{ACTION_LEN, OBS_LEN};

mod lander;

pub use lander::{main_throttle, side_throttle, LanderSim};

/// Lander state as seen by a controller. Indices are fixed and meaningful;
/// see the `OBS_*` constants. The contact flags at indices 6 and 7 are
/// boolean-valued (0.0 or 1.0).
pub type Observation = [f64; OBS_LEN];

/// Engine commands: [vertical thrust, lateral thrust], each in [-1, 1].
pub type Action = [f64; ACTION_LEN];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalKind {
    Landed,
    Crashed,
    OutOfBounds,
    TimedOut,
}

impl TerminalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landed => "landed",
            Self::Crashed => "crashed",
            Self::OutOfBounds => "out_of_bounds",
            Self::TimedOut => "timed_out",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub terminal: Option<TerminalKind>,
}

/// The narrow seam between the tuning lab and whatever flies the episode.
pub trait Environment {
    /// Begin a new episode and return its initial observation.
    fn reset(&mut self) -> Observation;

    /// Advance one tick under the given engine commands.
    fn step(&mut self, action: Action) -> StepOutcome;

    /// Visual-frame side effect; nothing is returned to the caller.
    fn render(&mut self) {}

    /// Release any resources held by the environment.
    fn close(&mut self) {}
}
