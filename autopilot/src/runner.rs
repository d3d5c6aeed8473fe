use crate::controller::{control, Gains};
use crate::recorder::FrameRecorder;
use anyhow::Result;
use lander_sim_core::sim::{Environment, TerminalKind};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EpisodeMetrics {
    pub total_reward: f64,
    pub steps: u32,
    pub terminal: Option<TerminalKind>,
}

/// Fly one episode under the given gains and return its cumulative reward.
///
/// Each step renders, captures the pre-step state into the recorder, computes
/// the action, and then advances the environment, so every captured frame
/// shows the world the controller acted on. The loop carries no step cap of
/// its own; it runs until the environment reports the episode done.
pub fn run_episode<E: Environment>(
    env: &mut E,
    gains: &Gains,
    recorder: &mut dyn FrameRecorder,
) -> Result<EpisodeMetrics> {
    let mut state = env.reset();
    let mut total_reward = 0.0;
    let mut steps = 0u32;

    loop {
        env.render();
        recorder.capture_frame(steps, &state)?;

        let action = control(gains, &state);
        let outcome = env.step(action);

        total_reward += outcome.reward;
        steps += 1;
        state = outcome.observation;

        if outcome.done {
            return Ok(EpisodeMetrics {
                total_reward,
                steps,
                terminal: outcome.terminal,
            });
        }
    }
}
