//! Random-perturbation gain search: perturb, re-fly, keep improvements.

use crate::controller::Gains;
use crate::recorder::NullRecorder;
use crate::runner::run_episode;
use anyhow::Result;
use lander_sim_core::sim::Environment;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::Serialize;

/// Episodes flown per candidate; the simulator randomizes each episode, so a
/// single flight is too noisy to rank candidates on.
pub const TRIALS_PER_CANDIDATE: usize = 5;

/// Best gains/score pair found so far, threaded explicitly through each
/// search step and reassigned by the driver.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Incumbent {
    pub gains: Gains,
    pub score: f64,
}

/// Perturbation noise scale for a 1-based search iteration. Exploration
/// shrinks as the search progresses.
pub fn perturbation_std(iteration: u32) -> f64 {
    assert!(iteration >= 1, "search iterations are 1-based");
    2.0 / f64::from(iteration)
}

/// One search iteration: draw a Gaussian perturbation of the incumbent gains,
/// fly the candidate for [`TRIALS_PER_CANDIDATE`] episodes, and adopt it only
/// if the mean reward strictly beats the incumbent score. A rejected
/// candidate leaves the incumbent untouched.
pub fn search_step<E: Environment, R: Rng>(
    incumbent: Incumbent,
    env: &mut E,
    iteration: u32,
    rng: &mut R,
) -> Result<Incumbent> {
    let std = perturbation_std(iteration);

    let mut candidate = incumbent.gains.to_array();
    for slot in &mut candidate {
        let z: f64 = StandardNormal.sample(rng);
        *slot += std * z;
    }
    let candidate = Gains::from_array(candidate);

    let mut sum = 0.0;
    for _ in 0..TRIALS_PER_CANDIDATE {
        sum += run_episode(env, &candidate, &mut NullRecorder)?.total_reward;
    }
    let mean = sum / TRIALS_PER_CANDIDATE as f64;

    if mean > incumbent.score {
        Ok(Incumbent {
            gains: candidate,
            score: mean,
        })
    } else {
        Ok(incumbent)
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct SearchReport {
    pub iterations: u32,
    pub improvements: u32,
    pub initial_score: f64,
    pub best: Incumbent,
}

/// Drive the full search: score the starting gains with one plain episode,
/// then run `iterations` perturbation steps, logging each accepted
/// improvement.
pub fn run_search<E: Environment, R: Rng>(
    env: &mut E,
    initial_gains: Gains,
    iterations: u32,
    rng: &mut R,
) -> Result<SearchReport> {
    let initial_score = run_episode(env, &initial_gains, &mut NullRecorder)?.total_reward;
    let mut incumbent = Incumbent {
        gains: initial_gains,
        score: initial_score,
    };

    let mut improvements = 0u32;
    for iteration in 1..=iterations {
        let next = search_step(incumbent, env, iteration, rng)?;
        if next.score > incumbent.score {
            improvements += 1;
            let g = next.gains.to_array();
            eprintln!(
                "iter {iteration:>6} | score={:.2} | gains=[{:.5}, {:.5}, {:.5}, {:.5}]",
                next.score, g[0], g[1], g[2], g[3],
            );
        }
        incumbent = next;
    }

    Ok(SearchReport {
        iterations,
        improvements,
        initial_score,
        best: incumbent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_scale_decays_as_two_over_iteration() {
        assert_eq!(perturbation_std(1), 2.0);
        assert_eq!(perturbation_std(2), 1.0);
        assert_eq!(perturbation_std(1000), 0.002);
    }

    #[test]
    #[should_panic(expected = "1-based")]
    fn iteration_zero_is_rejected() {
        perturbation_std(0);
    }
}
