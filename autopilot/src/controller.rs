//! Descent control law: two PI channels over state-derived setpoints.

use lander_sim_core::constants::{OBS_ALTITUDE, OBS_ANGLE, OBS_LEG_LEFT, OBS_LEG_RIGHT, OBS_VX, OBS_X};
use lander_sim_core::sim::{Action, Observation};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

/// The four tunable coefficients of the control law, in channel order:
/// altitude proportional/integral, then angle proportional/integral.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gains {
    pub kp_alt: f64,
    pub ki_alt: f64,
    pub kp_ang: f64,
    pub ki_ang: f64,
}

impl Gains {
    pub fn from_array(values: [f64; 4]) -> Self {
        Self {
            kp_alt: values[0],
            ki_alt: values[1],
            kp_ang: values[2],
            ki_ang: values[3],
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.kp_alt, self.ki_alt, self.kp_ang, self.ki_ang]
    }
}

impl Default for Gains {
    fn default() -> Self {
        Gains::from_array(PRESETS[0].2)
    }
}

/// Compute engine commands for the current lander state.
///
/// Both setpoints are derived from the state itself: the altitude target is
/// the horizontal offset magnitude (the lander is allowed to stay high while
/// far from the pad), and the tilt target leans the hull toward the pad in
/// proportion to offset plus drift. The integral channels are recomputed from
/// the instantaneous error on every call; pre-tuned gain sets depend on that
/// memoryless behavior, so it must not grow an accumulator.
pub fn control(gains: &Gains, state: &Observation) -> Action {
    let alt_target = state[OBS_X].abs();
    let ang_target = FRAC_PI_4 * (state[OBS_X] + state[OBS_VX]);

    let alt_error = alt_target - state[OBS_ALTITUDE];
    let ang_error = ang_target - state[OBS_ANGLE];

    let alt_adj = gains.kp_alt * alt_error + gains.ki_alt * alt_error;
    let ang_adj = gains.kp_ang * ang_error + gains.ki_ang * ang_error;

    let mut action = [alt_adj.clamp(-1.0, 1.0), ang_adj.clamp(-1.0, 1.0)];

    // Engines cut the moment a leg reports ground contact.
    if state[OBS_LEG_LEFT] != 0.0 || state[OBS_LEG_RIGHT] != 0.0 {
        action = [0.0, 0.0];
    }

    action
}

const PRESETS: [(&str, &str, [f64; 4]); 3] = [
    (
        "softstep",
        "Mainline tuned set; the usual starting point for further search",
        [1.145_390_2, 2.512_411_78, -4.904_496_47, 3.503_991_9],
    ),
    (
        "veteran",
        "Older tuned set with an inverted altitude-integral channel",
        [3.424_497_22, -3.137_780_14, -4.818_120_7, 5.048_943_21],
    ),
    (
        "showcase",
        "Flight-log demo set; flies a photogenic approach",
        [-0.567_878_2, 6.945_416_76, -4.554_199_96, 3.516_333_15],
    ),
];

pub fn preset(id: &str) -> Option<Gains> {
    PRESETS
        .iter()
        .find(|(name, _, _)| *name == id)
        .map(|(_, _, values)| Gains::from_array(*values))
}

pub fn preset_ids() -> Vec<&'static str> {
    PRESETS.iter().map(|(name, _, _)| *name).collect()
}

pub fn describe_presets() -> Vec<(&'static str, &'static str)> {
    PRESETS
        .iter()
        .map(|(name, description, _)| (*name, *description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_example_from_two_units_right() {
        let gains = Gains::from_array([1.0, 0.0, 0.0, 0.0]);
        let state = [2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let action = control(&gains, &state);
        // altitude target 2, error 2, raw command 2 clamps to 1; angle gains
        // are zero so the lateral channel stays cold.
        assert_eq!(action, [1.0, 0.0]);
    }

    #[test]
    fn leg_contact_cuts_engines() {
        let gains = Gains::from_array([1.0, 0.0, 0.0, 0.0]);
        let mut state = [2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        state[6] = 1.0;
        assert_eq!(control(&gains, &state), [0.0, 0.0]);

        state[6] = 0.0;
        state[7] = 1.0;
        assert_eq!(control(&gains, &state), [0.0, 0.0]);
    }

    #[test]
    fn output_is_clamped_for_wild_gains() {
        let state = [0.8, 1.2, -0.4, -0.6, 0.3, 0.1, 0.0, 0.0];
        for gains in [
            Gains::from_array([1e9, -1e9, 1e9, 1e9]),
            Gains::from_array([-250.0, 300.0, 17.5, -42.0]),
            Gains::from_array([0.0, 0.0, 0.0, 0.0]),
        ] {
            let action = control(&gains, &state);
            assert!((-1.0..=1.0).contains(&action[0]), "{action:?}");
            assert!((-1.0..=1.0).contains(&action[1]), "{action:?}");
        }
    }

    #[test]
    fn control_is_pure() {
        let gains = preset("softstep").unwrap();
        let state = [0.3, 0.9, -0.2, -0.5, 0.08, -0.02, 0.0, 0.0];
        assert_eq!(control(&gains, &state), control(&gains, &state));
    }

    #[test]
    fn integral_channel_mirrors_proportional_channel() {
        // With no accumulator the two channels fold into (kp + ki) * error,
        // so splitting one combined gain across both slots changes nothing.
        let state = [0.4, 0.7, 0.1, -0.3, 0.05, 0.0, 0.0, 0.0];
        let combined = control(&Gains::from_array([1.4, 0.0, -2.0, 0.0]), &state);
        let split = control(&Gains::from_array([0.9, 0.5, -1.2, -0.8]), &state);
        assert!((combined[0] - split[0]).abs() < 1e-12);
        assert!((combined[1] - split[1]).abs() < 1e-12);
    }

    #[test]
    fn preset_roster_round_trips() {
        for id in preset_ids() {
            let gains = preset(id).expect("roster id resolves");
            assert_eq!(Gains::from_array(gains.to_array()), gains);
        }
        assert!(preset("no-such-profile").is_none());
    }
}
