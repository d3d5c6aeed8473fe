use crate::constants::{
    CONTACT_DAMPING, CRASHED_REWARD, CRASH_SPEED, CRASH_TILT, GRAVITY, HULL_CLEARANCE,
    LANDED_REWARD, LEG_DROP, LEG_SPAN, MAIN_ENGINE_ACCEL, MAIN_ENGINE_COST,
    MAIN_ENGINE_MIN_THROTTLE, MAX_EPISODE_FRAMES, SETTLE_SPEED, SETTLE_SPIN,
    SHAPING_ANGLE_WEIGHT, SHAPING_DISTANCE_WEIGHT, SHAPING_LEG_BONUS, SHAPING_SPEED_WEIGHT,
    SIDE_ENGINE_ACCEL, SIDE_ENGINE_COST, SIDE_ENGINE_DEADBAND, SIDE_ENGINE_TORQUE,
    SPAWN_SPIN_SPREAD, SPAWN_TILT_SPREAD, SPAWN_VX_SPREAD, SPAWN_VY_MAX, SPAWN_VY_MIN,
    SPAWN_X_SPREAD, START_ALTITUDE, STEP_DT, WORLD_CEILING, WORLD_HALF_WIDTH,
};
use crate::rng::SeededRng;
use crate::sim::{Action, Environment, Observation, StepOutcome, TerminalKind};

/// Main-engine throttle for a commanded value. The engine only lights for
/// positive commands and never below half throttle.
pub fn main_throttle(command: f64) -> f64 {
    if command <= 0.0 {
        0.0
    } else {
        MAIN_ENGINE_MIN_THROTTLE + (1.0 - MAIN_ENGINE_MIN_THROTTLE) * command.clamp(0.0, 1.0)
    }
}

/// Side-thruster (sign, throttle) for a commanded value. Commands inside the
/// deadband leave both thrusters cold.
pub fn side_throttle(command: f64) -> (f64, f64) {
    if command.abs() <= SIDE_ENGINE_DEADBAND {
        (0.0, 0.0)
    } else {
        (
            command.signum(),
            command.abs().clamp(SIDE_ENGINE_DEADBAND, 1.0),
        )
    }
}

fn contact_flag(touching: bool) -> f64 {
    if touching {
        1.0
    } else {
        0.0
    }
}

/// Deterministic 2D lander over a flat pad at the origin.
///
/// The construction seed fixes the whole run: initial conditions for each
/// episode are drawn from one persistent stream, so repeated `reset()` calls
/// give differing episodes while the full sequence replays exactly from the
/// same seed.
pub struct LanderSim {
    rng: SeededRng,
    frame_count: u32,
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    angle: f64,
    vang: f64,
    leg_left: bool,
    leg_right: bool,
    shaping: f64,
    done: bool,
}

impl LanderSim {
    pub fn new(seed: u32) -> Self {
        let mut sim = Self {
            rng: SeededRng::new(seed),
            frame_count: 0,
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            angle: 0.0,
            vang: 0.0,
            leg_left: false,
            leg_right: false,
            shaping: 0.0,
            done: false,
        };
        sim.spawn();
        sim
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn observation(&self) -> Observation {
        [
            self.x,
            self.y,
            self.vx,
            self.vy,
            self.angle,
            self.vang,
            contact_flag(self.leg_left),
            contact_flag(self.leg_right),
        ]
    }

    fn spawn(&mut self) {
        self.frame_count = 0;
        self.x = self.rng.next_signed(SPAWN_X_SPREAD);
        self.y = START_ALTITUDE;
        self.vx = self.rng.next_signed(SPAWN_VX_SPREAD);
        self.vy = self.rng.next_range_f64(SPAWN_VY_MIN, SPAWN_VY_MAX);
        self.angle = self.rng.next_signed(SPAWN_TILT_SPREAD);
        self.vang = self.rng.next_signed(SPAWN_SPIN_SPREAD);
        self.leg_left = false;
        self.leg_right = false;
        self.done = false;
        self.shaping = self.shaping_potential();
    }

    fn shaping_potential(&self) -> f64 {
        -SHAPING_DISTANCE_WEIGHT * self.x.hypot(self.y)
            - SHAPING_SPEED_WEIGHT * self.vx.hypot(self.vy)
            - SHAPING_ANGLE_WEIGHT * self.angle.abs()
            + SHAPING_LEG_BONUS * contact_flag(self.leg_left)
            + SHAPING_LEG_BONUS * contact_flag(self.leg_right)
    }

    /// World-space heights of the left and right leg tips above the pad.
    fn leg_heights(&self) -> (f64, f64) {
        let (sin_a, cos_a) = self.angle.sin_cos();
        let drop = LEG_DROP * cos_a;
        let left = self.y - LEG_SPAN * sin_a - drop;
        let right = self.y + LEG_SPAN * sin_a - drop;
        (left, right)
    }

    fn advance(&mut self, action: Action) -> StepOutcome {
        assert!(!self.done, "step on a finished episode; reset first");
        self.frame_count += 1;

        let main = main_throttle(action[0]);
        let (side_sign, side) = side_throttle(action[1]);

        let (sin_a, cos_a) = self.angle.sin_cos();
        let ax = -sin_a * MAIN_ENGINE_ACCEL * main + side_sign * SIDE_ENGINE_ACCEL * side * cos_a;
        let ay = cos_a * MAIN_ENGINE_ACCEL * main
            + side_sign * SIDE_ENGINE_ACCEL * side * sin_a
            + GRAVITY;
        // The side thruster sits above the center of mass, so its push torques
        // the hull opposite to the translation it produces.
        self.vang -= side_sign * SIDE_ENGINE_TORQUE * side * STEP_DT;

        self.vx += ax * STEP_DT;
        self.vy += ay * STEP_DT;
        self.x += self.vx * STEP_DT;
        self.y += self.vy * STEP_DT;
        self.angle += self.vang * STEP_DT;

        let (left_h, right_h) = self.leg_heights();
        let touching_left = left_h <= 0.0;
        let touching_right = right_h <= 0.0;
        let speed = self.vx.hypot(self.vy);

        let mut terminal = None;
        if self.x.abs() >= WORLD_HALF_WIDTH || self.y >= WORLD_CEILING {
            terminal = Some(TerminalKind::OutOfBounds);
        } else if self.y <= HULL_CLEARANCE
            || ((touching_left || touching_right)
                && (speed > CRASH_SPEED || self.angle.abs() > CRASH_TILT))
        {
            terminal = Some(TerminalKind::Crashed);
        } else if touching_left
            && touching_right
            && speed <= SETTLE_SPEED
            && self.vang.abs() <= SETTLE_SPIN
        {
            terminal = Some(TerminalKind::Landed);
        } else if touching_left || touching_right {
            // Survivable bounce: hold the lowest tip at the surface and bleed
            // velocity so a slow touchdown settles over the next few frames.
            let penetration = (-left_h).max(-right_h).max(0.0);
            self.y += penetration;
            if self.vy < 0.0 {
                self.vy = -self.vy * CONTACT_DAMPING;
            }
            self.vx *= CONTACT_DAMPING;
            self.vang *= CONTACT_DAMPING;
        }

        if terminal.is_none() && self.frame_count >= MAX_EPISODE_FRAMES {
            terminal = Some(TerminalKind::TimedOut);
        }

        self.leg_left = touching_left;
        self.leg_right = touching_right;

        let potential = self.shaping_potential();
        let mut reward = potential - self.shaping;
        self.shaping = potential;
        reward -= MAIN_ENGINE_COST * main;
        reward -= SIDE_ENGINE_COST * side;
        match terminal {
            Some(TerminalKind::Landed) => reward += LANDED_REWARD,
            Some(TerminalKind::Crashed) | Some(TerminalKind::OutOfBounds) => {
                reward += CRASHED_REWARD
            }
            Some(TerminalKind::TimedOut) | None => {}
        }

        self.done = terminal.is_some();
        StepOutcome {
            observation: self.observation(),
            reward,
            done: self.done,
            terminal,
        }
    }
}

impl Environment for LanderSim {
    fn reset(&mut self) -> Observation {
        self.spawn();
        self.observation()
    }

    fn step(&mut self, action: Action) -> StepOutcome {
        self.advance(action)
    }
}
