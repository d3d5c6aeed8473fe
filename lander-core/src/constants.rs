//! Simulation constants.
//!
//! Positions are in pad-relative units (the pad center is the origin, the
//! visible world spans one unit to each side), velocities in units/s, angles
//! in radians measured from vertical (positive counter-clockwise).

// Tick rate
pub const SIM_HZ: f64 = 50.0;
pub const STEP_DT: f64 = 1.0 / SIM_HZ;
pub const MAX_EPISODE_FRAMES: u32 = 1_000; // 20s * 50fps

// World geometry
pub const WORLD_HALF_WIDTH: f64 = 1.0;
pub const WORLD_CEILING: f64 = 2.0;
pub const START_ALTITUDE: f64 = 1.4;

// Hull geometry
pub const LEG_SPAN: f64 = 0.08; // horizontal leg offset from center, body frame
pub const LEG_DROP: f64 = 0.12; // vertical drop from center to leg tip
pub const HULL_CLEARANCE: f64 = 0.05; // center height at which the hull grounds

// Engines
pub const GRAVITY: f64 = -1.8;
pub const MAIN_ENGINE_ACCEL: f64 = 4.0; // full-throttle accel along the body axis
pub const SIDE_ENGINE_ACCEL: f64 = 0.9;
pub const SIDE_ENGINE_TORQUE: f64 = 3.6; // rad/s^2 at full side throttle
pub const MAIN_ENGINE_MIN_THROTTLE: f64 = 0.5;
pub const SIDE_ENGINE_DEADBAND: f64 = 0.5;

// Touchdown thresholds
pub const SETTLE_SPEED: f64 = 0.08; // both legs down and slower than this = settled
pub const SETTLE_SPIN: f64 = 0.12;
pub const CRASH_SPEED: f64 = 0.55; // contact faster than this destroys the lander
pub const CRASH_TILT: f64 = 0.6; // rad; contact at more tilt than this = crash
pub const CONTACT_DAMPING: f64 = 0.45; // velocity retained through a survivable bounce

// Reward shaping
pub const SHAPING_DISTANCE_WEIGHT: f64 = 100.0;
pub const SHAPING_SPEED_WEIGHT: f64 = 100.0;
pub const SHAPING_ANGLE_WEIGHT: f64 = 100.0;
pub const SHAPING_LEG_BONUS: f64 = 10.0;
pub const MAIN_ENGINE_COST: f64 = 0.30; // per frame at full throttle
pub const SIDE_ENGINE_COST: f64 = 0.03;
pub const LANDED_REWARD: f64 = 100.0;
pub const CRASHED_REWARD: f64 = -100.0;

// Spawn spread (drawn fresh from the seeded stream each reset)
pub const SPAWN_X_SPREAD: f64 = 0.4;
pub const SPAWN_VX_SPREAD: f64 = 0.5;
pub const SPAWN_VY_MIN: f64 = -0.4;
pub const SPAWN_VY_MAX: f64 = 0.0;
pub const SPAWN_TILT_SPREAD: f64 = 0.1;
pub const SPAWN_SPIN_SPREAD: f64 = 0.1;

// Observation layout
pub const OBS_X: usize = 0;
pub const OBS_ALTITUDE: usize = 1;
pub const OBS_VX: usize = 2;
pub const OBS_VY: usize = 3;
pub const OBS_ANGLE: usize = 4;
pub const OBS_VANG: usize = 5;
pub const OBS_LEG_LEFT: usize = 6;
pub const OBS_LEG_RIGHT: usize = 7;
pub const OBS_LEN: usize = 8;

pub const ACTION_LEN: usize = 2;
