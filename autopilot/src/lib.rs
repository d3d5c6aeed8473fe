pub mod benchmark;
pub mod controller;
pub mod recorder;
pub mod runner;
pub mod tuner;
pub mod util;
