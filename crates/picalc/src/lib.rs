//! PiCalc-rs library — application logic for the pi partial-sum runner.

pub mod app;
pub mod config;
pub mod errors;
pub mod output;
