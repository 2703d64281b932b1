pub mod catalog;
pub mod display;
pub mod quiz;
pub mod reactor;
pub mod telemetry;
pub mod time;
pub mod vote;
