#![forbid(unsafe_code)]

pub mod chart;
pub mod extract;
pub mod model;
pub mod time;

pub use time::Clock;
