//! Route handlers.

pub mod analyze;
pub mod entries;
pub mod health;
pub mod students;
