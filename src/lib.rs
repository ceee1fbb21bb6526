pub mod bot;
pub mod config;
pub mod errors;
pub mod models;
pub mod notifier;
pub mod review;
pub mod startup;
pub mod status;
pub mod validation;

#[cfg(test)]
pub mod test_utils;

pub use bot::{CycleOutcome, StatusBot};
pub use startup::Application;
