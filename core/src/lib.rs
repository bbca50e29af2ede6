//! Contract types for the candidate/employer registration API and the
//! synthetic data used to exercise it.

pub mod data;
pub mod messages;
pub mod models;

pub use models::*;
