//! Domain layer types for the outreach campaign.
//!
//! This module contains the core domain types used throughout the crate:
//! contact rows, sent-email records and the persisted checkpoint.

mod checkpoint;
mod contact;
mod record;

pub use checkpoint::Checkpoint;
pub use contact::{first_name, Contact};
pub use record::{SendStatus, SentEmail, RESULT_COLUMNS};
