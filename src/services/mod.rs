//! Campaign services layer.
//!
//! This module contains the services that carry the campaign logic,
//! coordinating between providers, storage, and domain types.
//!
//! # Architecture
//!
//! ```text
//!        main (CLI)
//!            |
//!            v
//!    Services Layer  <-- You are here
//!            |
//!            v
//! Infrastructure (Providers, Storage)
//! ```
//!
//! # Services Overview
//!
//! - [`AddressGuesser`]: Derives candidate addresses from a contact name
//! - [`MessageComposer`]: Renders the HTML message body
//! - [`SenderService`]: Delivers one message and contains any fault
//! - [`CampaignService`]: Drives the resumable, paced campaign loop
//!
//! Randomness and pacing are injected through [`Randomness`] and [`Pacer`].

mod address_service;
mod campaign_service;
mod composer_service;
mod pacing;
mod randomness;
mod sender_service;

pub use address_service::AddressGuesser;
pub use campaign_service::{CampaignError, CampaignService, CampaignSummary};
pub use composer_service::{
    ComposeRequest, MessageComposer, CALLS_TO_ACTION, GREETINGS, RATIONALES, SIGN_OFFS,
};
pub use pacing::{minutes, Pacer, TokioPacer};
pub use randomness::{FixedRandomness, Randomness, ThreadRandomness};
pub use sender_service::{SenderService, ATTACHMENT_CONTENT_TYPE};
