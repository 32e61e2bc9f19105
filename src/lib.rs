//! outreach - A resumable, paced cold-outreach mailer
//!
//! This crate guesses recruiter addresses from names, renders a personalized
//! HTML message, delivers it over SMTP, and checkpoints progress so a long
//! campaign can stop and resume without re-emailing anyone.

pub mod config;
pub mod domain;
pub mod providers;
pub mod services;
pub mod storage;

pub use services::{CampaignService, CampaignSummary};
