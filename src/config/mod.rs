//! Configuration and settings management.
//!
//! This module provides campaign settings types and loading.
//! Settings are stored in the user's config directory as JSON.

mod settings;

pub use settings::{
    Achievement, CampaignSettings, ConfigError, PortfolioLink, ProfileSettings, RelaySettings,
    Result, SenderSettings, Settings, TlsMode,
};
