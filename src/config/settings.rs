//! Campaign settings and configuration types.
//!
//! Settings are persisted to `~/.config/outreach/settings.json` (or XDG equivalent)
//! and loaded once at startup. Every section has defaults, so a missing file is
//! a valid configuration. The SMTP secret is never stored here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("could not determine a configuration directory")]
    NoConfigDir,
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sender identity.
    pub sender: SenderSettings,
    /// Outbound mail relay.
    pub relay: RelaySettings,
    /// Campaign inputs, outputs and pacing.
    pub campaign: CampaignSettings,
    /// Persona rendered into every message.
    pub profile: ProfileSettings,
}

impl Settings {
    /// File name looked up inside the platform config directory.
    pub const FILE_NAME: &'static str = "settings.json";

    /// Returns the default settings path (`<config dir>/settings.json`).
    pub fn default_path() -> Result<PathBuf> {
        directories::ProjectDirs::from("io", "outreach", "outreach")
            .map(|dirs| dirs.config_dir().join(Self::FILE_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Loads settings from `path`, falling back to defaults if the file is absent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let settings: Settings =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.sender.address.trim().is_empty() {
            return Err(invalid("sender.address", "must not be empty"));
        }
        if self.campaign.domain.trim().is_empty() {
            return Err(invalid("campaign.domain", "must not be empty"));
        }
        if self.relay.host.trim().is_empty() {
            return Err(invalid("relay.host", "must not be empty"));
        }
        if self.relay.port == 0 {
            return Err(invalid("relay.port", "must be non-zero"));
        }
        let (min, max) = (
            self.campaign.delay_min_minutes,
            self.campaign.delay_max_minutes,
        );
        if !(min.is_finite() && max.is_finite()) || min < 0.0 {
            return Err(invalid(
                "campaign.delay_min_minutes",
                "delays must be finite and non-negative",
            ));
        }
        if min > max {
            return Err(invalid(
                "campaign.delay_max_minutes",
                format!("must be >= delay_min_minutes ({min})"),
            ));
        }
        if max > CampaignSettings::MAX_DELAY_MINUTES {
            return Err(invalid(
                "campaign.delay_max_minutes",
                format!("must be <= {}", CampaignSettings::MAX_DELAY_MINUTES),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Sender identity used for the From header and SMTP login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderSettings {
    /// Sender address, also the SMTP username.
    pub address: String,
    /// Display name shown in the From header.
    pub display_name: Option<String>,
    /// Keychain entry holding the SMTP secret.
    pub keychain_key: String,
}

impl Default for SenderSettings {
    fn default() -> Self {
        Self {
            address: "me@example.com".to_string(),
            display_name: None,
            keychain_key: "smtp.password".to_string(),
        }
    }
}

/// Transport security used when talking to the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plain connection upgraded with STARTTLS (typically port 587).
    #[default]
    Starttls,
    /// Implicit TLS from the first byte (typically port 465).
    Tls,
}

/// Outbound relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaySettings {
    /// Relay hostname.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Transport security mode.
    pub tls: TlsMode,
    /// Connection and command timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            tls: TlsMode::Starttls,
            timeout_secs: 30,
        }
    }
}

/// Campaign inputs, outputs and pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignSettings {
    /// Company every contact in the table belongs to.
    pub company: String,
    /// Mail domain used for guessed addresses.
    pub domain: String,
    /// Subject line, identical for every send.
    pub subject: String,
    /// Contact table with at least `name` and `title` columns.
    pub contacts_path: PathBuf,
    /// Checkpoint file.
    pub checkpoint_path: PathBuf,
    /// Final results table.
    pub results_path: PathBuf,
    /// Résumé to attach, if present on disk.
    pub resume_path: Option<PathBuf>,
    /// Filename the attachment is sent under.
    pub attachment_filename: String,
    /// Lower bound of the pause after each attempt, in minutes.
    pub delay_min_minutes: f64,
    /// Upper bound of the pause after each attempt, in minutes.
    pub delay_max_minutes: f64,
    /// Advance the checkpoint past a row whose every candidate failed.
    pub advance_on_total_failure: bool,
}

impl CampaignSettings {
    /// Longest allowed pause between attempts (one day).
    pub const MAX_DELAY_MINUTES: f64 = 24.0 * 60.0;
}

impl Default for CampaignSettings {
    fn default() -> Self {
        Self {
            company: "Stripe".to_string(),
            domain: "stripe.com".to_string(),
            subject: "Application for SDE Role at Stripe".to_string(),
            contacts_path: PathBuf::from("linkedin_profiles_final.csv"),
            checkpoint_path: PathBuf::from("email_checkpoint.json"),
            results_path: PathBuf::from("email_sending_results.csv"),
            resume_path: None,
            attachment_filename: "Resume.pdf".to_string(),
            delay_min_minutes: 30.0,
            delay_max_minutes: 60.0,
            advance_on_total_failure: false,
        }
    }
}

/// One highlighted achievement rendered as a bullet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub category: String,
    pub details: String,
}

impl Achievement {
    pub fn new(category: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            details: details.into(),
        }
    }
}

/// A portfolio link shown when links are enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioLink {
    pub label: String,
    pub url: String,
}

/// The sender persona rendered into every message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    /// First name used in signatures.
    pub first_name: String,
    /// Introductory paragraph following the greeting.
    pub introduction: String,
    /// Fixed achievement bullets.
    pub achievements: Vec<Achievement>,
    /// Portfolio links block content.
    pub links: Vec<PortfolioLink>,
    /// Kind of role being applied for.
    pub role_type: String,
    /// Whether to render the links block.
    pub include_links: bool,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            first_name: "Alex".to_string(),
            introduction: "I'm Alex, a Computer Science Master's student graduating this spring \
                with over 2 years of professional software development experience."
                .to_string(),
            achievements: vec![
                Achievement::new(
                    "Backend Development",
                    "Built high-performance microservices handling 100K+ daily users, \
                     including real-time tracking APIs for thousands of drivers.",
                ),
                Achievement::new(
                    "Open Source & Frontend Dev",
                    "Contributed 10+ merged pull requests to large open-source projects, \
                     improving documentation and fixing critical bugs.",
                ),
                Achievement::new(
                    "Technical Leadership",
                    "Led a team of 3 teaching assistants, mentoring 50+ students in C++ \
                     and graphics optimization techniques.",
                ),
                Achievement::new(
                    "Innovation",
                    "Developed a recruitment tool that reduced candidate screening time \
                     by 60% through automated profile analysis.",
                ),
            ],
            links: vec![PortfolioLink {
                label: "LinkedIn".to_string(),
                url: "https://linkedin.com/in/example".to_string(),
            }],
            role_type: "software engineering".to_string(),
            include_links: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.relay.port, 587);
        assert_eq!(settings.relay.tls, TlsMode::Starttls);
        assert_eq!(settings.campaign.delay_min_minutes, 30.0);
        assert_eq!(settings.campaign.delay_max_minutes, 60.0);
        assert!(!settings.campaign.advance_on_total_failure);
        assert!(settings.profile.include_links);
    }

    #[test]
    fn tls_mode_serialization() {
        let json = serde_json::to_string(&TlsMode::Tls).unwrap();
        assert_eq!(json, "\"tls\"");

        let mode: TlsMode = serde_json::from_str("\"starttls\"").unwrap();
        assert_eq!(mode, TlsMode::Starttls);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let json = r#"{ "campaign": { "domain": "acme.io", "company": "Acme" } }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.campaign.domain, "acme.io");
        assert_eq!(settings.campaign.company, "Acme");
        assert_eq!(settings.campaign.delay_max_minutes, 60.0);
        assert_eq!(settings.relay.host, "smtp.gmail.com");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path().join("nope.json")).unwrap();
        assert_eq!(settings.campaign.domain, "stripe.com");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let result = Settings::load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn inverted_delay_range_is_rejected() {
        let mut settings = Settings::default();
        settings.campaign.delay_min_minutes = 10.0;
        settings.campaign.delay_max_minutes = 5.0;

        let err = settings.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "campaign.delay_max_minutes",
                ..
            }
        ));
    }

    #[test]
    fn delay_beyond_one_day_is_rejected() {
        let mut settings = Settings::default();
        settings.campaign.delay_min_minutes = 1e12;
        settings.campaign.delay_max_minutes = 1e12;

        let err = settings.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "campaign.delay_max_minutes",
                ..
            }
        ));

        settings.campaign.delay_min_minutes = 0.0;
        settings.campaign.delay_max_minutes = CampaignSettings::MAX_DELAY_MINUTES;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn empty_domain_is_rejected() {
        let mut settings = Settings::default();
        settings.campaign.domain = "  ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn settings_roundtrip() {
        let mut settings = Settings::default();
        settings.sender.display_name = Some("Alex Example".to_string());
        settings.campaign.resume_path = Some(PathBuf::from("/tmp/resume.pdf"));
        settings.relay.tls = TlsMode::Tls;

        let json = serde_json::to_string_pretty(&settings).unwrap();
        let deserialized: Settings = serde_json::from_str(&json).unwrap();

        assert_eq!(
            deserialized.sender.display_name.as_deref(),
            Some("Alex Example")
        );
        assert_eq!(deserialized.relay.tls, TlsMode::Tls);
        assert_eq!(
            deserialized.campaign.resume_path,
            Some(PathBuf::from("/tmp/resume.pdf"))
        );
        assert_eq!(deserialized.profile.achievements.len(), 4);
    }
}
