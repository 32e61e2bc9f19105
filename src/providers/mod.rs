//! External service providers.
//!
//! - [`email`] - Outbound mail transports (SMTP)

pub mod email;
