//! Configuration module for environment variable parsing.
//!
//! The function has a single required setting, the reCAPTCHA shared secret.
//! Everything else only concerns the local HTTP host.

use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret sent to the verifier alongside each token
    pub recaptcha_secret: Option<String>,

    /// Port for the host server to listen on
    pub port: u16,

    /// Return the verifier payload as a success envelope when it carries a score
    pub relay_verified_as_success: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            recaptcha_secret: env::var("RECAPTCHA_SECRET").ok(),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            relay_verified_as_success: parse_flag("RELAY_VERIFIED_AS_SUCCESS"),
        }
    }

    /// The secret as sent on the wire. An unset secret is sent as an empty value.
    pub fn secret(&self) -> &str {
        self.recaptcha_secret.as_deref().unwrap_or_default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            recaptcha_secret: None,
            port: 8080,
            relay_verified_as_success: false,
        }
    }
}

/// Parse a boolean flag such as "true", "1", "yes".
fn parse_flag(name: &str) -> bool {
    env::var(name)
        .map(|raw| {
            matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_truthy() {
        env::set_var("TEST_FLAG_TRUTHY", " True ");
        assert!(parse_flag("TEST_FLAG_TRUTHY"));
        env::set_var("TEST_FLAG_TRUTHY", "1");
        assert!(parse_flag("TEST_FLAG_TRUTHY"));
        env::remove_var("TEST_FLAG_TRUTHY");
    }

    #[test]
    fn test_parse_flag_falsy() {
        env::set_var("TEST_FLAG_FALSY", "nope");
        assert!(!parse_flag("TEST_FLAG_FALSY"));
        env::remove_var("TEST_FLAG_FALSY");
        assert!(!parse_flag("TEST_FLAG_FALSY"));
    }

    #[test]
    fn test_secret_defaults_to_empty() {
        let config = Config::default();
        assert_eq!(config.secret(), "");

        let config = Config {
            recaptcha_secret: Some("shh".to_string()),
            ..Config::default()
        };
        assert_eq!(config.secret(), "shh");
    }
}
