//! Gateway configuration.
//!
//! Loads merchant settings from a TOML file with `$VAR` / `${VAR}`
//! environment expansion in string values, or builds them directly. The
//! resulting [`GatewayConfig`] is an explicit context object: components
//! that need credentials, base URLs, or TTLs take it (or parts of it) by
//! parameter. There is no ambient global.
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "sandbox"
//! client_id = "merchant-1"
//! client_secret = "$BANKPAY_CLIENT_SECRET"
//! scope = "merchant-api"
//! cache_ttl_secs = 3600
//! ```
//!
//! # Environment Variables
//!
//! - `BANKPAY_CONFIG` — path to the configuration file (default:
//!   `bankpay.toml`)
//! - Secrets referenced by `$VAR` in string values

use serde::{Deserialize, Serialize};

use crate::auth::Jwt;
use crate::error::{ConfigError, ValidationError};

/// Which gateway deployment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Test deployment; payments are simulated.
    Sandbox,
    /// Live deployment.
    Production,
}

impl Environment {
    /// Base URL of the merchant API for this environment.
    #[must_use]
    pub const fn api_base(self) -> &'static str {
        match self {
            Self::Sandbox => "https://api.sandbox.bankpay.example",
            Self::Production => "https://api.bankpay.example",
        }
    }

    /// Base URL of the auth endpoint for this environment.
    #[must_use]
    pub const fn auth_base(self) -> &'static str {
        match self {
            Self::Sandbox => "https://auth.sandbox.bankpay.example",
            Self::Production => "https://auth.bankpay.example",
        }
    }
}

/// Merchant-level SDK configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Target deployment (default: sandbox).
    #[serde(default = "default_environment")]
    pub environment: Environment,

    /// Merchant client id.
    pub client_id: String,

    /// Merchant client secret. Supports `$VAR` / `${VAR}` expansion.
    pub client_secret: String,

    /// OAuth scope requested on credential exchange.
    #[serde(default = "default_scope")]
    pub scope: String,

    /// TTL for cached gateway data, in seconds (0 = never expire).
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

const fn default_environment() -> Environment {
    Environment::Sandbox
}

fn default_scope() -> String {
    "merchant-api".to_owned()
}

const fn default_cache_ttl() -> u64 {
    3600
}

impl GatewayConfig {
    /// Loads configuration from the path given by the `BANKPAY_CONFIG`
    /// environment variable, falling back to `bankpay.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or
    /// when a required key is missing after expansion.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("BANKPAY_CONFIG").unwrap_or_else(|_| "bankpay.toml".to_owned());
        Self::load_from(&path)
    }

    /// Loads configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or
    /// when a required key is missing after expansion.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let expanded = expand_env_vars(&raw);
        let config: Self = toml::from_str(&expanded)?;
        config.check_required()?;
        Ok(config)
    }

    fn check_required(&self) -> Result<(), ConfigError> {
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::MissingKey("client_id"));
        }
        if self.client_secret.trim().is_empty() {
            return Err(ConfigError::MissingKey("client_secret"));
        }
        Ok(())
    }

    /// Builds the credential configuration for this merchant.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the credentials fail validation.
    pub fn credentials(&self) -> Result<Jwt, ValidationError> {
        Jwt::new(&self.client_id, &self.client_secret, &self.scope)
    }
}

/// Expands `$VAR` and `${VAR}` patterns from environment variables.
/// Unresolved variables are left as-is.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }
        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut var_name = String::new();
        while let Some(&c) = chars.peek() {
            if braced {
                if c == '}' {
                    chars.next();
                    break;
                }
            } else if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            var_name.push(c);
            chars.next();
        }

        if var_name.is_empty() {
            result.push('$');
            if braced {
                result.push('{');
            }
        } else if let Ok(value) = std::env::var(&var_name) {
            result.push_str(&value);
        } else {
            result.push('$');
            if braced {
                result.push('{');
            }
            result.push_str(&var_name);
            if braced {
                result.push('}');
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply() {
        let config: GatewayConfig =
            toml::from_str("client_id = \"m-1\"\nclient_secret = \"s\"\n").unwrap();
        assert_eq!(config.environment, Environment::Sandbox);
        assert_eq!(config.scope, "merchant-api");
        assert_eq!(config.cache_ttl_secs, 3600);
    }

    #[test]
    fn test_environment_base_urls_differ() {
        assert_ne!(
            Environment::Sandbox.api_base(),
            Environment::Production.api_base()
        );
        assert_ne!(
            Environment::Sandbox.auth_base(),
            Environment::Production.auth_base()
        );
    }

    #[test]
    fn test_expand_env_vars_leaves_unresolved_as_is() {
        let input = "secret = \"$BANKPAY_TEST_UNSET_VAR\"";
        assert_eq!(expand_env_vars(input), input);
        let braced = "secret = \"${BANKPAY_TEST_UNSET_VAR}\"";
        assert_eq!(expand_env_vars(braced), braced);
    }

    #[test]
    fn test_expand_env_vars_substitutes() {
        // SAFETY: test-local variable name, no concurrent reader depends on it.
        unsafe { std::env::set_var("BANKPAY_TEST_SECRET", "hunter2") };
        assert_eq!(
            expand_env_vars("x = \"${BANKPAY_TEST_SECRET}\""),
            "x = \"hunter2\""
        );
    }

    #[test]
    fn test_missing_credentials_are_config_errors() {
        let config: GatewayConfig =
            toml::from_str("client_id = \" \"\nclient_secret = \"s\"\n").unwrap();
        assert!(matches!(
            config.check_required().unwrap_err(),
            ConfigError::MissingKey("client_id")
        ));
    }

    #[test]
    fn test_credentials_build_a_jwt() {
        let config: GatewayConfig =
            toml::from_str("client_id = \"m-1\"\nclient_secret = \"s\"\n").unwrap();
        let jwt = config.credentials().unwrap();
        assert_eq!(jwt.client_id(), "m-1");
        assert_eq!(jwt.scope(), "merchant-api");
    }
}
