use std::env;
use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::time::Duration;

use agent_chat_core::DEFAULT_COMMIT_DELAY;
use agent_chat_http::DEFAULT_BASE_URL;
use agent_chat_protocol::DEFAULT_USER_ID;

/// Environment variable holding the backend base URL.
pub const BASE_URL_VAR: &str = "AGENT_CHAT_BASE_URL";

/// Environment variable holding the user identity.
pub const USER_ID_VAR: &str = "AGENT_CHAT_USER_ID";

/// Environment variable holding the commit delay in milliseconds.
pub const COMMIT_DELAY_VAR: &str = "AGENT_CHAT_COMMIT_DELAY_MS";

/// Error returned when the configuration cannot be read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigError {
    var: &'static str,
    value: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} must be a number of milliseconds, got {:?}",
            self.var, self.value
        )
    }
}

impl StdError for ConfigError {}

/// Settings of the terminal front end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliConfig {
    /// Where the backend listens.
    pub base_url: String,
    /// The user whose conversations are shown.
    pub user_id: String,
    /// How long thinking steps stay visible before the answer.
    pub commit_delay: Duration,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_id: DEFAULT_USER_ID.to_owned(),
            commit_delay: DEFAULT_COMMIT_DELAY,
        }
    }
}

impl CliConfig {
    /// Reads the configuration from the process environment.
    #[inline]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`. Unset and empty variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(base_url) = read(BASE_URL_VAR) {
            config.base_url = base_url;
        }
        if let Some(user_id) = read(USER_ID_VAR) {
            config.user_id = user_id;
        }
        if let Some(delay) = read(COMMIT_DELAY_VAR) {
            let millis = delay.parse::<u64>().map_err(|_| ConfigError {
                var: COMMIT_DELAY_VAR,
                value: delay.clone(),
            })?;
            config.commit_delay = Duration::from_millis(millis);
        }
        debug!("configuration: {config:?}");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.user_id, "user");
        assert_eq!(config.commit_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_overrides() {
        let config = CliConfig::from_lookup(lookup_in(&[
            (BASE_URL_VAR, "http://10.0.0.2:9000/chat"),
            (USER_ID_VAR, " alice "),
            (COMMIT_DELAY_VAR, "0"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:9000/chat");
        assert_eq!(config.user_id, "alice");
        assert_eq!(config.commit_delay, Duration::ZERO);
    }

    #[test]
    fn test_empty_values_keep_defaults() {
        let config =
            CliConfig::from_lookup(lookup_in(&[(USER_ID_VAR, "")])).unwrap();
        assert_eq!(config.user_id, "user");
    }

    #[test]
    fn test_invalid_delay() {
        let err =
            CliConfig::from_lookup(lookup_in(&[(COMMIT_DELAY_VAR, "soon")]))
                .unwrap_err();
        assert_eq!(
            err.to_string(),
            "AGENT_CHAT_COMMIT_DELAY_MS must be a number of milliseconds, \
             got \"soon\""
        );
    }
}
