use crate::{CorosError, Credentials, Region};
use secrecy::SecretString;
use std::time::Duration;

pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct Config {
    pub email: String,
    pub password: SecretString,
    pub region: Region,
    /// Overrides the region host, e.g. for a proxy or a local mock.
    pub base_url_override: Option<String>,
    pub timeout: Duration,
    pub default_limit: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, CorosError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function instead of the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, CorosError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let email = get("COROS_EMAIL")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| CorosError::Config("COROS_EMAIL missing".into()))?;
        let password = get("COROS_PASSWORD")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| CorosError::Config("COROS_PASSWORD missing".into()))?;
        let region = match get("COROS_REGION") {
            Some(r) => r.parse()?,
            None => Region::default(),
        };
        let base_url_override = get("COROS_BASE_URL").filter(|v| !v.is_empty());
        let timeout = match get("COROS_TIMEOUT_SECS") {
            Some(v) => parse_positive(&v, "COROS_TIMEOUT_SECS").map(Duration::from_secs)?,
            None => DEFAULT_TIMEOUT,
        };
        let default_limit = match get("COROS_LIMIT") {
            Some(v) => parse_positive(&v, "COROS_LIMIT")? as u32,
            None => DEFAULT_LIMIT,
        };
        Ok(Self {
            email,
            password: SecretString::new(password.into()),
            region,
            base_url_override,
            timeout,
            default_limit,
        })
    }

    /// The API host to talk to: the override when set, else the region host.
    pub fn base_url(&self) -> &str {
        self.base_url_override
            .as_deref()
            .unwrap_or_else(|| self.region.base_url())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.clone(), self.password.clone())
    }
}

fn parse_positive(value: &str, key: &str) -> Result<u64, CorosError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 && n <= u32::MAX as u64 => Ok(n),
        _ => Err(CorosError::Config(format!(
            "{key} must be a positive integer, got '{value}'"
        ))),
    }
}
