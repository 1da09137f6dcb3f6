use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
pub const DEFAULT_AUTH_SCHEME: &str = "JWT";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Where the pool REST API lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_scheme: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Reads `POOL_API_BASE_URL`, `POOL_API_AUTH_SCHEME` and
    /// `POOL_API_TIMEOUT_SECS`, falling back to local development defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut base_url = non_empty("POOL_API_BASE_URL").unwrap_or(defaults.base_url);
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let timeout = non_empty("POOL_API_TIMEOUT_SECS")
            .and_then(|secs| secs.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            base_url,
            auth_scheme: non_empty("POOL_API_AUTH_SCHEME").unwrap_or(defaults.auth_scheme),
            timeout,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn authorization(&self, token: &str) -> String {
        format!("{} {}", self.auth_scheme, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(ApiConfig::from_lookup(lookup(&[])), ApiConfig::default());
    }

    #[test]
    fn base_url_gets_a_trailing_slash() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("POOL_API_BASE_URL", "https://api.example.org/v1"),
            ("POOL_API_AUTH_SCHEME", "Bearer"),
            ("POOL_API_TIMEOUT_SECS", "5"),
        ]));

        assert_eq!(config.endpoint("/pool/all/"), "https://api.example.org/v1/pool/all/");
        assert_eq!(config.authorization("abc"), "Bearer abc");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_falls_back() {
        let config = ApiConfig::from_lookup(lookup(&[("POOL_API_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
