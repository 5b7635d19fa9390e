use crate::prelude::*;
use std::time::Duration;

/// Environment variable holding the server root, e.g. `http://127.0.0.1:8084`.
pub const URL_VAR: &str = "BLOGADMIN_URL";
/// Environment variable holding an already issued session cookie.
pub const SESSION_VAR: &str = "BLOGADMIN_SESSION";
/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_VAR: &str = "BLOGADMIN_TIMEOUT";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the admin API
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Server root without a trailing `/`.
    pub base_url: String,
    /// Value sent as the `Cookie` header, if any.
    pub session: Option<String>,
    pub timeout: Duration,
}

impl AdminConfig {
    /// Build the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup(URL_VAR)
            .ok_or_else(|| eyre!("{URL_VAR} environment variable not set (or pass --url)"))?;

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| eyre!("{TIMEOUT_VAR} must be a number of seconds, got '{raw}'"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            base_url: String::new(),
            session: lookup(SESSION_VAR).filter(|s| !s.is_empty()),
            timeout: Duration::from_secs(timeout),
        }
        .with_base_url(&base_url)
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        session: Option<String>,
        timeout: Option<u64>,
    ) -> Result<Self> {
        if let Some(session) = session {
            self.session = Some(session);
        }
        if let Some(secs) = timeout {
            self.timeout = Duration::from_secs(secs);
        }
        match base_url {
            Some(url) => self.with_base_url(&url),
            None => Ok(self),
        }
    }

    fn with_base_url(mut self, url: &str) -> Result<Self> {
        let url = url.trim();
        if !blogadmin_core::url::is_absolute(url) {
            return Err(eyre!(
                "Server URL must start with http:// or https://, got '{}'",
                url
            ));
        }
        self.base_url = url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Resolve configuration from the environment, letting CLI flags win.
    ///
    /// `--url` alone is enough: the environment is only required to provide
    /// the server URL when no flag does.
    pub fn resolve(global: &crate::Global) -> Result<Self> {
        Self::resolve_with(global, |name| std::env::var(name).ok())
    }

    fn resolve_with(
        global: &crate::Global,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let lookup = |name: &str| {
            if name == URL_VAR {
                global.url.clone().or_else(|| env_lookup(name))
            } else {
                env_lookup(name)
            }
        };
        Self::from_lookup(lookup)?.with_overrides(None, global.session.clone(), global.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn global(url: Option<&str>) -> crate::Global {
        crate::Global {
            url: url.map(str::to_string),
            session: None,
            timeout: None,
            verbose: false,
        }
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config =
            AdminConfig::from_lookup(env(&[(URL_VAR, "http://127.0.0.1:8084/")])).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8084");
        assert_eq!(config.session, None);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_from_lookup_reads_everything() {
        let config = AdminConfig::from_lookup(env(&[
            (URL_VAR, "https://blog.example.com"),
            (SESSION_VAR, "session=abc"),
            (TIMEOUT_VAR, "5"),
        ]))
        .unwrap();
        assert_eq!(config.session.as_deref(), Some("session=abc"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_url_is_an_error() {
        let err = AdminConfig::from_lookup(env(&[])).unwrap_err();
        assert!(err.to_string().contains(URL_VAR));
    }

    #[test]
    fn test_bad_timeout_is_an_error() {
        let result = AdminConfig::from_lookup(env(&[
            (URL_VAR, "http://x"),
            (TIMEOUT_VAR, "soon"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_url_without_scheme_is_rejected() {
        let result = AdminConfig::from_lookup(env(&[(URL_VAR, "blog.example.com")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_flag_url_wins_and_env_is_optional() {
        let config =
            AdminConfig::resolve_with(&global(Some("http://flag:1/")), env(&[])).unwrap();
        assert_eq!(config.base_url, "http://flag:1");

        let config = AdminConfig::resolve_with(
            &global(Some("http://flag:1")),
            env(&[(URL_VAR, "http://env:2")]),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://flag:1");
    }

    #[test]
    fn test_overrides() {
        let config = AdminConfig::from_lookup(env(&[(URL_VAR, "http://env:2")]))
            .unwrap()
            .with_overrides(None, Some("s=1".to_string()), Some(3))
            .unwrap();
        assert_eq!(config.base_url, "http://env:2");
        assert_eq!(config.session.as_deref(), Some("s=1"));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
