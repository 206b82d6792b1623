//! connection target configuration
//!
//! Settings come from an optional env file (yaml) and are overridden by flags and environment
//! variables:
//!
//! ```yaml
//! target: opsman.example.com
//! token: eyJhbGciOi...
//! skip-ssl-validation: true
//! request-timeout: 600
//! ```
//!
//! Unknown keys in the env file are ignored so existing env files can be reused.
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(1800);

/// Partial settings from a single source
#[derive(Debug, Default, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetSettings {
    pub target: Option<String>,
    pub token: Option<String>,
    pub skip_ssl_validation: Option<bool>,
    /// seconds
    pub request_timeout: Option<u64>,
}

impl TargetSettings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!(path=%path.display(), "loading env file");
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Layer `overrides` on top of `self`
    pub fn merge(self, overrides: TargetSettings) -> Self {
        Self {
            target: overrides.target.or(self.target),
            token: overrides.token.or(self.token),
            skip_ssl_validation: overrides.skip_ssl_validation.or(self.skip_ssl_validation),
            request_timeout: overrides.request_timeout.or(self.request_timeout),
        }
    }

    pub fn resolve(self) -> Result<Target, ConfigError> {
        let target = self.target.ok_or(ConfigError::MissingTarget)?;
        let url = if target.contains("://") {
            Url::parse(&target)
        } else {
            Url::parse(&format!("https://{target}"))
        }
        .map_err(|source| ConfigError::InvalidTarget {
            target: target.clone(),
            source,
        })?;

        Ok(Target {
            url,
            token: self.token,
            skip_ssl_validation: self.skip_ssl_validation.unwrap_or(false),
            request_timeout: self
                .request_timeout
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        })
    }
}

/// Fully resolved connection target
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub url: Url,
    pub token: Option<String>,
    pub skip_ssl_validation: bool,
    pub request_timeout: Duration,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error")]
    Io(#[from] std::io::Error),
    #[error("Unable to parse env file")]
    Yaml(#[from] serde_yaml::Error),
    #[error("target is required (--target, OM_TARGET or env file)")]
    MissingTarget,
    #[error("invalid target '{target}'")]
    InvalidTarget {
        target: String,
        source: url::ParseError,
    },
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn load_env_file_ignores_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "target: opsman.example.com\nusername: admin\nskip-ssl-validation: true\nrequest-timeout: 60"
        )
        .unwrap();

        let settings = TargetSettings::load(file.path()).unwrap();
        assert_eq!(
            settings,
            TargetSettings {
                target: Some("opsman.example.com".to_string()),
                token: None,
                skip_ssl_validation: Some(true),
                request_timeout: Some(60),
            }
        );
    }

    #[test]
    fn overrides_win() {
        let file = TargetSettings {
            target: Some("from-file".to_string()),
            token: Some("file-token".to_string()),
            skip_ssl_validation: Some(true),
            request_timeout: None,
        };
        let flags = TargetSettings {
            target: Some("from-flags".to_string()),
            ..Default::default()
        };

        let merged = file.merge(flags);
        assert_eq!(merged.target.as_deref(), Some("from-flags"));
        assert_eq!(merged.token.as_deref(), Some("file-token"));
        assert_eq!(merged.skip_ssl_validation, Some(true));
    }

    #[test]
    fn resolve_defaults() {
        let target = TargetSettings {
            target: Some("opsman.example.com".to_string()),
            ..Default::default()
        }
        .resolve()
        .unwrap();

        assert_eq!(target.url.as_str(), "https://opsman.example.com/");
        assert!(!target.skip_ssl_validation);
        assert_eq!(target.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn resolve_keeps_explicit_scheme() {
        let target = TargetSettings {
            target: Some("http://127.0.0.1:8080".to_string()),
            ..Default::default()
        }
        .resolve()
        .unwrap();

        assert_eq!(target.url.as_str(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn resolve_requires_target() {
        assert!(matches!(
            TargetSettings::default().resolve(),
            Err(ConfigError::MissingTarget)
        ));
    }
}
