//! # Suite environment
//!
//! Resolves where the scenarios send their requests. Values are layered:
//! built-in defaults, then `PETSTORE_*` environment variables, then whatever
//! the command line overrides.

use std::collections::HashMap;

use crate::error::{Result, SuiteError};

pub const DEFAULT_BASE_URL: &str = "https://petstore.swagger.io/v2";

pub const BASE_URL_VAR: &str = "PETSTORE_BASE_URL";
pub const TIMEOUT_VAR: &str = "PETSTORE_TIMEOUT_MS";
pub const PROXY_VAR: &str = "PETSTORE_PROXY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteConfig {
    pub base_url: String,
    pub timeout_ms: Option<u64>,
    pub proxy_url: Option<String>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: None,
            proxy_url: None,
        }
    }
}

/// Raw `PETSTORE_*` values. Nothing is parsed until [`EnvLayer::resolve`],
/// so a flag can replace a malformed variable before it is ever read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvLayer {
    pub base_url: Option<String>,
    pub timeout_ms: Option<String>,
    pub proxy_url: Option<String>,
}

impl EnvLayer {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Collect the layer from an arbitrary variable source. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            base_url: get(BASE_URL_VAR),
            timeout_ms: get(TIMEOUT_VAR),
            proxy_url: get(PROXY_VAR),
        }
    }

    /// Parse the layer over the defaults and validate the result.
    pub fn resolve(self) -> Result<SuiteConfig> {
        let mut config = SuiteConfig::default();
        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if let Some(raw) = self.timeout_ms {
            let ms = raw.parse::<u64>().map_err(|e| SuiteError::InvalidConfig {
                field: TIMEOUT_VAR.to_string(),
                reason: format!("`{raw}` is not a number of milliseconds: {e}"),
            })?;
            config.timeout_ms = Some(ms);
        }
        config.proxy_url = self.proxy_url;

        config.validate()
    }
}

impl SuiteConfig {
    pub fn from_env() -> Result<Self> {
        EnvLayer::from_env().resolve()
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        EnvLayer::from_lookup(lookup).resolve()
    }

    /// Normalise and check the base URL. Only http and https are accepted;
    /// a trailing slash is dropped so paths can be appended verbatim.
    pub fn validate(mut self) -> Result<Self> {
        let parsed = reqwest::Url::parse(&self.base_url).map_err(|e| SuiteError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SuiteError::InvalidBaseUrl {
                url: self.base_url,
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }
        if self.timeout_ms == Some(0) {
            self.timeout_ms = None;
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        Ok(self)
    }
}

/// Fill `{name}` placeholders in a path template such as `/pet/{id}`.
pub fn expand_path(template: &str, params: &HashMap<String, String>) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| SuiteError::MissingPathParam(after.to_string()))?;
        let name = &after[..close];
        let value = params
            .get(name)
            .ok_or_else(|| SuiteError::MissingPathParam(name.to_string()))?;
        result.push_str(value);
        rest = &after[close + 1..];
    }
    result.push_str(rest);

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = SuiteConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, SuiteConfig::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn variables_override_defaults() {
        let config = SuiteConfig::from_lookup(lookup_from(&[
            (BASE_URL_VAR, "http://localhost:8080/v2/"),
            (TIMEOUT_VAR, "2500"),
            (PROXY_VAR, "http://proxy:3128"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/v2");
        assert_eq!(config.timeout_ms, Some(2500));
        assert_eq!(config.proxy_url.as_deref(), Some("http://proxy:3128"));
    }

    #[test]
    fn blank_variables_are_ignored() {
        let config =
            SuiteConfig::from_lookup(lookup_from(&[(BASE_URL_VAR, "  "), (PROXY_VAR, "")])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.proxy_url.is_none());
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = SuiteConfig::from_lookup(lookup_from(&[(TIMEOUT_VAR, "soon")])).unwrap_err();
        assert!(matches!(err, SuiteError::InvalidConfig { .. }));
    }

    #[test]
    fn layer_keeps_raw_values_until_resolved() {
        let layer = EnvLayer::from_lookup(lookup_from(&[
            (BASE_URL_VAR, "not a url"),
            (TIMEOUT_VAR, " soon "),
        ]));
        assert_eq!(layer.base_url.as_deref(), Some("not a url"));
        assert_eq!(layer.timeout_ms.as_deref(), Some("soon"));
        assert!(layer.proxy_url.is_none());
        assert!(layer.resolve().is_err());
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let config = SuiteConfig {
            base_url: "ftp://petstore.example/v2".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SuiteError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn zero_timeout_means_client_default() {
        let config = SuiteConfig {
            timeout_ms: Some(0),
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap().timeout_ms, None);
    }

    #[test]
    fn expand_path_fills_placeholders() {
        let mut params = HashMap::new();
        params.insert("id".to_string(), "123123".to_string());
        assert_eq!(expand_path("/pet/{id}", &params).unwrap(), "/pet/123123");
    }

    #[test]
    fn expand_path_without_placeholders() {
        let params = HashMap::new();
        assert_eq!(
            expand_path("/pet/findByStatus", &params).unwrap(),
            "/pet/findByStatus"
        );
    }

    #[test]
    fn expand_path_missing_param() {
        let params = HashMap::new();
        let err = expand_path("/pet/{id}", &params).unwrap_err();
        assert!(matches!(err, SuiteError::MissingPathParam(name) if name == "id"));
    }
}
