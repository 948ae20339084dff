use crate::error::ConfigError;
use crate::modality::Modality;
use serde::{Deserialize, Serialize};
use url::Url;

/// Runtime configuration of the demo client.
///
/// Loaded from YAML; every field has a default so a partial file (or no
/// file at all) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Absolute base URL of the vision API. Every endpoint is derived from it.
    pub api_base_url: String,
    /// Path prefix under which the API serves result images.
    pub static_prefix: String,
    /// Number of results requested from the search endpoint.
    pub search_top_k: u32,
    /// When false, segmentation calls go out without a bearer token if
    /// the visitor is not logged in.
    pub segment_requires_auth: bool,
    /// Base URL of the identity/data service (login, profile, credits).
    pub identity_base_url: String,
    pub login_path: String,
    pub toast_duration_ms: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            static_prefix: "/static".to_string(),
            search_top_k: 6,
            segment_requires_auth: true,
            identity_base_url: "http://localhost:8081".to_string(),
            login_path: "/auth/login".to_string(),
            toast_duration_ms: 4000,
        }
    }
}

impl VisionConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: VisionConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("api_base_url", &self.api_base_url),
            ("identity_base_url", &self.identity_base_url),
        ] {
            let url = Url::parse(value)?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ConfigError::Invalid(format!(
                    "{} must be an http(s) URL, got {}",
                    name, value
                )));
            }
        }
        if !(1..=100).contains(&self.search_top_k) {
            return Err(ConfigError::Invalid(format!(
                "search_top_k must be between 1 and 100, got {}",
                self.search_top_k
            )));
        }
        Ok(())
    }

    /// Whether a call for `modality` may go out without a bearer token.
    pub fn allows_anonymous(&self, modality: Modality) -> bool {
        modality == Modality::Segment && !self.segment_requires_auth
    }

    pub fn endpoint(&self, modality: Modality) -> Result<Url, ConfigError> {
        join_base(&self.api_base_url, &modality.endpoint_path())
    }

    /// Resolves an image path returned by the search endpoint. Absolute
    /// URLs are kept as they are.
    pub fn static_url(&self, image_path: &str) -> Result<Url, ConfigError> {
        if image_path.starts_with("http://") || image_path.starts_with("https://") {
            return Ok(Url::parse(image_path)?);
        }
        let prefix = self.static_prefix.trim_matches('/');
        let path = image_path.trim_start_matches('/');
        if prefix.is_empty() || path.starts_with(&format!("{}/", prefix)) {
            join_base(&self.api_base_url, path)
        } else {
            join_base(&self.api_base_url, &format!("{}/{}", prefix, path))
        }
    }

    pub fn login_url(&self) -> Result<Url, ConfigError> {
        join_base(&self.identity_base_url, &self.login_path)
    }

    pub fn profile_url(&self) -> Result<Url, ConfigError> {
        join_base(&self.identity_base_url, "/auth/me")
    }

    pub fn credits_url(&self, user_id: &str) -> Result<Url, ConfigError> {
        let mut url = join_base(&self.identity_base_url, "/profiles")?;
        url.query_pairs_mut()
            .append_pair("user_id", &format!("eq.{}", user_id));
        Ok(url)
    }
}

// Url::join drops the base path when `path` is absolute, so the base is
// forced into directory form and `path` made relative.
fn join_base(base: &str, path: &str) -> Result<Url, ConfigError> {
    let mut base = Url::parse(base)?;
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        assert!(VisionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = VisionConfig::from_yaml_str("search_top_k: 12\n").unwrap();
        assert_eq!(config.search_top_k, 12);
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert!(config.segment_requires_auth);
    }

    #[test]
    fn test_rejects_relative_base_url() {
        let err = VisionConfig::from_yaml_str("api_base_url: /api\n").unwrap_err();
        assert!(matches!(err, ConfigError::Url(_)));
    }

    #[test]
    fn test_rejects_out_of_range_top_k() {
        let err = VisionConfig::from_yaml_str("search_top_k: 0\n").unwrap_err();
        assert!(err.to_string().contains("search_top_k"));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let config = VisionConfig {
            api_base_url: "https://vision.example.com/gateway".into(),
            ..VisionConfig::default()
        };
        assert_eq!(
            config.endpoint(Modality::Detect).unwrap().as_str(),
            "https://vision.example.com/gateway/api/v1/detect/"
        );
    }

    #[test]
    fn test_static_url_resolution() {
        let config = VisionConfig::default();
        assert_eq!(
            config.static_url("images/robe_01.jpg").unwrap().as_str(),
            "http://localhost:8000/static/images/robe_01.jpg"
        );
        assert_eq!(
            config.static_url("/static/images/robe_01.jpg").unwrap().as_str(),
            "http://localhost:8000/static/images/robe_01.jpg"
        );
        assert_eq!(
            config.static_url("https://cdn.example.com/a.png").unwrap().as_str(),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_credits_url_filters_by_user() {
        let url = VisionConfig::default().credits_url("0663ffff-88a5").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8081/profiles?user_id=eq.0663ffff-88a5"
        );
    }

    #[test]
    fn test_segment_anonymous_switch() {
        let mut config = VisionConfig::default();
        assert!(!config.allows_anonymous(Modality::Segment));
        config.segment_requires_auth = false;
        assert!(config.allows_anonymous(Modality::Segment));
        assert!(!config.allows_anonymous(Modality::Detect));
    }
}
