//! User-adjustable settings, persisted through eframe storage.

use crate::resolver::AssetRoots;

/// Longest thumbnail fallback chain: public root, raw path, build root.
pub const MAX_THUMBNAIL_ATTEMPTS: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default)] // new fields fall back to their defaults when reading old state
pub struct UploaderConfig {
    /// Directory that asset locations are resolved against on native builds.
    pub asset_dir: String,
    /// Prefix of the build-output root, e.g. `/build`.
    pub build_root: String,
    /// Prefix of the public-asset root. Empty means the site root.
    pub public_root: String,
    /// How many locations a gallery thumbnail tries before showing a placeholder.
    pub thumbnail_attempts: usize,
    /// Sample manifest file name inside `asset_dir`.
    pub catalog_file: String,
    /// `PUBLIC_URL` given at startup. Takes precedence over `public_root`
    /// for this run only and is never saved.
    #[serde(skip)]
    pub(crate) public_root_override: Option<String>,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            asset_dir: "assets".to_owned(),
            build_root: "/build".to_owned(),
            public_root: String::new(),
            thumbnail_attempts: 2,
            catalog_file: "samples.json".to_owned(),
            public_root_override: None,
        }
    }
}

impl UploaderConfig {
    /// Apply a `PUBLIC_URL` value, if one is set. The persisted
    /// `public_root` is left untouched.
    pub fn with_public_url(mut self, public_url: Option<String>) -> Self {
        if let Some(url) = public_url {
            self.public_root_override = Some(url.trim_end_matches('/').to_owned());
        }
        self
    }

    /// The public-asset root in effect for this run.
    pub fn effective_public_root(&self) -> &str {
        self.public_root_override
            .as_deref()
            .unwrap_or(&self.public_root)
    }

    /// Apply overrides from the process environment.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_env_overrides(self) -> Self {
        self.with_public_url(std::env::var("PUBLIC_URL").ok())
    }

    pub fn roots(&self) -> AssetRoots {
        AssetRoots {
            build_root: self.build_root.clone(),
            public_root: self.effective_public_root().to_owned(),
        }
    }

    pub fn thumbnail_attempts(&self) -> usize {
        self.thumbnail_attempts.clamp(1, MAX_THUMBNAIL_ATTEMPTS)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn catalog_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.asset_dir).join(&self.catalog_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_state_gets_new_defaults() {
        let config: UploaderConfig = serde_json::from_str(r#"{"asset_dir": "data"}"#).unwrap();
        assert_eq!(config.asset_dir, "data");
        assert_eq!(config.build_root, "/build");
        assert_eq!(config.thumbnail_attempts, 2);
    }

    #[test]
    fn public_url_trims_trailing_slash() {
        let config = UploaderConfig::default().with_public_url(Some("/static/".to_owned()));
        assert_eq!(config.roots().public_root, "/static");

        let untouched = UploaderConfig::default().with_public_url(None);
        assert_eq!(untouched.roots().public_root, "");
    }

    #[test]
    fn public_url_is_not_persisted() {
        let stored = UploaderConfig {
            public_root: "/site".to_owned(),
            ..Default::default()
        };
        let running = stored.clone().with_public_url(Some("/static".to_owned()));
        assert_eq!(running.effective_public_root(), "/static");

        let saved = serde_json::to_string(&running).unwrap();
        let restored: UploaderConfig = serde_json::from_str(&saved).unwrap();
        assert_eq!(restored, stored);
        assert_eq!(restored.roots().public_root, "/site");
    }

    #[test]
    fn thumbnail_attempts_are_clamped() {
        let mut config = UploaderConfig {
            thumbnail_attempts: 0,
            ..Default::default()
        };
        assert_eq!(config.thumbnail_attempts(), 1);
        config.thumbnail_attempts = 10;
        assert_eq!(config.thumbnail_attempts(), MAX_THUMBNAIL_ATTEMPTS);
    }
}
