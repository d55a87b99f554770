//! Fetching asset bytes from a location string.
//!
//! A failed fetch is `None`, never an error: callers treat it as "try the
//! next location".

use std::future::Future;

pub trait AssetLoader {
    /// Attempt a single fetch of `location`.
    fn load(&self, location: &str) -> impl Future<Output = Option<Vec<u8>>>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FsLoader;
#[cfg(target_arch = "wasm32")]
pub use web::WebLoader;

/// Loader used by the application on the current platform.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformLoader = FsLoader;
#[cfg(target_arch = "wasm32")]
pub type PlatformLoader = WebLoader;

#[cfg(not(target_arch = "wasm32"))]
pub fn platform_loader(config: &crate::UploaderConfig) -> PlatformLoader {
    FsLoader::new(&config.asset_dir)
}

#[cfg(target_arch = "wasm32")]
pub fn platform_loader(_config: &crate::UploaderConfig) -> PlatformLoader {
    WebLoader
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Component, Path, PathBuf};

    use super::AssetLoader;

    /// Reads locations as paths beneath a base directory.
    #[derive(Clone, Debug)]
    pub struct FsLoader {
        base: PathBuf,
    }

    impl FsLoader {
        pub fn new(base: impl Into<PathBuf>) -> Self {
            Self { base: base.into() }
        }

        /// Map a location like `/samples/cat.jpg` below the base directory.
        /// Locations escaping the base are refused.
        pub fn path_for(&self, location: &str) -> Option<PathBuf> {
            let relative = Path::new(location.trim_start_matches('/'));
            if relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
            {
                return None;
            }
            Some(self.base.join(relative))
        }
    }

    impl AssetLoader for FsLoader {
        async fn load(&self, location: &str) -> Option<Vec<u8>> {
            let Some(path) = self.path_for(location) else {
                log::debug!("Refusing location outside asset dir: {location}");
                return None;
            };
            match std::fs::read(&path) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    log::debug!("{}: {e}", path.display());
                    None
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast as _;
    use wasm_bindgen_futures::JsFuture;

    use super::AssetLoader;

    /// Fetches locations relative to the page with the browser `fetch` API.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct WebLoader;

    impl AssetLoader for WebLoader {
        async fn load(&self, location: &str) -> Option<Vec<u8>> {
            let window = web_sys::window()?;
            let response = JsFuture::from(window.fetch_with_str(location)).await.ok()?;
            let response: web_sys::Response = response.dyn_into().ok()?;
            if !response.ok() {
                log::debug!("{location}: HTTP {}", response.status());
                return None;
            }
            let buffer = JsFuture::from(response.array_buffer().ok()?).await.ok()?;
            Some(js_sys::Uint8Array::new(&buffer).to_vec())
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn path_for_strips_leading_slash() {
        let loader = FsLoader::new("assets");
        assert_eq!(
            loader.path_for("/samples/cat.jpg"),
            Some(std::path::Path::new("assets").join("samples/cat.jpg"))
        );
    }

    #[test]
    fn path_for_refuses_parent_dirs() {
        let loader = FsLoader::new("assets");
        assert_eq!(loader.path_for("/../secret.png"), None);
    }

    #[test]
    fn load_reads_file_and_misses_cleanly() {
        let dir = std::env::temp_dir().join(format!("sample_uploader_loader_{}", std::process::id()));
        std::fs::create_dir_all(dir.join("samples")).unwrap();
        std::fs::write(dir.join("samples/one.png"), b"png-bytes").unwrap();

        let loader = FsLoader::new(&dir);
        let hit = pollster::block_on(loader.load("/samples/one.png"));
        let miss = pollster::block_on(loader.load("/samples/two.png"));
        assert_eq!(hit.as_deref(), Some(&b"png-bytes"[..]));
        assert_eq!(miss, None);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
