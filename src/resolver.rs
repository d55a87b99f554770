//! Resolving a sample entry into file bytes by trying candidate locations in
//! order.

use crate::acquire::{AcquiredFile, FileSource};
use crate::catalog::SampleEntry;
use crate::error::ResolveError;
use crate::loader::AssetLoader;

/// Root prefixes combined with a sample's relative path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetRoots {
    pub build_root: String,
    pub public_root: String,
}

impl AssetRoots {
    /// Locations tried when a sample is selected: the raw path, then the
    /// build-output root, then the public-asset root.
    pub fn sample_candidates(&self, entry: &SampleEntry) -> [String; 3] {
        [
            entry.path.clone(),
            format!("{}{}", self.build_root, entry.path),
            format!("{}{}", self.public_root, entry.path),
        ]
    }

    /// The first `attempts` locations tried by a gallery thumbnail: the
    /// public-asset root, then the raw path, then the build-output root.
    pub fn thumbnail_candidates(&self, entry: &SampleEntry, attempts: usize) -> Vec<String> {
        [
            format!("{}{}", self.public_root, entry.path),
            entry.path.clone(),
            format!("{}{}", self.build_root, entry.path),
        ]
        .into_iter()
        .take(attempts)
        .collect()
    }
}

/// Try each candidate of `entry` in order and wrap the first bytes found as a
/// file named after the sample. Nothing is cached: every call searches anew.
pub async fn resolve_sample<L: AssetLoader>(
    loader: &L,
    entry: &SampleEntry,
    roots: &AssetRoots,
) -> Result<AcquiredFile, ResolveError> {
    let candidates = roots.sample_candidates(entry);
    for location in &candidates {
        match loader.load(location).await {
            Some(bytes) => {
                log::info!("Loaded sample image from: {location}");
                let source = FileSource::Sample {
                    id: entry.id.clone(),
                    location: location.clone(),
                };
                return Ok(AcquiredFile::new(entry.name.clone(), bytes, source));
            }
            None => log::debug!("Sample '{}' not found at {location}", entry.id),
        }
    }
    log::warn!("Failed to load sample image: {}", entry.name);
    Err(ResolveError::Exhausted {
        name: entry.name.clone(),
        attempts: candidates.len(),
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use crate::loader::AssetLoader;

    /// Serves fixed bytes for known locations and records every attempt.
    #[derive(Default)]
    pub struct RecordingLoader {
        pub files: HashMap<String, Vec<u8>>,
        pub attempts: RefCell<Vec<String>>,
    }

    impl RecordingLoader {
        pub fn serving<B: AsRef<[u8]>>(files: &[(&str, B)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(loc, bytes)| ((*loc).to_owned(), bytes.as_ref().to_vec()))
                    .collect(),
                attempts: RefCell::default(),
            }
        }

        pub fn attempts(&self) -> Vec<String> {
            self.attempts.borrow().clone()
        }
    }

    impl AssetLoader for RecordingLoader {
        async fn load(&self, location: &str) -> Option<Vec<u8>> {
            self.attempts.borrow_mut().push(location.to_owned());
            self.files.get(location).cloned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingLoader;
    use super::*;
    use crate::catalog::entry;

    fn roots() -> AssetRoots {
        AssetRoots {
            build_root: "/build".to_owned(),
            public_root: "/static".to_owned(),
        }
    }

    #[test]
    fn candidates_in_preference_order() {
        let sample = entry("lake", "/samples/lake.jpg", "Lake");
        assert_eq!(
            roots().sample_candidates(&sample),
            [
                "/samples/lake.jpg",
                "/build/samples/lake.jpg",
                "/static/samples/lake.jpg"
            ]
        );
    }

    #[test]
    fn empty_public_root_repeats_raw_path() {
        let sample = entry("lake", "/samples/lake.jpg", "Lake");
        let roots = AssetRoots {
            build_root: "/build".to_owned(),
            public_root: String::new(),
        };
        let [first, _, third] = roots.sample_candidates(&sample);
        assert_eq!(first, third);
    }

    #[test]
    fn thumbnail_candidates_default_to_public_then_raw() {
        let sample = entry("lake", "/samples/lake.jpg", "Lake");
        assert_eq!(
            roots().thumbnail_candidates(&sample, 2),
            ["/static/samples/lake.jpg", "/samples/lake.jpg"]
        );
        assert_eq!(roots().thumbnail_candidates(&sample, 3).len(), 3);
        assert_eq!(roots().thumbnail_candidates(&sample, 1).len(), 1);
    }

    #[test]
    fn first_candidate_hit_fetches_once() {
        let sample = entry("lake", "/samples/lake.jpg", "Lake");
        let loader = RecordingLoader::serving(&[("/samples/lake.jpg", b"lake")]);

        let file = pollster::block_on(resolve_sample(&loader, &sample, &roots())).unwrap();

        assert_eq!(loader.attempts(), ["/samples/lake.jpg"]);
        assert_eq!(file.bytes(), b"lake");
    }

    #[test]
    fn third_candidate_hit_tries_in_order() {
        let sample = entry("lake", "/samples/lake.jpg", "Mountain Lake");
        let loader = RecordingLoader::serving(&[("/static/samples/lake.jpg", b"lake")]);

        let file = pollster::block_on(resolve_sample(&loader, &sample, &roots())).unwrap();

        assert_eq!(
            loader.attempts(),
            [
                "/samples/lake.jpg",
                "/build/samples/lake.jpg",
                "/static/samples/lake.jpg"
            ]
        );
        assert_eq!(file.name(), "Mountain Lake");
        assert_eq!(
            file.source(),
            &FileSource::Sample {
                id: "lake".to_owned(),
                location: "/static/samples/lake.jpg".to_owned(),
            }
        );
    }

    #[test]
    fn all_candidates_missing_is_exhausted() {
        let sample = entry("lake", "/samples/lake.jpg", "Mountain Lake");
        let loader = RecordingLoader::default();

        let err = pollster::block_on(resolve_sample(&loader, &sample, &roots())).unwrap_err();

        assert_eq!(loader.attempts().len(), 3);
        assert_eq!(
            err,
            ResolveError::Exhausted {
                name: "Mountain Lake".to_owned(),
                attempts: 3,
            }
        );
    }

    #[test]
    fn repeated_resolution_searches_again() {
        let sample = entry("lake", "/samples/lake.jpg", "Lake");
        let loader = RecordingLoader::default();

        let first = pollster::block_on(resolve_sample(&loader, &sample, &roots()));
        let second = pollster::block_on(resolve_sample(&loader, &sample, &roots()));

        assert!(first.is_err() && second.is_err());
        assert_eq!(loader.attempts().len(), 6);
    }
}
