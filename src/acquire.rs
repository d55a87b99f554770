//! Turning dropped, picked or fetched content into a single [`AcquiredFile`].

use std::sync::Arc;

use crate::error::AcquireError;

/// Raster formats the drop target and picker accept.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// MIME subtypes matching [`ACCEPTED_EXTENSIONS`].
const ACCEPTED_MIME_SUBTYPES: &[&str] = &["png", "jpeg", "gif", "webp"];

/// Where an acquired file came from. Kept for diagnostics only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileSource {
    Dropped,
    Picked,
    Sample {
        id: String,
        /// The candidate location that produced the bytes.
        location: String,
    },
}

/// An image file handed to the upload sink: a name plus its raw bytes.
#[derive(Clone, Debug)]
pub struct AcquiredFile {
    name: String,
    bytes: Arc<[u8]>,
    source: FileSource,
}

impl AcquiredFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>, source: FileSource) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            source,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Whether a file with this name (or MIME type, when the name has no
/// extension) is one of the accepted image kinds.
pub fn is_accepted(name: &str, mime: &str) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ACCEPTED_EXTENSIONS
            .iter()
            .any(|accepted| ext.eq_ignore_ascii_case(accepted)),
        _ => mime
            .strip_prefix("image/")
            .is_some_and(|subtype| ACCEPTED_MIME_SUBTYPES.contains(&subtype)),
    }
}

fn dropped_name(file: &egui::DroppedFile) -> String {
    if !file.name.is_empty() {
        return file.name.clone();
    }
    file.path
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Convert one dropped file, reading it from disk when the platform only
/// reports a path.
pub fn accept_dropped(file: &egui::DroppedFile) -> Result<AcquiredFile, AcquireError> {
    let name = dropped_name(file);
    if !is_accepted(&name, &file.mime) {
        return Err(AcquireError::Unsupported { name });
    }
    if let Some(bytes) = &file.bytes {
        return Ok(AcquiredFile::new(name, Arc::clone(bytes), FileSource::Dropped));
    }
    let Some(path) = &file.path else {
        return Err(AcquireError::Empty { name });
    };
    match std::fs::read(path) {
        Ok(bytes) => Ok(AcquiredFile::new(name, bytes, FileSource::Dropped)),
        Err(source) => Err(AcquireError::Unreadable { name, source }),
    }
}

/// Lazily yield the acceptable files of a drop, in drop order. Rejected items
/// are skipped without surfacing anything to the user.
pub fn accepted_dropped(files: &[egui::DroppedFile]) -> impl Iterator<Item = AcquiredFile> + '_ {
    files.iter().filter_map(|file| match accept_dropped(file) {
        Ok(acquired) => Some(acquired),
        Err(e) => {
            log::debug!("Ignoring dropped item: {e}");
            None
        }
    })
}

/// Show the native file dialog and read the chosen image.
#[cfg(all(not(target_arch = "wasm32"), not(target_os = "android")))]
pub fn pick_file() -> Option<AcquiredFile> {
    let path = rfd::FileDialog::new()
        .add_filter("Image", ACCEPTED_EXTENSIONS)
        .pick_file()?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !is_accepted(&name, "") {
        log::debug!("Ignoring picked file of unsupported type: {name}");
        return None;
    }
    match std::fs::read(&path) {
        Ok(bytes) => Some(AcquiredFile::new(name, bytes, FileSource::Picked)),
        Err(e) => {
            log::warn!("Failed to read {}: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dropped(name: &str, bytes: &[u8]) -> egui::DroppedFile {
        egui::DroppedFile {
            name: name.to_owned(),
            bytes: Some(Arc::from(bytes)),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_allow_listed_extensions() {
        for name in ["a.png", "b.JPG", "c.jpeg", "d.gif", "e.WebP"] {
            assert!(is_accepted(name, ""), "{name} should be accepted");
        }
        for name in ["notes.txt", "raw.cr2", "vector.svg", "photo.bmp"] {
            assert!(!is_accepted(name, "image/png"), "{name} should be rejected");
        }
    }

    #[test]
    fn falls_back_to_mime_without_extension() {
        assert!(is_accepted("clipboard", "image/jpeg"));
        assert!(!is_accepted("clipboard", "image/svg+xml"));
        assert!(!is_accepted("clipboard", ""));
    }

    #[test]
    fn unsupported_items_are_filtered() {
        let files = vec![
            dropped("readme.md", b"# hi"),
            dropped("first.png", b"1"),
            dropped("second.jpg", b"2"),
        ];
        let names: Vec<_> = accepted_dropped(&files)
            .map(|f| f.name().to_owned())
            .collect();
        assert_eq!(names, ["first.png", "second.jpg"]);
    }

    #[test]
    fn dropped_without_content_is_rejected() {
        let file = egui::DroppedFile {
            name: "ghost.png".to_owned(),
            ..Default::default()
        };
        assert!(matches!(accept_dropped(&file), Err(AcquireError::Empty { .. })));
    }

    #[test]
    fn dropped_path_is_read_from_disk() {
        let path = std::env::temp_dir().join(format!("sample_uploader_drop_{}.png", std::process::id()));
        std::fs::write(&path, b"pixels").unwrap();
        let file = egui::DroppedFile {
            path: Some(path.clone()),
            ..Default::default()
        };

        let acquired = accept_dropped(&file).unwrap();
        assert_eq!(acquired.bytes(), b"pixels");
        assert_eq!(acquired.source(), &FileSource::Dropped);
        assert!(acquired.name().starts_with("sample_uploader_drop_"));

        std::fs::remove_file(&path).unwrap();
    }
}
