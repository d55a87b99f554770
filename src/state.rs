//! Render state of the upload control: prompt vs. success, gallery
//! visibility, and per-thumbnail fallback progress.

use std::collections::HashMap;

/// Inputs the caller owns and passes in every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UploadProps {
    /// Whether the caller currently has a preview of the last uploaded file.
    pub image_preview: bool,
    /// While true, every acquisition affordance is disabled.
    pub loading: bool,
}

/// What the drop target shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    /// Nothing acquired yet.
    Prompt,
    /// A preview exists; clicking replaces it.
    Success,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub gallery_visible: bool,
    pub has_image: bool,
    pub is_loading: bool,
}

impl UiState {
    /// Mirror the caller-owned flags.
    pub fn sync(&mut self, props: UploadProps) {
        self.has_image = props.image_preview;
        self.is_loading = props.loading;
    }

    pub fn view(&self) -> View {
        if self.has_image {
            View::Success
        } else {
            View::Prompt
        }
    }

    /// Flip gallery visibility. Returns false (and does nothing) while loading.
    pub fn toggle_gallery(&mut self) -> bool {
        if self.is_loading {
            return false;
        }
        self.gallery_visible = !self.gallery_visible;
        true
    }

    /// Any completed acquisition closes the gallery.
    pub fn acquisition_completed(&mut self) {
        self.gallery_visible = false;
    }
}

/// Progress of one gallery thumbnail through its candidate locations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThumbnailState {
    /// Waiting on candidate `attempt`.
    Pending { attempt: usize },
    Loaded,
    /// Every candidate failed; the generated placeholder is shown for good.
    FallbackShown,
}

/// Result of reporting a render failure for a thumbnail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThumbnailTransition {
    /// Try the next candidate.
    Retry { attempt: usize },
    /// The placeholder replaces the thumbnail.
    FallbackShown,
    /// Already settled; nothing changes.
    Unchanged,
}

/// Thumbnail states keyed by sample id.
#[derive(Clone, Debug)]
pub struct ThumbnailTracker {
    attempts: usize,
    states: HashMap<String, ThumbnailState>,
}

impl ThumbnailTracker {
    /// `attempts` is the number of candidate locations per thumbnail (at least one).
    pub fn new(attempts: usize) -> Self {
        Self {
            attempts: attempts.max(1),
            states: HashMap::new(),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn state(&self, id: &str) -> ThumbnailState {
        self.states
            .get(id)
            .copied()
            .unwrap_or(ThumbnailState::Pending { attempt: 0 })
    }

    pub fn on_loaded(&mut self, id: &str) {
        if let ThumbnailState::Pending { .. } = self.state(id) {
            self.states.insert(id.to_owned(), ThumbnailState::Loaded);
        }
    }

    pub fn on_error(&mut self, id: &str) -> ThumbnailTransition {
        let ThumbnailState::Pending { attempt } = self.state(id) else {
            return ThumbnailTransition::Unchanged;
        };
        let next = attempt + 1;
        if next < self.attempts {
            self.states
                .insert(id.to_owned(), ThumbnailState::Pending { attempt: next });
            ThumbnailTransition::Retry { attempt: next }
        } else {
            self.states
                .insert(id.to_owned(), ThumbnailState::FallbackShown);
            ThumbnailTransition::FallbackShown
        }
    }
}
