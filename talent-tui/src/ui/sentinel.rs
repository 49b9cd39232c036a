//! Scroll sentinel
//!
//! The last row of every list is a sentinel. The renderer reports how much
//! of it is inside the viewport after each frame; `observe` turns that into
//! "load the next page" exactly once per not-visible to visible transition.

/// Whether visibility observation is possible at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelMode {
    Active,
    /// Nothing is observed; pages are only loaded on explicit request
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollSentinel {
    mode: SentinelMode,
    threshold: f32,
    was_visible: bool,
    /// Epoch, next page and row count of the last snapshot seen
    last_progress: Option<(u64, u32, usize)>,
    detached: bool,
}

impl Default for ScrollSentinel {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ScrollSentinel {
    /// Sentinel counting as visible once `threshold` of its row is on screen
    pub fn new(threshold: f32) -> Self {
        Self {
            mode: SentinelMode::Active,
            threshold: threshold.clamp(0.0, 1.0),
            was_visible: false,
            last_progress: None,
            detached: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            mode: SentinelMode::Unavailable,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> SentinelMode {
        self.mode
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Record one frame's visibility; `true` means fetch the next page
    pub fn observe(&mut self, visibility: f32, has_more: bool, is_loading: bool) -> bool {
        if self.detached || self.mode == SentinelMode::Unavailable {
            return false;
        }

        let visible = visibility >= self.threshold;
        let trigger = visible && !self.was_visible && has_more && !is_loading;
        self.was_visible = visible;
        trigger
    }

    /// Forget the previous visibility once the list has moved on
    ///
    /// Snapshots can be coalesced, so the loading flag may never be seen
    /// flipping. A new epoch, a new page or a different row count re-arms
    /// the sentinel instead; a failed fetch changes none of them and does not.
    pub fn track_progress(&mut self, epoch: u64, page: u32, rows: usize) {
        let progress = Some((epoch, page, rows));
        if self.last_progress != progress {
            self.was_visible = false;
            self.last_progress = progress;
        }
    }

    /// Stop observing for good
    pub fn detach(&mut self) {
        self.detached = true;
        self.was_visible = false;
    }

    /// A fresh sentinel with the same mode and threshold
    pub fn remount(&self) -> Self {
        Self {
            mode: self.mode,
            threshold: self.threshold,
            was_visible: false,
            last_progress: None,
            detached: false,
        }
    }
}
