use std::sync::Mutex;

use serde::Serialize;

use crate::models::resume::ResumeDraft;

/// Builder state handed to the preview page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewHandoff {
    pub draft: ResumeDraft,
    pub markup: String,
}

/// Holds at most one [`PreviewHandoff`]. A new `put` replaces the old one.
#[derive(Debug, Default)]
pub struct PreviewSlot {
    inner: Mutex<Option<PreviewHandoff>>,
}

impl PreviewSlot {
    pub fn put(&self, handoff: PreviewHandoff) {
        *self.guard() = Some(handoff);
    }

    pub fn peek(&self) -> Option<PreviewHandoff> {
        self.guard().clone()
    }

    pub fn clear(&self) -> Option<PreviewHandoff> {
        self.guard().take()
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, Option<PreviewHandoff>> {
        // The slot is a plain value; a panic mid-update cannot leave it torn.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
