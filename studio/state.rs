use std::sync::{Arc, Mutex, PoisonError};

use netdeck::{NetworkList, NetworkRepository};

// ---------------------------------------------------------------------------
// Flash messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlashKind { Success, Error }

#[derive(Debug, Clone, PartialEq)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Success, text: text.into() }
    }
    pub fn error(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Error, text: text.into() }
    }
}

// ---------------------------------------------------------------------------
// Main state struct
// ---------------------------------------------------------------------------

pub struct StudioState {
    /// Repository the detail and prediction pages talk to.
    pub repo:     Arc<dyn NetworkRepository>,
    /// Cached collection shown on the list page.
    pub networks: NetworkList,
    /// Where the networks live, shown in the page header.
    pub backend:  String,
    /// One-shot flash message for the next page render.
    flash:        Mutex<Option<FlashMessage>>,
}

impl StudioState {
    pub fn new(repo: Arc<dyn NetworkRepository>, backend: impl Into<String>) -> Self {
        StudioState {
            networks: NetworkList::new(repo.clone()),
            repo,
            backend:  backend.into(),
            flash:    Mutex::new(None),
        }
    }

    pub fn set_flash(&self, message: FlashMessage) {
        *self.flash.lock().unwrap_or_else(PoisonError::into_inner) = Some(message);
    }

    /// Takes and returns the current flash message, clearing it.
    pub fn take_flash(&self) -> Option<FlashMessage> {
        self.flash.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/// Shared state type passed to every handler.
///
/// The list state synchronises itself, so no outer lock is taken per request.
pub type SharedState = Arc<StudioState>;
