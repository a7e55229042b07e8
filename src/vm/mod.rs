//! Per-screen view-models
//!
//! Each view-model owns the state for one screen: fetch on mount, mutate on
//! user action, reconcile with gateway responses. Mutations render only
//! after remote confirmation; there is no optimistic insert and therefore no
//! rollback path to get wrong. A failed mutation leaves prior state
//! untouched and surfaces an inline message.

pub mod blog;
pub mod files;
pub mod measurements;
pub mod profile;

pub use blog::BlogFeed;
pub use files::FileBrowser;
pub use measurements::MeasurementHistory;
pub use profile::ProfileEditor;

/// Remote-backed screen state: `Idle -> Loading -> { Ready, Failed }`.
///
/// `Failed` carries the user-facing message; the process never dies on a
/// remote failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}
