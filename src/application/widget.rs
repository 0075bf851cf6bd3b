// Widget lifecycle state machine

use crate::application::source::SourceError;

/// Lifecycle phase of a widget, for host logic and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Loading,
    Ready,
    Error,
}

/// Per-widget lifecycle. Transitions are `Uninitialized -> Loading`,
/// `Loading -> Ready | Error`, manual retry `Error -> Loading`, and
/// `Ready -> Ready` for toggle or view-switch re-renders. The cached
/// payload lives inside `Ready`; entering `Loading` discards it, so a
/// failed reload never leaves stale data behind.
#[derive(Debug)]
pub enum WidgetState<D> {
    Uninitialized,
    Loading,
    Ready(D),
    Error(SourceError),
}

impl<D> WidgetState<D> {
    pub fn phase(&self) -> Phase {
        match self {
            WidgetState::Uninitialized => Phase::Uninitialized,
            WidgetState::Loading => Phase::Loading,
            WidgetState::Ready(_) => Phase::Ready,
            WidgetState::Error(_) => Phase::Error,
        }
    }

    pub fn data(&self) -> Option<&D> {
        match self {
            WidgetState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SourceError> {
        match self {
            WidgetState::Error(e) => Some(e),
            _ => None,
        }
    }
}
