use std::fmt;

/// Lifecycle of something read in the background, such as the pending
/// source image of the crop dialog. A failed read resets to `Empty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadingState<T> {
    Empty,
    Loading,
    Ready(T),
}

impl<T> Default for LoadingState<T> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<T> LoadingState<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, LoadingState::Empty)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadingState::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadingState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl<T> fmt::Display for LoadingState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadingState::Empty => write!(f, "Empty"),
            LoadingState::Loading => write!(f, "Loading"),
            LoadingState::Ready(_) => write!(f, "Ready"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadingEvent<T> {
    StartLoading,
    LoadComplete(T),
    Reset,
}

impl<T> LoadingEvent<T> {
    /// A result only lands on a state that is still waiting for it.
    pub fn apply_to_state(self, current_state: LoadingState<T>) -> LoadingState<T> {
        match (self, current_state) {
            (LoadingEvent::StartLoading, _) => LoadingState::Loading,
            (LoadingEvent::LoadComplete(value), LoadingState::Loading) => LoadingState::Ready(value),
            (LoadingEvent::LoadComplete(_), state) => state,
            (LoadingEvent::Reset, _) => LoadingState::Empty,
        }
    }
}
