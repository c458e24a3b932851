//! Async-state container for remote data.
//!
//! Replaces the loading/data/error flag triple with a single tagged union so
//! impossible combinations (loading AND failed, data AND error) cannot be
//! represented.

/// State of a value fetched asynchronously from a remote source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Loadable<T> {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request succeeded.
    Loaded(T),
    /// The last request failed with a display message.
    Failed(String),
}

impl<T> Loadable<T> {
    /// Returns the loaded value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the failure message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Loadable::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Loadable::Loaded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Loadable::Failed(_))
    }

    /// Has this ever settled (loaded or failed)?
    ///
    /// Used by views that must show a spinner until the first settlement and
    /// never again afterwards.
    pub fn is_settled(&self) -> bool {
        matches!(self, Loadable::Loaded(_) | Loadable::Failed(_))
    }

    /// Maps the loaded value, preserving the other states.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loadable<U> {
        match self {
            Loadable::Idle => Loadable::Idle,
            Loadable::Loading => Loadable::Loading,
            Loadable::Loaded(value) => Loadable::Loaded(f(value)),
            Loadable::Failed(message) => Loadable::Failed(message),
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for Loadable<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Loadable::Loaded(value),
            Err(err) => Loadable::Failed(err.to_string()),
        }
    }
}
