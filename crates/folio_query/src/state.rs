use std::fmt;
use std::sync::Arc;

use folio_core::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Pending,
    Error,
    Success,
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Error => write!(f, "error"),
            Self::Success => write!(f, "success"),
        }
    }
}

/// What a view sees for one query.
#[derive(Debug, Clone)]
pub enum QueryState<T> {
    /// A load is in flight. `previous` holds stale data that can still be shown.
    Pending { previous: Option<T> },
    Error(Arc<Error>),
    Success(T),
}

impl<T> QueryState<T> {
    pub fn status(&self) -> QueryStatus {
        match self {
            Self::Pending { .. } => QueryStatus::Pending,
            Self::Error(_) => QueryStatus::Error,
            Self::Success(_) => QueryStatus::Success,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Loaded data, or the stale data carried by a pending state.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Pending { previous } => previous.as_ref(),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> QueryState<U> {
        match self {
            Self::Pending { previous } => QueryState::Pending {
                previous: previous.map(f),
            },
            Self::Error(err) => QueryState::Error(err),
            Self::Success(value) => QueryState::Success(f(value)),
        }
    }
}

impl<T> From<folio_core::Result<T>> for QueryState<T> {
    fn from(result: folio_core::Result<T>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Error(Arc::new(err)),
        }
    }
}
