//! Consumer-facing view of a catalog read.

use super::CatalogError;

/// State of a catalog query as seen by a view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueryState<T> {
    /// The query is disabled (e.g. no product id yet) and was never sent.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The request failed; the message is safe to display.
    Error(String),
    /// The request succeeded.
    Success(T),
}

impl<T> QueryState<T> {
    /// Build the final state of a finished request.
    #[must_use]
    pub fn from_result(result: Result<T, CatalogError>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(e) => Self::Error(e.user_message()),
        }
    }

    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The data, if the query succeeded.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    /// The error message, if the query failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Transform the success value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
        match self {
            Self::Idle => QueryState::Idle,
            Self::Loading => QueryState::Loading,
            Self::Error(message) => QueryState::Error(message),
            Self::Success(data) => QueryState::Success(f(data)),
        }
    }
}

/// Receipt for one request issued through a [`QueryTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a ticket is needed to resolve the request"]
pub struct QueryTicket(u64);

/// Tracks one query slot in a view (the product list, the open detail page).
///
/// Every new request supersedes the previous one. When an older request
/// finishes late its result is discarded instead of overwriting newer state.
///
/// ```rust
/// # use fakestore_storefront::catalog::{QueryState, QueryTracker};
/// let mut detail = QueryTracker::<&str>::new();
/// let first = detail.begin();
/// let second = detail.begin();
///
/// assert!(detail.resolve(second, Ok("new")));
/// assert!(!detail.resolve(first, Ok("old")));
/// assert_eq!(detail.state(), &QueryState::Success("new"));
/// ```
#[derive(Debug, Clone)]
pub struct QueryTracker<T> {
    latest: u64,
    state: QueryState<T>,
}

impl<T> Default for QueryTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> QueryTracker<T> {
    /// A tracker with no request issued.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: 0,
            state: QueryState::Idle,
        }
    }

    /// Issue a new request. The state becomes `Loading` and any request issued
    /// earlier is superseded.
    pub fn begin(&mut self) -> QueryTicket {
        self.latest += 1;
        self.state = QueryState::Loading;
        QueryTicket(self.latest)
    }

    /// Apply the result of the request behind `ticket`.
    ///
    /// Returns `false`, leaving the state untouched, if the ticket has been
    /// superseded or cancelled.
    pub fn resolve(&mut self, ticket: QueryTicket, result: Result<T, CatalogError>) -> bool {
        if ticket.0 != self.latest {
            return false;
        }
        self.state = QueryState::from_result(result);
        true
    }

    /// Abandon the outstanding request (e.g. the view was closed).
    pub fn cancel(&mut self) {
        self.latest += 1;
        self.state = QueryState::Idle;
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &QueryState<T> {
        &self.state
    }
}
