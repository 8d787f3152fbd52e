//! Offset pagination for list queries.

/// Default number of items returned by list queries.
pub const DEFAULT_LIMIT: u32 = 100;
/// Upper bound on the number of items returned by a single list query.
pub const MAX_LIMIT: u32 = 100;

/// Offset/limit window over an ordered collection.
///
/// ## Invariants
/// - `limit` lies in `1..=MAX_LIMIT`.
///
/// # Examples
/// ```
/// use room_booker::domain::PageRequest;
///
/// let page = PageRequest::new(Some(20), Some(500));
/// assert_eq!(page.offset(), 20);
/// assert_eq!(page.limit(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    offset: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a page window, applying defaults and clamping the limit.
    #[must_use]
    pub fn new(offset: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            offset: offset.unwrap_or(0),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    /// Number of items skipped.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Maximum number of items returned.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}
