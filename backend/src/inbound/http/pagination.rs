//! `skip`/`limit` query parameters shared by list endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::PageRequest;

/// Offset pagination parameters.
///
/// `limit` is clamped to `1..=100` rather than rejected.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Number of items to skip.
    #[param(minimum = 0, example = 0)]
    pub skip: Option<u32>,
    /// Maximum number of items to return (default and maximum 100).
    #[param(minimum = 1, maximum = 100, example = 100)]
    pub limit: Option<u32>,
}

impl PageQuery {
    /// Convert into the domain page window.
    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.skip, self.limit)
    }
}
