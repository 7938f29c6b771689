//! The lookups the register pipeline needs from a character directory.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{OrganizationIdentity, Proficiency, RosterPage, SearchOrder, SearchResult};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} answered with status {status}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}

pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Read-only access to Free Company and character data.
///
/// Absence is reported as `Ok(None)` (or `Proficiency::Missing`); `Err` is
/// reserved for transport failures.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    async fn resolve_by_id(&self, id: &str) -> Result<Option<OrganizationIdentity>>;

    async fn search_by_name(&self, name: &str, order: SearchOrder) -> Result<Vec<SearchResult>>;

    /// Pages are 1-indexed.
    async fn roster_page(&self, organization_id: &str, page: u32) -> Result<Option<RosterPage>>;

    async fn job_proficiency(&self, member_id: &str) -> Result<Proficiency>;
}
