use thiserror::Error;
use tracing::debug;

use crate::directory::{DirectoryClient, DirectoryError};
use crate::models::{OrganizationIdentity, RosterEntry};
use crate::progress::Progress;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Failed to get \"{name}\" ({server}) members (page {page}).")]
    PageMissing {
        name: String,
        server: String,
        page: u32,
    },
    #[error("Failed to get \"{name}\" ({server}) members (page {page}).")]
    PageFailed {
        name: String,
        server: String,
        page: u32,
        #[source]
        source: DirectoryError,
    },
    #[error("Member page {reported} of \"{name}\" was returned when page {requested} was requested.")]
    OutOfSequence {
        name: String,
        requested: u32,
        reported: u32,
    },
}

/// Walks the member list one page at a time, keeping response order.
pub async fn fetch_roster<C>(
    client: &C,
    organization: &OrganizationIdentity,
    progress: &mut dyn Progress,
) -> Result<Vec<RosterEntry>, RosterError>
where
    C: DirectoryClient + ?Sized,
{
    let mut entries = Vec::new();
    let mut page = 1;

    loop {
        progress.log(&format!(
            "Get \"{}\" ({}) members - Page {page}...",
            organization.name, organization.server
        ));

        let response = match client.roster_page(&organization.id, page).await {
            Ok(Some(response)) => response,
            Ok(None) => {
                return Err(RosterError::PageMissing {
                    name: organization.name.clone(),
                    server: organization.server.clone(),
                    page,
                })
            }
            Err(source) => {
                return Err(RosterError::PageFailed {
                    name: organization.name.clone(),
                    server: organization.server.clone(),
                    page,
                    source,
                })
            }
        };

        if response.current_page < page {
            return Err(RosterError::OutOfSequence {
                name: organization.name.clone(),
                requested: page,
                reported: response.current_page,
            });
        }

        debug!(
            page = response.current_page,
            total = response.total_pages,
            members = response.entries.len(),
            "roster page"
        );
        entries.extend(response.entries);

        if response.current_page >= response.total_pages {
            return Ok(entries);
        }
        page = response.current_page + 1;
    }
}
