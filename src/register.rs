//! One register run: resolve, page through the roster, enrich, write.

use std::path::PathBuf;

use chrono::Local;
use tracing::info;

use crate::config::Settings;
use crate::console::Prompt;
use crate::directory::DirectoryClient;
use crate::enrich::enrich;
use crate::progress::Progress;
use crate::report::{report_path, write_report_file};
use crate::resolver::{resolve, Resolution};
use crate::roster::fetch_roster;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Written(PathBuf),
    Quit,
    Unresolved,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, RunOutcome::Unresolved)
    }
}

/// Roster failures come back as `Err` and nothing is written.
pub async fn run<C, P>(
    client: &C,
    settings: &Settings,
    prompt: &mut P,
    progress: &mut dyn Progress,
) -> anyhow::Result<RunOutcome>
where
    C: DirectoryClient + ?Sized,
    P: Prompt,
{
    let organization = match resolve(client, prompt, settings.query.as_deref()).await? {
        Resolution::Resolved(organization) => organization,
        Resolution::Quit => return Ok(RunOutcome::Quit),
        Resolution::Unresolved => return Ok(RunOutcome::Unresolved),
    };
    info!(id = %organization.id, name = %organization.name, "free company resolved");

    let snapshot = Local::now().naive_local();

    let roster = fetch_roster(client, &organization, progress).await?;
    let members = enrich(client, roster, settings.concurrency, progress).await;

    let path = report_path(&settings.output_dir, &organization.name);
    progress.log(&format!("Write \"{}\"...", path.display()));
    write_report_file(&path, members, snapshot, progress)?;
    progress.log("Done");

    Ok(RunOutcome::Written(path))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde::Deserialize;

    use super::*;
    use crate::config::Region;
    use crate::console::Console;
    use crate::directory::Result;
    use crate::models::{
        Job, JobLevel, OrganizationIdentity, Proficiency, RosterEntry, RosterPage, SearchOrder,
        SearchResult,
    };
    use crate::progress::testing::RecordingProgress;
    use crate::report::header;

    #[derive(Default)]
    struct FreeCompanyStub {
        results: Vec<SearchResult>,
        pages: HashMap<u32, RosterPage>,
        levels: HashMap<String, u8>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DirectoryClient for FreeCompanyStub {
        async fn resolve_by_id(&self, id: &str) -> Result<Option<OrganizationIdentity>> {
            self.calls.lock().unwrap().push(format!("id {id}"));
            Ok(None)
        }

        async fn search_by_name(&self, name: &str, _order: SearchOrder) -> Result<Vec<SearchResult>> {
            self.calls.lock().unwrap().push(format!("search {name}"));
            Ok(self.results.clone())
        }

        async fn roster_page(&self, organization_id: &str, page: u32) -> Result<Option<RosterPage>> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("roster {organization_id} {page}"));
            Ok(self.pages.get(&page).cloned())
        }

        async fn job_proficiency(&self, member_id: &str) -> Result<Proficiency> {
            Ok(match self.levels.get(member_id) {
                Some(level) => Proficiency::Known(
                    [(Job::Warrior, JobLevel::unlocked(*level))].into_iter().collect(),
                ),
                None => Proficiency::Missing,
            })
        }
    }

    #[derive(Debug, Deserialize)]
    struct LeadingColumns {
        #[serde(rename = "CharacterID")]
        id: String,
        #[serde(rename = "CharacterName")]
        name: String,
        #[serde(rename = "LastUpdate")]
        last_update: String,
        #[serde(rename = "Warrior")]
        warrior: String,
    }

    fn entry(id: &str, name: &str) -> RosterEntry {
        RosterEntry {
            id: id.to_string(),
            name: name.to_string(),
            organization_rank: "Member".to_string(),
            external_rank: "Private First Class".to_string(),
        }
    }

    fn alpha_stub() -> FreeCompanyStub {
        let result = |id: &str, name: &str| SearchResult {
            id: id.to_string(),
            name: name.to_string(),
            server: "Cerberus [Chaos]".to_string(),
        };
        let mut stub = FreeCompanyStub {
            results: vec![result("101", "Alpha"), result("102", "Alpha Two"), result("103", "Alpha Three")],
            ..FreeCompanyStub::default()
        };
        stub.pages.insert(
            1,
            RosterPage {
                entries: vec![entry("300", "Kiara"), entry("100", "Avery")],
                current_page: 1,
                total_pages: 2,
            },
        );
        stub.pages.insert(
            2,
            RosterPage {
                entries: vec![entry("200", "Jules")],
                current_page: 2,
                total_pages: 2,
            },
        );
        stub.levels.insert("100".to_string(), 90);
        stub.levels.insert("300".to_string(), 61);
        stub
    }

    fn settings(query: &str, output_dir: PathBuf) -> Settings {
        Settings {
            query: Some(query.to_string()),
            region: Region::Eu,
            concurrency: 2,
            output_dir,
        }
    }

    #[tokio::test]
    async fn alpha_search_writes_sorted_report() {
        let dir = tempfile::tempdir().unwrap();
        let stub = alpha_stub();
        let mut console = Console::new(Cursor::new("1\n".to_string()), Vec::new());
        let mut progress = RecordingProgress::default();

        let outcome = run(&stub, &settings("Alpha", dir.path().to_path_buf()), &mut console, &mut progress)
            .await
            .unwrap();

        let path = dir.path().join("Alpha.csv");
        assert_eq!(outcome, RunOutcome::Written(path.clone()));

        let screen = String::from_utf8(console.into_output()).unwrap();
        let choices = screen.find("3- Alpha Three").unwrap();
        assert!(screen.find("1- Alpha (").unwrap() < choices);
        assert_eq!(
            stub.calls.lock().unwrap().as_slice(),
            &["search Alpha".to_string(), "roster 101 1".to_string(), "roster 101 2".to_string()]
        );

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap().len(), header().len());
        let rows: Vec<LeadingColumns> = reader.deserialize().map(|row| row.unwrap()).collect();
        let ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["100", "200", "300"]);
        assert_eq!(rows[0].name, "Avery");
        assert_eq!(rows[0].warrior, "90");
        assert_eq!(rows[1].warrior, "");
        assert!(rows.iter().all(|row| row.last_update == rows[0].last_update));
        assert!(progress.lines.contains(&"Failed to get jobs of Jules.".to_string()));
        assert_eq!(progress.lines.last().unwrap(), "Done");
    }

    #[tokio::test]
    async fn unknown_numeric_id_ends_run_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let stub = FreeCompanyStub::default();
        let mut console = Console::new(Cursor::new(String::new()), Vec::new());

        let outcome = run(
            &stub,
            &settings("12345678", dir.path().to_path_buf()),
            &mut console,
            &mut RecordingProgress::default(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, RunOutcome::Unresolved);
        assert!(!outcome.is_success());
        assert_eq!(stub.calls.lock().unwrap().as_slice(), &["id 12345678".to_string()]);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        let screen = String::from_utf8(console.into_output()).unwrap();
        assert!(screen.contains("There is no free company matching the ID 12345678."));
    }

    #[tokio::test]
    async fn missing_roster_page_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut stub = alpha_stub();
        stub.pages.remove(&2);
        let mut console = Console::new(Cursor::new("1\n".to_string()), Vec::new());

        let err = run(
            &stub,
            &settings("Alpha", dir.path().to_path_buf()),
            &mut console,
            &mut RecordingProgress::default(),
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to get \"Alpha\" (Cerberus [Chaos]) members (page 2)."
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
