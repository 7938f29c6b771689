use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDateTime;

use crate::models::{EnrichedMember, Job, Proficiency};
use crate::progress::Progress;

pub const FIXED_COLUMNS: [&str; 5] = [
    "CharacterID",
    "CharacterName",
    "LastUpdate",
    "FreeCompanyRank",
    "GrandCompanyRank",
];

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn header() -> Vec<&'static str> {
    FIXED_COLUMNS
        .iter()
        .copied()
        .chain(Job::ALL.iter().map(|job| job.name()))
        .collect()
}

/// `<dir>/<organization name>.csv`, with characters that are not allowed in
/// file names replaced by `_`.
pub fn report_path(output_dir: &Path, organization_name: &str) -> PathBuf {
    let stem: String = organization_name
        .trim()
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            ch if ch.is_control() => '_',
            ch => ch,
        })
        .collect();
    let stem = if stem.is_empty() { "free_company".to_string() } else { stem };
    output_dir.join(format!("{stem}.csv"))
}

fn row(member: &EnrichedMember, snapshot: &str, progress: &mut dyn Progress) -> Vec<String> {
    let entry = &member.entry;
    let mut fields = vec![
        entry.id.clone(),
        entry.name.clone(),
        snapshot.to_string(),
        entry.organization_rank.clone(),
        entry.external_rank.clone(),
    ];

    match &member.proficiency {
        Proficiency::Known(proficiency) => {
            fields.extend(Job::ALL.iter().map(|job| {
                let level = proficiency.get(*job);
                if level.unlocked {
                    level.level.to_string()
                } else {
                    String::new()
                }
            }));
        }
        Proficiency::Restricted => {
            progress.log(&format!(
                "Failed to get job levels of \"{}\". Character profile is probably private.",
                entry.name
            ));
            fields.resize(FIXED_COLUMNS.len() + Job::ALL.len(), String::new());
        }
        Proficiency::Missing => {
            fields.resize(FIXED_COLUMNS.len() + Job::ALL.len(), String::new());
        }
    }
    fields
}

/// Writes the header and one row per member, ascending by member id.
pub fn write_report<W: Write>(
    out: W,
    mut members: Vec<EnrichedMember>,
    snapshot: NaiveDateTime,
    progress: &mut dyn Progress,
) -> anyhow::Result<()> {
    members.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.entry.id.cmp(&b.entry.id)));
    let snapshot = snapshot.format(TIMESTAMP_FORMAT).to_string();

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(header())?;
    for member in &members {
        writer.write_record(row(member, &snapshot, progress))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_report_file(
    path: &Path,
    members: Vec<EnrichedMember>,
    snapshot: NaiveDateTime,
    progress: &mut dyn Progress,
) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_report(file, members, snapshot, progress)
        .with_context(|| format!("failed to write {}", path.display()))
}
