use std::fmt;
use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_CONCURRENCY: usize = 8;

const LANGUAGE_PREFIXES: [&str; 2] = ["/language:", "language:"];

#[derive(Parser, Debug)]
#[command(name = "free-company-register", version)]
#[command(about = "Snapshot a Free Company roster and its job levels to CSV", long_about = None)]
pub struct Cli {
    /// Free Company name or Lodestone ID, optionally mixed with `language:<code>`
    #[arg(value_name = "QUERY")]
    pub args: Vec<String>,
    /// Lodestone region (jp, na, eu, fr, de)
    #[arg(long)]
    pub language: Option<String>,
    /// Maximum number of character pages fetched at once
    #[arg(long, env = "FCR_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
    /// Directory receiving the CSV file (defaults to the working directory)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Log debug details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    Jp,
    Na,
    #[default]
    Eu,
    Fr,
    De,
}

impl Region {
    pub const ALL: [Region; 5] = [Region::Jp, Region::Na, Region::Eu, Region::Fr, Region::De];

    pub fn code(self) -> &'static str {
        match self {
            Region::Jp => "jp",
            Region::Na => "na",
            Region::Eu => "eu",
            Region::Fr => "fr",
            Region::De => "de",
        }
    }

    pub fn from_code(code: &str) -> Option<Region> {
        let code = code.trim();
        Region::ALL
            .into_iter()
            .find(|region| region.code().eq_ignore_ascii_case(code))
    }

    pub fn base_url(self) -> String {
        format!("https://{}.finalfantasyxiv.com", self.code())
    }

    pub fn codes() -> String {
        Region::ALL.map(Region::code).join(", ")
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Everything a run needs from the process environment, captured once.
#[derive(Debug, Clone)]
pub struct Settings {
    pub query: Option<String>,
    pub region: Region,
    pub concurrency: usize,
    pub output_dir: PathBuf,
}

impl Settings {
    /// Returns the settings plus human-readable warnings about ignored input.
    pub fn from_cli(cli: Cli, working_dir: PathBuf) -> (Settings, Vec<String>) {
        let mut warnings = Vec::new();
        let mut query: Option<String> = None;
        let mut language = cli.language;

        for arg in cli.args {
            if let Some(code) = LANGUAGE_PREFIXES
                .iter()
                .find_map(|prefix| arg.strip_prefix(prefix))
            {
                language = Some(code.to_string());
            } else if query.is_none() {
                query = Some(arg);
            } else {
                warnings.push(format!("Ignoring extra argument \"{arg}\"."));
            }
        }

        let region = match language.as_deref() {
            None => Region::default(),
            Some(code) => Region::from_code(code).unwrap_or_else(|| {
                warnings.push(format!(
                    "Unknown language \"{code}\". Choose one of those: {}",
                    Region::codes()
                ));
                Region::default()
            }),
        };

        let settings = Settings {
            query: query.filter(|q| !q.trim().is_empty()),
            region,
            concurrency: cli.concurrency.max(1),
            output_dir: cli.output_dir.unwrap_or(working_dir),
        };
        (settings, warnings)
    }
}
