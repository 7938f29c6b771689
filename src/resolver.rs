//! Turns a name or Lodestone ID into a single Free Company.

use std::io;

use tracing::warn;

use crate::console::Prompt;
use crate::directory::DirectoryClient;
use crate::models::{OrganizationIdentity, SearchOrder, SearchResult};

const QUERY_PROMPT: &str = "Enter the Free Company name (or Lodestone ID): ";
const SELECTION_PROMPT: &str = "Enter the number (0 to quit): ";
const QUIT: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(OrganizationIdentity),
    /// The user asked to stop.
    Quit,
    /// A command-line query matched nothing.
    Unresolved,
}

enum Attempt {
    Found(OrganizationIdentity),
    Miss,
    Quit,
}

/// With `query` set the first miss ends resolution; without it the user is
/// prompted until something resolves or they quit.
pub async fn resolve<C, P>(client: &C, prompt: &mut P, query: Option<&str>) -> io::Result<Resolution>
where
    C: DirectoryClient + ?Sized,
    P: Prompt,
{
    let interactive = query.is_none();

    loop {
        prompt.say("")?;

        let raw = match query {
            Some(query) => query.to_string(),
            None => match read_query(prompt)? {
                Some(query) => query,
                None => return Ok(Resolution::Quit),
            },
        };
        let query = raw.trim();

        let attempt = if is_lodestone_id(query) {
            lookup_id(client, prompt, query).await?
        } else {
            search(client, prompt, query).await?
        };

        match attempt {
            Attempt::Found(organization) => return Ok(Resolution::Resolved(organization)),
            Attempt::Quit => return Ok(Resolution::Quit),
            Attempt::Miss if !interactive => return Ok(Resolution::Unresolved),
            Attempt::Miss => continue,
        }
    }
}

fn is_lodestone_id(query: &str) -> bool {
    !query.is_empty() && query.bytes().all(|b| b.is_ascii_digit())
}

fn read_query<P: Prompt>(prompt: &mut P) -> io::Result<Option<String>> {
    loop {
        match prompt.ask(QUERY_PROMPT)? {
            None => return Ok(None),
            Some(line) if line.trim().is_empty() => continue,
            Some(line) => return Ok(Some(line)),
        }
    }
}

async fn lookup_id<C, P>(client: &C, prompt: &mut P, id: &str) -> io::Result<Attempt>
where
    C: DirectoryClient + ?Sized,
    P: Prompt,
{
    match client.resolve_by_id(id).await {
        Ok(Some(organization)) => Ok(Attempt::Found(organization)),
        Ok(None) => {
            prompt.say(&format!("There is no free company matching the ID {id}."))?;
            Ok(Attempt::Miss)
        }
        Err(err) => {
            warn!(%id, error = %err, "free company lookup failed");
            prompt.say(&format!("Failed to look up free company {id}."))?;
            Ok(Attempt::Miss)
        }
    }
}

async fn search<C, P>(client: &C, prompt: &mut P, query: &str) -> io::Result<Attempt>
where
    C: DirectoryClient + ?Sized,
    P: Prompt,
{
    prompt.say(&format!("Search \"{query}\"..."))?;

    let results = match client.search_by_name(query, SearchOrder::MembershipDescending).await {
        Ok(results) => results,
        Err(err) => {
            warn!(%query, error = %err, "free company search failed");
            prompt.say(&format!("Failed to search a free company with query \"{query}\"."))?;
            return Ok(Attempt::Miss);
        }
    };

    match results.len() {
        0 => {
            prompt.say(&format!("No match for free company with query \"{query}\"."))?;
            Ok(Attempt::Miss)
        }
        1 => Ok(results
            .into_iter()
            .next()
            .map(|result| Attempt::Found(result.into()))
            .unwrap_or(Attempt::Miss)),
        _ => choose(prompt, query, results),
    }
}

fn choose<P: Prompt>(prompt: &mut P, query: &str, results: Vec<SearchResult>) -> io::Result<Attempt> {
    prompt.say("")?;
    prompt.say(&format!("Search result for \"{query}\":"))?;
    for (index, result) in results.iter().enumerate() {
        prompt.say(&format!("{}- {} ({})", index + 1, result.name, result.server))?;
    }
    prompt.say("")?;

    let Some(index) = read_selection(prompt, results.len())? else {
        return Ok(Attempt::Quit);
    };
    Ok(results
        .into_iter()
        .nth(index - 1)
        .map(|result| Attempt::Found(result.into()))
        .unwrap_or(Attempt::Quit))
}

/// Returns a 1-based index in `[1, count]`, or `None` to quit.
fn read_selection<P: Prompt>(prompt: &mut P, count: usize) -> io::Result<Option<usize>> {
    loop {
        let Some(line) = prompt.ask(SELECTION_PROMPT)? else {
            return Ok(None);
        };
        let line = line.trim();
        if line == QUIT {
            return Ok(None);
        }
        match line.parse::<usize>() {
            Ok(index) if (1..=count).contains(&index) => return Ok(Some(index)),
            _ => continue,
        }
    }
}
