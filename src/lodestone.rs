//! Lodestone website client: plain HTTP GETs plus HTML scraping.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::Region;
use crate::directory::{DirectoryClient, DirectoryError, Result};
use crate::models::{
    Job, JobLevel, JobProficiency, OrganizationIdentity, Proficiency, RosterEntry, RosterPage,
    SearchOrder, SearchResult,
};

const USER_AGENT: &str = concat!("free-company-register/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

macro_rules! selector {
    ($name:ident, $css:literal) => {
        static $name: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($css).expect("static selector"));
    };
}

selector!(FC_NAME, ".entry__freecompany__name");
selector!(FC_WORLD, ".entry__freecompany__gc");
selector!(SEARCH_ENTRY, "div.entry");
selector!(SEARCH_LINK, "a.entry__block");
selector!(SEARCH_WORLD, ".entry__world");
selector!(ENTRY_NAME, ".entry__name");
selector!(MEMBER_ENTRY, "li.entry");
selector!(MEMBER_LINK, "a.entry__bg");
selector!(MEMBER_INFO, ".entry__freecompany__info > li");
selector!(SPAN, "span");
selector!(PAGER, ".btn__pager__current");
selector!(JOB_ITEM, ".character__job > li");
selector!(JOB_LEVEL, ".character__job__level");

static LODESTONE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/lodestone/(?:freecompany|character)/(\d+)").expect("static regex")
});
static PAGER_NUMBERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\D+(\d+)").expect("static regex"));

#[derive(Debug, Clone)]
pub struct LodestoneClient {
    http: Client,
    base_url: String,
}

impl LodestoneClient {
    pub fn new(region: Region) -> Result<Self> {
        Self::with_base_url(region.base_url())
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetches a page body; `Ok(None)` on 404.
    async fn get_page(&self, path: &str, query: &[(&str, &str)]) -> Result<Option<String>> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "lodestone request");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(%url, "not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(DirectoryError::Status { status, url });
        }

        Ok(Some(response.text().await?))
    }
}

#[async_trait]
impl DirectoryClient for LodestoneClient {
    async fn resolve_by_id(&self, id: &str) -> Result<Option<OrganizationIdentity>> {
        let path = format!("/lodestone/freecompany/{id}/");
        let body = self.get_page(&path, &[]).await?;
        Ok(body.and_then(|html| parse_free_company(id, &html)))
    }

    async fn search_by_name(&self, name: &str, order: SearchOrder) -> Result<Vec<SearchResult>> {
        let query = [("q", name), ("order", order_param(order))];
        let body = self.get_page("/lodestone/freecompany/", &query).await?;
        Ok(body.map(|html| parse_search_results(&html)).unwrap_or_default())
    }

    async fn roster_page(&self, organization_id: &str, page: u32) -> Result<Option<RosterPage>> {
        let path = format!("/lodestone/freecompany/{organization_id}/member/");
        let page_param = page.to_string();
        let body = self.get_page(&path, &[("page", page_param.as_str())]).await?;
        Ok(body.map(|html| parse_roster_page(&html, page)))
    }

    async fn job_proficiency(&self, member_id: &str) -> Result<Proficiency> {
        let path = format!("/lodestone/character/{member_id}/class_job/");
        let body = self.get_page(&path, &[]).await?;
        Ok(body
            .map(|html| parse_class_jobs(&html))
            .unwrap_or(Proficiency::Missing))
    }
}

/// Lodestone's `order` value for a Free Company search.
fn order_param(order: SearchOrder) -> &'static str {
    match order {
        SearchOrder::MembershipDescending => "3",
    }
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

fn lodestone_id(href: &str) -> Option<String> {
    LODESTONE_ID
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}

fn parse_pager(text: &str) -> Option<(u32, u32)> {
    let caps = PAGER_NUMBERS.captures(text)?;
    let current = caps.get(1)?.as_str().parse().ok()?;
    let total = caps.get(2)?.as_str().parse().ok()?;
    Some((current, total))
}

pub fn parse_free_company(id: &str, html: &str) -> Option<OrganizationIdentity> {
    let document = Html::parse_document(html);
    let name = document.select(&FC_NAME).next().map(text_of)?;
    if name.is_empty() {
        return None;
    }
    let server = document.select(&FC_WORLD).last().map(text_of).unwrap_or_default();

    Some(OrganizationIdentity {
        id: id.to_string(),
        name,
        server,
    })
}

pub fn parse_search_results(html: &str) -> Vec<SearchResult> {
    let document = Html::parse_document(html);
    document
        .select(&SEARCH_ENTRY)
        .filter_map(|entry| {
            let href = entry.select(&SEARCH_LINK).next()?.value().attr("href")?;
            let id = lodestone_id(href)?;
            let name = entry.select(&ENTRY_NAME).next().map(text_of)?;
            let server = entry.select(&SEARCH_WORLD).last().map(text_of).unwrap_or_default();
            Some(SearchResult { id, name, server })
        })
        .collect()
}

/// A page without a pager is the only page.
pub fn parse_roster_page(html: &str, requested_page: u32) -> RosterPage {
    let document = Html::parse_document(html);
    let entries = document
        .select(&MEMBER_ENTRY)
        .filter_map(|entry| {
            let href = entry.select(&MEMBER_LINK).next()?.value().attr("href")?;
            let id = lodestone_id(href)?;
            let name = entry.select(&ENTRY_NAME).next().map(text_of)?;
            let mut ranks = entry
                .select(&MEMBER_INFO)
                .map(|item| item.select(&SPAN).next().map(text_of).unwrap_or_default());
            let organization_rank = ranks.next().unwrap_or_default();
            let external_rank = ranks.next().unwrap_or_default();
            Some(RosterEntry {
                id,
                name,
                organization_rank,
                external_rank,
            })
        })
        .collect();

    let (current_page, total_pages) = document
        .select(&PAGER)
        .next()
        .and_then(|pager| parse_pager(&text_of(pager)))
        .unwrap_or((requested_page, requested_page));

    RosterPage {
        entries,
        current_page,
        total_pages,
    }
}

/// Job rows are listed in `Job::ALL` order; anything else is treated as a
/// restricted profile.
pub fn parse_class_jobs(html: &str) -> Proficiency {
    let document = Html::parse_document(html);
    let levels: Vec<Option<JobLevel>> = document
        .select(&JOB_ITEM)
        .map(|item| item.select(&JOB_LEVEL).next().and_then(|level| parse_level(&text_of(level))))
        .collect();

    if levels.len() != Job::ALL.len() {
        debug!(found = levels.len(), "unexpected job list length");
        return Proficiency::Restricted;
    }

    let mut proficiency = JobProficiency::default();
    for (job, level) in Job::ALL.into_iter().zip(levels) {
        match level {
            Some(level) => proficiency.set(job, level),
            None => return Proficiency::Restricted,
        }
    }
    Proficiency::Known(proficiency)
}

fn parse_level(text: &str) -> Option<JobLevel> {
    match text.trim() {
        "-" => Some(JobLevel::locked()),
        level => level.parse().ok().map(JobLevel::unlocked),
    }
}
