use std::time::Duration;

use ::scraper::{ElementRef, Html, Selector};
use anyhow::{Context, Result};
use async_trait::async_trait;
use navigator_common::config::GoogleCredentials;
use navigator_common::SearchResult;
use serde::Deserialize;
use tracing::{info, warn};

/// The structured provider rejects `num` above this.
pub const GOOGLE_MAX_RESULTS: usize = 10;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// DuckDuckGo's own redirect parameter, unwrapped wherever it appears.
const DDG_REDIRECT_PARAM: &str = "uddg";

/// Generic destination parameters, only honored on a known redirector.
const REDIRECT_PARAMS: &[&str] = &["url", "u", "q"];

/// (host, path prefix) pairs of search-engine click-through redirects.
const REDIRECTORS: &[(&str, &str)] = &[("duckduckgo.com", "/l/"), ("google.com", "/url")];

// --- WebSearcher trait ---

/// One external search surface. Implementations never fail: transport,
/// status, and parse errors are logged and surface as an empty result list.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult>;
    fn name(&self) -> &str;
}

fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(BROWSER_USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

// --- Google Custom Search ---

pub struct GoogleSearcher {
    api_key: String,
    engine_id: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Debug, Deserialize)]
struct GoogleItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

impl GoogleSearcher {
    pub fn new(credentials: &GoogleCredentials, base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            api_key: credentials.api_key.clone(),
            engine_id: credentials.engine_id.clone(),
            base_url: base_url.to_string(),
            client: build_client(timeout)?,
        })
    }

    async fn fetch(&self, query: &str, num: usize) -> Result<Vec<SearchResult>> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("num", num.to_string().as_str()),
            ])
            .send()
            .await
            .context("Custom Search request failed")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("Custom Search returned {status}");
        }

        let body = resp.text().await.context("Failed to read Custom Search body")?;
        parse_google_response(&body, num)
    }
}

/// Decode a Custom Search JSON body. A body without `items` is zero results.
pub fn parse_google_response(body: &str, limit: usize) -> Result<Vec<SearchResult>> {
    let data: GoogleResponse =
        serde_json::from_str(body).context("Failed to parse Custom Search response")?;

    Ok(data
        .items
        .into_iter()
        .take(limit)
        .map(|item| SearchResult {
            title: item.title,
            snippet: item.snippet,
            link: item.link,
        })
        .collect())
}

#[async_trait]
impl WebSearcher for GoogleSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let num = max_results.min(GOOGLE_MAX_RESULTS);
        if num == 0 {
            return Vec::new();
        }
        info!(query, num, "Custom Search");

        match self.fetch(query, num).await {
            Ok(results) => {
                info!(query, count = results.len(), "Custom Search complete");
                results
            }
            Err(e) => {
                warn!(query, error = %format!("{e:#}"), "Custom Search failed, treating as no results");
                Vec::new()
            }
        }
    }

    fn name(&self) -> &str {
        "google"
    }
}

// --- DuckDuckGo HTML scrape ---

pub struct DuckDuckGoSearcher {
    endpoint: String,
    client: reqwest::Client,
}

impl DuckDuckGoSearcher {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.to_string(),
            client: build_client(timeout)?,
        })
    }

    async fn fetch(&self, query: &str) -> Result<String> {
        let resp = self
            .client
            .post(&self.endpoint)
            .form(&[("q", query)])
            .header("Accept", "text/html")
            .send()
            .await
            .context("HTML search request failed")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("HTML search returned {status}");
        }

        resp.text().await.context("Failed to read HTML search body")
    }
}

#[async_trait]
impl WebSearcher for DuckDuckGoSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        if max_results == 0 {
            return Vec::new();
        }
        info!(query, max_results, "HTML search");

        let html = match self.fetch(query).await {
            Ok(html) => html,
            Err(e) => {
                warn!(query, error = %format!("{e:#}"), "HTML search failed, treating as no results");
                return Vec::new();
            }
        };

        // `Html` is !Send, so parsing stays in a sync helper after the last await.
        let results = parse_results_html(&html, max_results);
        if results.is_empty() {
            warn!(query, bytes = html.len(), "No recognizable results in HTML search page");
        } else {
            info!(query, count = results.len(), "HTML search complete");
        }
        results
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}

struct ResultSelectors {
    container: Selector,
    title: Selector,
    snippet: Selector,
}

impl ResultSelectors {
    fn new() -> Option<Self> {
        Some(Self {
            container: Selector::parse(".result, .web-result, .results_links").ok()?,
            title: Selector::parse("a.result__a, .result__title a, h2 a").ok()?,
            snippet: Selector::parse(".result__snippet, .result-snippet").ok()?,
        })
    }
}

/// Best-effort extraction of search results from an HTML results page.
///
/// Each record is assembled from the title anchor, its `href`, and the snippet
/// element. A missing snippet or link yields a partial record; only a missing
/// title drops the record. Sponsored results are skipped.
pub fn parse_results_html(html: &str, max_results: usize) -> Vec<SearchResult> {
    let Some(sel) = ResultSelectors::new() else {
        return Vec::new();
    };
    let doc = Html::parse_document(html);

    let containers: Vec<ElementRef> = doc
        .select(&sel.container)
        .filter(|el| !is_ad(el))
        .collect();

    let mut results = Vec::new();

    if containers.is_empty() {
        // Containers drifted away: fall back to bare title anchors.
        for anchor in doc.select(&sel.title) {
            if let Some(record) = record_from_anchor(anchor, None) {
                results.push(record);
            }
            if results.len() >= max_results {
                break;
            }
        }
        return results;
    }

    for container in containers {
        let Some(anchor) = container.select(&sel.title).next() else {
            continue;
        };
        let snippet = container.select(&sel.snippet).next().map(element_text);
        if let Some(record) = record_from_anchor(anchor, snippet) {
            results.push(record);
        }
        if results.len() >= max_results {
            break;
        }
    }

    results
}

fn is_ad(el: &ElementRef) -> bool {
    el.value()
        .classes()
        .any(|c| c == "result--ad" || c == "result--ad--small")
}

fn record_from_anchor(anchor: ElementRef, snippet: Option<String>) -> Option<SearchResult> {
    let title = element_text(anchor);
    if title.is_empty() {
        return None;
    }
    let link = anchor
        .value()
        .attr("href")
        .map(unwrap_redirect)
        .unwrap_or_default();

    Some(SearchResult {
        title,
        snippet: snippet.unwrap_or_default(),
        link,
    })
}

fn element_text(el: ElementRef) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a result `href` to its destination.
///
/// Tracking links such as `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`
/// are unwrapped to the percent-decoded embedded URL. Protocol-relative and
/// root-relative links are made absolute first.
pub fn unwrap_redirect(href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }

    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else if href.starts_with('/') {
        format!("https://duckduckgo.com{href}")
    } else {
        href.to_string()
    };

    let Ok(parsed) = url::Url::parse(&absolute) else {
        return absolute;
    };

    let redirector = is_redirector(&parsed);
    for (key, value) in parsed.query_pairs() {
        let carries_target = key == DDG_REDIRECT_PARAM || (redirector && REDIRECT_PARAMS.contains(&&*key));
        if carries_target && (value.starts_with("http://") || value.starts_with("https://")) {
            return value.into_owned();
        }
    }

    absolute
}

fn is_redirector(url: &url::Url) -> bool {
    let host = url.host_str().unwrap_or("").to_lowercase();
    REDIRECTORS.iter().any(|(domain, path)| {
        (host == *domain || host.ends_with(&format!(".{domain}"))) && url.path().starts_with(path)
    })
}
