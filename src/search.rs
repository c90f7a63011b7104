use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{info, warn};

use crate::client::Storefront;
use crate::settings::Settings;

// "showing 1 - 25 of 105,632"
static RESULT_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bof\s+([\d,]+)").unwrap());

/// How many search pages a run will walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCount {
    /// Read from the result-count marker on page 1.
    Parsed { total_results: u32, pages: u32 },
    /// Marker missing or unreadable; a fixed upper bound is used instead.
    Fallback { pages: u32 },
}

impl PageCount {
    pub fn pages(&self) -> u32 {
        match *self {
            PageCount::Parsed { pages, .. } | PageCount::Fallback { pages } => pages,
        }
    }

    pub fn from_html(html: &str, page_size: u32, fallback_pages: u32) -> Self {
        match parse_result_count(html) {
            Some(total_results) => PageCount::Parsed {
                total_results,
                pages: total_results.div_ceil(page_size.max(1)),
            },
            None => PageCount::Fallback {
                pages: fallback_pages,
            },
        }
    }
}

/// Total number of search results announced by the pagination marker.
pub fn parse_result_count(html: &str) -> Option<u32> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse("div.search_pagination_left").ok()?;
    let text: String = doc.select(&sel).next()?.text().collect();
    let caps = RESULT_COUNT_RE.captures(text.trim())?;
    caps[1].replace(',', "").parse().ok()
}

/// App ids carried by the result rows of one search page, in document order.
/// Bundle rows list several ids in one attribute and are skipped.
pub fn parse_app_ids(html: &str) -> Vec<u32> {
    let doc = Html::parse_document(html);
    let Ok(sel) = Selector::parse("a.search_result_row[data-ds-appid]") else {
        return Vec::new();
    };

    doc.select(&sel)
        .filter_map(|a| {
            let raw = a.value().attr("data-ds-appid")?.trim();
            match raw.parse::<u32>() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!("Skipping search row with appid {:?}", raw);
                    None
                }
            }
        })
        .collect()
}

/// Request page 1 and work out the page count, falling back on any failure.
pub async fn count_pages<S: Storefront>(store: &S, settings: &Settings) -> PageCount {
    let count = match store.search_page(1).await {
        Ok(html) => PageCount::from_html(&html, settings.page_size, settings.fallback_pages),
        Err(e) => {
            warn!("Search page 1 failed: {}", e);
            PageCount::Fallback {
                pages: settings.fallback_pages,
            }
        }
    };

    match count {
        PageCount::Parsed {
            total_results,
            pages,
        } => info!("{} search results across {} pages", total_results, pages),
        PageCount::Fallback { pages } => {
            warn!("Result count unavailable, assuming {} pages", pages)
        }
    }
    count
}

/// App ids on one page; failures are logged and yield nothing.
pub async fn scrape_page<S: Storefront>(store: &S, page: u32) -> Vec<u32> {
    match store.search_page(page).await {
        Ok(html) => parse_app_ids(&html),
        Err(e) => {
            warn!("Error scraping page {}: {}", page, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
    }

    #[test]
    fn result_count_from_marker() {
        let html = fixture("search_page.html");
        assert_eq!(parse_result_count(&html), Some(105_632));
        assert_eq!(
            PageCount::from_html(&html, 25, 5000),
            PageCount::Parsed {
                total_results: 105_632,
                pages: 4226
            }
        );
    }

    #[test]
    fn exact_multiple_does_not_add_page() {
        let html = r#"<div class="search_pagination_left"> showing 1 - 25 of 50 </div>"#;
        assert_eq!(PageCount::from_html(html, 25, 5000).pages(), 2);
    }

    #[test]
    fn missing_marker_falls_back() {
        let html = fixture("search_page_no_count.html");
        assert_eq!(parse_result_count(&html), None);
        assert_eq!(
            PageCount::from_html(&html, 25, 5000),
            PageCount::Fallback { pages: 5000 }
        );
    }

    #[test]
    fn garbled_marker_falls_back() {
        let html = r#"<div class="search_pagination_left">no results here</div>"#;
        assert_eq!(
            PageCount::from_html(html, 25, 77),
            PageCount::Fallback { pages: 77 }
        );
    }

    #[test]
    fn one_id_per_matching_anchor() {
        let html = fixture("search_page.html");
        let doc = Html::parse_document(&html);
        let sel = Selector::parse("a.search_result_row[data-ds-appid]").unwrap();
        let anchors = doc.select(&sel).count();

        let ids = parse_app_ids(&html);
        assert_eq!(ids.len(), anchors);
        assert_eq!(ids, vec![570, 730, 440, 1172470]);
    }

    #[test]
    fn page_without_rows_is_empty() {
        assert!(parse_app_ids(&fixture("search_page_no_count.html")).is_empty());
    }

    #[test]
    fn bundle_rows_skipped() {
        let html = r#"
            <a class="search_result_row" data-ds-appid="10">x</a>
            <a class="search_result_row" data-ds-appid="20,30" data-ds-bundleid="5">b</a>
            <a class="other_row" data-ds-appid="40">y</a>
        "#;
        assert_eq!(parse_app_ids(html), vec![10]);
    }
}
