use std::path::Path;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::appids;
use crate::client::Storefront;
use crate::details::fetch_details;
use crate::error::FetchError;
use crate::export;
use crate::rows::{CatalogEntry, Rows};
use crate::search::{self, PageCount};
use crate::settings::Settings;
use crate::throttle::Throttle;

#[derive(Debug, Default, PartialEq)]
pub struct CatalogStats {
    pub pages: u32,
    pub ids_found: usize,
    pub entries: usize,
    pub not_found: usize,
    pub failed: usize,
}

/// Search pages → app details → one spreadsheet + the id list.
pub struct CatalogPipeline<'a, S, T> {
    store: &'a S,
    settings: &'a Settings,
    detail_delay: T,
    page_delay: T,
}

impl<'a, S: Storefront, T: Throttle> CatalogPipeline<'a, S, T> {
    pub fn new(store: &'a S, settings: &'a Settings, detail_delay: T, page_delay: T) -> Self {
        CatalogPipeline {
            store,
            settings,
            detail_delay,
            page_delay,
        }
    }

    /// Walk the search pages (capped by `max_pages`) and fetch details for every id.
    pub async fn collect(&self, max_pages: Option<u32>) -> (Rows<CatalogEntry>, CatalogStats) {
        let count: PageCount = search::count_pages(self.store, self.settings).await;
        let pages = match max_pages {
            Some(limit) => count.pages().min(limit),
            None => count.pages(),
        };
        info!("Starting to scrape {} pages...", pages);

        let mut rows = Rows::new();
        let mut stats = CatalogStats {
            pages,
            ..Default::default()
        };
        let pb = super::progress_bar(pages as u64);

        for page in 1..=pages {
            pb.set_message(format!("page {}", page));
            info!("Scraping page {}/{}", page, pages);

            let ids = search::scrape_page(self.store, page).await;
            stats.ids_found += ids.len();

            for app_id in ids {
                match fetch_details(self.store, app_id).await {
                    Ok(entry) => {
                        info!("Scraped: {}", entry.name);
                        rows.push(entry);
                    }
                    Err(FetchError::NotFound) => {
                        debug!("No details for app {}, skipping", app_id);
                        stats.not_found += 1;
                    }
                    Err(e) => {
                        warn!("Error fetching details for app {}: {}", app_id, e);
                        stats.failed += 1;
                    }
                }
                self.detail_delay.wait().await;
            }

            self.page_delay.wait().await;
            pb.inc(1);
        }

        pb.finish_and_clear();
        stats.entries = rows.len();
        (rows, stats)
    }

    /// Collect, then write the spreadsheet to `output` and the id list to the
    /// configured path. Write failures are the only errors returned.
    pub async fn run(&self, max_pages: Option<u32>, output: &Path) -> Result<CatalogStats> {
        let (rows, stats) = self.collect(max_pages).await;
        export::write_xlsx(output, None, &rows)?;
        appids::write_app_ids(&self.settings.appid_file, &rows)?;
        Ok(stats)
    }
}
