use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::appids;
use crate::client::Storefront;
use crate::error::FetchError;
use crate::export;
use crate::histogram::fetch_histogram;
use crate::rows::{HistogramPoint, Rows};
use crate::settings::Settings;
use crate::throttle::Throttle;

#[derive(Debug, Default, PartialEq)]
pub struct HistoryStats {
    pub ids: usize,
    pub rejected_lines: usize,
    pub written: Vec<PathBuf>,
    pub empty: usize,
    pub failed: usize,
}

/// Id list → review histogram per app → one spreadsheet per app.
pub struct HistoryPipeline<'a, S, T> {
    store: &'a S,
    settings: &'a Settings,
    delay: T,
}

impl<'a, S: Storefront, T: Throttle> HistoryPipeline<'a, S, T> {
    pub fn new(store: &'a S, settings: &'a Settings, delay: T) -> Self {
        HistoryPipeline {
            store,
            settings,
            delay,
        }
    }

    pub async fn fetch_rows(&self, app_id: u32) -> Result<Rows<HistogramPoint>, FetchError> {
        let points = fetch_histogram(self.store, app_id, self.settings.utc_offset_hours).await?;
        Ok(Rows::from(points))
    }

    /// Process every id in `input`. An unreadable id list ends the run with
    /// nothing processed; only spreadsheet write failures are returned as errors.
    /// Existing per-app files are overwritten.
    pub async fn run(&self, input: &Path) -> Result<HistoryStats> {
        let mut stats = HistoryStats::default();

        let list = match appids::read_app_ids(input) {
            Ok(list) => list,
            Err(e) => {
                error!("{:#}; check the file name and path", e);
                return Ok(stats);
            }
        };
        stats.ids = list.ids.len();
        stats.rejected_lines = list.rejected.len();
        if list.ids.is_empty() {
            info!("No app ids in {}", input.display());
            return Ok(stats);
        }

        let dir = &self.settings.history_dir;
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

        let pb = super::progress_bar(list.ids.len() as u64);
        for app_id in list.ids {
            pb.set_message(format!("app {}", app_id));
            match self.fetch_rows(app_id).await {
                Ok(rows) if rows.is_empty() => {
                    info!("No review history for app {}", app_id);
                    stats.empty += 1;
                }
                Ok(rows) => {
                    let path = dir.join(export::history_filename(app_id));
                    let sheet = format!("AppID_{}", app_id);
                    export::write_xlsx(&path, Some(sheet.as_str()), &rows)?;
                    stats.written.push(path);
                }
                Err(e) => {
                    warn!("Error fetching review history for app {}: {}", app_id, e);
                    stats.failed += 1;
                }
            }
            self.delay.wait().await;
            pb.inc(1);
        }
        pb.finish_and_clear();

        Ok(stats)
    }
}
