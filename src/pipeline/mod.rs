pub mod catalog;
pub mod history;

use indicatif::{ProgressBar, ProgressStyle};

pub use catalog::CatalogPipeline;
pub use history::HistoryPipeline;

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    pb.set_style(style);
    pb
}
