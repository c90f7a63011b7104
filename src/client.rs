use anyhow::{Context, Result};
use tracing::debug;

use crate::error::FetchError;
use crate::settings::Settings;

/// The three store endpoints the pipelines read. Bodies are returned raw;
/// parsing lives next to each pipeline stage.
#[allow(async_fn_in_trait)]
pub trait Storefront {
    /// HTML of one search results page (1-based).
    async fn search_page(&self, page: u32) -> Result<String, FetchError>;
    /// JSON body of the appdetails endpoint for one app.
    async fn app_details(&self, app_id: u32) -> Result<String, FetchError>;
    /// JSON body of the review histogram endpoint for one app.
    async fn review_histogram(&self, app_id: u32) -> Result<String, FetchError>;
}

pub struct SteamClient {
    http: reqwest::Client,
    settings: Settings,
}

impl SteamClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(SteamClient {
            http,
            settings: settings.clone(),
        })
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, FetchError> {
        debug!("GET {} {:?}", url, query);
        let resp = self.http.get(url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(resp.text().await?)
    }
}

impl Storefront for SteamClient {
    async fn search_page(&self, page: u32) -> Result<String, FetchError> {
        let s = &self.settings;
        let page = page.to_string();
        self.get_text(
            &s.search_url(),
            &[
                ("l", s.language.as_str()),
                ("cc", s.currency.as_str()),
                ("category1", s.category.as_str()),
                ("sort_by", "_ASC"),
                ("page", page.as_str()),
            ],
        )
        .await
    }

    async fn app_details(&self, app_id: u32) -> Result<String, FetchError> {
        let s = &self.settings;
        let id = app_id.to_string();
        self.get_text(
            &s.details_url(),
            &[
                ("appids", id.as_str()),
                ("l", s.language.as_str()),
                ("cc", s.currency.as_str()),
            ],
        )
        .await
    }

    async fn review_histogram(&self, app_id: u32) -> Result<String, FetchError> {
        let s = &self.settings;
        self.get_text(
            &s.histogram_url(app_id),
            &[
                ("l", s.histogram_language.as_str()),
                ("review_score_preference", "0"),
            ],
        )
        .await
    }
}
