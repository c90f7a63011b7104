use std::collections::HashMap;

use serde::Deserialize;

use crate::client::Storefront;
use crate::error::FetchError;
use crate::rows::CatalogEntry;

const FREE: &str = "Free";

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    data: Option<AppData>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct AppData {
    name: String,
    release_date: Option<ReleaseDate>,
    price_overview: Option<PriceOverview>,
    developers: Vec<String>,
    publishers: Vec<String>,
    genres: Vec<Genre>,
    short_description: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ReleaseDate {
    date: String,
}

#[derive(Deserialize)]
struct PriceOverview {
    final_formatted: String,
}

#[derive(Deserialize)]
struct Genre {
    description: String,
}

/// Turn an appdetails body into a catalog row for `app_id`.
pub fn parse_details(app_id: u32, body: &str) -> Result<CatalogEntry, FetchError> {
    let mut map: HashMap<String, Envelope> = serde_json::from_str(body)?;
    let envelope = map
        .remove(&app_id.to_string())
        .ok_or(FetchError::NotFound)?;
    if !envelope.success {
        return Err(FetchError::NotFound);
    }
    let data = envelope.data.ok_or(FetchError::NotFound)?;

    Ok(CatalogEntry {
        id: app_id,
        name: data.name,
        release_date: data.release_date.map(|r| r.date).unwrap_or_default(),
        price: data
            .price_overview
            .map(|p| p.final_formatted)
            .unwrap_or_else(|| FREE.to_string()),
        developers: data.developers.join(", "),
        publishers: data.publishers.join(", "),
        genres: data
            .genres
            .into_iter()
            .map(|g| g.description)
            .collect::<Vec<_>>()
            .join(", "),
        description: data.short_description,
    })
}

pub async fn fetch_details<S: Storefront>(
    store: &S,
    app_id: u32,
) -> Result<CatalogEntry, FetchError> {
    let body = store.app_details(app_id).await?;
    parse_details(app_id, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
    }

    #[test]
    fn free_game_gets_sentinel_price() {
        let e = parse_details(570, &fixture("appdetails_570.json")).unwrap();
        assert_eq!(e.id, 570);
        assert_eq!(e.name, "Dota 2");
        assert_eq!(e.release_date, "Jul 9, 2013");
        assert_eq!(e.price, "Free");
        assert_eq!(e.developers, "Valve");
        assert_eq!(e.genres, "Action, Strategy, Free To Play");
        assert!(e.description.starts_with("Every day"));
    }

    #[test]
    fn priced_game_uses_final_formatted() {
        let e = parse_details(440, &fixture("appdetails_440_priced.json")).unwrap();
        assert_eq!(e.price, "$4.99");
        assert_eq!(e.developers, "Valve, Hidden Path");
        assert_eq!(e.release_date, "Oct 10, 2007");
    }

    #[test]
    fn unsuccessful_response_is_not_found() {
        let err = parse_details(12345, &fixture("appdetails_failed.json")).unwrap_err();
        assert!(matches!(err, FetchError::NotFound));
    }

    #[test]
    fn absent_key_is_not_found() {
        let err = parse_details(999, &fixture("appdetails_570.json")).unwrap_err();
        assert!(matches!(err, FetchError::NotFound));
    }

    #[test]
    fn missing_optional_fields_default() {
        let body = r#"{"7":{"success":true,"data":{"name":"Bare"}}}"#;
        let e = parse_details(7, body).unwrap();
        assert_eq!(e.name, "Bare");
        assert_eq!(e.release_date, "");
        assert_eq!(e.price, "Free");
        assert_eq!(e.genres, "");
    }

    #[test]
    fn non_json_body_is_shape_error() {
        let err = parse_details(1, "<html>busy</html>").unwrap_err();
        assert!(matches!(err, FetchError::Shape(_)));
    }
}
