use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::rows::{Cell, Record, Rows};

/// `steam_games_YYYYmmdd_HHMMSS.xlsx`
pub fn catalog_filename(now: DateTime<Local>) -> String {
    format!("steam_games_{}.xlsx", now.format("%Y%m%d_%H%M%S"))
}

pub fn history_filename(app_id: u32) -> String {
    format!("steam_recommendations_{}.xlsx", app_id)
}

/// Write one header row plus one row per record. Replaces any existing file.
pub fn write_xlsx<T: Record>(path: &Path, sheet_name: Option<&str>, rows: &Rows<T>) -> Result<()> {
    let (columns, cells) = rows.project();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    if let Some(name) = sheet_name {
        sheet
            .set_name(name)
            .with_context(|| format!("Invalid sheet name {:?}", name))?;
    }

    for (col, name) in columns.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for (r, row) in cells.iter().enumerate() {
        let r = (r + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(s) => sheet.write_string(r, col as u16, s.as_str())?,
                Cell::Int(n) => sheet.write_number(r, col as u16, *n as f64)?,
            };
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::testing::{read_xlsx, text};
    use super::*;
    use crate::rows::{CatalogEntry, HistogramPoint};
    use calamine::Data;
    use chrono::TimeZone;

    #[test]
    fn catalog_name_is_timestamped() {
        let t = Local.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(catalog_filename(t), "steam_games_20240305_070809.xlsx");
    }

    #[test]
    fn writes_named_sheet_with_numeric_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(history_filename(570));
        let rows = Rows::from(vec![HistogramPoint {
            id: 570,
            date: "2013-07-01".into(),
            recommendations_up: 3,
            recommendations_down: 1,
        }]);

        write_xlsx(&path, Some("AppID_570"), &rows).unwrap();

        let (sheets, rows) = read_xlsx(&path);
        assert_eq!(sheets, vec!["AppID_570"]);
        assert_eq!(
            rows,
            vec![
                text(&["id", "date", "recommendations_up", "recommendations_down"]),
                vec![
                    Data::Float(570.0),
                    Data::String("2013-07-01".into()),
                    Data::Float(3.0),
                    Data::Float(1.0),
                ],
            ]
        );
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        std::fs::write(&path, b"stale").unwrap();

        write_xlsx::<CatalogEntry>(&path, None, &Rows::new()).unwrap();

        let (_, rows) = read_xlsx(&path);
        assert_eq!(
            rows,
            vec![text(&[
                "id",
                "name",
                "release_date",
                "price",
                "developers",
                "publishers",
                "genres",
                "description",
            ])]
        );
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.xlsx");
        assert!(write_xlsx::<HistogramPoint>(&path, None, &Rows::new()).is_err());
    }
}
