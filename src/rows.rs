/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(u64),
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// A flat record that can be projected onto a fixed column list.
pub trait Record {
    /// Allow-list of column names, in output order.
    const COLUMNS: &'static [&'static str];

    /// Value for `column`, or `None` if this record doesn't carry it.
    fn field(&self, column: &str) -> Option<Cell>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: u32,
    pub name: String,
    pub release_date: String,
    pub price: String,
    pub developers: String,
    pub publishers: String,
    pub genres: String,
    pub description: String,
}

impl Record for CatalogEntry {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "release_date",
        "price",
        "developers",
        "publishers",
        "genres",
        "description",
    ];

    fn field(&self, column: &str) -> Option<Cell> {
        let text = match column {
            "id" => return Some(Cell::Int(self.id.into())),
            "name" => &self.name,
            "release_date" => &self.release_date,
            "price" => &self.price,
            "developers" => &self.developers,
            "publishers" => &self.publishers,
            "genres" => &self.genres,
            "description" => &self.description,
            _ => return None,
        };
        Some(Cell::Text(text.clone()))
    }
}

/// One rollup bucket of the review histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramPoint {
    pub id: u32,
    pub date: String,
    pub recommendations_up: u64,
    pub recommendations_down: u64,
}

impl Record for HistogramPoint {
    const COLUMNS: &'static [&'static str] =
        &["id", "date", "recommendations_up", "recommendations_down"];

    fn field(&self, column: &str) -> Option<Cell> {
        match column {
            "id" => Some(Cell::Int(self.id.into())),
            "date" => Some(Cell::Text(self.date.clone())),
            "recommendations_up" => Some(Cell::Int(self.recommendations_up)),
            "recommendations_down" => Some(Cell::Int(self.recommendations_down)),
            _ => None,
        }
    }
}

/// Ordered in-memory accumulation for a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct Rows<T> {
    items: Vec<T>,
}

impl<T> Default for Rows<T> {
    fn default() -> Self {
        Rows { items: Vec::new() }
    }
}

impl<T> Rows<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> From<Vec<T>> for Rows<T> {
    fn from(items: Vec<T>) -> Self {
        Rows { items }
    }
}

impl<'a, T> IntoIterator for &'a Rows<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Record> Rows<T> {
    /// Columns from the allow-list that at least one record provides.
    /// With no records every allowed column is kept so the header stays stable.
    pub fn columns(&self) -> Vec<&'static str> {
        if self.items.is_empty() {
            return T::COLUMNS.to_vec();
        }
        T::COLUMNS
            .iter()
            .copied()
            .filter(|c| self.items.iter().any(|r| r.field(c).is_some()))
            .collect()
    }

    /// Header-ordered cells, one `Vec` per record. Missing fields become empty text.
    pub fn project(&self) -> (Vec<&'static str>, Vec<Vec<Cell>>) {
        let columns = self.columns();
        let cells = self
            .items
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|c| r.field(c).unwrap_or_else(|| Cell::from("")))
                    .collect()
            })
            .collect();
        (columns, cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Record whose optional column may be missing.
    struct Sparse {
        id: u32,
        note: Option<String>,
    }

    impl Record for Sparse {
        const COLUMNS: &'static [&'static str] = &["id", "note", "extra"];

        fn field(&self, column: &str) -> Option<Cell> {
            match column {
                "id" => Some(Cell::Int(self.id.into())),
                "note" => self.note.as_deref().map(Cell::from),
                _ => None,
            }
        }
    }

    #[test]
    fn columns_filtered_to_present_fields() {
        let rows = Rows::from(vec![
            Sparse { id: 1, note: None },
            Sparse { id: 2, note: Some("x".into()) },
        ]);
        let (cols, cells) = rows.project();
        assert_eq!(cols, vec!["id", "note"]);
        assert_eq!(cells[0], vec![Cell::Int(1), Cell::from("")]);
        assert_eq!(cells[1], vec![Cell::Int(2), Cell::from("x")]);
    }

    #[test]
    fn empty_rows_keep_full_header() {
        let rows: Rows<CatalogEntry> = Rows::new();
        assert_eq!(rows.columns(), CatalogEntry::COLUMNS.to_vec());
    }

    #[test]
    fn catalog_projection_order() {
        let entry = CatalogEntry {
            id: 570,
            name: "Dota 2".into(),
            release_date: "Jul 9, 2013".into(),
            price: "Free".into(),
            developers: "Valve".into(),
            publishers: "Valve".into(),
            genres: "Action, Strategy".into(),
            description: "MOBA".into(),
        };
        let (cols, cells) = Rows::from(vec![entry]).project();
        assert_eq!(cols[0], "id");
        assert_eq!(cols[7], "description");
        assert_eq!(cells[0][0], Cell::Int(570));
        assert_eq!(cells[0][3], Cell::from("Free"));
    }
}
