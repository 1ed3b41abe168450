//! Market table

use crate::{store::ViewStateStore, types::MarketEntry};
use std::sync::Arc;

const HEADER: [&str; 3] = ["Name", "Price", "Market Cap"];
const SEPARATOR: &str = " | ";

/// One rendered table row, keyed by the upstream id
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub key: String,
    pub cells: [String; 3],
}

impl From<&MarketEntry> for TableRow {
    fn from(entry: &MarketEntry) -> Self {
        Self {
            key: entry.id.clone(),
            cells: [
                entry.name.clone(),
                format!("${}", entry.current_price),
                format!("${}", entry.market_cap),
            ],
        }
    }
}

impl TableRow {
    pub fn line(&self) -> String {
        self.cells.join(SEPARATOR)
    }
}

/// Table of the market list held by the store
///
/// Keeps the snapshot it last rendered and only re-renders when the store
/// holds a different one.
#[derive(Debug, Default)]
pub struct TableView {
    rendered: Option<Arc<[MarketEntry]>>,
    output: String,
}

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows for `entries`, in the order given
    pub fn rows(entries: &[MarketEntry]) -> Vec<TableRow> {
        entries.iter().map(TableRow::from).collect()
    }

    /// Header line followed by one line per entry
    pub fn render(entries: &[MarketEntry]) -> String {
        let mut lines = vec![HEADER.join(SEPARATOR)];
        lines.extend(Self::rows(entries).iter().map(TableRow::line));
        lines.join("\n")
    }

    /// Re-renders if the store's list changed since the last call
    ///
    /// # Returns
    /// True if the output was rebuilt
    pub fn refresh(&mut self, store: &ViewStateStore) -> bool {
        let current = store.current_list();
        if let Some(rendered) = &self.rendered {
            if Arc::ptr_eq(rendered, &current) {
                return false;
            }
        }

        self.output = Self::render(&current);
        self.rendered = Some(current);
        true
    }

    /// Output of the last `refresh`
    pub fn output(&self) -> &str {
        &self.output
    }
}
