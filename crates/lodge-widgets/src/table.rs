//! Data table
//!
//! Cells form a row-major grid navigation group with a roving tabindex, so
//! the whole table is a single Tab stop and arrows move between cells.

use lodge_a11y::{AccessibilityCore, NavigationGroup, Orientation, Priority};
use lodge_dom::{Document, KeyOutcome, KeyboardEvent, NodeId};

use crate::{Result, WidgetError};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// `aria-sort` value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Accessible data table
#[derive(Debug)]
pub struct DataTable {
    table: NodeId,
    tbody: NodeId,
    headers: Vec<NodeId>,
    header_labels: Vec<String>,
    /// Body rows in display order, each with its cells
    rows: Vec<(NodeId, Vec<NodeId>)>,
    nav: NavigationGroup,
    sort: Option<(usize, SortDirection)>,
}

impl DataTable {
    /// Build the table under `parent`. Every row must have one cell per header.
    pub fn build(
        doc: &mut Document,
        parent: NodeId,
        caption: &str,
        headers: &[&str],
        rows: &[Vec<String>],
    ) -> Result<Self> {
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != headers.len()) {
            return Err(WidgetError::RowWidth { row, expected: headers.len(), got: cells.len() });
        }

        let table = doc.append_element(parent, "table", &[("class", "data-table")])?;
        let caption_node = doc.append_element(table, "caption", &[])?;
        doc.append_text(caption_node, caption)?;

        let thead = doc.append_element(table, "thead", &[])?;
        let head_row = doc.append_element(thead, "tr", &[])?;
        let mut header_nodes = Vec::with_capacity(headers.len());
        for label in headers {
            let th = doc.append_element(head_row, "th", &[("scope", "col")])?;
            doc.append_text(th, label)?;
            header_nodes.push(th);
        }

        let tbody = doc.append_element(table, "tbody", &[])?;
        let mut body_rows = Vec::with_capacity(rows.len());
        for values in rows {
            let tr = doc.append_element(tbody, "tr", &[])?;
            let mut cells = Vec::with_capacity(values.len());
            for value in values {
                let td = doc.append_element(tr, "td", &[("tabindex", "-1")])?;
                doc.append_text(td, value)?;
                cells.push(td);
            }
            body_rows.push((tr, cells));
        }

        let nav = NavigationGroup::new(Self::flatten(&body_rows), Orientation::Horizontal)
            .with_columns(headers.len());
        nav.apply_roving_tabindex(doc);
        tracing::debug!("Built table \"{}\" with {} rows", caption, rows.len());

        Ok(Self {
            table,
            tbody,
            headers: header_nodes,
            header_labels: headers.iter().map(|h| h.to_string()).collect(),
            rows: body_rows,
            nav,
            sort: None,
        })
    }

    fn flatten(rows: &[(NodeId, Vec<NodeId>)]) -> Vec<NodeId> {
        rows.iter().flat_map(|(_, cells)| cells.iter().copied()).collect()
    }

    pub fn table(&self) -> NodeId {
        self.table
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn header(&self, column: usize) -> Option<NodeId> {
        self.headers.get(column).copied()
    }

    /// Cell at a display position
    pub fn cell(&self, row: usize, column: usize) -> Option<NodeId> {
        self.rows.get(row).and_then(|(_, cells)| cells.get(column)).copied()
    }

    /// Cell holding the roving tab stop
    pub fn active_cell(&self) -> Option<NodeId> {
        self.nav.active_item()
    }

    pub fn sort(&self) -> Option<(usize, SortDirection)> {
        self.sort
    }

    /// Arrow, Home and End keys move between cells
    pub fn handle_key(&mut self, doc: &mut Document, event: &KeyboardEvent) -> KeyOutcome {
        self.nav.sync_with_focus(doc);
        let outcome = self.nav.handle_key(doc, event);
        if outcome.is_handled() {
            self.nav.apply_roving_tabindex(doc);
        }
        outcome
    }

    /// Sort rows by the text of a column, mark the header and announce it.
    ///
    /// The active cell keeps its position in the grid.
    pub fn sort_by(
        &mut self,
        doc: &mut Document,
        core: &mut AccessibilityCore,
        column: usize,
        direction: SortDirection,
    ) -> Result<()> {
        if column >= self.headers.len() {
            return Err(WidgetError::ColumnOutOfRange { column, columns: self.headers.len() });
        }

        for (i, &th) in self.headers.iter().enumerate() {
            if i == column {
                doc.set_attribute(th, "aria-sort", direction.as_str())?;
            } else {
                doc.remove_attribute(th, "aria-sort")?;
            }
        }

        let mut keyed: Vec<(String, (NodeId, Vec<NodeId>))> = self.rows
            .drain(..)
            .map(|row| (doc.tree().text_content(row.1[column]), row))
            .collect();
        keyed.sort_by(|a, b| compare_cells(&a.0, &b.0));
        if direction == SortDirection::Descending {
            keyed.reverse();
        }
        self.rows = keyed.into_iter().map(|(_, row)| row).collect();

        for (tr, _) in &self.rows {
            doc.append_child(self.tbody, *tr)?;
        }

        self.nav.set_items(Self::flatten(&self.rows));
        self.nav.apply_roving_tabindex(doc);
        self.sort = Some((column, direction));

        let text = format!("Sorted by {}, {}", self.header_labels[column], direction.as_str());
        core.announce(doc, &text, Priority::Polite);
        Ok(())
    }
}

/// Numeric when both cells parse as numbers, otherwise case-insensitive text
fn compare_cells(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}
