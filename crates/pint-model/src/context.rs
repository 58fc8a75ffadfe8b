//! Immutable dataset view for one validation run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::{BUYER_ID, INVOICE_ID, LINE_ID, Record};

/// Which of the three record kinds a check iterates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetScope {
    Buyers,
    Headers,
    Lines,
}

impl std::fmt::Display for DatasetScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DatasetScope::Buyers => "buyers",
            DatasetScope::Headers => "headers",
            DatasetScope::Lines => "lines",
        };
        f.write_str(name)
    }
}

/// An immutable view over one uploaded dataset: the three record
/// sequences plus lookup indices derived once at construction.
///
/// Lines and headers may carry foreign keys that do not resolve; that is
/// a validation finding for the engine, not a construction error.
#[derive(Debug, Clone, Default)]
pub struct DataContext {
    buyers: Vec<Record>,
    headers: Vec<Record>,
    lines: Vec<Record>,
    buyer_index: BTreeMap<String, usize>,
    header_index: BTreeMap<String, usize>,
    lines_by_invoice: BTreeMap<String, Vec<usize>>,
}

impl DataContext {
    /// Build the view and its indices. First record wins on duplicate
    /// ids; duplicate detection is a rule concern, not an index concern.
    pub fn new(buyers: Vec<Record>, headers: Vec<Record>, lines: Vec<Record>) -> Self {
        let mut buyer_index = BTreeMap::new();
        for (idx, buyer) in buyers.iter().enumerate() {
            if let Some(id) = buyer.get_str(BUYER_ID) {
                buyer_index.entry(id).or_insert(idx);
            }
        }

        let mut header_index = BTreeMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(id) = header.get_str(INVOICE_ID) {
                header_index.entry(id).or_insert(idx);
            }
        }

        // Insertion order of lines within an invoice is preserved.
        let mut lines_by_invoice: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, line) in lines.iter().enumerate() {
            if let Some(invoice_id) = line.get_str(INVOICE_ID) {
                lines_by_invoice.entry(invoice_id).or_default().push(idx);
            }
        }

        Self {
            buyers,
            headers,
            lines,
            buyer_index,
            header_index,
            lines_by_invoice,
        }
    }

    pub fn buyers(&self) -> &[Record] {
        &self.buyers
    }

    pub fn headers(&self) -> &[Record] {
        &self.headers
    }

    pub fn lines(&self) -> &[Record] {
        &self.lines
    }

    /// The record slice a `DatasetScope` selects.
    pub fn records(&self, scope: DatasetScope) -> &[Record] {
        match scope {
            DatasetScope::Buyers => &self.buyers,
            DatasetScope::Headers => &self.headers,
            DatasetScope::Lines => &self.lines,
        }
    }

    pub fn buyer(&self, buyer_id: &str) -> Option<&Record> {
        self.buyer_index.get(buyer_id).map(|idx| &self.buyers[*idx])
    }

    pub fn header(&self, invoice_id: &str) -> Option<&Record> {
        self.header_index
            .get(invoice_id)
            .map(|idx| &self.headers[*idx])
    }

    /// Lines for an invoice in upload order. Unknown invoice yields an
    /// empty slice.
    pub fn lines_for_invoice(&self, invoice_id: &str) -> Vec<&Record> {
        self.lines_by_invoice
            .get(invoice_id)
            .map(|indices| indices.iter().map(|idx| &self.lines[*idx]).collect())
            .unwrap_or_default()
    }

    /// Id fields grouped per scope (`buyer_id`, `invoice_id`, `line_id`).
    pub fn id_field(scope: DatasetScope) -> &'static str {
        match scope {
            DatasetScope::Buyers => BUYER_ID,
            DatasetScope::Headers => INVOICE_ID,
            DatasetScope::Lines => LINE_ID,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_value(value)
    }

    #[test]
    fn indices_resolve_and_preserve_line_order() {
        let ctx = DataContext::new(
            vec![record(json!({"buyer_id": "B1", "name": "Acme"}))],
            vec![record(json!({"invoice_id": "I1", "buyer_id": "B1"}))],
            vec![
                record(json!({"line_id": "L2", "invoice_id": "I1", "pos": 1})),
                record(json!({"line_id": "L1", "invoice_id": "I1", "pos": 2})),
                record(json!({"line_id": "L9", "invoice_id": "I-unknown"})),
            ],
        );

        assert!(ctx.buyer("B1").is_some());
        assert!(ctx.header("I1").is_some());
        assert!(ctx.header("I2").is_none());

        let line_ids: Vec<_> = ctx
            .lines_for_invoice("I1")
            .iter()
            .filter_map(|line| line.get_str("line_id"))
            .collect();
        assert_eq!(line_ids, vec!["L2".to_string(), "L1".to_string()]);
        assert!(ctx.lines_for_invoice("nope").is_empty());
    }

    #[test]
    fn dangling_references_do_not_panic() {
        let ctx = DataContext::new(
            vec![],
            vec![record(json!({"invoice_id": "I1", "buyer_id": "B-missing"}))],
            vec![record(json!({"invoice_id": "I-missing", "line_id": "L1"}))],
        );
        assert!(ctx.buyer("B-missing").is_none());
        assert_eq!(ctx.records(DatasetScope::Headers).len(), 1);
    }
}
