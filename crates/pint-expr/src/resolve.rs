//! Dot-path field resolution and message template substitution.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use pint_model::Record;
use pint_model::record::value_to_display;
use regex::Regex;
use serde_json::Value;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_.]*)\}").expect("placeholder regex"));

/// Resolve a dot-path against a record. A whole-key match wins over
/// path traversal, so columns whose names contain dots still resolve.
/// Returns `None` on any missing segment, never panics.
pub fn resolve_field<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    if let Some(value) = record.get(path) {
        return Some(value);
    }

    let mut segments = path.split('.');
    let mut current = record.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Replace every `{fieldPath}` in a template with the resolved value,
/// stringified. `extra` overrides the record (used for derived values
/// such as duplicate group sizes). Unresolved paths stay as the literal
/// placeholder rather than failing the message.
pub fn substitute(
    template: &str,
    record: &Record,
    extra: Option<&BTreeMap<String, String>>,
) -> String {
    PLACEHOLDER
        .replace_all(template, |captures: &regex::Captures<'_>| {
            let path = &captures[1];
            if let Some(value) = extra.and_then(|map| map.get(path)) {
                return value.clone();
            }
            match resolve_field(record, path) {
                Some(value) => value_to_display(value),
                None => captures[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_value(value)
    }

    #[test]
    fn resolves_nested_paths() {
        let rec = record(json!({
            "seller": {"address": {"city": "Dubai"}},
            "invoice_number": "INV-1"
        }));
        assert_eq!(
            resolve_field(&rec, "seller.address.city"),
            Some(&json!("Dubai"))
        );
        assert_eq!(resolve_field(&rec, "seller.address.street"), None);
        assert_eq!(resolve_field(&rec, "missing.path"), None);
        assert_eq!(resolve_field(&rec, ""), None);
    }

    #[test]
    fn whole_key_wins_over_traversal() {
        let mut rec = Record::new();
        rec.insert("a.b", json!("flat"));
        assert_eq!(resolve_field(&rec, "a.b"), Some(&json!("flat")));
    }

    #[test]
    fn substitutes_with_overrides_and_literal_fallback() {
        let rec = record(json!({"invoice_number": "INV-1", "vat_total": 50}));
        let mut extra = BTreeMap::new();
        extra.insert("group_size".to_string(), "3".to_string());
        let message = substitute(
            "Invoice {invoice_number}: VAT {vat_total}, seen {group_size} times, {unknown}",
            &rec,
            Some(&extra),
        );
        assert_eq!(message, "Invoice INV-1: VAT 50, seen 3 times, {unknown}");
    }

    #[test]
    fn null_renders_empty() {
        let rec = record(json!({"buyer_trn": null}));
        assert_eq!(substitute("TRN: {buyer_trn}.", &rec, None), "TRN: .");
    }
}
