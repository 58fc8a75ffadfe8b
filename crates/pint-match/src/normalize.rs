//! Normalization for the three search value kinds.
//!
//! All three functions are pure and total: any input yields a
//! normalized string, possibly empty.

/// Invoice/document references: strip separators and whitespace,
/// lowercase. `"INV- 2026/001"` becomes `"inv2026001"`.
pub fn normalize_invoice_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '_' | '/' | '.' | '\\'))
        .collect::<String>()
        .to_lowercase()
}

/// Party names: collapse internal whitespace, lowercase, trim.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// TRNs: digits only. `"TRN 100-200-300"` becomes `"100200300"`.
pub fn normalize_trn(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
