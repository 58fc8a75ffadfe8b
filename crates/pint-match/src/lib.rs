//! Fuzzy matching for duplicate and investigation detection.
//!
//! Free-text fields (vendor names, invoice numbers, TRNs) are
//! normalized, scored with a Levenshtein-based similarity, and ranked
//! against a query under a strictness profile.

mod normalize;
mod rank;
mod score;

pub use normalize::{normalize_invoice_number, normalize_name, normalize_trn};
pub use rank::{FuzzyCandidate, MatchProfile, RankedMatch, rank_candidates};
pub use score::similarity_score;
