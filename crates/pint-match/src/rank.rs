//! Candidate ranking under a strictness profile.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::normalize::{normalize_invoice_number, normalize_name, normalize_trn};
use crate::score::similarity_score;

/// Minimum-score profiles for candidate retention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchProfile {
    Strict,
    Balanced,
    Loose,
}

impl MatchProfile {
    pub fn min_score(self) -> f64 {
        match self {
            MatchProfile::Strict => 0.86,
            MatchProfile::Balanced => 0.72,
            MatchProfile::Loose => 0.58,
        }
    }
}

/// One record offered up for matching, with up to four searchable
/// fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuzzyCandidate {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// A retained candidate with its best-field score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    pub candidate: FuzzyCandidate,
    pub score: f64,
    /// Which field produced the score, when the query was non-blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_field: Option<&'static str>,
}

/// Rank candidates against a query.
///
/// The query is normalized per field kind and the maximum similarity
/// across the candidate's fields is taken. Candidates at or above the
/// profile threshold are kept, sorted descending by score (stable for
/// ties).
///
/// A blank query short-circuits to every candidate at score 1.0 in
/// input order. That is the unfiltered listing default, not a confident
/// match, and downstream must not treat it as one.
pub fn rank_candidates(
    query: &str,
    candidates: &[FuzzyCandidate],
    profile: MatchProfile,
) -> Vec<RankedMatch> {
    if query.trim().is_empty() {
        return candidates
            .iter()
            .map(|candidate| RankedMatch {
                candidate: candidate.clone(),
                score: 1.0,
                matched_field: None,
            })
            .collect();
    }

    let name_query = normalize_name(query);
    let invoice_query = normalize_invoice_number(query);
    let trn_query = normalize_trn(query);

    let mut matches: Vec<RankedMatch> = candidates
        .iter()
        .filter_map(|candidate| {
            let mut best: Option<(f64, &'static str)> = None;
            let mut consider = |score: f64, field: &'static str| {
                if best.is_none_or(|(b, _)| score > b) {
                    best = Some((score, field));
                }
            };

            if let Some(name) = &candidate.vendor_name {
                consider(
                    similarity_score(&name_query, &normalize_name(name)),
                    "vendor_name",
                );
            }
            if let Some(number) = &candidate.invoice_number {
                consider(
                    similarity_score(&invoice_query, &normalize_invoice_number(number)),
                    "invoice_number",
                );
            }
            if let Some(trn) = &candidate.trn {
                consider(similarity_score(&trn_query, &normalize_trn(trn)), "trn");
            }
            if let Some(reference) = &candidate.reference {
                consider(
                    similarity_score(&invoice_query, &normalize_invoice_number(reference)),
                    "reference",
                );
            }

            let (score, matched_field) = best?;
            if score < profile.min_score() {
                return None;
            }
            Some(RankedMatch {
                candidate: candidate.clone(),
                score,
                matched_field: Some(matched_field),
            })
        })
        .collect();

    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<FuzzyCandidate> {
        vec![
            FuzzyCandidate {
                id: "1".to_string(),
                vendor_name: Some("Acme Trading LLC".to_string()),
                invoice_number: Some("INV-1001".to_string()),
                trn: Some("100200300".to_string()),
                reference: None,
            },
            FuzzyCandidate {
                id: "2".to_string(),
                vendor_name: Some("Globex".to_string()),
                invoice_number: Some("ABC-778".to_string()),
                trn: Some("999888777".to_string()),
                reference: None,
            },
        ]
    }

    #[test]
    fn invoice_number_query_ranks_exact_first() {
        let ranked = rank_candidates("INV1001", &candidates(), MatchProfile::Strict);
        assert!(!ranked.is_empty());
        assert_eq!(ranked[0].candidate.id, "1");
        assert_eq!(ranked[0].score, 1.0);
        assert_eq!(ranked[0].matched_field, Some("invoice_number"));
    }

    #[test]
    fn strict_results_are_subset_of_loose() {
        let strict = rank_candidates("Acm Tradin", &candidates(), MatchProfile::Strict);
        let loose = rank_candidates("Acm Tradin", &candidates(), MatchProfile::Loose);
        assert!(strict.len() <= loose.len());
        for kept in &strict {
            assert!(loose.iter().any(|m| m.candidate.id == kept.candidate.id));
        }
    }

    #[test]
    fn trn_query_matches_digit_normalized() {
        let ranked = rank_candidates("TRN 100-200-300", &candidates(), MatchProfile::Strict);
        assert_eq!(ranked[0].candidate.id, "1");
        assert_eq!(ranked[0].matched_field, Some("trn"));
    }

    #[test]
    fn blank_query_lists_everything_in_input_order() {
        let ranked = rank_candidates("   ", &candidates(), MatchProfile::Strict);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].candidate.id, "1");
        assert_eq!(ranked[1].candidate.id, "2");
        assert!(ranked.iter().all(|m| m.score == 1.0));
        assert!(ranked.iter().all(|m| m.matched_field.is_none()));
    }

    #[test]
    fn below_threshold_candidates_are_dropped() {
        let ranked = rank_candidates("zzzzzz", &candidates(), MatchProfile::Strict);
        assert!(ranked.is_empty());
    }
}
