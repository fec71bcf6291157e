// 🔍 Duplicate Detector - re-import detection against stored transactions
// Two stages per (incoming, existing) pair: exact content hash, then a
// weighted fuzzy score gated on amount equality.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::transaction::NormalizedTransaction;

// ============================================================================
// CONFIG
// ============================================================================

/// Scoring constants for the fuzzy stage. Defaults: 80 / 0.3 / 0.5 / 0.2 / 0.01.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Minimum combined score (0-100) for a fuzzy duplicate
    pub threshold: f64,

    pub date_weight: f64,

    pub description_weight: f64,

    pub amount_weight: f64,

    /// Absolute difference under which two amounts count as equal
    pub amount_tolerance: f64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        DedupConfig {
            threshold: 80.0,
            date_weight: 0.3,
            description_weight: 0.5,
            amount_weight: 0.2,
            amount_tolerance: 0.01,
        }
    }
}

// ============================================================================
// VERDICT
// ============================================================================

/// How a verdict was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum MatchEvidence {
    /// Identical normalized (date, amount, description)
    Hash,

    /// Component similarities (0-100) and the combined score
    #[serde(rename_all = "camelCase")]
    Fuzzy {
        date_similarity: f64,
        description_similarity: f64,
        amount_match: bool,
        score: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateVerdict {
    pub is_duplicate: bool,

    /// 0-100
    pub confidence: f64,

    pub reason: String,

    #[serde(flatten)]
    pub method: MatchEvidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateMatch {
    /// Index into the incoming slice
    pub incoming_index: usize,

    /// Index into the existing slice
    pub existing_index: usize,

    pub verdict: DuplicateVerdict,
}

/// Incoming transactions split into new ones and matched pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateReport {
    pub new_transactions: Vec<NormalizedTransaction>,
    pub duplicates: Vec<DuplicateMatch>,
}

impl DuplicateReport {
    /// Distinct incoming indices with at least one match, ascending.
    pub fn duplicate_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.duplicates.iter().map(|m| m.incoming_index).collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

// ============================================================================
// HASHING + SIMILARITY
// ============================================================================

fn normalize_description(description: Option<&str>) -> String {
    description
        .unwrap_or_default()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whole cents; an absent or non-finite amount hashes as the empty string.
fn normalize_amount(amount: Option<f64>) -> String {
    amount
        .filter(|a| a.is_finite())
        .map(|a| format!("{}", (a * 100.0).round() as i64))
        .unwrap_or_default()
}

/// Stable SHA-256 over the normalized `date|amount|description` triple, hex encoded.
pub fn content_hash(tx: &NormalizedTransaction) -> String {
    let canonical = format!(
        "{}|{}|{}",
        tx.date_string(),
        normalize_amount(tx.amount),
        normalize_description(tx.description.as_deref())
    );

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Character-level edit distance.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// `(1 - distance / longer_length) * 100`; two empty strings are 100.
pub fn similarity_percent(a: &str, b: &str) -> f64 {
    let longer = a.chars().count().max(b.chars().count());
    if longer == 0 {
        return 100.0;
    }
    (1.0 - levenshtein_distance(a, b) as f64 / longer as f64) * 100.0
}

/// Only an exact match reports full confidence.
const MAX_FUZZY_CONFIDENCE: f64 = 99.99;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ============================================================================
// DUPLICATE DETECTOR
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct DuplicateDetector {
    pub config: DedupConfig,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self::with_config(DedupConfig::default())
    }

    pub fn with_config(config: DedupConfig) -> Self {
        DuplicateDetector { config }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold;
        self
    }

    fn amounts_match(&self, a: Option<f64>, b: Option<f64>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => (a - b).abs() <= self.config.amount_tolerance,
            _ => false,
        }
    }

    /// Pairwise verdict for one incoming and one existing transaction.
    pub fn compare(
        &self,
        incoming: &NormalizedTransaction,
        existing: &NormalizedTransaction,
    ) -> DuplicateVerdict {
        self.compare_hashed(incoming, &content_hash(incoming), existing, &content_hash(existing))
    }

    fn compare_hashed(
        &self,
        incoming: &NormalizedTransaction,
        incoming_hash: &str,
        existing: &NormalizedTransaction,
        existing_hash: &str,
    ) -> DuplicateVerdict {
        if incoming_hash == existing_hash {
            return DuplicateVerdict {
                is_duplicate: true,
                confidence: 100.0,
                reason: "Exact match on date, amount and description".to_string(),
                method: MatchEvidence::Hash,
            };
        }

        let date_similarity = similarity_percent(&incoming.date_string(), &existing.date_string());
        let description_similarity = similarity_percent(
            &normalize_description(incoming.description.as_deref()),
            &normalize_description(existing.description.as_deref()),
        );
        let amount_match = self.amounts_match(incoming.amount, existing.amount);

        let cfg = &self.config;
        let score = date_similarity * cfg.date_weight
            + description_similarity * cfg.description_weight
            + if amount_match { 100.0 } else { 0.0 } * cfg.amount_weight;

        // Amount equality is a hard gate, not just a weight
        let is_duplicate = amount_match && score >= cfg.threshold;

        let reason = if !amount_match {
            "Amounts differ".to_string()
        } else if is_duplicate {
            format!(
                "Similar transaction: date {:.0}%, description {:.0}%, same amount",
                date_similarity, description_similarity
            )
        } else {
            format!("Similarity {:.1} below threshold {:.1}", score, cfg.threshold)
        };

        DuplicateVerdict {
            is_duplicate,
            confidence: round2(score).min(MAX_FUZZY_CONFIDENCE),
            reason,
            method: MatchEvidence::Fuzzy {
                date_similarity: round2(date_similarity),
                description_similarity: round2(description_similarity),
                amount_match,
                score,
            },
        }
    }

    /// Every (incoming, existing) pair judged a duplicate, ordered by incoming
    /// then existing index.
    pub fn find_duplicates(
        &self,
        incoming: &[NormalizedTransaction],
        existing: &[NormalizedTransaction],
    ) -> Vec<DuplicateMatch> {
        let existing_hashes: Vec<String> = existing.iter().map(content_hash).collect();

        let matches_for = |(i, tx): (usize, &NormalizedTransaction)| -> Vec<DuplicateMatch> {
            let hash = content_hash(tx);
            existing
                .iter()
                .zip(&existing_hashes)
                .enumerate()
                .filter_map(|(j, (other, other_hash))| {
                    let verdict = self.compare_hashed(tx, &hash, other, other_hash);
                    verdict.is_duplicate.then_some(DuplicateMatch {
                        incoming_index: i,
                        existing_index: j,
                        verdict,
                    })
                })
                .collect()
        };

        #[cfg(feature = "parallel")]
        let per_row: Vec<Vec<DuplicateMatch>> =
            incoming.par_iter().enumerate().map(matches_for).collect();

        #[cfg(not(feature = "parallel"))]
        let per_row: Vec<Vec<DuplicateMatch>> =
            incoming.iter().enumerate().map(matches_for).collect();

        per_row.into_iter().flatten().collect()
    }

    /// Partition incoming transactions into new ones and duplicates.
    pub fn detect(
        &self,
        incoming: &[NormalizedTransaction],
        existing: &[NormalizedTransaction],
    ) -> DuplicateReport {
        let duplicates = self.find_duplicates(incoming, existing);

        let mut is_dup = vec![false; incoming.len()];
        for m in &duplicates {
            is_dup[m.incoming_index] = true;
        }

        let new_transactions: Vec<NormalizedTransaction> = incoming
            .iter()
            .zip(&is_dup)
            .filter(|(_, dup)| !**dup)
            .map(|(tx, _)| tx.clone())
            .collect();

        debug!(
            incoming = incoming.len(),
            existing = existing.len(),
            new = new_transactions.len(),
            matches = duplicates.len(),
            "duplicate detection finished"
        );

        DuplicateReport {
            new_transactions,
            duplicates,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
