// 🚚 Import Pipeline - normalize, compare against stored, persist
//
// grid -> BatchResult -> existing (store) -> DuplicateReport -> insert
// Nothing is written when the batch needs manual review.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::IngestConfig;
use crate::db::TransactionStore;
use crate::deduplication::{DuplicateDetector, DuplicateReport};
use crate::error::Result;
use crate::normalizer::{BatchResult, RowNormalizer};
use crate::transaction::{CellValue, RawBatch};

/// What to persist once duplicates are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportPolicy {
    /// Store only transactions without a match
    #[default]
    SkipDuplicates,
    /// Store every valid transaction, duplicates included
    ImportAll,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub batch: BatchResult,
    pub report: DuplicateReport,
    pub inserted: usize,
}

impl ImportOutcome {
    pub fn summary(&self) -> String {
        format!(
            "valid: {}, invalid: {}, new: {}, duplicates: {}, inserted: {}",
            self.batch.transactions.len(),
            self.batch.invalid_transactions.len(),
            self.report.new_transactions.len(),
            self.report.duplicate_indices().len(),
            self.inserted
        )
    }
}

pub struct ImportPipeline {
    normalizer: RowNormalizer,
    detector: DuplicateDetector,
}

impl ImportPipeline {
    pub fn new(normalizer: RowNormalizer, detector: DuplicateDetector) -> Self {
        ImportPipeline {
            normalizer,
            detector,
        }
    }

    pub fn from_config(config: &IngestConfig) -> Result<Self> {
        Ok(Self::new(config.normalizer()?, config.detector()))
    }

    pub fn normalizer(&self) -> &RowNormalizer {
        &self.normalizer
    }

    pub fn detector(&self) -> &DuplicateDetector {
        &self.detector
    }

    /// Import a raw grid (header row located automatically).
    pub fn import_grid<S: TransactionStore>(
        &self,
        grid: &[Vec<CellValue>],
        store: &mut S,
        user_id: &str,
        policy: ImportPolicy,
    ) -> Result<ImportOutcome> {
        let batch = self.normalizer.normalize_grid(grid);
        self.import_normalized(batch, store, user_id, policy)
    }

    /// Import an already decoded batch.
    pub fn import_batch<S: TransactionStore>(
        &self,
        batch: &RawBatch,
        store: &mut S,
        user_id: &str,
        policy: ImportPolicy,
    ) -> Result<ImportOutcome> {
        let batch = self.normalizer.normalize_batch(batch);
        self.import_normalized(batch, store, user_id, policy)
    }

    fn import_normalized<S: TransactionStore>(
        &self,
        batch: BatchResult,
        store: &mut S,
        user_id: &str,
        policy: ImportPolicy,
    ) -> Result<ImportOutcome> {
        if batch.requires_manual_review {
            info!(user_id, "batch needs manual review; nothing imported");
            return Ok(ImportOutcome {
                batch,
                report: DuplicateReport::default(),
                inserted: 0,
            });
        }

        let existing = store.existing_transactions(user_id)?;
        let report = self.detector.detect(&batch.transactions, &existing);

        let to_store = match policy {
            ImportPolicy::SkipDuplicates => &report.new_transactions,
            ImportPolicy::ImportAll => &batch.transactions,
        };
        let inserted = if to_store.is_empty() {
            0
        } else {
            store.insert_transactions(user_id, to_store)?
        };

        let outcome = ImportOutcome {
            batch,
            report,
            inserted,
        };
        info!(user_id, ?policy, "{}", outcome.summary());
        Ok(outcome)
    }
}

impl Default for ImportPipeline {
    fn default() -> Self {
        Self::new(RowNormalizer::default(), DuplicateDetector::new())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStore;
    use crate::error::IngestError;
    use crate::transaction::{NormalizedTransaction, RawRow};

    fn statement(rows: &[[&str; 3]]) -> RawBatch {
        RawBatch::new(
            vec!["Date".to_string(), "Description".to_string(), "Amount".to_string()],
            rows.iter().map(|r| RawRow::positional(*r)).collect(),
        )
    }

    /// Store that refuses every write.
    struct FailingStore;

    impl TransactionStore for FailingStore {
        fn existing_transactions(&self, _user_id: &str) -> Result<Vec<NormalizedTransaction>> {
            Ok(Vec::new())
        }

        fn insert_transactions(&mut self, _: &str, _: &[NormalizedTransaction]) -> Result<usize> {
            Err(IngestError::Config("read-only store".to_string()))
        }
    }

    #[test]
    fn test_second_import_skips_duplicates() {
        let pipeline = ImportPipeline::default();
        let mut store = SqliteStore::open_in_memory().unwrap();
        let batch = statement(&[
            ["2024-03-01", "UBER TRIP 8812", "-212.40"],
            ["2024-03-02", "SWIGGY ORDER 1234", "-320.00"],
        ]);

        let first = pipeline
            .import_batch(&batch, &mut store, "u1", ImportPolicy::SkipDuplicates)
            .unwrap();
        assert_eq!(first.inserted, 2);

        let second = pipeline
            .import_batch(&batch, &mut store, "u1", ImportPolicy::SkipDuplicates)
            .unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.report.duplicate_indices(), vec![0, 1]);
        assert_eq!(store.count("u1").unwrap(), 2);
    }

    #[test]
    fn test_import_all_keeps_duplicates() {
        let pipeline = ImportPipeline::default();
        let mut store = SqliteStore::open_in_memory().unwrap();
        let batch = statement(&[["2024-03-01", "UBER TRIP", "-212.40"]]);

        pipeline
            .import_batch(&batch, &mut store, "u1", ImportPolicy::ImportAll)
            .unwrap();
        let again = pipeline
            .import_batch(&batch, &mut store, "u1", ImportPolicy::ImportAll)
            .unwrap();

        assert_eq!(again.report.duplicates.len(), 1);
        assert_eq!(again.inserted, 1);
        assert_eq!(store.count("u1").unwrap(), 2);
    }

    #[test]
    fn test_manual_review_writes_nothing() {
        let pipeline = ImportPipeline::default();
        let mut store = FailingStore;
        let batch = statement(&[["not a date", "X", "zero"]]);

        let outcome = pipeline
            .import_batch(&batch, &mut store, "u1", ImportPolicy::ImportAll)
            .unwrap();
        assert!(outcome.batch.requires_manual_review);
        assert_eq!(outcome.inserted, 0);
    }

    #[test]
    fn test_store_failure_propagates() {
        let pipeline = ImportPipeline::default();
        let mut store = FailingStore;
        let batch = statement(&[["2024-03-01", "UBER TRIP", "-212.40"]]);

        let result = pipeline.import_batch(&batch, &mut store, "u1", ImportPolicy::SkipDuplicates);
        assert!(matches!(result, Err(IngestError::Config(_))));
    }
}
