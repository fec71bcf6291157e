// Statement Ingest - Core Library
// Raw statement rows -> normalized, classified, de-duplicated transactions

pub mod config;
pub mod data_quality;
pub mod db;
pub mod decode;
pub mod deduplication;
pub mod entities;
pub mod error;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod rules;
pub mod transaction;

// Re-export commonly used types
pub use config::{load_config, IngestConfig};
pub use data_quality::{validate_transaction, BatchSummary, ValidationReport};
pub use db::{SqliteStore, TransactionStore};
pub use decode::{read_csv_file, read_csv_grid};
pub use deduplication::{
    content_hash, DedupConfig, DuplicateDetector, DuplicateMatch, DuplicateReport,
    DuplicateVerdict, MatchEvidence,
};
pub use entities::{CreditCardDetector, MerchantClassifier};
pub use error::{IngestError, Result};
pub use normalizer::{BatchResult, RowNormalizer};
pub use pipeline::{ImportOutcome, ImportPipeline, ImportPolicy};
pub use rules::{CategoryMapper, CategoryRule, CustomRuleSpec, RuleDirection, RulePattern};
pub use transaction::{
    CellValue, CreditCardInfo, NormalizedTransaction, RawBatch, RawRow, TransactionType,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
