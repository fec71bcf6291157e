// ⚙️ Config - ingest tuning loaded from JSON
//
// {
//   "duplicates": { "threshold": 85 },
//   "custom_rules": [ { "category": "Pets", "patterns": ["petsmart"], "type": "debit" } ],
//   "header_scan_rows": 40
// }

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::deduplication::{DedupConfig, DuplicateDetector};
use crate::error::{IngestError, Result};
use crate::normalizer::RowNormalizer;
use crate::rules::{CategoryMapper, CustomRuleSpec};

pub const DEFAULT_HEADER_SCAN_ROWS: usize = 25;

fn default_header_scan_rows() -> usize {
    DEFAULT_HEADER_SCAN_ROWS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub duplicates: DedupConfig,

    /// Registered after the built-in rules, in file order
    #[serde(default)]
    pub custom_rules: Vec<CustomRuleSpec>,

    /// Leading grid rows searched for the header row
    #[serde(default = "default_header_scan_rows")]
    pub header_scan_rows: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            duplicates: DedupConfig::default(),
            custom_rules: Vec::new(),
            header_scan_rows: DEFAULT_HEADER_SCAN_ROWS,
        }
    }
}

const WEIGHT_SUM_EPSILON: f64 = 1e-9;

impl IngestConfig {
    /// Reject values that would make every comparison meaningless.
    pub fn validate(&self) -> Result<()> {
        let d = &self.duplicates;
        if !(0.0..=100.0).contains(&d.threshold) {
            return Err(IngestError::Config(format!(
                "duplicates.threshold must be within 0-100, got {}",
                d.threshold
            )));
        }
        for (name, w) in [
            ("date_weight", d.date_weight),
            ("description_weight", d.description_weight),
            ("amount_weight", d.amount_weight),
            ("amount_tolerance", d.amount_tolerance),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(IngestError::Config(format!(
                    "duplicates.{} must be a non-negative number, got {}",
                    name, w
                )));
            }
        }
        let weight_sum = d.date_weight + d.description_weight + d.amount_weight;
        if weight_sum > 1.0 + WEIGHT_SUM_EPSILON {
            return Err(IngestError::Config(format!(
                "duplicate weights must sum to at most 1, got {}",
                weight_sum
            )));
        }
        if self.header_scan_rows == 0 {
            return Err(IngestError::Config("header_scan_rows must be at least 1".to_string()));
        }
        for rule in &self.custom_rules {
            if rule.category.trim().is_empty() || rule.patterns.is_empty() {
                return Err(IngestError::Config(
                    "custom rules need a category and at least one pattern".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Built-in rules followed by `custom_rules`.
    pub fn category_mapper(&self) -> Result<CategoryMapper> {
        let mut mapper = CategoryMapper::new();
        for spec in &self.custom_rules {
            mapper.add_rule(spec.compile()?);
        }
        Ok(mapper)
    }

    pub fn normalizer(&self) -> Result<RowNormalizer> {
        Ok(RowNormalizer::new(self.category_mapper()?).with_header_scan_rows(self.header_scan_rows))
    }

    pub fn detector(&self) -> DuplicateDetector {
        DuplicateDetector::with_config(self.duplicates)
    }
}

/// Load and validate a JSON config file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<IngestConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let config: IngestConfig = serde_json::from_str(&content)?;
    config.validate()?;

    debug!(
        path = %path.display(),
        custom_rules = config.custom_rules.len(),
        threshold = config.duplicates.threshold,
        "loaded ingest config"
    );
    Ok(config)
}

// ============================================================================
// TESTS
// ============================================================================
