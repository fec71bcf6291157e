// ✅ Data Quality - per-record import validity
//
// A record is importable iff it has a parsed date, a non-empty unmasked
// description and a finite non-zero amount. Validity is always recomputed from
// the fields; nothing here is cached on the record.

use serde::{Deserialize, Serialize};

use crate::entities::category::is_placeholder_category;
use crate::transaction::NormalizedTransaction;

pub const MISSING_DATE: &str = "Missing or invalid date";
pub const MISSING_DESCRIPTION: &str = "Missing or invalid description";
pub const MISSING_AMOUNT: &str = "Missing, invalid, or zero amount";
pub const CATEGORY_NOT_DETECTED: &str = "Category not detected — will be set as Others";

/// Substrings (case-insensitive) that mark a description as redacted by the exporter.
pub const MASKED_MARKERS: &[&str] = &[
    "[masked]",
    "<masked>",
    "data masked",
    "#####",
    "xxxxxxxxxxxx",
];

pub fn is_masked(description: &str) -> bool {
    let lower = description.to_lowercase();
    MASKED_MARKERS.iter().any(|m| lower.contains(m))
}

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Record cannot be imported
    Warning,  // Importable, but lower quality
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub passed: bool,
    pub field: &'static str,
    pub message: &'static str,
    pub severity: Severity,
}

impl ValidationResult {
    fn pass(field: &'static str) -> Self {
        ValidationResult {
            passed: true,
            field,
            message: "",
            severity: Severity::Warning,
        }
    }

    fn fail(field: &'static str, message: &'static str, severity: Severity) -> Self {
        ValidationResult {
            passed: false,
            field,
            message,
            severity,
        }
    }
}

/// Outcome of validating one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn record(&mut self, result: ValidationResult) {
        if result.passed {
            return;
        }
        let message = result.message.to_string();
        match result.severity {
            Severity::Critical => self.errors.push(message),
            Severity::Warning => self.warnings.push(message),
        }
    }
}

// ============================================================================
// RULES
// ============================================================================

fn validate_date(tx: &NormalizedTransaction) -> ValidationResult {
    match tx.date {
        Some(_) => ValidationResult::pass("date"),
        None => ValidationResult::fail("date", MISSING_DATE, Severity::Critical),
    }
}

fn validate_description(tx: &NormalizedTransaction) -> ValidationResult {
    match tx.description.as_deref().map(str::trim) {
        Some(d) if !d.is_empty() && !is_masked(d) => ValidationResult::pass("description"),
        _ => ValidationResult::fail("description", MISSING_DESCRIPTION, Severity::Critical),
    }
}

fn validate_amount(tx: &NormalizedTransaction) -> ValidationResult {
    match tx.amount {
        Some(a) if a.is_finite() && a != 0.0 => ValidationResult::pass("amount"),
        _ => ValidationResult::fail("amount", MISSING_AMOUNT, Severity::Critical),
    }
}

fn validate_category(tx: &NormalizedTransaction) -> ValidationResult {
    if is_placeholder_category(&tx.category) {
        ValidationResult::fail("category", CATEGORY_NOT_DETECTED, Severity::Warning)
    } else {
        ValidationResult::pass("category")
    }
}

/// Run every rule; errors come out in date, description, amount order.
pub fn validate_transaction(tx: &NormalizedTransaction) -> ValidationReport {
    let mut report = ValidationReport::default();
    for result in [
        validate_date(tx),
        validate_description(tx),
        validate_amount(tx),
        validate_category(tx),
    ] {
        report.record(result);
    }
    report
}

// ============================================================================
// BATCH SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub rows_seen: usize,
    pub empty_rows: usize,
    pub valid: usize,
    pub invalid: usize,
    pub with_warnings: usize,
}

impl BatchSummary {
    pub fn summary(&self) -> String {
        format!(
            "Rows: {} ({} empty), valid: {}, invalid: {}, with warnings: {}",
            self.rows_seen, self.empty_rows, self.valid, self.invalid, self.with_warnings
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn create_valid_transaction() -> NormalizedTransaction {
        NormalizedTransaction {
            date: NaiveDate::from_ymd_opt(2024, 3, 15),
            description: Some("SWIGGY ORDER 1234".to_string()),
            amount: Some(-320.0),
            category: "Food & Dining".to_string(),
            ..NormalizedTransaction::empty()
        }
    }

    #[test]
    fn test_validate_perfect_transaction() {
        let report = validate_transaction(&create_valid_transaction());
        assert!(report.is_valid());
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_validate_missing_date_and_amount() {
        let mut tx = create_valid_transaction();
        tx.date = None;
        tx.amount = None;

        let report = validate_transaction(&tx);
        assert!(!report.is_valid());
        assert_eq!(report.errors, vec![MISSING_DATE, MISSING_AMOUNT]);
    }

    #[test]
    fn test_validate_zero_and_non_finite_amount() {
        let mut tx = create_valid_transaction();
        tx.amount = Some(0.0);
        assert_eq!(validate_transaction(&tx).errors, vec![MISSING_AMOUNT]);

        tx.amount = Some(f64::INFINITY);
        assert_eq!(validate_transaction(&tx).errors, vec![MISSING_AMOUNT]);
    }

    #[test]
    fn test_validate_masked_description() {
        let mut tx = create_valid_transaction();
        tx.description = Some("UPI/XXXXXXXXXXXX1234/PAY".to_string());
        assert_eq!(validate_transaction(&tx).errors, vec![MISSING_DESCRIPTION]);

        tx.description = Some("   ".to_string());
        assert_eq!(validate_transaction(&tx).errors, vec![MISSING_DESCRIPTION]);

        // A masked card number (XX1234) is not a masked description
        tx.description = Some("CARD XX1234 PAYMENT".to_string());
        assert!(validate_transaction(&tx).is_valid());
    }

    #[test]
    fn test_uncategorized_is_a_warning_only() {
        let mut tx = create_valid_transaction();
        tx.category = "Others".to_string();

        let report = validate_transaction(&tx);
        assert!(report.is_valid());
        assert_eq!(report.warnings, vec![CATEGORY_NOT_DETECTED]);
    }

    #[test]
    fn test_validity_is_recomputed() {
        let mut tx = create_valid_transaction();
        assert!(tx.is_valid());
        tx.date = None;
        assert!(!tx.is_valid());
    }
}
