// 🔄 Row Normalizer - raw statement rows -> NormalizedTransaction
//
// normalize_row is a pure builder: one raw row + its headers in, one fully
// formed record out. The batch layer drops blank rows, validates, and splits
// valid records from the ones that need manual review.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::DEFAULT_HEADER_SCAN_ROWS;
use crate::data_quality::{validate_transaction, BatchSummary};
use crate::entities::bank::CreditCardDetector;
use crate::entities::category::{CREDIT_CARD_BILLS, DEFAULT_CATEGORY};
use crate::entities::merchant::MerchantClassifier;
use crate::parser::{
    header_matches, parse_date, resolve_amount, ColumnMap, AMOUNT_SYNONYMS,
    CREDIT_SYNONYMS, DATE_SYNONYMS, DEBIT_SYNONYMS, DESCRIPTION_SYNONYMS,
};
use crate::rules::CategoryMapper;
use crate::transaction::{normalize_header_key, CellValue, NormalizedTransaction, RawBatch, RawRow};

// ============================================================================
// BATCH RESULT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub transactions: Vec<NormalizedTransaction>,

    pub invalid_transactions: Vec<NormalizedTransaction>,

    /// True when no valid transaction came out of the file
    pub requires_manual_review: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub summary: BatchSummary,
}

impl BatchResult {
    fn manual_review(message: String, summary: BatchSummary) -> Self {
        BatchResult {
            requires_manual_review: true,
            message: Some(message),
            summary,
            ..BatchResult::default()
        }
    }
}

// ============================================================================
// ROW VIEW
// ============================================================================

/// Header name + cell, in column order, for either row shape.
fn row_cells<'a>(row: &'a RawRow, headers: &'a [String]) -> Vec<(&'a str, &'a CellValue)> {
    match row {
        RawRow::Positional(cells) => cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (headers.get(i).map(String::as_str).unwrap_or(""), cell))
            .collect(),
        RawRow::Keyed(pairs) => pairs.iter().map(|(k, v)| (k.as_str(), v)).collect(),
    }
}

fn original_data(cells: &[(&str, &CellValue)]) -> BTreeMap<String, CellValue> {
    let mut data = BTreeMap::new();
    for (i, (header, cell)) in cells.iter().enumerate() {
        let mut key = normalize_header_key(header);
        if key.is_empty() {
            key = format!("column_{}", i);
        }
        if data.contains_key(&key) {
            key = format!("{}_{}", key, i);
        }
        data.insert(key, (*cell).clone());
    }
    data
}

fn text_of(cell: Option<&CellValue>) -> Option<String> {
    cell.and_then(CellValue::as_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// ============================================================================
// ROW NORMALIZER
// ============================================================================

#[derive(Debug, Clone)]
pub struct RowNormalizer {
    mapper: CategoryMapper,
    merchants: MerchantClassifier,
    cards: CreditCardDetector,
    header_scan_rows: usize,
}

impl RowNormalizer {
    pub fn new(mapper: CategoryMapper) -> Self {
        RowNormalizer {
            mapper,
            merchants: MerchantClassifier::new(),
            cards: CreditCardDetector::new(),
            header_scan_rows: DEFAULT_HEADER_SCAN_ROWS,
        }
    }

    pub fn with_merchants(mut self, merchants: MerchantClassifier) -> Self {
        self.merchants = merchants;
        self
    }

    pub fn with_header_scan_rows(mut self, rows: usize) -> Self {
        self.header_scan_rows = rows.max(1);
        self
    }

    pub fn mapper(&self) -> &CategoryMapper {
        &self.mapper
    }

    /// Build the canonical record for one row. Never fails; anything that
    /// cannot be located or parsed stays absent.
    pub fn normalize_row(&self, row: &RawRow, headers: &[String]) -> NormalizedTransaction {
        let cells = row_cells(row, headers);
        let names: Vec<&str> = cells.iter().map(|(h, _)| *h).collect();
        let columns = ColumnMap::discover(&names);
        let cell = |idx: Option<usize>| idx.and_then(|i| cells.get(i)).map(|(_, c)| *c);

        let date = cell(columns.date).and_then(parse_date);
        let description = text_of(cell(columns.description));
        let (amount, transaction_type) = resolve_amount(
            cell(columns.credit),
            cell(columns.debit),
            cell(columns.amount),
            cell(columns.direction),
        );
        let existing_category = text_of(cell(columns.category));

        let desc = description.as_deref().unwrap_or("");
        let merchant = self.merchants.detect_merchant(desc).to_string();

        let mut tx = NormalizedTransaction {
            date,
            description,
            amount,
            transaction_type,
            category: existing_category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            merchant,
            original_data: original_data(&cells),
            ..NormalizedTransaction::empty()
        };
        tx.category = self.mapper.resolve_category(&tx);

        // Card bill payments always land in the same bucket
        if let Some(info) = tx.description.as_deref().and_then(|d| self.cards.detect(d)) {
            tx.is_credit_card_payment = true;
            tx.category = CREDIT_CARD_BILLS.to_string();
            tx.credit_card_info = Some(info);
        }

        tx
    }

    /// Normalize and validate every non-blank row of a decoded statement.
    pub fn normalize_batch(&self, batch: &RawBatch) -> BatchResult {
        let rows: Vec<&RawRow> = batch.rows.iter().filter(|r| !r.is_empty()).collect();

        let mut summary = BatchSummary {
            rows_seen: batch.rows.len(),
            empty_rows: batch.rows.len() - rows.len(),
            ..BatchSummary::default()
        };

        let normalize = |row: &&RawRow| {
            let mut tx = self.normalize_row(row, &batch.headers);
            let report = validate_transaction(&tx);
            tx.errors = report.errors;
            tx.warnings = report.warnings;
            tx
        };

        #[cfg(feature = "parallel")]
        let normalized: Vec<NormalizedTransaction> = rows.par_iter().map(normalize).collect();

        #[cfg(not(feature = "parallel"))]
        let normalized: Vec<NormalizedTransaction> = rows.iter().map(normalize).collect();

        let (transactions, invalid_transactions): (Vec<_>, Vec<_>) =
            normalized.into_iter().partition(|tx| tx.errors.is_empty());

        summary.valid = transactions.len();
        summary.invalid = invalid_transactions.len();
        summary.with_warnings = transactions.iter().filter(|tx| !tx.warnings.is_empty()).count();

        info!("{}", summary.summary());

        let requires_manual_review = transactions.is_empty();
        let message = if !requires_manual_review {
            None
        } else if rows.is_empty() {
            Some("No transaction rows found in the statement".to_string())
        } else {
            warn!(invalid = invalid_transactions.len(), "no valid transactions extracted");
            Some(format!(
                "No valid transactions could be extracted; {} rows need manual review",
                invalid_transactions.len()
            ))
        };

        BatchResult {
            transactions,
            invalid_transactions,
            requires_manual_review,
            message,
            summary,
        }
    }

    /// Normalize a raw grid whose header row is not necessarily the first row.
    pub fn normalize_grid(&self, grid: &[Vec<CellValue>]) -> BatchResult {
        let Some(header_idx) = detect_header_row(grid, self.header_scan_rows) else {
            warn!(scanned = grid.len().min(self.header_scan_rows), "header row not found");
            let summary = BatchSummary {
                rows_seen: grid.len(),
                ..BatchSummary::default()
            };
            return BatchResult::manual_review(
                format!(
                    "Could not detect a header row in the first {} rows; expected a date column \
                     and a description or amount column",
                    self.header_scan_rows
                ),
                summary,
            );
        };

        debug!(row = header_idx, "detected header row");

        let headers: Vec<String> = grid[header_idx]
            .iter()
            .map(|c| c.as_text().map(|s| s.trim().to_string()).unwrap_or_default())
            .collect();
        let rows: Vec<RawRow> = grid[header_idx + 1..]
            .iter()
            .map(|cells| RawRow::Positional(cells.clone()))
            .collect();

        self.normalize_batch(&RawBatch::new(headers, rows))
    }
}

impl Default for RowNormalizer {
    fn default() -> Self {
        Self::new(CategoryMapper::new())
    }
}

// ============================================================================
// HEADER ROW DETECTION
// ============================================================================

fn is_header_text(cell: &CellValue, synonyms: &[&str]) -> bool {
    let CellValue::Text(text) = cell else {
        return false;
    };
    let lower = text.trim().to_lowercase();
    // Banner lines carry values ("Statement date 01/04/2024"); header names don't
    !lower.is_empty()
        && !lower.chars().any(|c| c.is_ascii_digit())
        && synonyms.iter().any(|syn| header_matches(&lower, syn))
}

/// Index of the first row (within `scan_rows`) holding a date header plus a
/// description or amount header.
pub fn detect_header_row(grid: &[Vec<CellValue>], scan_rows: usize) -> Option<usize> {
    grid.iter().take(scan_rows).position(|row| {
        let has_date = row.iter().any(|c| is_header_text(c, DATE_SYNONYMS));
        let has_other = row.iter().any(|c| {
            is_header_text(c, DESCRIPTION_SYNONYMS)
                || is_header_text(c, AMOUNT_SYNONYMS)
                || is_header_text(c, CREDIT_SYNONYMS)
                || is_header_text(c, DEBIT_SYNONYMS)
        });
        has_date && has_other
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_quality::{MISSING_AMOUNT, MISSING_DATE};
    use crate::transaction::TransactionType;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn text_row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|c| CellValue::from(*c)).collect()
    }

    #[test]
    fn test_normalize_generic_amount_row() {
        let normalizer = RowNormalizer::default();
        let hdrs = headers(&["Date", "Description", "Amount"]);
        let row = RawRow::positional(["15/03/24", "  NETFLIX.COM SUBSCRIPTION ", "(649.00)"]);

        let tx = normalizer.normalize_row(&row, &hdrs);

        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(tx.description.as_deref(), Some("NETFLIX.COM SUBSCRIPTION"));
        assert_eq!(tx.amount, Some(-649.0));
        assert_eq!(tx.transaction_type, TransactionType::Debit);
        assert_eq!(tx.category, "Entertainment");
        assert_eq!(tx.merchant, "Netflix");
        assert!(!tx.is_credit_card_payment);
        assert!(tx.tags.is_empty());
        assert_eq!(
            tx.original_data.get("amount"),
            Some(&CellValue::Text("(649.00)".to_string()))
        );
    }

    #[test]
    fn test_normalize_split_columns() {
        let normalizer = RowNormalizer::default();
        let hdrs = headers(&["Txn Date", "Narration", "Withdrawal Amt.", "Deposit Amt.", "Closing Balance"]);

        let debit = normalizer.normalize_row(
            &RawRow::positional(["01/04/2024", "UPI/SWIGGY/ORDER", "250.00", "", "10,000.00"]),
            &hdrs,
        );
        assert_eq!(debit.amount, Some(-250.0));
        assert_eq!(debit.transaction_type, TransactionType::Debit);

        let credit = normalizer.normalize_row(
            &RawRow::positional(["01/04/2024", "SALARY APR ACME", "", "85,000.00", "95,000.00"]),
            &hdrs,
        );
        assert_eq!(credit.amount, Some(85000.0));
        assert_eq!(credit.transaction_type, TransactionType::Credit);
        assert_eq!(credit.category, "Salary");
    }

    #[test]
    fn test_normalize_single_signed_direction_column() {
        let normalizer = RowNormalizer::default();

        let hdrs = headers(&["Date", "Description", "Debit/Credit"]);
        let tx = normalizer.normalize_row(&RawRow::positional(["07/03/2024", "UBER TRIP", "-212.40"]), &hdrs);
        assert_eq!(tx.amount, Some(-212.4));
        assert_eq!(tx.transaction_type, TransactionType::Debit);

        let hdrs = headers(&["Date", "Description", "Amount (Dr/Cr)"]);
        let tx = normalizer.normalize_row(&RawRow::positional(["07/03/2024", "UBER TRIP", "212.40 Dr"]), &hdrs);
        assert_eq!(tx.amount, Some(-212.4));
        assert_eq!(tx.transaction_type, TransactionType::Debit);

        let tx = normalizer.normalize_row(&RawRow::positional(["08/03/2024", "REFUND", "99.00"]), &hdrs);
        assert_eq!(tx.amount, Some(99.0));
        assert_eq!(tx.transaction_type, TransactionType::Credit);
    }

    #[test]
    fn test_normalize_direction_indicator_column() {
        let normalizer = RowNormalizer::default();
        let hdrs = headers(&["Date", "Description", "Amount", "Cr/Dr"]);

        let tx = normalizer.normalize_row(&RawRow::positional(["07/03/2024", "UBER TRIP", "212.40", "DR"]), &hdrs);
        assert_eq!(tx.amount, Some(-212.4));
        assert_eq!(tx.transaction_type, TransactionType::Debit);
    }

    #[test]
    fn test_credit_card_override() {
        let normalizer = RowNormalizer::default();
        let hdrs = headers(&["Date", "Description", "Amount"]);
        let row = RawRow::positional(["2024-03-20", "AMAZON PAY CREDIT CARD BILL PAYMENT", "-15000"]);

        let tx = normalizer.normalize_row(&row, &hdrs);

        assert!(tx.is_credit_card_payment);
        assert_eq!(tx.category, CREDIT_CARD_BILLS);
        assert_eq!(tx.merchant, "Amazon Pay");
        assert!(tx.credit_card_info.is_some());
    }

    #[test]
    fn test_keyed_row_uses_keys() {
        let normalizer = RowNormalizer::default();
        let row = RawRow::keyed([
            ("Posting Date", CellValue::Date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())),
            ("Particulars", CellValue::from("ZOMATO ONLINE")),
            ("Amount", CellValue::Number(-420.5)),
            ("Category", CellValue::from("Team Lunch")),
        ]);

        let tx = normalizer.normalize_row(&row, &[]);

        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(tx.amount, Some(-420.5));
        // Pattern match wins over the existing category
        assert_eq!(tx.category, "Food & Dining");
        assert_eq!(tx.original_data.len(), 4);
        assert!(tx.original_data.contains_key("posting_date"));
    }

    #[test]
    fn test_existing_category_used_when_nothing_matches() {
        let normalizer = RowNormalizer::default();
        let hdrs = headers(&["Date", "Description", "Amount", "Category"]);
        let row = RawRow::positional(["2024-03-01", "MYSTERY VENDOR", "-10", "Gifts"]);

        assert_eq!(normalizer.normalize_row(&row, &hdrs).category, "Gifts");
    }

    #[test]
    fn test_row_longer_than_headers() {
        let normalizer = RowNormalizer::default();
        let hdrs = headers(&["Date", "Description"]);
        let row = RawRow::positional(["2024-03-01", "X", "extra"]);

        let tx = normalizer.normalize_row(&row, &hdrs);
        assert!(tx.original_data.contains_key("column_2"));
    }

    #[test]
    fn test_normalize_row_is_pure() {
        let normalizer = RowNormalizer::default();
        let hdrs = headers(&["Date", "Description", "Amount"]);
        let row = RawRow::positional(["2024-03-01", "UBER TRIP", "-212.40"]);

        assert_eq!(normalizer.normalize_row(&row, &hdrs), normalizer.normalize_row(&row, &hdrs));
    }

    #[test]
    fn test_unparseable_row_is_invalid() {
        let normalizer = RowNormalizer::default();
        let batch = RawBatch::new(
            headers(&["Remarks", "Reference"]),
            vec![RawRow::positional(["SOME PAYMENT", "REF123"])],
        );

        let result = normalizer.normalize_batch(&batch);

        assert!(result.transactions.is_empty());
        assert_eq!(result.invalid_transactions.len(), 1);
        let errors = &result.invalid_transactions[0].errors;
        assert!(errors.contains(&MISSING_DATE.to_string()));
        assert!(errors.contains(&MISSING_AMOUNT.to_string()));
        assert!(result.requires_manual_review);
        assert!(result.message.is_some());
    }

    #[test]
    fn test_batch_skips_blank_rows_and_splits() {
        let normalizer = RowNormalizer::default();
        let batch = RawBatch::new(
            headers(&["Date", "Description", "Amount"]),
            vec![
                RawRow::positional(["2024-03-01", "UBER TRIP", "-212.40"]),
                RawRow::positional(["", " ", ""]),
                RawRow::positional(["2024-03-02", "MYSTERY", "0"]),
            ],
        );

        let result = normalizer.normalize_batch(&batch);

        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.invalid_transactions.len(), 1);
        assert!(!result.requires_manual_review);
        assert_eq!(result.message, None);
        assert_eq!(result.summary.rows_seen, 3);
        assert_eq!(result.summary.empty_rows, 1);
    }

    #[test]
    fn test_grid_with_banner_rows() {
        let normalizer = RowNormalizer::default();
        let grid = vec![
            text_row(&["HDFC BANK LTD", "", ""]),
            text_row(&["Statement date 01/04/2024", "Account description", ""]),
            text_row(&["Date", "Narration", "Amount"]),
            text_row(&["02/03/2024", "UPI/ZOMATO/ORDER", "-380"]),
            text_row(&["", "", ""]),
        ];

        assert_eq!(detect_header_row(&grid, 25), Some(2));

        let result = normalizer.normalize_grid(&grid);
        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.transactions[0].merchant, "Zomato");
        assert_eq!(result.summary.empty_rows, 1);
    }

    #[test]
    fn test_grid_without_header_row() {
        let normalizer = RowNormalizer::default().with_header_scan_rows(2);
        let grid = vec![
            text_row(&["foo", "bar"]),
            text_row(&["1", "2"]),
            text_row(&["Date", "Amount"]),
        ];

        let result = normalizer.normalize_grid(&grid);
        assert!(result.requires_manual_review);
        assert!(result
            .message
            .as_deref()
            .unwrap()
            .starts_with("Could not detect a header row"));
    }
}
