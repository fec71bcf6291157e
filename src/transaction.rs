// 🧾 Transaction Model - raw input rows and the canonical normalized record
//
// Input rows are untrusted. A NormalizedTransaction is built in one step from a
// raw row and never mutated by the normalizer afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::category::DEFAULT_CATEGORY;
use crate::entities::merchant::DEFAULT_MERCHANT;

// ============================================================================
// RAW INPUT
// ============================================================================

/// One decoded cell of a statement grid.
///
/// JSON strings always read back as `Text`; `Date` only comes from decoders
/// with a native date type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl CellValue {
    /// A cell with nothing meaningful in it (no value, or whitespace only).
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text rendering used for description columns and header detection.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            CellValue::Text(s) => Some(s.clone()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

/// A raw statement row, either aligned to the batch headers or keyed by them.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRow {
    /// Cell `i` belongs to `headers[i]`.
    Positional(Vec<CellValue>),

    /// Header name -> cell, in the order the decoder produced them.
    Keyed(Vec<(String, CellValue)>),
}

impl RawRow {
    pub fn positional<I, C>(cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CellValue>,
    {
        RawRow::Positional(cells.into_iter().map(Into::into).collect())
    }

    pub fn keyed<I, K, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, C)>,
        K: Into<String>,
        C: Into<CellValue>,
    {
        RawRow::Keyed(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// True when every cell is blank.
    pub fn is_empty(&self) -> bool {
        match self {
            RawRow::Positional(cells) => cells.iter().all(CellValue::is_blank),
            RawRow::Keyed(pairs) => pairs.iter().all(|(_, v)| v.is_blank()),
        }
    }
}

/// A decoded tabular statement: header list plus rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBatch {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawBatch {
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        RawBatch { headers, rows }
    }
}

// ============================================================================
// NORMALIZED OUTPUT
// ============================================================================

/// Direction of money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
    #[default]
    Unknown,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "credit",
            TransactionType::Debit => "debit",
            TransactionType::Unknown => "unknown",
        }
    }

    /// Direction implied by the sign of an amount.
    pub fn from_amount(amount: Option<f64>) -> Self {
        match amount {
            Some(a) if a > 0.0 => TransactionType::Credit,
            Some(a) if a < 0.0 => TransactionType::Debit,
            _ => TransactionType::Unknown,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "credit" => TransactionType::Credit,
            "debit" => TransactionType::Debit,
            _ => TransactionType::Unknown,
        }
    }
}

/// Issuer details for a credit-card bill payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardInfo {
    /// Title-cased issuer name, when one is named in the description
    pub bank: Option<String>,

    /// Card network when named, otherwise "Credit Card"
    pub card_type: String,

    /// First bare four-digit run in the description (heuristic)
    pub last4: Option<String>,

    pub display_name: String,
}

/// The canonical, classifier-enriched record derived from one raw row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTransaction {
    pub date: Option<NaiveDate>,

    pub description: Option<String>,

    /// Positive = money in, negative = money out. Never zero.
    pub amount: Option<f64>,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    pub category: String,

    pub merchant: String,

    #[serde(default)]
    pub tags: Vec<String>,

    pub is_credit_card_payment: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card_info: Option<CreditCardInfo>,

    /// Every original cell, keyed by the normalized header name. Audit only.
    #[serde(default)]
    pub original_data: BTreeMap<String, CellValue>,

    /// Filled in by batch validation, empty straight out of the row normalizer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl NormalizedTransaction {
    /// An empty record with every classifier field at its default.
    pub fn empty() -> Self {
        NormalizedTransaction {
            date: None,
            description: None,
            amount: None,
            transaction_type: TransactionType::Unknown,
            category: DEFAULT_CATEGORY.to_string(),
            merchant: DEFAULT_MERCHANT.to_string(),
            tags: Vec::new(),
            is_credit_card_payment: false,
            credit_card_info: None,
            original_data: BTreeMap::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Recomputed on every call; see `data_quality::validate_transaction`.
    pub fn is_valid(&self) -> bool {
        crate::data_quality::validate_transaction(self).is_valid()
    }

    /// Date rendered the way it is stored and compared (`YYYY-MM-DD`, empty if absent).
    pub fn date_string(&self) -> String {
        self.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

impl Default for NormalizedTransaction {
    fn default() -> Self {
        Self::empty()
    }
}

/// Lower-cased, underscored header key used for `original_data`.
///
/// Example: "Txn Date (DD/MM)" -> "txn_date_dd_mm"
pub fn normalize_header_key(header: &str) -> String {
    let mut key = String::with_capacity(header.len());
    let mut pending_sep = false;

    for c in header.trim().chars() {
        if c.is_alphanumeric() {
            if pending_sep && !key.is_empty() {
                key.push('_');
            }
            pending_sep = false;
            key.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }

    key
}

// ============================================================================
// TESTS
// ============================================================================
