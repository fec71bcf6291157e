// 🏦 Card Issuers - credit-card bill payment detection
//
// "HDFC CREDIT CARD PAYMENT XX4821" -> payment, bank "Hdfc", last4 "4821"
// "BILLDESK CC BILL 9912"           -> payment, bank unknown, last4 "9912"

use regex::Regex;
use std::sync::OnceLock;

use crate::transaction::CreditCardInfo;

/// Phrases that mark a description as a payment toward a credit-card bill.
pub const PAYMENT_PHRASES: &[&str] = &[
    "credit card",
    "creditcard",
    "cc bill",
    "cc payment",
    "cc pymt",
    "card bill",
    "card payment",
    "card pymt",
    "cred club",
    "sbi card",
    "sbicard",
    "amex",
    "american express",
    "visa credit",
    "mastercard credit",
    "rupay credit",
    "diners club",
];

/// Known issuers, first match wins. Multi-word names sit above their abbreviations.
pub const KNOWN_ISSUERS: &[&str] = &[
    "american express",
    "standard chartered",
    "bank of baroda",
    "au small finance",
    "yes bank",
    "hdfc",
    "icici",
    "sbi",
    "axis",
    "kotak",
    "indusind",
    "idfc",
    "rbl",
    "hsbc",
    "citi",
    "federal",
    "onecard",
    "amex",
];

/// Card networks, checked in order for `card_type`.
const CARD_NETWORKS: &[(&str, &str)] = &[
    ("visa", "Visa"),
    ("mastercard", "Mastercard"),
    ("rupay", "RuPay"),
    ("american express", "Amex"),
    ("amex", "Amex"),
    ("diners", "Diners Club"),
];

const GENERIC_CARD_TYPE: &str = "Credit Card";

fn four_digit_run() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]{4,}").ok()).as_ref()
}

/// Title-case each word: "yes bank" -> "Yes Bank", "hdfc" -> "Hdfc".
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// First run of four ASCII digits not followed by another ASCII digit.
///
/// For a longer run ("1234567890") this is its final four digits. Known
/// heuristic: any unrelated 4-digit number earlier in the text (a year, a
/// reference code) is captured instead of the card suffix.
pub fn extract_last4(description: &str) -> Option<String> {
    four_digit_run()?.find(description).map(|m| {
        let run = m.as_str();
        run[run.len() - 4..].to_string()
    })
}

// ============================================================================
// CREDIT CARD DETECTOR
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct CreditCardDetector {
    phrases: &'static [&'static str],
    issuers: &'static [&'static str],
}

impl CreditCardDetector {
    pub fn new() -> Self {
        CreditCardDetector {
            phrases: PAYMENT_PHRASES,
            issuers: KNOWN_ISSUERS,
        }
    }

    pub fn is_credit_card_payment(&self, description: &str) -> bool {
        let lower = description.to_lowercase();
        self.phrases.iter().any(|p| lower.contains(p))
    }

    /// Issuer, network and card suffix. Best-effort; every part may be missing.
    pub fn extract_credit_card_info(&self, description: &str) -> CreditCardInfo {
        let lower = description.to_lowercase();

        let bank = self
            .issuers
            .iter()
            .find(|issuer| lower.contains(*issuer))
            .map(|issuer| title_case(issuer));

        let card_type = CARD_NETWORKS
            .iter()
            .find(|(needle, _)| lower.contains(needle))
            .map(|(_, name)| (*name).to_string())
            .unwrap_or_else(|| GENERIC_CARD_TYPE.to_string());

        let last4 = extract_last4(description);

        let display_name = match (&bank, &last4) {
            (Some(b), Some(l)) => format!("{} {} ending {}", b, card_type, l),
            (Some(b), None) => format!("{} {}", b, card_type),
            (None, Some(l)) => format!("{} ending {}", card_type, l),
            (None, None) => card_type.clone(),
        };

        CreditCardInfo {
            bank,
            card_type,
            last4,
            display_name,
        }
    }

    /// Detection and extraction in one call; None for non-payments.
    pub fn detect(&self, description: &str) -> Option<CreditCardInfo> {
        self.is_credit_card_payment(description)
            .then(|| self.extract_credit_card_info(description))
    }
}

impl Default for CreditCardDetector {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
