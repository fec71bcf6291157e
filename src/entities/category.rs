// 🏷️ Categories - spending labels + the built-in ordered rule table
//
// The table is evaluated top to bottom and the first non-excluded match wins.
// Narrow rules ("Credit Card Bills") must stay above the broad ones that would
// also match them ("Bill Payments", "Transfers").

use crate::rules::RuleDirection;

/// Always-available fallback label.
pub const DEFAULT_CATEGORY: &str = "Others";

/// Legacy placeholder some stored records still carry.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Label forced onto every detected credit-card bill payment.
pub const CREDIT_CARD_BILLS: &str = "Credit Card Bills";

/// True for labels that mean "no real category yet".
pub fn is_placeholder_category(category: &str) -> bool {
    let trimmed = category.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case(DEFAULT_CATEGORY)
        || trimmed.eq_ignore_ascii_case(UNCATEGORIZED)
}

/// Static description of one built-in rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleDef {
    pub category: &'static str,
    /// Case-insensitive substrings
    pub patterns: &'static [&'static str],
    /// Case-insensitive regular expressions, for words too short to match as substrings
    pub regexes: &'static [&'static str],
    pub direction: Option<RuleDirection>,
    pub exclude: &'static [&'static str],
}

const NO_PATTERNS: &[&str] = &[];

const CREDIT_CARD_TERMS: &[&str] = &["credit card", "cc bill", "cc payment", "card bill"];

pub const DEFAULT_RULES: &[RuleDef] = &[
    RuleDef {
        category: CREDIT_CARD_BILLS,
        patterns: &[
            "credit card",
            "creditcard",
            "cc bill",
            "cc payment",
            "card bill",
            "cred club",
            "sbi card",
            "sbicard",
        ],
        regexes: &[r"\bcc\s*(?:pymt|pmt)\b"],
        direction: None,
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "Bill Payments",
        patterns: &[
            "bill payment",
            "billpay",
            "bill pay",
            "billdesk",
            "electricity",
            "bescom",
            "water bill",
            "gas bill",
            "broadband",
            "recharge",
            "postpaid",
            "mobile bill",
        ],
        regexes: &[r"\bdth\b"],
        direction: None,
        exclude: CREDIT_CARD_TERMS,
    },
    RuleDef {
        category: "Salary",
        patterns: &["salary", "payroll", "sal credit"],
        regexes: &[r"\bsal\b"],
        direction: Some(RuleDirection::Credit),
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "Refunds",
        patterns: &["refund", "reversal", "cashback", "chargeback"],
        regexes: NO_PATTERNS,
        direction: Some(RuleDirection::Credit),
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "Interest",
        patterns: &["interest", "int.pd", "int pd", "int credit"],
        regexes: NO_PATTERNS,
        direction: Some(RuleDirection::Credit),
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "Groceries",
        patterns: &[
            "instamart",
            "blinkit",
            "grofers",
            "zepto",
            "bigbasket",
            "dmart",
            "grocery",
            "supermarket",
            "kirana",
        ],
        regexes: NO_PATTERNS,
        direction: None,
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "Food & Dining",
        patterns: &[
            "swiggy",
            "zomato",
            "restaurant",
            "cafe",
            "starbucks",
            "domino",
            "mcdonald",
            "kfc",
            "pizza",
            "eatery",
        ],
        regexes: NO_PATTERNS,
        direction: None,
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "Entertainment",
        patterns: &[
            "netflix",
            "spotify",
            "hotstar",
            "prime video",
            "amazon prime",
            "bookmyshow",
            "youtube",
            "cinema",
        ],
        regexes: &[r"\bpvr\b", r"\binox\b"],
        direction: None,
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "Shopping",
        patterns: &["amazon", "amzn", "flipkart", "myntra", "ajio", "nykaa", "meesho"],
        regexes: NO_PATTERNS,
        direction: None,
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "Fuel",
        patterns: &["petrol", "fuel", "indian oil", "iocl", "bpcl", "hpcl"],
        regexes: NO_PATTERNS,
        direction: None,
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "Transportation",
        patterns: &["uber", "olacabs", "ola cabs", "rapido", "metro", "parking", "fastag"],
        regexes: &[r"\bola\b", r"\btoll\b"],
        direction: None,
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "Travel",
        patterns: &[
            "irctc",
            "makemytrip",
            "goibibo",
            "cleartrip",
            "indigo",
            "air india",
            "airline",
            "hotel",
        ],
        regexes: &[r"\boyo\b"],
        direction: None,
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "Health",
        patterns: &[
            "pharmacy",
            "apollo",
            "pharmeasy",
            "1mg",
            "hospital",
            "clinic",
            "medical",
            "diagnostic",
        ],
        regexes: NO_PATTERNS,
        direction: None,
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "Rent",
        patterns: &["nobroker", "house rent", "landlord"],
        regexes: &[r"\brent\b"],
        direction: None,
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "Investments",
        patterns: &["mutual fund", "zerodha", "groww", "upstox", "kuvera"],
        regexes: &[r"\bsip\b", r"\bnps\b", r"\bppf\b"],
        direction: None,
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "Insurance",
        patterns: &["insurance", "premium", "policy"],
        regexes: &[r"\blic\b"],
        direction: None,
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "EMI & Loans",
        patterns: &["loan", "nach"],
        regexes: &[r"\bemi\b"],
        direction: Some(RuleDirection::Debit),
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "Education",
        patterns: &["school", "college", "tuition", "university", "udemy", "coursera"],
        regexes: NO_PATTERNS,
        direction: None,
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "ATM Withdrawal",
        patterns: &["cash withdrawal", "cash wdl", "atw"],
        regexes: &[r"\batm\b", r"\bnwd\b"],
        direction: Some(RuleDirection::Debit),
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "Bank Charges",
        patterns: &["charges", "penalty", "annual fee", "sms alert"],
        regexes: &[r"\bfees?\b", r"\bgst\b"],
        direction: Some(RuleDirection::Debit),
        exclude: NO_PATTERNS,
    },
    RuleDef {
        category: "Transfers",
        patterns: &["neft", "imps", "rtgs", "upi", "transfer"],
        regexes: &[r"\btrf\b"],
        direction: None,
        exclude: NO_PATTERNS,
    },
];

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_categories() {
        assert!(is_placeholder_category("Others"));
        assert!(is_placeholder_category("uncategorized"));
        assert!(is_placeholder_category("  "));
        assert!(!is_placeholder_category("Groceries"));
    }

    #[test]
    fn test_credit_card_rule_is_first() {
        assert_eq!(DEFAULT_RULES[0].category, CREDIT_CARD_BILLS);
        let bills = DEFAULT_RULES
            .iter()
            .position(|r| r.category == "Bill Payments")
            .unwrap();
        assert!(bills > 0);
    }

    #[test]
    fn test_labels_are_unique() {
        let mut labels: Vec<&str> = DEFAULT_RULES.iter().map(|r| r.category).collect();
        labels.sort_unstable();
        let before = labels.len();
        labels.dedup();
        assert_eq!(before, labels.len());
    }
}
