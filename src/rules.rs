// 🏷️ Category Rules - ordered pattern rules as data
// Maps a description (+ amount sign) onto a spending category.
//
// Rules are evaluated in table order; the first rule that is not excluded and
// has a matching pattern wins. Insertion order is part of the contract.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::entities::category::{
    is_placeholder_category, RuleDef, CREDIT_CARD_BILLS, DEFAULT_CATEGORY, DEFAULT_RULES,
};
use crate::entities::merchant::DEFAULT_MERCHANT;
use crate::error::{IngestError, Result};
use crate::transaction::NormalizedTransaction;

// ============================================================================
// RULE DEFINITION
// ============================================================================

/// Amount sign a rule is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleDirection {
    /// Positive amounts only
    Credit,
    /// Negative amounts only
    Debit,
}

impl RuleDirection {
    pub fn allows(&self, amount: Option<f64>) -> bool {
        match (self, amount) {
            (RuleDirection::Credit, Some(a)) => a > 0.0,
            (RuleDirection::Debit, Some(a)) => a < 0.0,
            (_, None) => false,
        }
    }
}

/// One match pattern: a case-insensitive substring or a regular expression.
#[derive(Debug, Clone)]
pub enum RulePattern {
    /// Stored lower-cased
    Literal(String),
    Regex(Regex),
}

impl RulePattern {
    pub fn literal(s: &str) -> Self {
        RulePattern::Literal(s.to_lowercase())
    }

    /// Compiled case-insensitive.
    pub fn regex(pattern: &str) -> Result<Self> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map(RulePattern::Regex)
            .map_err(|source| IngestError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// `lower` is the lower-cased `original`.
    fn matches(&self, lower: &str, original: &str) -> bool {
        match self {
            RulePattern::Literal(needle) => !needle.is_empty() && lower.contains(needle.as_str()),
            RulePattern::Regex(re) => re.is_match(original),
        }
    }
}

impl PartialEq for RulePattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RulePattern::Literal(a), RulePattern::Literal(b)) => a == b,
            (RulePattern::Regex(a), RulePattern::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRule {
    pub category: String,
    pub patterns: Vec<RulePattern>,
    pub direction: Option<RuleDirection>,
    /// Checked before `patterns`; any hit disqualifies the rule
    pub exclude: Vec<RulePattern>,
}

impl CategoryRule {
    pub fn new(category: &str, patterns: Vec<RulePattern>) -> Self {
        CategoryRule {
            category: category.to_string(),
            patterns,
            direction: None,
            exclude: Vec::new(),
        }
    }

    pub fn with_direction(mut self, direction: RuleDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_exclude(mut self, exclude: Vec<RulePattern>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn matches(&self, description: &str, amount: Option<f64>) -> bool {
        let lower = description.to_lowercase();
        self.matches_prepared(&lower, description, amount)
    }

    fn matches_prepared(&self, lower: &str, original: &str, amount: Option<f64>) -> bool {
        if let Some(direction) = self.direction {
            if !direction.allows(amount) {
                return false;
            }
        }
        if self.exclude.iter().any(|p| p.matches(lower, original)) {
            return false;
        }
        self.patterns.iter().any(|p| p.matches(lower, original))
    }

    fn from_def(def: &RuleDef) -> Self {
        let mut patterns: Vec<RulePattern> =
            def.patterns.iter().map(|p| RulePattern::literal(p)).collect();

        for re in def.regexes {
            match RulePattern::regex(re) {
                Ok(p) => patterns.push(p),
                Err(e) => warn!(category = def.category, "skipping built-in pattern: {}", e),
            }
        }

        CategoryRule {
            category: def.category.to_string(),
            patterns,
            direction: def.direction,
            exclude: def.exclude.iter().map(|p| RulePattern::literal(p)).collect(),
        }
    }
}

// ============================================================================
// CUSTOM RULES (config / JSON)
// ============================================================================

/// Pattern as written in a rules file: a plain string, or `{ "regex": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternSpec {
    Literal(String),
    Regex { regex: String },
}

impl PatternSpec {
    pub fn compile(&self) -> Result<RulePattern> {
        match self {
            PatternSpec::Literal(s) => Ok(RulePattern::literal(s)),
            PatternSpec::Regex { regex } => RulePattern::regex(regex),
        }
    }
}

/// A user-supplied rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRuleSpec {
    pub category: String,
    pub patterns: Vec<PatternSpec>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<RuleDirection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<PatternSpec>,
}

impl CustomRuleSpec {
    pub fn compile(&self) -> Result<CategoryRule> {
        let patterns = self
            .patterns
            .iter()
            .map(PatternSpec::compile)
            .collect::<Result<Vec<_>>>()?;
        let exclude = self
            .exclude
            .iter()
            .map(PatternSpec::compile)
            .collect::<Result<Vec<_>>>()?;

        Ok(CategoryRule {
            category: self.category.trim().to_string(),
            patterns,
            direction: self.direction,
            exclude,
        })
    }
}

// ============================================================================
// CATEGORY MAPPER
// ============================================================================

#[derive(Debug, Clone)]
pub struct CategoryMapper {
    rules: Vec<CategoryRule>,
}

impl CategoryMapper {
    /// Mapper over the built-in rule table.
    pub fn new() -> Self {
        CategoryMapper {
            rules: DEFAULT_RULES.iter().map(CategoryRule::from_def).collect(),
        }
    }

    /// Mapper with no rules at all; everything resolves through the fallbacks.
    pub fn empty() -> Self {
        CategoryMapper { rules: Vec::new() }
    }

    /// Mapper over an explicit ordered rule list.
    pub fn with_rules(rules: Vec<CategoryRule>) -> Self {
        CategoryMapper { rules }
    }

    /// Built-in rules followed by the custom rules in a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let specs: Vec<CustomRuleSpec> = serde_json::from_str(&content)?;

        let mut mapper = CategoryMapper::new();
        for spec in &specs {
            mapper.add_rule(spec.compile()?);
        }
        Ok(mapper)
    }

    /// Register a rule at run time.
    ///
    /// An existing label keeps its position and gains the new patterns; a new
    /// label is appended to the end of the table.
    pub fn add_rule(&mut self, rule: CategoryRule) {
        if let Some(existing) = self
            .rules
            .iter_mut()
            .find(|r| r.category.eq_ignore_ascii_case(&rule.category))
        {
            debug!(category = %rule.category, added = rule.patterns.len(), "extending category rule");
            existing.patterns.extend(rule.patterns);
            existing.exclude.extend(rule.exclude);
            if rule.direction.is_some() {
                existing.direction = rule.direction;
            }
        } else {
            debug!(category = %rule.category, "registering category rule");
            self.rules.push(rule);
        }
    }

    /// Register literal patterns for a category.
    pub fn add_custom_rule(
        &mut self,
        category: &str,
        patterns: &[&str],
        direction: Option<RuleDirection>,
    ) -> Result<()> {
        let category = category.trim();
        if category.is_empty() {
            return Err(IngestError::Config("custom rule needs a category name".to_string()));
        }
        if patterns.iter().all(|p| p.trim().is_empty()) {
            return Err(IngestError::Config(format!(
                "custom rule '{}' needs at least one pattern",
                category
            )));
        }

        let mut rule = CategoryRule::new(
            category,
            patterns
                .iter()
                .filter(|p| !p.trim().is_empty())
                .map(|p| RulePattern::literal(p.trim()))
                .collect(),
        );
        rule.direction = direction;
        self.add_rule(rule);
        Ok(())
    }

    /// First matching rule's category, if any.
    pub fn detect_category(&self, description: &str, amount: Option<f64>) -> Option<&str> {
        let lower = description.to_lowercase();
        if lower.trim().is_empty() {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.matches_prepared(&lower, description, amount))
            .map(|rule| rule.category.as_str())
    }

    /// Never empty. Pattern match, then an existing non-placeholder category,
    /// then the merchant (if recognised), then "Others".
    pub fn resolve_category(&self, tx: &NormalizedTransaction) -> String {
        if let Some(desc) = tx.description.as_deref() {
            if let Some(category) = self.detect_category(desc, tx.amount) {
                return category.to_string();
            }
        }

        if !is_placeholder_category(&tx.category) {
            return tx.category.trim().to_string();
        }

        let merchant = tx.merchant.trim();
        if !merchant.is_empty() && merchant != DEFAULT_MERCHANT {
            return merchant.to_string();
        }

        DEFAULT_CATEGORY.to_string()
    }

    /// Re-run categorization over records that have no real category yet.
    /// User-assigned categories are left untouched.
    pub fn recategorize(&self, transactions: &[NormalizedTransaction]) -> Vec<NormalizedTransaction> {
        transactions
            .iter()
            .map(|tx| {
                if !is_placeholder_category(&tx.category) {
                    return tx.clone();
                }
                let mut updated = tx.clone();
                updated.category = if tx.is_credit_card_payment {
                    CREDIT_CARD_BILLS.to_string()
                } else {
                    self.resolve_category(tx)
                };
                updated
            })
            .collect()
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Labels in evaluation order.
    pub fn categories(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.category.as_str()).collect()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for CategoryMapper {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
