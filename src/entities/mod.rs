// Entity tables - the closed sets the classifiers map descriptions onto
//
// Each table is static and ordered; first match wins.

pub mod bank;
pub mod category;
pub mod merchant;

pub use bank::{CreditCardDetector, KNOWN_ISSUERS, PAYMENT_PHRASES};
pub use category::{CREDIT_CARD_BILLS, DEFAULT_CATEGORY, DEFAULT_RULES};
pub use merchant::{Merchant, MerchantClassifier, DEFAULT_MERCHANT, DEFAULT_MERCHANTS};
