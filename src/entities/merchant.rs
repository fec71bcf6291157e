// 🏪 Merchant Classifier - description text -> known merchant identity
//
// "SWIGGY INSTAMART ORDER 8812", "Swiggy*Instamart" -> "Swiggy Instamart"
// "UPI-SWIGGY-BLR" -> "Swiggy"
//
// The table is ordered: the first merchant with any matching pattern wins, so
// more specific identities sit above the broader ones they contain.

/// Fallback identity when nothing matches.
pub const DEFAULT_MERCHANT: &str = "Others";

/// One known merchant and the lower-case substrings that identify it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merchant {
    pub id: &'static str,
    pub patterns: &'static [&'static str],
}

impl Merchant {
    /// `description_lower` must already be lower-cased.
    pub fn matches(&self, description_lower: &str) -> bool {
        self.patterns.iter().any(|p| description_lower.contains(p))
    }
}

const fn merchant(id: &'static str, patterns: &'static [&'static str]) -> Merchant {
    Merchant { id, patterns }
}

/// Known merchants in precedence order.
pub const DEFAULT_MERCHANTS: &[Merchant] = &[
    // Food delivery / quick commerce (specific before generic)
    merchant("Swiggy Instamart", &["instamart"]),
    merchant("Swiggy", &["swiggy"]),
    merchant("Zomato", &["zomato"]),
    merchant("Blinkit", &["blinkit", "grofers"]),
    merchant("Zepto", &["zepto"]),
    merchant("BigBasket", &["bigbasket", "big basket"]),
    merchant("DMart", &["dmart", "avenue supermarts"]),
    // Food & coffee chains
    merchant("Starbucks", &["starbucks"]),
    merchant("Dominos", &["domino"]),
    merchant("McDonalds", &["mcdonald"]),
    merchant("KFC", &["kfc"]),
    // Shopping
    merchant("Amazon Prime", &["amazon prime", "prime video"]),
    merchant("Amazon Pay", &["amazon pay", "amazonpay"]),
    merchant("Amazon", &["amazon", "amzn"]),
    merchant("Flipkart", &["flipkart"]),
    merchant("Myntra", &["myntra"]),
    merchant("Ajio", &["ajio"]),
    merchant("Nykaa", &["nykaa"]),
    merchant("Meesho", &["meesho"]),
    // Transport & travel
    merchant("Uber", &["uber"]),
    merchant("Ola", &["olacabs", "ola cabs", "ani technologies"]),
    merchant("Rapido", &["rapido"]),
    merchant("IRCTC", &["irctc"]),
    merchant("MakeMyTrip", &["makemytrip", "make my trip"]),
    merchant("IndiGo", &["indigo", "interglobe"]),
    // Fuel
    merchant("Indian Oil", &["indian oil", "iocl"]),
    merchant("Bharat Petroleum", &["bharat petroleum", "bpcl"]),
    merchant("HP Petrol", &["hpcl", "hindustan petroleum"]),
    // Streaming & subscriptions
    merchant("Netflix", &["netflix"]),
    merchant("Spotify", &["spotify"]),
    merchant("Hotstar", &["hotstar", "disney+"]),
    merchant("YouTube", &["youtube"]),
    merchant("Apple", &["apple.com", "itunes", "apple services"]),
    merchant("Google Play", &["google play", "googleplay"]),
    merchant("BookMyShow", &["bookmyshow"]),
    // Telecom
    merchant("Airtel", &["airtel"]),
    merchant("Jio", &["jio"]),
    merchant("Vodafone Idea", &["vodafone", "vi prepaid", "vi postpaid"]),
    // Health
    merchant("Apollo Pharmacy", &["apollo"]),
    merchant("PharmEasy", &["pharmeasy"]),
    merchant("Tata 1mg", &["1mg"]),
    // Wallets & payment apps (last: they prefix many other merchants' UPI narrations)
    merchant("CRED", &["cred club", "dreamplug"]),
    merchant("Paytm", &["paytm"]),
    merchant("PhonePe", &["phonepe"]),
    merchant("Google Pay", &["google pay", "gpay"]),
];

// ============================================================================
// MERCHANT CLASSIFIER
// ============================================================================

/// Maps free-text descriptions onto a closed set of merchant identities.
#[derive(Debug, Clone, Copy)]
pub struct MerchantClassifier {
    table: &'static [Merchant],
}

impl MerchantClassifier {
    pub fn new() -> Self {
        Self::with_table(DEFAULT_MERCHANTS)
    }

    /// Use a different ordered table.
    pub fn with_table(table: &'static [Merchant]) -> Self {
        MerchantClassifier { table }
    }

    /// First merchant whose pattern occurs in the description, else "Others".
    pub fn detect_merchant(&self, description: &str) -> &'static str {
        let lower = description.to_lowercase();
        if lower.trim().is_empty() {
            return DEFAULT_MERCHANT;
        }
        self.table
            .iter()
            .find(|m| m.matches(&lower))
            .map(|m| m.id)
            .unwrap_or(DEFAULT_MERCHANT)
    }

    pub fn merchants(&self) -> &'static [Merchant] {
        self.table
    }
}

impl Default for MerchantClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_known_merchant() {
        let classifier = MerchantClassifier::new();
        assert_eq!(classifier.detect_merchant("UPI/ZOMATO ONLINE/ORDER 4471"), "Zomato");
        assert_eq!(classifier.detect_merchant("POS 4821 STARBUCKS MUMBAI"), "Starbucks");
        assert_eq!(classifier.detect_merchant("amzn mktp in"), "Amazon");
    }

    #[test]
    fn test_specific_entry_wins() {
        let classifier = MerchantClassifier::new();
        assert_eq!(classifier.detect_merchant("SWIGGY INSTAMART BLR"), "Swiggy Instamart");
        assert_eq!(classifier.detect_merchant("SWIGGY ORDER 1234"), "Swiggy");
        assert_eq!(classifier.detect_merchant("AMAZON PAY BILL"), "Amazon Pay");
    }

    #[test]
    fn test_unknown_defaults_to_others() {
        let classifier = MerchantClassifier::new();
        assert_eq!(classifier.detect_merchant("NEFT TO RAHUL SHARMA"), DEFAULT_MERCHANT);
        assert_eq!(classifier.detect_merchant(""), DEFAULT_MERCHANT);
    }

    #[test]
    fn test_table_order_is_precedence() {
        static GENERIC_FIRST: &[Merchant] = &[
            merchant("Swiggy", &["swiggy"]),
            merchant("Swiggy Instamart", &["instamart"]),
        ];
        let classifier = MerchantClassifier::with_table(GENERIC_FIRST);

        // Reordering the table changes the outcome
        assert_eq!(classifier.detect_merchant("SWIGGY INSTAMART"), "Swiggy");
    }

    #[test]
    fn test_every_pattern_is_lowercase() {
        for m in DEFAULT_MERCHANTS {
            for p in m.patterns {
                assert_eq!(*p, p.to_lowercase(), "pattern for {} must be lower-case", m.id);
            }
        }
    }
}
