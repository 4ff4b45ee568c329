pub mod parser;

pub use parser::{vehicle_description, QuoteExtractor};

/// Product names offered on the comprehensive tab, in the order the site
/// renders them. Plain "Comprehensive" renders first; anchoring is a plain
/// first-occurrence find, so this order also keeps the prefix from landing
/// on the "Comprehensive Plus" section.
pub const COMPREHENSIVE_PRODUCTS: &[&str] = &["Comprehensive", "Comprehensive Plus"];

/// Product names offered on the third-party tab.
pub const THIRD_PARTY_PRODUCTS: &[&str] =
    &["Third Party Fire and Theft", "Third Party Property Damage"];
