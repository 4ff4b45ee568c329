//! Text Extraction Engine: pure functions from rendered page text to
//! structured quotes. No page interaction happens here, and identical text
//! always yields identical results.

use crate::models::{DriverSummary, ProductQuote};
use regex::Regex;

/// Anchored extractor over rendered quote-page text.
///
/// Per product: find the name's first occurrence, take a bounded window of
/// the text that follows, and match each numeric field independently inside
/// it. A product without a yearly price is simply not offered and is
/// skipped; any other missing field falls back to a sentinel rather than
/// failing the extraction.
pub struct QuoteExtractor {
    window: usize,
    yearly_re: Regex,
    monthly_re: Regex,
    total_re: Regex,
    saving_re: Regex,
    age_re: Regex,
    gender_re: Regex,
    additional_re: Regex,
}

impl QuoteExtractor {
    /// `window` is the number of characters scanned after each product name.
    /// It is tuned against the observed page layout, not derived.
    pub fn new(window: usize) -> Result<Self, regex::Error> {
        Ok(Self {
            window,
            yearly_re: Regex::new(r"(\$[\d,]+(?:\.\d{1,2})?)/Yearly")?,
            monthly_re: Regex::new(r"(\$[\d,]+(?:\.\d{1,2})?)/Monthly")?,
            total_re: Regex::new(r"\((\$[\d,]+(?:\.\d{1,2})?) over 12 months\)")?,
            saving_re: Regex::new(r"Save (\$[\d,]+(?:\.\d{1,2})?)")?,
            age_re: Regex::new(r"Age:\s*(\d+)")?,
            gender_re: Regex::new(r"Gender:\s*([A-Za-z]+)")?,
            additional_re: Regex::new(r"Additional drivers?:\s*(\d+)")?,
        })
    }

    /// Extracts one product's quote, or `None` if the product name is absent
    /// or carries no yearly price (meaning it is not offered).
    pub fn extract_product(&self, text: &str, product_name: &str) -> Option<ProductQuote> {
        let idx = text.find(product_name)?;
        let tail = &text[idx + product_name.len()..];
        let window: String = tail.chars().take(self.window).collect();

        let yearly = self.capture(&self.yearly_re, &window)?;
        let monthly = self
            .capture(&self.monthly_re, &window)
            .unwrap_or_else(|| "Unknown".to_string());
        let total = self
            .capture(&self.total_re, &window)
            .unwrap_or_else(|| "Unknown".to_string());
        let saving = self.capture(&self.saving_re, &window);

        Some(ProductQuote {
            name: product_name.to_string(),
            yearly_price: yearly,
            monthly_price: monthly,
            total_over_12_months: total,
            yearly_saving: saving,
            features: Vec::new(),
        })
    }

    /// Runs anchored extraction for each known product name, keeping display
    /// order and omitting products that are not offered.
    pub fn extract_products(&self, text: &str, product_names: &[&str]) -> Vec<ProductQuote> {
        product_names
            .iter()
            .filter_map(|name| self.extract_product(text, name))
            .collect()
    }

    /// Driver summary from labeled text, defaulting to sentinels when a
    /// label is absent.
    pub fn driver_summary(&self, text: &str) -> DriverSummary {
        DriverSummary {
            age: self
                .capture(&self.age_re, text)
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            gender: self
                .capture(&self.gender_re, text)
                .unwrap_or_else(|| "Unknown".to_string()),
            additional_drivers: self
                .capture(&self.additional_re, text)
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }

    fn capture(&self, re: &Regex, text: &str) -> Option<String> {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

/// Recovers the human-readable vehicle description: a 4-digit year followed
/// by two capitalised words, truncated before the edit markers the site
/// appends ("Edit", "Not your car").
pub fn vehicle_description(text: &str) -> Option<String> {
    let re = Regex::new(
        r"((?:19|20)\d{2}\s+[A-Z][A-Za-z0-9-]*\s+[A-Z][^\n]*?)\s*(?:Edit\b|Not your car|\n|$)",
    )
    .ok()?;
    let caps = re.captures(text)?;
    let description = caps.get(1)?.as_str().trim();
    if description.is_empty() {
        None
    } else {
        Some(description.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> QuoteExtractor {
        QuoteExtractor::new(500).unwrap()
    }

    #[test]
    fn extracts_full_product_quote() {
        let text = "Comprehensive cover for your car $120.50/Yearly or $10.50/Monthly \
                    ($120.50 over 12 months) Save $15.00 compared to monthly";
        let quote = extractor().extract_product(text, "Comprehensive").unwrap();
        assert_eq!(quote.name, "Comprehensive");
        assert_eq!(quote.yearly_price, "$120.50");
        assert_eq!(quote.monthly_price, "$10.50");
        assert_eq!(quote.total_over_12_months, "$120.50");
        assert_eq!(quote.yearly_saving, Some("$15.00".to_string()));
        assert!(quote.features.is_empty());
    }

    #[test]
    fn absent_product_is_omitted() {
        let text = "Comprehensive $120.50/Yearly";
        assert!(extractor().extract_product(text, "Third Party Property Damage").is_none());
    }

    #[test]
    fn product_without_yearly_price_is_not_offered() {
        let text = "Comprehensive Plus is coming soon to your area";
        assert!(extractor().extract_product(text, "Comprehensive Plus").is_none());
    }

    #[test]
    fn missing_optional_fields_fall_back_to_sentinels() {
        let text = "Comprehensive $1,043.00/Yearly only";
        let quote = extractor().extract_product(text, "Comprehensive").unwrap();
        assert_eq!(quote.yearly_price, "$1,043.00");
        // missing fields are sentinels, never values invented from other
        // captures
        assert_eq!(quote.monthly_price, "Unknown");
        assert_eq!(quote.total_over_12_months, "Unknown");
        assert_eq!(quote.yearly_saving, None);
    }

    #[test]
    fn price_outside_window_is_ignored() {
        let padding = "x".repeat(600);
        let text = format!("Comprehensive {} $120.50/Yearly", padding);
        assert!(extractor().extract_product(&text, "Comprehensive").is_none());
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = "Comprehensive $120.50/Yearly $10.50/Monthly ($120.50 over 12 months)";
        let ex = extractor();
        let first = ex.extract_products(text, &["Comprehensive"]);
        let second = ex.extract_products(text, &["Comprehensive"]);
        assert_eq!(first, second);
    }

    #[test]
    fn driver_summary_reads_labeled_fields() {
        let text = "Your quote summary Age: 34 Gender: Male Additional drivers: 1";
        let summary = extractor().driver_summary(text);
        assert_eq!(summary.age, 34);
        assert_eq!(summary.gender, "Male");
        assert_eq!(summary.additional_drivers, 1);
    }

    #[test]
    fn driver_summary_defaults_when_labels_missing() {
        let summary = extractor().driver_summary("no labels here");
        assert_eq!(summary.age, 0);
        assert_eq!(summary.gender, "Unknown");
        assert_eq!(summary.additional_drivers, 0);
    }

    #[test]
    fn vehicle_description_stops_before_edit_marker() {
        let text = "Great news, we found it\n2018 Toyota Corolla Ascent Hatch Edit Not your car?";
        assert_eq!(
            vehicle_description(text),
            Some("2018 Toyota Corolla Ascent Hatch".to_string())
        );
    }

    #[test]
    fn vehicle_description_absent_yields_none() {
        assert_eq!(vehicle_description("no vehicle text at all"), None);
    }
}
