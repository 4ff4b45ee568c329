use crate::error::FlowError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How the target vehicle is identified. Exactly one mode per flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VehicleLookup {
    #[serde(rename_all = "camelCase")]
    Registration {
        rego: String,
        jurisdiction: String,
    },
    #[serde(rename_all = "camelCase")]
    Manual {
        year: String,
        make: String,
        model: String,
        body_type: String,
    },
}

impl VehicleLookup {
    /// Rejects incomplete lookups before any browser resource is spent.
    pub fn validate(&self) -> Result<(), FlowError> {
        match self {
            VehicleLookup::Registration { rego, jurisdiction } => {
                if rego.trim().is_empty() || jurisdiction.trim().is_empty() {
                    return Err(FlowError::InvalidInput(
                        "Registration lookup needs both rego and jurisdiction".to_string(),
                    ));
                }
            }
            VehicleLookup::Manual {
                year,
                make,
                model,
                body_type,
            } => {
                if [year, make, model, body_type].iter().any(|v| v.trim().is_empty()) {
                    return Err(FlowError::InvalidInput(
                        "Manual lookup needs year, make, model and body type".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsagePurpose {
    Private,
    Business,
    PrivateAndBusiness,
}

impl UsagePurpose {
    /// Option value as rendered in the target's Purpose select.
    pub fn form_value(&self) -> &'static str {
        match self {
            UsagePurpose::Private => "Private",
            UsagePurpose::Business => "Business",
            UsagePurpose::PrivateAndBusiness => "Private and Business",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn form_value(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverStartDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl CoverStartDate {
    /// dd/mm/yyyy, as the start-date field expects.
    pub fn form_value(&self) -> String {
        format!("{:02}/{:02}/{}", self.day, self.month, self.year)
    }

    /// The triple as a calendar date, or `None` for impossible dates like
    /// 31/02.
    pub fn as_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

/// Step 2 payload: vehicle ownership and usage details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDetails {
    pub address: String,
    pub under_finance: bool,
    pub purpose: UsagePurpose,
    pub registered_in_business: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_start: Option<CoverStartDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl OwnerDetails {
    /// Rejects impossible cover-start dates before any page interaction.
    pub fn validate(&self) -> Result<(), FlowError> {
        if let Some(start) = &self.cover_start {
            if start.as_naive_date().is_none() {
                return Err(FlowError::InvalidInput(format!(
                    "Cover start date {} is not a real calendar date",
                    start.form_value()
                )));
            }
        }
        Ok(())
    }
}

/// Step 3 payload: primary driver details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverDetails {
    pub is_member: bool,
    pub gender: Gender,
    pub age: u32,
    /// Years since the driver was first licensed.
    pub licence_age: u32,
    /// Any at-fault incidents in the last 5 years.
    pub has_claims: bool,
}

/// One priced product as recovered from rendered text. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuote {
    pub name: String,
    pub yearly_price: String,
    pub monthly_price: String,
    pub total_over_12_months: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearly_saving: Option<String>,
    /// Extraction does not currently recover feature lists.
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSummary {
    pub age: u32,
    pub gender: String,
    pub additional_drivers: u32,
}

/// Terminal artifact of a completed flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    pub vehicle: String,
    pub driver: DriverSummary,
    pub comprehensive_quotes: Vec<ProductQuote>,
    pub third_party_quotes: Vec<ProductQuote>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_lookup_requires_both_fields() {
        let lookup = VehicleLookup::Registration {
            rego: "ABC123".to_string(),
            jurisdiction: "".to_string(),
        };
        assert!(lookup.validate().is_err());

        let lookup = VehicleLookup::Registration {
            rego: "ABC123".to_string(),
            jurisdiction: "NSW".to_string(),
        };
        assert!(lookup.validate().is_ok());
    }

    #[test]
    fn manual_lookup_requires_all_four_fields() {
        let lookup = VehicleLookup::Manual {
            year: "2018".to_string(),
            make: "Toyota".to_string(),
            model: "".to_string(),
            body_type: "Hatch".to_string(),
        };
        assert!(lookup.validate().is_err());
    }

    #[test]
    fn cover_start_date_renders_zero_padded() {
        let date = CoverStartDate { day: 3, month: 7, year: 2026 };
        assert_eq!(date.form_value(), "03/07/2026");
        assert!(date.as_naive_date().is_some());
    }

    #[test]
    fn impossible_cover_start_date_is_rejected() {
        let details = OwnerDetails {
            address: "12 Example Street, Sydney NSW".to_string(),
            under_finance: false,
            purpose: UsagePurpose::Private,
            registered_in_business: false,
            cover_start: Some(CoverStartDate { day: 31, month: 2, year: 2026 }),
            email: None,
        };
        assert!(details.validate().is_err());

        let ok = OwnerDetails {
            cover_start: Some(CoverStartDate { day: 29, month: 2, year: 2024 }),
            ..details
        };
        assert!(ok.validate().is_ok());
    }
}
