/// Selectors and landmark strings for the target quoting form.
///
/// Field selectors key on the `name` attributes the site has kept stable
/// across restyles; everything class-based gets a fallback list because the
/// class names churn. Landmark strings are confirmation signals only. They
/// are never parsed for data.
pub struct QuoteSelectors;

impl QuoteSelectors {
    // Step 1: vehicle lookup
    pub const REGO_INPUT: &'static str = "input[name='rego']";
    pub const JURISDICTION_SELECT: &'static str = "select[name='jurisdictionFieldValue']";

    pub const SEARCH_BUTTONS: &'static [&'static str] = &[
        "button[type='submit']",
        "input[type='submit']",
        ".rego-search button",
        "button.search-btn",
    ];

    // Manual lookup (cascading selects repopulate after each pick)
    pub const MANUAL_LOOKUP_LINKS: &'static [&'static str] = &[
        "a[href*='manual']",
        ".manual-lookup",
        "[data-test*='manual']",
    ];
    pub const YEAR_SELECT: &'static str = "select[name='vehicleYear']";
    pub const MAKE_SELECT: &'static str = "select[name='vehicleMake']";
    pub const MODEL_SELECT: &'static str = "select[name='vehicleModel']";
    pub const BODY_TYPE_SELECT: &'static str = "select[name='vehicleBodyType']";

    // Step 2: vehicle/owner details
    pub const ADDRESS_INPUT: &'static str = "input[name='addressSearch']";
    pub const ADDRESS_SUGGESTIONS: &'static [&'static str] = &[
        "ul[role='listbox'] li",
        "li[role='option']",
        "[class*='autocomplete'] li",
        "[class*='suggestion']",
    ];
    pub const UNDER_FINANCE_SELECT: &'static str = "select[name='UnderFinance']";
    pub const PURPOSE_SELECT: &'static str = "select[name='Purpose']";
    pub const BUSINESS_SELECT: &'static str = "select[name='vehicleRegisterInBusinessName']";
    pub const START_DATE_INPUT: &'static str = "input[name='startDate']";
    pub const EMAIL_INPUT: &'static str = "input[name='email']";

    // Step 3: driver details
    pub const MEMBER_SELECT: &'static str = "select[name='isMember0']";
    pub const GENDER_SELECT: &'static str = "select[name='driverSex0']";
    pub const AGE_INPUT: &'static str = "input[name='age0']";
    pub const LICENCE_AGE_INPUT: &'static str = "input[name='driverAge0']";
    pub const CLAIMS_SELECT: &'static str = "select[name='hasClaims0']";

    // Continue controls. The click is sometimes swallowed by an overlay, so
    // callers pair these with a bounded-retry landmark wait.
    pub const CONTINUE_BUTTONS: &'static [&'static str] = &[
        "button[type='submit']",
        ".continue-btn",
        "button.btn-continue",
    ];

    // Landmarks
    /// Rendered on the driver-details page; confirms step 2 landed.
    pub const DRIVER_PAGE_LANDMARK: &'static str = "Already with us?";
    /// A priced product has rendered; confirms the quote computed.
    pub const YEARLY_PRICE_LANDMARK: &'static str = "/Yearly";
    /// Fallbacks when the price landmark is missed but the quote page is up.
    pub const QUOTE_PAGE_MARKERS: &'static [&'static str] =
        &["Comprehensive", "Your quote summary"];
    /// Markers that terminate the vehicle-description run of text.
    pub const DESCRIPTION_STOP_MARKERS: &'static [&'static str] = &["Edit", "Not your car"];
}
