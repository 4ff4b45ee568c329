//! Quote Flow Engine: the four ordered automation steps run against one
//! session's page. Each step is a sequence of paced DOM interactions closed
//! out by a confirmation wait on landmark text.

pub mod driver;
pub mod owner;
pub mod page;
pub mod quote;
pub mod selectors;
pub mod vehicle;

pub use driver::fill_driver_details;
pub use owner::fill_owner_details;
pub use quote::extract_quote_result;
pub use selectors::QuoteSelectors;
pub use vehicle::{locate_by_registration, locate_manually};
