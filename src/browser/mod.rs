pub mod driver;

pub use driver::{human_delay, launch};
