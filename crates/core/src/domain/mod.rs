pub mod record;
pub mod states;

pub use record::{CaseField, CaseRecord, Series, UnknownField};
pub use states::{UsState, US_STATES};
