pub mod error;
pub mod provider;

pub use error::{FetchError, FetchErrorKind};
pub use provider::{HttpSeriesClient, SeriesClient};
