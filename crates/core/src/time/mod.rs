pub mod calendar;
pub mod format;

pub use format::FormatError;
