pub mod listing;
pub mod logic;
pub mod summary;

pub use listing::{ListingFields, ListingRecord, NormalizedRecord};
pub use logic::LocationSegment;
pub use summary::{summarize, LocationSummary};
