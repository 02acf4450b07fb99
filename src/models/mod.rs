pub use catalog::{CaptionRecord, CatalogRecord, Category, Recommendation};
pub use profile::{PurchaseRecord, UserProfile, DEFAULT_PROFILE};
pub use session::SessionState;

pub mod catalog;
pub mod profile;
pub mod session;
