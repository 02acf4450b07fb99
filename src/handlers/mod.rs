pub mod health;
pub mod landing;
pub mod suggestion;

pub use health::health_check;
pub use landing::{landing, landing_submit};
pub use suggestion::{suggestion, suggestion_submit};
