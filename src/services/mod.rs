pub mod detection;
pub mod providers;
pub mod recommendations;

pub use detection::{detect_ingredients, DetectionError, DetectionSettings};
pub use recommendations::get_recommendations;
