pub mod imagery;
pub mod model;
pub mod normalize;
pub mod prompt;

pub use imagery::{ImageCatalog, image_prompt};
pub use model::NormalizedPlan;
pub use normalize::{NormalizeError, normalize_plans};
