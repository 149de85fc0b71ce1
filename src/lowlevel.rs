//! Low-level building blocks for custom scoring pipelines.
//!
//! These expose template plans, the scalar ZNCC kernel and resampling for
//! callers that compute their own grids. Most users should prefer
//! [`Detector`](crate::Detector).

pub use crate::image::resize::resize_u8_bilinear;
pub use crate::kernel::scalar::{zncc_grid, zncc_score_at};
#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::zncc_grid_par;
pub use crate::template::TemplatePlan;
