//! Cover image sizing.
//!
//! [`plan_scale`] picks an integer factor for the longer side, and
//! [`resize_image`] applies it with the `image` crate.

mod resize;
mod scale;

pub use resize::{image_dimensions, resize_image};
pub use scale::{plan_scale, ScaleOp, ScalePlan, ScaleRange};
