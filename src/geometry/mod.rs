//! Bounding-box geometry
//!
//! Boxes are `[N, 4]` arrays. Unless noted otherwise they are in `xyxy`
//! format: top-left `(x1, y1)` and bottom-right `(x2, y2)`.

mod format;
mod nms;
mod ops;

pub use format::{box_convert, BoxFormat};
pub use nms::{batched_nms, nms};
pub use ops::{box_area, box_iou, clip_boxes_to_image, generalized_box_iou, remove_small_boxes};

use crate::error::{Error, Result};
use ndarray::Array2;

/// Ensure `boxes` has shape `[N, 4]`
pub(crate) fn check_boxes(boxes: &Array2<f32>, context: &str) -> Result<()> {
    if boxes.ncols() != 4 {
        return Err(Error::shape(context, &[boxes.nrows(), 4], boxes.shape()));
    }
    Ok(())
}
