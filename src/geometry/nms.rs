//! Non-maximum suppression

use super::check_boxes;
use super::ops::box_iou;
use crate::error::{Error, Result};
use ndarray::{Array2, Axis};

/// Greedy non-maximum suppression on `xyxy` boxes.
///
/// Returns kept indices in decreasing score order. A box is dropped when its
/// IoU with an already kept box exceeds `iou_threshold`. Equal scores keep
/// their input order.
pub fn nms(boxes: &Array2<f32>, scores: &[f32], iou_threshold: f32) -> Result<Vec<usize>> {
    check_boxes(boxes, "nms")?;
    if scores.len() != boxes.nrows() {
        return Err(Error::shape("nms scores", &[boxes.nrows()], &[scores.len()]));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let iou = box_iou(boxes, boxes)?;
    let mut suppressed = vec![false; order.len()];
    let mut keep = Vec::new();
    for (rank, &i) in order.iter().enumerate() {
        if suppressed[i] {
            continue;
        }
        keep.push(i);
        for &j in &order[rank + 1..] {
            if iou[[i, j]] > iou_threshold {
                suppressed[j] = true;
            }
        }
    }
    log::debug!("nms kept {} of {} boxes", keep.len(), order.len());
    Ok(keep)
}

/// Non-maximum suppression applied independently per category.
///
/// Every box is shifted by `idx * (max_coordinate + 1)` so that boxes of
/// different categories never overlap, then a single [`nms`] pass runs.
pub fn batched_nms(
    boxes: &Array2<f32>,
    scores: &[f32],
    idxs: &[usize],
    iou_threshold: f32,
) -> Result<Vec<usize>> {
    check_boxes(boxes, "batched_nms")?;
    if boxes.nrows() == 0 {
        return Ok(Vec::new());
    }
    if idxs.len() != boxes.nrows() {
        return Err(Error::shape("batched_nms idxs", &[boxes.nrows()], &[idxs.len()]));
    }

    let max_coordinate = boxes.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut shifted = boxes.clone();
    for (mut row, &idx) in shifted.axis_iter_mut(Axis(0)).zip(idxs) {
        let offset = idx as f32 * (max_coordinate + 1.0);
        row.mapv_inplace(|v| v + offset);
    }
    nms(&shifted, scores, iou_threshold)
}
