//! Areas, overlaps, filtering and clipping

use super::check_boxes;
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1, Axis};

fn area(b: ArrayView1<'_, f32>) -> f32 {
    (b[2] - b[0]) * (b[3] - b[1])
}

/// Area of each `xyxy` box
pub fn box_area(boxes: &Array2<f32>) -> Result<Array1<f32>> {
    check_boxes(boxes, "box_area")?;
    Ok(boxes.axis_iter(Axis(0)).map(area).collect())
}

/// Pairwise intersection and union, `[N, M]` each
fn inter_union(boxes1: &Array2<f32>, boxes2: &Array2<f32>) -> (Array2<f32>, Array2<f32>) {
    let (n, m) = (boxes1.nrows(), boxes2.nrows());
    let mut inter = Array2::zeros((n, m));
    let mut union = Array2::zeros((n, m));
    for (i, a) in boxes1.axis_iter(Axis(0)).enumerate() {
        let area_a = area(a);
        for (j, b) in boxes2.axis_iter(Axis(0)).enumerate() {
            let w = (a[2].min(b[2]) - a[0].max(b[0])).max(0.0);
            let h = (a[3].min(b[3]) - a[1].max(b[1])).max(0.0);
            let overlap = w * h;
            inter[[i, j]] = overlap;
            union[[i, j]] = area_a + area(b) - overlap;
        }
    }
    (inter, union)
}

/// Intersection over union of every pair, `[N, M]`.
///
/// Pairs with an empty union score 0.
pub fn box_iou(boxes1: &Array2<f32>, boxes2: &Array2<f32>) -> Result<Array2<f32>> {
    check_boxes(boxes1, "box_iou")?;
    check_boxes(boxes2, "box_iou")?;
    let (inter, union) = inter_union(boxes1, boxes2);
    Ok(ndarray::Zip::from(&inter)
        .and(&union)
        .map_collect(|&i, &u| if u > 0.0 { i / u } else { 0.0 }))
}

fn check_not_degenerate(boxes: &Array2<f32>) -> Result<()> {
    for (index, b) in boxes.axis_iter(Axis(0)).enumerate() {
        if b[2] < b[0] || b[3] < b[1] {
            return Err(Error::InvalidBox { index, coords: [b[0], b[1], b[2], b[3]] });
        }
    }
    Ok(())
}

/// Generalized IoU of every pair, `[N, M]`, in `[-1, 1]`.
///
/// IoU minus the share of the smallest enclosing box not covered by the
/// union. Degenerate boxes (`x2 < x1` or `y2 < y1`) are rejected.
pub fn generalized_box_iou(boxes1: &Array2<f32>, boxes2: &Array2<f32>) -> Result<Array2<f32>> {
    check_boxes(boxes1, "generalized_box_iou")?;
    check_boxes(boxes2, "generalized_box_iou")?;
    check_not_degenerate(boxes1)?;
    check_not_degenerate(boxes2)?;

    let (inter, union) = inter_union(boxes1, boxes2);
    let mut giou = Array2::zeros(inter.raw_dim());
    for (i, a) in boxes1.axis_iter(Axis(0)).enumerate() {
        for (j, b) in boxes2.axis_iter(Axis(0)).enumerate() {
            let (u, overlap) = (union[[i, j]], inter[[i, j]]);
            let iou = if u > 0.0 { overlap / u } else { 0.0 };
            let w = (a[2].max(b[2]) - a[0].min(b[0])).max(0.0);
            let h = (a[3].max(b[3]) - a[1].min(b[1])).max(0.0);
            let enclosing = w * h;
            giou[[i, j]] = if enclosing > 0.0 { iou - (enclosing - u) / enclosing } else { iou };
        }
    }
    Ok(giou)
}

/// Indices of boxes whose width and height are both at least `min_size`
pub fn remove_small_boxes(boxes: &Array2<f32>, min_size: f32) -> Result<Vec<usize>> {
    check_boxes(boxes, "remove_small_boxes")?;
    Ok(boxes
        .axis_iter(Axis(0))
        .enumerate()
        .filter(|(_, b)| b[2] - b[0] >= min_size && b[3] - b[1] >= min_size)
        .map(|(i, _)| i)
        .collect())
}

/// Clamp x coordinates to `[0, width]` and y coordinates to `[0, height]`
pub fn clip_boxes_to_image(boxes: &Array2<f32>, size: (u32, u32)) -> Result<Array2<f32>> {
    check_boxes(boxes, "clip_boxes_to_image")?;
    let (height, width) = (size.0 as f32, size.1 as f32);
    let mut clipped = boxes.clone();
    for mut b in clipped.axis_iter_mut(Axis(0)) {
        for (k, v) in b.iter_mut().enumerate() {
            let max = if k % 2 == 0 { width } else { height };
            *v = v.clamp(0.0, max);
        }
    }
    Ok(clipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_box_area() {
        let boxes = array![[0.0, 0.0, 2.0, 3.0], [1.0, 1.0, 1.0, 5.0]];
        assert_eq!(box_area(&boxes).unwrap(), array![6.0, 0.0]);
    }

    #[test]
    fn test_box_iou_half_overlap() {
        let a = array![[0.0, 0.0, 2.0, 2.0]];
        let b = array![[1.0, 0.0, 3.0, 2.0], [5.0, 5.0, 6.0, 6.0]];
        let iou = box_iou(&a, &b).unwrap();
        assert_eq!(iou.shape(), &[1, 2]);
        assert_abs_diff_eq!(iou[[0, 0]], 2.0 / 6.0, epsilon = 1e-6);
        assert_eq!(iou[[0, 1]], 0.0);
    }

    #[test]
    fn test_box_iou_self_is_one() {
        let a = array![[1.0, 2.0, 4.0, 8.0]];
        assert_abs_diff_eq!(box_iou(&a, &a).unwrap()[[0, 0]], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_giou_disjoint_is_negative() {
        let a = array![[0.0, 0.0, 1.0, 1.0]];
        let b = array![[2.0, 0.0, 3.0, 1.0]];
        // enclosing 3x1, union 2 -> 0 - 1/3
        let giou = generalized_box_iou(&a, &b).unwrap();
        assert_abs_diff_eq!(giou[[0, 0]], -1.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_giou_matches_iou_for_nested() {
        let a = array![[0.0, 0.0, 4.0, 4.0]];
        let b = array![[1.0, 1.0, 3.0, 3.0]];
        let giou = generalized_box_iou(&a, &b).unwrap();
        assert_abs_diff_eq!(giou[[0, 0]], 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_giou_rejects_degenerate() {
        let a = array![[0.0, 0.0, 1.0, 1.0], [3.0, 0.0, 2.0, 1.0]];
        let err = generalized_box_iou(&a, &a).unwrap_err();
        assert!(matches!(err, Error::InvalidBox { index: 1, .. }));
    }

    #[test]
    fn test_remove_small_boxes() {
        let boxes = array![[0.0, 0.0, 5.0, 5.0], [0.0, 0.0, 0.5, 5.0], [0.0, 0.0, 1.0, 1.0]];
        assert_eq!(remove_small_boxes(&boxes, 1.0).unwrap(), vec![0, 2]);
    }

    #[test]
    fn test_clip_boxes_to_image() {
        let boxes = array![[-5.0, -1.0, 120.0, 40.0]];
        let clipped = clip_boxes_to_image(&boxes, (30, 100)).unwrap();
        assert_eq!(clipped, array![[0.0, 0.0, 100.0, 30.0]]);
    }
}
