//! Box format conversions

use super::check_boxes;
use crate::error::{Error, Result};
use ndarray::{Array2, Axis};
use std::fmt;
use std::str::FromStr;

/// Coordinate layout of a box
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoxFormat {
    /// Corners: `(x1, y1, x2, y2)`
    Xyxy,
    /// Top-left corner plus size: `(x1, y1, w, h)`
    Xywh,
    /// Center plus size: `(cx, cy, w, h)`
    Cxcywh,
}

impl BoxFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xyxy => "xyxy",
            Self::Xywh => "xywh",
            Self::Cxcywh => "cxcywh",
        }
    }
}

impl FromStr for BoxFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "xyxy" => Ok(Self::Xyxy),
            "xywh" => Ok(Self::Xywh),
            "cxcywh" => Ok(Self::Cxcywh),
            other => Err(Error::UnsupportedBoxFormat(other.to_string())),
        }
    }
}

impl fmt::Display for BoxFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn to_xyxy(row: [f32; 4], from: BoxFormat) -> [f32; 4] {
    let [a, b, c, d] = row;
    match from {
        BoxFormat::Xyxy => row,
        BoxFormat::Xywh => [a, b, a + c, b + d],
        BoxFormat::Cxcywh => [a - 0.5 * c, b - 0.5 * d, a + 0.5 * c, b + 0.5 * d],
    }
}

fn from_xyxy(row: [f32; 4], to: BoxFormat) -> [f32; 4] {
    let [x1, y1, x2, y2] = row;
    match to {
        BoxFormat::Xyxy => row,
        BoxFormat::Xywh => [x1, y1, x2 - x1, y2 - y1],
        BoxFormat::Cxcywh => [(x1 + x2) / 2.0, (y1 + y2) / 2.0, x2 - x1, y2 - y1],
    }
}

/// Convert boxes between formats, going through `xyxy`.
///
/// Converting to the same format returns a copy.
pub fn box_convert(boxes: &Array2<f32>, in_fmt: BoxFormat, out_fmt: BoxFormat) -> Result<Array2<f32>> {
    check_boxes(boxes, "box_convert")?;
    let mut out = boxes.clone();
    if in_fmt == out_fmt {
        return Ok(out);
    }
    for mut row in out.axis_iter_mut(Axis(0)) {
        let converted = from_xyxy(to_xyxy([row[0], row[1], row[2], row[3]], in_fmt), out_fmt);
        for (dst, src) in row.iter_mut().zip(converted) {
            *dst = src;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_parse_formats() {
        assert_eq!("cxcywh".parse::<BoxFormat>().unwrap(), BoxFormat::Cxcywh);
        assert!(matches!(
            "yxyx".parse::<BoxFormat>(),
            Err(Error::UnsupportedBoxFormat(fmt)) if fmt == "yxyx"
        ));
        assert_eq!(BoxFormat::Xywh.to_string(), "xywh");
    }

    #[test]
    fn test_xyxy_to_xywh_and_cxcywh() {
        let boxes = array![[10.0, 20.0, 30.0, 60.0]];
        let xywh = box_convert(&boxes, BoxFormat::Xyxy, BoxFormat::Xywh).unwrap();
        assert_eq!(xywh, array![[10.0, 20.0, 20.0, 40.0]]);
        let cxcywh = box_convert(&boxes, BoxFormat::Xyxy, BoxFormat::Cxcywh).unwrap();
        assert_eq!(cxcywh, array![[20.0, 40.0, 20.0, 40.0]]);
    }

    #[test]
    fn test_non_xyxy_pair_goes_through_xyxy() {
        let xywh = array![[1.0, 2.0, 4.0, 6.0], [0.0, 0.0, 1.0, 1.0]];
        let cxcywh = box_convert(&xywh, BoxFormat::Xywh, BoxFormat::Cxcywh).unwrap();
        assert_abs_diff_eq!(cxcywh, array![[3.0, 5.0, 4.0, 6.0], [0.5, 0.5, 1.0, 1.0]], epsilon = 1e-6);
        let back = box_convert(&cxcywh, BoxFormat::Cxcywh, BoxFormat::Xywh).unwrap();
        assert_abs_diff_eq!(back, xywh, epsilon = 1e-6);
    }

    #[test]
    fn test_same_format_is_copy() {
        let boxes = array![[1.0, 2.0, 3.0, 4.0]];
        assert_eq!(box_convert(&boxes, BoxFormat::Xywh, BoxFormat::Xywh).unwrap(), boxes);
    }

    #[test]
    fn test_wrong_width() {
        let boxes = Array2::<f32>::zeros((2, 3));
        assert!(matches!(
            box_convert(&boxes, BoxFormat::Xyxy, BoxFormat::Xywh),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
