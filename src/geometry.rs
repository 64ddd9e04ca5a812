//! Percentage-based page coordinates.
//!
//! Every geometric value in the model is a percentage of the containing page
//! (or of the containing slot, for slot-bound assets). The nominal range is
//! [0,100] but the model never clamps: interactive drag legitimately stores
//! values outside the range (e.g. -100..200) to let an image rest beyond a
//! slot edge for panning. Clamping, where wanted, happens at the UI edge.

/// Top-left anchor of a box, in percent of the containing page.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

/// Box extent in percent of page width/height. Zero is legal but degenerate.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 20.0,
        }
    }
}

/// Pan/zoom window applied to media before it is windowed by its box.
///
/// `zoom >= 1` by convention (the image is enlarged, then cropped); `x`/`y`
/// are the focal point in percent. The UI clamps these, the model does not.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Crop {
    pub zoom: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for Crop {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            x: 50.0,
            y: 50.0,
        }
    }
}

/// Per-asset transform: free-form rotation in degrees (not normalized mod 360
/// here; callers normalize at the UI edge), uniform scale, optional crop.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    pub rotation: f64,
    pub scale: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<Crop>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            scale: 1.0,
            crop: None,
        }
    }
}
