//! Placement geometry
//!
//! Converts the client's normalized, screen-space placement box into absolute
//! PDF user-space coordinates. Screen coordinates put the origin at the
//! top-left with Y growing downward; PDF user space puts it at the bottom-left
//! with Y growing upward. The conversion inverts the Y axis and offsets by the
//! box height, so the on-screen top edge of the box lands on the intended top
//! edge in the page.

use serde::{Deserialize, Serialize};

use super::error::SignError;

/// Tolerance for floating-point bounds checks
const EPSILON: f64 = 1e-6;

/// Normalized placement rectangle, relative to the rendered page viewport
///
/// All fields are fractions in `[0, 1]`; `x_percent + width_percent` and
/// `y_percent + height_percent` must not exceed 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementBox {
    pub x_percent: f64,
    pub y_percent: f64,
    pub width_percent: f64,
    pub height_percent: f64,
}

impl PlacementBox {
    /// Validate the normalized-box invariants
    ///
    /// Run as the first stage of the pipeline; a box that fails here never
    /// reaches the document signer.
    pub fn validate(&self) -> Result<(), SignError> {
        let fields = [
            ("xPercent", self.x_percent),
            ("yPercent", self.y_percent),
            ("widthPercent", self.width_percent),
            ("heightPercent", self.height_percent),
        ];

        for (name, value) in fields {
            if !value.is_finite() {
                return Err(SignError::InvalidPlacement(format!(
                    "{name} is not a finite number"
                )));
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(SignError::InvalidPlacement(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if self.width_percent == 0.0 || self.height_percent == 0.0 {
            return Err(SignError::InvalidPlacement(
                "placement box has no area".to_string(),
            ));
        }

        if self.x_percent + self.width_percent > 1.0 + EPSILON {
            return Err(SignError::InvalidPlacement(
                "xPercent + widthPercent exceeds 1".to_string(),
            ));
        }
        if self.y_percent + self.height_percent > 1.0 + EPSILON {
            return Err(SignError::InvalidPlacement(
                "yPercent + heightPercent exceeds 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Map the box into PDF user space for a page of the given size
    pub fn to_pdf_space(&self, page: PageSize) -> PdfRect {
        let width = self.width_percent * page.width;
        let height = self.height_percent * page.height;
        let x = self.x_percent * page.width;
        let y = page.height - self.y_percent * page.height - height;

        PdfRect {
            x,
            y,
            width,
            height,
        }
    }
}

/// Page media-box dimensions in PDF points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// A4 at 72 dpi
    pub const A4: PageSize = PageSize {
        width: 595.0,
        height: 842.0,
    };
}

/// Absolute rectangle in PDF user space (origin bottom-left, Y up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PdfRect {
    /// Whether the rectangle lies entirely within the page
    pub fn fits_within(&self, page: PageSize) -> bool {
        self.x >= -EPSILON
            && self.y >= -EPSILON
            && self.x + self.width <= page.width + EPSILON
            && self.y + self.height <= page.height + EPSILON
    }
}

// ============================================================================
// Tests
// ============================================================================
