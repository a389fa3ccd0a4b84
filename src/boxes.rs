/// A single ground-truth annotation as delivered by the dataset pipeline.
///
/// Coordinates are corner-form and normalized to `[0, 1]` relative to the
/// image width and height. A batch is a slice of per-image `Vec<BoxLabel>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxLabel {
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
    pub class_index: usize,
}

impl BoxLabel {
    pub fn new(xmin: f32, ymin: f32, xmax: f32, ymax: f32, class_index: usize) -> Self {
        BoxLabel {
            xmin,
            ymin,
            xmax,
            ymax,
            class_index,
        }
    }

    /// Normalized width and height fractions of the full image.
    pub fn size_fractions(&self) -> (f32, f32) {
        (self.xmax - self.xmin, self.ymax - self.ymin)
    }
}

/// A box in center form: `(cx, cy, w, h)`.
///
/// The unit is whatever the caller put in — the target encoders use
/// feature-map grid units (pixels divided by the stride). Anchor shapes are
/// compared by centering both sides at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterBox {
    pub cx: f32,
    pub cy: f32,
    pub w: f32,
    pub h: f32,
}

impl CenterBox {
    pub fn new(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        CenterBox { cx, cy, w, h }
    }

    /// Converts to corner form `[xmin, ymin, xmax, ymax]`.
    pub fn to_corners(&self) -> [f32; 4] {
        [
            self.cx - self.w * 0.5,
            self.cy - self.h * 0.5,
            self.cx + self.w * 0.5,
            self.cy + self.h * 0.5,
        ]
    }

    pub fn area(&self) -> f32 {
        self.w * self.h
    }
}

/// Computes the Intersection over Union between each candidate box and one
/// reference box.
///
/// Both sides are converted to corner form. The intersection width and height
/// are clamped at zero so disjoint boxes score exactly `0.0`, and the union
/// carries a `1e-20` additive epsilon so a degenerate zero-area pair divides
/// cleanly instead of by zero. The epsilon is far below `f32` resolution for
/// any real box, so it never changes which candidate scores highest.
///
/// # Arguments
///
/// * `candidates` - Ordered candidate boxes; the output is index-aligned with
///   this slice.
/// * `reference` - The single box every candidate is scored against.
///
/// # Returns
///
/// One IoU in `[0, 1]` per candidate. Empty candidates yield an empty vector.
pub fn compute_iou(candidates: &[CenterBox], reference: &CenterBox) -> Vec<f32> {
    let [rx1, ry1, rx2, ry2] = reference.to_corners();
    let reference_area = reference.area();

    candidates
        .iter()
        .map(|candidate| {
            let [cx1, cy1, cx2, cy2] = candidate.to_corners();

            let inter_w = (rx2.min(cx2) - rx1.max(cx1)).max(0.0);
            let inter_h = (ry2.min(cy2) - ry1.max(cy1)).max(0.0);
            let intersection = inter_w * inter_h;

            let union = reference_area + candidate.area() - intersection + 1e-20;

            intersection / union
        })
        .collect()
}
