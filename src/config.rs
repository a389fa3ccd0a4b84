use burn::config::Config;
use burn::prelude::Backend;
use burn::tensor::Tensor;

use crate::anchors::anchor_catalog;
use crate::error::YoloResult;
use crate::loss::LossOutput;
use crate::targets::{AreaBand, Assignment, Scale, TargetBuilder};

/// Strides of the feature pyramid the multi-scale builder supervises,
/// smallest first. Must match the backbone's pyramid exactly.
pub const MULTI_SCALE_STRIDES: [usize; 3] = [8, 16, 32];

/// Default area-ratio bands paired with [`MULTI_SCALE_STRIDES`].
///
/// A box is claimed by the first stride whose band contains its
/// width-fraction × height-fraction. Boxes under 1% of the image side fall
/// below every band and receive no supervision at all — too small to supply
/// a useful regression signal. The last band is open-ended so a full-image
/// box is always claimed.
pub const DEFAULT_AREA_BANDS: [AreaBand; 3] = [
    AreaBand::new(1e-4, 0.025),
    AreaBand::new(0.025, 0.1),
    AreaBand::new(0.1, f32::INFINITY),
];

/// Target-assignment settings fixed before the first training iteration.
#[derive(Config)]
pub struct TargetConfig {
    /// VOC object categories.
    #[config(default = 20)]
    pub num_classes: usize,
    /// Anchors with shape IoU above this supervise the box; below it only
    /// the single best anchor does.
    #[config(default = 0.5)]
    pub ignore_thresh: f32,
}

impl TargetConfig {
    /// Builds a single-scale anchor-based target builder from one of the
    /// pre-baked catalogs.
    pub fn anchor_builder(
        &self,
        input_size: (usize, usize),
        stride: usize,
        dataset: &str,
    ) -> YoloResult<TargetBuilder> {
        let anchors = anchor_catalog(dataset, false)?;
        TargetBuilder::new(
            input_size,
            self.num_classes,
            Scale::Single { stride },
            Assignment::AnchorBased {
                anchors,
                ignore_thresh: self.ignore_thresh,
            },
        )
    }

    /// Builds a single-scale anchor-free target builder.
    pub fn anchor_free_builder(
        &self,
        input_size: (usize, usize),
        stride: usize,
    ) -> YoloResult<TargetBuilder> {
        TargetBuilder::new(
            input_size,
            self.num_classes,
            Scale::Single { stride },
            Assignment::AnchorFree,
        )
    }

    /// Builds the multi-scale anchor-free builder over the default pyramid.
    pub fn multi_scale_builder(&self, input_size: (usize, usize)) -> YoloResult<TargetBuilder> {
        TargetBuilder::new(
            input_size,
            self.num_classes,
            Scale::Multi {
                strides: MULTI_SCALE_STRIDES.to_vec(),
                bands: DEFAULT_AREA_BANDS.to_vec(),
            },
            Assignment::AnchorFree,
        )
    }
}

/// Weights the training loop applies when folding the three loss terms into
/// one objective. The box term carries most of the weight; localization error
/// is the scarcest signal on a dense grid.
#[derive(Config)]
pub struct LossWeights {
    #[config(default = 1.0)]
    pub objectness: f32,
    #[config(default = 1.0)]
    pub class: f32,
    #[config(default = 5.0)]
    pub boxes: f32,
}

impl LossWeights {
    /// Weighted sum of the three terms.
    pub fn combine<B: Backend>(&self, terms: &LossOutput<B>) -> Tensor<B, 1> {
        terms.objectness.clone() * self.objectness
            + terms.class.clone() * self.class
            + terms.boxes.clone() * self.boxes
    }
}
