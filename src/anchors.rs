use crate::error::{YoloError, YoloResult};

/// An anchor box shape in feature-map grid units (pixels divided by the
/// stride of the feature map the anchor belongs to).
///
/// Catalogs are ordered and the position of an anchor in its catalog IS the
/// anchor index used by the target tensor and by the network's prediction
/// channel grouping. Once a catalog is handed to a builder it must never be
/// reordered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorSize {
    pub w: f32,
    pub h: f32,
}

impl AnchorSize {
    pub const fn new(w: f32, h: f32) -> Self {
        AnchorSize { w, h }
    }
}

/// Single-scale VOC catalog (stride 32), k-means box clusters.
///
/// “YOLO9000: Better, Faster, Stronger”
/// Authors: Joseph Redmon, Ali Farhadi
/// Link (official): https://arxiv.org/abs/1612.08242
///
/// Dimension Clusters - Section 2
///
/// Instead of choosing priors by hand, we run k-means clustering on the
/// training set bounding boxes to automatically find good priors. [...] We
/// choose k = 5 as a good tradeoff between model complexity and high recall.
pub const ANCHOR_SIZES_VOC: [AnchorSize; 5] = [
    AnchorSize::new(1.19, 1.98),
    AnchorSize::new(2.79, 4.59),
    AnchorSize::new(4.53, 8.92),
    AnchorSize::new(8.06, 5.29),
    AnchorSize::new(10.32, 10.65),
];

/// Multi-scale VOC catalog: three clusters per stride, ordered small stride
/// to large stride (YOLOv3 lineage, each cluster divided by its own stride).
pub const MULTI_ANCHOR_SIZES_VOC: [AnchorSize; 9] = [
    // stride 8
    AnchorSize::new(1.25, 1.625),
    AnchorSize::new(2.0, 3.75),
    AnchorSize::new(4.125, 2.875),
    // stride 16
    AnchorSize::new(1.875, 3.8125),
    AnchorSize::new(3.875, 2.8125),
    AnchorSize::new(3.6875, 7.4375),
    // stride 32
    AnchorSize::new(3.625, 2.8125),
    AnchorSize::new(4.875, 6.1875),
    AnchorSize::new(11.65625, 10.1875),
];

/// Derives an anchor catalog from area scales and per-scale aspect ratios.
///
/// Each `scales[i]` is a fraction of the feature-map area at the given
/// stride; `aspects[i]` lists the height/width ratios applied to that area.
/// For every (scale, ratio) pair the emitted anchor is
///
/// w = ⌊√(cells ⋅ scale)⌋        h = w ⋅ ratio
///
/// where `cells` is the number of grid cells at `stride`. Emission is
/// scale-major and ratio-minor; that order defines the anchor index and is a
/// contract with the network's prediction-channel layout.
///
/// # Arguments
///
/// * `input_size` - Image resolution as `(width, height)` in pixels.
/// * `stride` - Downsample factor of the feature map.
/// * `scales` - Area fractions, one per anchor group.
/// * `aspects` - One ratio list per entry of `scales`.
///
/// # Returns
///
/// The ordered catalog, or [`YoloError::AnchorSpecMismatch`] when `scales`
/// and `aspects` differ in length.
pub fn generate_anchor(
    input_size: (usize, usize),
    stride: usize,
    scales: &[f32],
    aspects: &[&[f32]],
) -> YoloResult<Vec<AnchorSize>> {
    if scales.len() != aspects.len() {
        return Err(YoloError::AnchorSpecMismatch {
            scales: scales.len(),
            aspects: aspects.len(),
        });
    }

    let (w, h) = input_size;
    let cells = ((h / stride) * (w / stride)) as f32;

    let mut catalog = Vec::new();
    for (scale, ratios) in scales.iter().zip(aspects.iter()) {
        for ratio in ratios.iter() {
            let anchor_w = (cells * scale).sqrt().floor();
            catalog.push(AnchorSize::new(anchor_w, anchor_w * ratio));
        }
    }

    Ok(catalog)
}

/// Looks up one of the pre-baked catalogs by dataset name.
///
/// # Arguments
///
/// * `name` - Dataset the catalog was clustered on (currently `"VOC"`).
/// * `multi_scale` - Selects the per-stride multi-scale catalog instead of
///   the single-scale one.
///
/// # Returns
///
/// The catalog, or [`YoloError::UnknownCatalog`] for an unknown name.
pub fn anchor_catalog(name: &str, multi_scale: bool) -> YoloResult<Vec<AnchorSize>> {
    match name {
        "VOC" if multi_scale => Ok(MULTI_ANCHOR_SIZES_VOC.to_vec()),
        "VOC" => Ok(ANCHOR_SIZES_VOC.to_vec()),
        unknown => Err(YoloError::UnknownCatalog(unknown.to_string())),
    }
}
