use burn::prelude::Backend;
use burn::tensor::Tensor;

use crate::anchors::AnchorSize;
use crate::boxes::{BoxLabel, CenterBox, compute_iou};
use crate::error::{YoloError, YoloResult};
use crate::layout::ChannelLayout;

/// How ground-truth boxes are matched to supervision slots.
///
/// Chosen once when the [`TargetBuilder`] is constructed; there is no
/// per-call mode flag. The anchor catalog and the ignore threshold travel
/// with the variant so no module-level state is involved.
#[derive(Debug, Clone)]
pub enum Assignment {
    AnchorFree,
    AnchorBased {
        anchors: Vec<AnchorSize>,
        ignore_thresh: f32,
    },
}

/// Single feature map, or a feature pyramid with one area band per stride.
#[derive(Debug, Clone)]
pub enum Scale {
    Single { stride: usize },
    Multi { strides: Vec<usize>, bands: Vec<AreaBand> },
}

/// Half-open area-ratio band `[lower, upper)` claiming boxes for one stride.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaBand {
    pub lower: f32,
    pub upper: f32,
}

impl AreaBand {
    pub const fn new(lower: f32, upper: f32) -> Self {
        AreaBand { lower, upper }
    }

    pub fn contains(&self, area_ratio: f32) -> bool {
        area_ratio >= self.lower && area_ratio < self.upper
    }
}

/// Anchor-free encoding of one box: owning cell plus regression values.
///
/// “You Only Look Once: Unified, Real-Time Object Detection”
/// Authors: Joseph Redmon, Santosh Divvala, Ross Girshick, Ali Farhadi
/// Link (official): https://arxiv.org/abs/1506.02640
///
/// Unified Detection - Section 2
///
/// Our system divides the input image into an S × S grid. If the center of
/// an object falls into a grid cell, that grid cell is responsible for
/// detecting that object. [...] The (x, y) coordinates represent the center
/// of the box relative to the bounds of the grid cell. The width and height
/// are predicted relative to the whole image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellOffsets {
    /// Box center in grid units.
    pub cx: f32,
    pub cy: f32,
    /// Fractional position inside the owning cell, `[0, 1)`.
    pub tx: f32,
    pub ty: f32,
    /// Width and height as fractions of the full image.
    pub bw: f32,
    pub bh: f32,
}

impl CellOffsets {
    /// Owning cell `(grid_x, grid_y)`. May lie outside the grid for a center
    /// on the far image border; the builder drops those.
    pub fn cell(&self) -> (usize, usize) {
        (self.cx as usize, self.cy as usize)
    }

    pub fn area_ratio(&self) -> f32 {
        self.bw * self.bh
    }
}

/// One anchor-based supervision row. A single box can produce several rows,
/// one per anchor whose shape matches it closely enough.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorTarget {
    pub anchor: usize,
    pub grid_x: usize,
    pub grid_y: usize,
    pub tx: f32,
    pub ty: f32,
    /// Natural log of box size over anchor size, in grid units.
    pub tw: f32,
    pub th: f32,
    /// `2 − w_frac ⋅ h_frac`, de-emphasizing very large boxes.
    pub weight: f32,
}

/// Maps a normalized box to its owning grid cell and anchor-free regression
/// targets at the given stride.
pub fn encode_offsets(label: &BoxLabel, input_size: (usize, usize), stride: usize) -> CellOffsets {
    let (w, h) = (input_size.0 as f32, input_size.1 as f32);
    let s = stride as f32;

    let cx = (label.xmin + label.xmax) * 0.5 * w / s;
    let cy = (label.ymin + label.ymax) * 0.5 * h / s;
    let (bw, bh) = label.size_fractions();

    CellOffsets {
        cx,
        cy,
        tx: cx - cx.floor(),
        ty: cy - cy.floor(),
        bw,
        bh,
    }
}

/// Maps a normalized box to one or more anchor assignments at the given
/// stride.
///
/// The catalog and the box are compared shape-only: every candidate anchor
/// and the box itself are centered at the origin before the IoU. Anchors
/// scoring above `ignore_thresh` each get a supervision row; when none
/// qualifies the single best-scoring anchor is force-assigned so every box
/// supervises at least one slot.
///
/// Size targets are natural logs of box-over-anchor ratios; a zero-sized
/// anchor or box makes the log NaN and that NaN is propagated, not caught —
/// the caller guarantees positive sizes.
pub fn encode_to_anchors(
    label: &BoxLabel,
    input_size: (usize, usize),
    stride: usize,
    anchors: &[AnchorSize],
    ignore_thresh: f32,
) -> Vec<AnchorTarget> {
    if anchors.is_empty() {
        return Vec::new();
    }

    let offsets = encode_offsets(label, input_size, stride);
    let (grid_x, grid_y) = offsets.cell();

    let s = stride as f32;
    let box_ws = offsets.bw * input_size.0 as f32 / s;
    let box_hs = offsets.bh * input_size.1 as f32 / s;

    let candidates: Vec<CenterBox> = anchors
        .iter()
        .map(|a| CenterBox::new(0.0, 0.0, a.w, a.h))
        .collect();
    let iou = compute_iou(&candidates, &CenterBox::new(0.0, 0.0, box_ws, box_hs));

    let weight = 2.0 - offsets.bw * offsets.bh;
    let row = |index: usize| AnchorTarget {
        anchor: index,
        grid_x,
        grid_y,
        tx: offsets.tx,
        ty: offsets.ty,
        tw: (box_ws / anchors[index].w).ln(),
        th: (box_hs / anchors[index].h).ln(),
        weight,
    };

    let qualifying: Vec<usize> = iou
        .iter()
        .enumerate()
        .filter(|(_, score)| **score > ignore_thresh)
        .map(|(index, _)| index)
        .collect();

    if qualifying.is_empty() {
        // Force-assign the closest shape.
        let best = iou
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(index, _)| index)
            .unwrap_or(0);
        vec![row(best)]
    } else {
        qualifying.into_iter().map(row).collect()
    }
}

/// Builds dense supervision tensors from raw per-image label lists.
///
/// The output is `[batch, locations, channels]` where the location axis is
/// the grid flattened row-major with anchors minor, and — in multi-scale
/// mode — the per-stride blocks concatenated in stride order. That
/// flattening is a binding contract with the network's prediction layout and
/// is the same order [`crate::loss::DetectionLoss`] expects.
///
/// Collision policy: at most one box survives per (cell, anchor) slot and a
/// later box in iteration order silently overwrites an earlier one. Boxes
/// whose owning cell falls outside the grid, and multi-scale boxes matching
/// no band, are silently dropped. Neither is an error.
#[derive(Debug, Clone)]
pub struct TargetBuilder {
    input_size: (usize, usize),
    num_classes: usize,
    scale: Scale,
    assignment: Assignment,
}

impl TargetBuilder {
    /// Validates the configuration once; every later `build_targets` call
    /// reuses it unchanged.
    pub fn new(
        input_size: (usize, usize),
        num_classes: usize,
        scale: Scale,
        assignment: Assignment,
    ) -> YoloResult<Self> {
        if input_size.0 == 0 || input_size.1 == 0 {
            return Err(YoloError::EmptyInputSize(input_size.0, input_size.1));
        }

        if let Scale::Multi { strides, bands } = &scale {
            if matches!(assignment, Assignment::AnchorBased { .. }) {
                return Err(YoloError::Unsupported(
                    "anchor-based multi-scale target generation",
                ));
            }
            if strides.is_empty() {
                return Err(YoloError::EmptyStrides);
            }
            if strides.len() != bands.len() {
                return Err(YoloError::BandSpecMismatch {
                    strides: strides.len(),
                    bands: bands.len(),
                });
            }
        }

        Ok(TargetBuilder {
            input_size,
            num_classes,
            scale,
            assignment,
        })
    }

    /// The channel layout this builder writes, to hand to the loss.
    pub fn layout(&self) -> ChannelLayout {
        match &self.assignment {
            Assignment::AnchorFree => ChannelLayout::anchor_free(self.num_classes),
            Assignment::AnchorBased { anchors, .. } => {
                ChannelLayout::anchor_based(self.num_classes, anchors.len())
            }
        }
    }

    /// Builds the dense target tensor for one batch of label lists.
    ///
    /// # Arguments
    ///
    /// * `label_lists` - One `Vec<BoxLabel>` per image; order defines the
    ///   batch axis.
    /// * `device` - Device the finished tensor is placed on.
    pub fn build_targets<B: Backend>(
        &self,
        label_lists: &[Vec<BoxLabel>],
        device: &B::Device,
    ) -> YoloResult<Tensor<B, 3>> {
        if label_lists.is_empty() {
            return Err(YoloError::EmptyBatch);
        }

        match (&self.scale, &self.assignment) {
            (Scale::Single { stride }, Assignment::AnchorFree) => {
                Ok(self.single_anchor_free(*stride, label_lists, device))
            }
            (Scale::Single { stride }, Assignment::AnchorBased { anchors, ignore_thresh }) => {
                Ok(self.single_anchor_based(*stride, anchors, *ignore_thresh, label_lists, device))
            }
            (Scale::Multi { strides, bands }, Assignment::AnchorFree) => {
                Ok(self.multi_anchor_free(strides, bands, label_lists, device))
            }
            // Rejected in `new`; kept total in case a builder is hand-rolled.
            (Scale::Multi { .. }, Assignment::AnchorBased { .. }) => Err(
                YoloError::Unsupported("anchor-based multi-scale target generation"),
            ),
        }
    }

    fn grid(&self, stride: usize) -> (usize, usize) {
        (self.input_size.0 / stride, self.input_size.1 / stride)
    }

    fn single_anchor_free<B: Backend>(
        &self,
        stride: usize,
        label_lists: &[Vec<BoxLabel>],
        device: &B::Device,
    ) -> Tensor<B, 3> {
        let (ws, hs) = self.grid(stride);
        let layout = self.layout();
        let channels = layout.target_channels();

        let batch = label_lists.len();
        let mut buf = vec![0.0f32; batch * hs * ws * channels];

        for (batch_index, labels) in label_lists.iter().enumerate() {
            for label in labels {
                let offsets = encode_offsets(label, self.input_size, stride);
                let (gx, gy) = offsets.cell();
                if gx >= ws || gy >= hs {
                    continue;
                }

                let base = ((batch_index * hs + gy) * ws + gx) * channels;
                buf[base] = 1.0;
                buf[base + 1] = label.class_index as f32;
                buf[base + 2] = offsets.tx;
                buf[base + 3] = offsets.ty;
                buf[base + 4] = offsets.bw;
                buf[base + 5] = offsets.bh;
            }
        }

        Tensor::<B, 1>::from_floats(buf.as_slice(), device)
            .reshape([batch, layout.locations((ws, hs)), channels])
    }

    fn single_anchor_based<B: Backend>(
        &self,
        stride: usize,
        anchors: &[AnchorSize],
        ignore_thresh: f32,
        label_lists: &[Vec<BoxLabel>],
        device: &B::Device,
    ) -> Tensor<B, 3> {
        let (ws, hs) = self.grid(stride);
        let layout = self.layout();
        let channels = layout.target_channels();
        let anchor_count = anchors.len();

        let batch = label_lists.len();
        let mut buf = vec![0.0f32; batch * hs * ws * anchor_count * channels];

        for (batch_index, labels) in label_lists.iter().enumerate() {
            for label in labels {
                for t in encode_to_anchors(label, self.input_size, stride, anchors, ignore_thresh)
                {
                    if t.grid_x >= ws || t.grid_y >= hs {
                        continue;
                    }

                    let slot = ((batch_index * hs + t.grid_y) * ws + t.grid_x) * anchor_count
                        + t.anchor;
                    let base = slot * channels;
                    buf[base] = 1.0;
                    buf[base + 1] = label.class_index as f32;
                    buf[base + 2] = t.tx;
                    buf[base + 3] = t.ty;
                    buf[base + 4] = t.tw;
                    buf[base + 5] = t.th;
                    buf[base + 6] = t.weight;
                }
            }
        }

        Tensor::<B, 1>::from_floats(buf.as_slice(), device)
            .reshape([batch, layout.locations((ws, hs)), channels])
    }

    fn multi_anchor_free<B: Backend>(
        &self,
        strides: &[usize],
        bands: &[AreaBand],
        label_lists: &[Vec<BoxLabel>],
        device: &B::Device,
    ) -> Tensor<B, 3> {
        let batch = label_lists.len();
        let channels = self.layout().target_channels();

        let grids: Vec<(usize, usize)> = strides.iter().map(|s| self.grid(*s)).collect();
        let mut bufs: Vec<Vec<f32>> = grids
            .iter()
            .map(|(ws, hs)| vec![0.0f32; batch * hs * ws * channels])
            .collect();

        for (batch_index, labels) in label_lists.iter().enumerate() {
            for label in labels {
                // First band to contain the box's area ratio claims it; a box
                // matching no band is dropped.
                for (scale_index, (&stride, band)) in
                    strides.iter().zip(bands.iter()).enumerate()
                {
                    let offsets = encode_offsets(label, self.input_size, stride);
                    if !band.contains(offsets.area_ratio()) {
                        continue;
                    }

                    let (ws, hs) = grids[scale_index];
                    let (gx, gy) = offsets.cell();
                    if gx < ws && gy < hs {
                        let base = ((batch_index * hs + gy) * ws + gx) * channels;
                        let buf = &mut bufs[scale_index];
                        buf[base] = 1.0;
                        buf[base + 1] = label.class_index as f32;
                        buf[base + 2] = offsets.tx;
                        buf[base + 3] = offsets.ty;
                        buf[base + 4] = offsets.bw;
                        buf[base + 5] = offsets.bh;
                    }
                    break;
                }
            }
        }

        let per_scale: Vec<Tensor<B, 3>> = bufs
            .into_iter()
            .zip(grids.iter())
            .map(|(buf, (ws, hs))| {
                Tensor::<B, 1>::from_floats(buf.as_slice(), device)
                    .reshape([batch, hs * ws, channels])
            })
            .collect();

        Tensor::cat(per_scale, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_AREA_BANDS, MULTI_SCALE_STRIDES};
    use crate::debug::{assert_approx_eq, set_tensor_dbg_precision};
    use burn::backend::{NdArray, ndarray::NdArrayDevice};
    use burn::tensor::cast::ToElement;

    type B = NdArray<f32>;

    fn read_back(t: Tensor<B, 3>) -> Vec<f32> {
        t.into_data().to_vec::<f32>().unwrap()
    }

    #[test]
    fn offsets_for_centered_box() {
        let label = BoxLabel::new(0.4, 0.4, 0.6, 0.6, 3);
        let offsets = encode_offsets(&label, (416, 416), 32);

        // Center 0.5 * 416 / 32 = 6.5 -> cell 6, halfway in.
        assert_eq!(offsets.cell(), (6, 6));
        assert_approx_eq(&offsets.tx, &0.5, 1e-5);
        assert_approx_eq(&offsets.ty, &0.5, 1e-5);
        assert_approx_eq(&offsets.bw, &0.2, 1e-5);
        assert_approx_eq(&offsets.bh, &0.2, 1e-5);
    }

    #[test]
    fn no_anchor_above_thresh_forces_argmax() {
        // 8x8 grid; the box spans 4 grid units, far from both anchors.
        let anchors = [AnchorSize::new(1.0, 1.0), AnchorSize::new(2.0, 2.0)];
        let label = BoxLabel::new(0.25, 0.25, 0.75, 0.75, 0);

        let rows = encode_to_anchors(&label, (256, 256), 32, &anchors, 0.5);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].anchor, 1);
        assert_eq!((rows[0].grid_x, rows[0].grid_y), (4, 4));
        assert_approx_eq(&rows[0].tx, &0.0, 1e-5);
        assert_approx_eq(&rows[0].tw, &2.0f32.ln(), 1e-5);
        assert_approx_eq(&rows[0].weight, &1.75, 1e-5);
    }

    #[test]
    fn every_anchor_above_thresh_gets_a_row() {
        // Box of 4.5 grid units: IoU 0.79 with the 4x4 anchor, 0.81 with the
        // 5x5 one, 0.05 with the 1x1 one.
        let anchors = [
            AnchorSize::new(4.0, 4.0),
            AnchorSize::new(5.0, 5.0),
            AnchorSize::new(1.0, 1.0),
        ];
        let half = 4.5 * 32.0 / 256.0 / 2.0;
        let label = BoxLabel::new(0.5 - half, 0.5 - half, 0.5 + half, 0.5 + half, 0);

        let mut rows = encode_to_anchors(&label, (256, 256), 32, &anchors, 0.5);
        rows.sort_by_key(|r| r.anchor);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].anchor, 0);
        assert_eq!(rows[1].anchor, 1);
    }

    #[test]
    fn anchor_free_round_trip() {
        let builder = TargetBuilder::new(
            (416, 416),
            20,
            Scale::Single { stride: 32 },
            Assignment::AnchorFree,
        )
        .unwrap();

        let labels = vec![vec![BoxLabel::new(0.4, 0.4, 0.6, 0.6, 3)]];
        let targets = builder
            .build_targets::<B>(&labels, &NdArrayDevice::default())
            .unwrap();

        assert_eq!(targets.dims(), [1, 169, 6]);

        // Exactly one positive cell in the whole grid.
        let objectness = targets
            .clone()
            .slice([0..1, 0..169, 0..1])
            .sum()
            .into_scalar()
            .to_f32();
        assert_approx_eq(&objectness, &1.0, 1e-6);

        let data = read_back(targets);
        let base = (6 * 13 + 6) * 6;
        assert_approx_eq(&data[base], &1.0, 1e-6);
        assert_approx_eq(&data[base + 1], &3.0, 1e-6);
        assert!(data[base + 2] >= 0.0 && data[base + 2] < 1.0);
        assert!(data[base + 3] >= 0.0 && data[base + 3] < 1.0);
        assert_approx_eq(&data[base + 4], &0.2, 1e-5);
        assert_approx_eq(&data[base + 5], &0.2, 1e-5);
    }

    #[test]
    fn later_box_overwrites_earlier_in_same_cell() {
        let builder = TargetBuilder::new(
            (416, 416),
            20,
            Scale::Single { stride: 32 },
            Assignment::AnchorFree,
        )
        .unwrap();

        // Both centers land in cell (6, 6).
        let labels = vec![vec![
            BoxLabel::new(0.4, 0.4, 0.6, 0.6, 3),
            BoxLabel::new(0.45, 0.45, 0.58, 0.58, 7),
        ]];
        let targets = builder
            .build_targets::<B>(&labels, &NdArrayDevice::default())
            .unwrap();

        let data = read_back(targets);
        let base = (6 * 13 + 6) * 6;
        assert_approx_eq(&data[base + 1], &7.0, 1e-6);
    }

    #[test]
    fn anchor_based_slot_layout() {
        let anchors = vec![AnchorSize::new(1.0, 1.0), AnchorSize::new(2.0, 2.0)];
        let builder = TargetBuilder::new(
            (256, 256),
            20,
            Scale::Single { stride: 32 },
            Assignment::AnchorBased {
                anchors,
                ignore_thresh: 0.5,
            },
        )
        .unwrap();

        let labels = vec![vec![BoxLabel::new(0.25, 0.25, 0.75, 0.75, 11)]];
        let targets = builder
            .build_targets::<B>(&labels, &NdArrayDevice::default())
            .unwrap();

        assert_eq!(targets.dims(), [1, 128, 7]);
        set_tensor_dbg_precision(2);

        // Anchor 1 of cell (4, 4): location (4 * 8 + 4) * 2 + 1.
        let data = read_back(targets);
        let base = ((4 * 8 + 4) * 2 + 1) * 7;
        assert_approx_eq(&data[base], &1.0, 1e-6);
        assert_approx_eq(&data[base + 1], &11.0, 1e-6);
        assert_approx_eq(&data[base + 4], &2.0f32.ln(), 1e-5);
        assert_approx_eq(&data[base + 6], &1.75, 1e-5);
    }

    #[test]
    fn multi_scale_places_box_at_matching_stride() {
        let builder = TargetBuilder::new(
            (416, 416),
            20,
            Scale::Multi {
                strides: MULTI_SCALE_STRIDES.to_vec(),
                bands: DEFAULT_AREA_BANDS.to_vec(),
            },
            Assignment::AnchorFree,
        )
        .unwrap();

        // Area ratio 0.04 falls in the stride-16 band.
        let labels = vec![vec![BoxLabel::new(0.4, 0.4, 0.6, 0.6, 5)]];
        let targets = builder
            .build_targets::<B>(&labels, &NdArrayDevice::default())
            .unwrap();

        assert_eq!(targets.dims(), [1, 52 * 52 + 26 * 26 + 13 * 13, 6]);

        let data = read_back(targets.clone());
        let base = (52 * 52 + 13 * 26 + 13) * 6;
        assert_approx_eq(&data[base], &1.0, 1e-6);
        assert_approx_eq(&data[base + 1], &5.0, 1e-6);

        let total = targets
            .slice([0..1, 0..3549, 0..1])
            .sum()
            .into_scalar()
            .to_f32();
        assert_approx_eq(&total, &1.0, 1e-6);
    }

    #[test]
    fn box_below_every_band_is_dropped() {
        let builder = TargetBuilder::new(
            (416, 416),
            20,
            Scale::Multi {
                strides: MULTI_SCALE_STRIDES.to_vec(),
                bands: DEFAULT_AREA_BANDS.to_vec(),
            },
            Assignment::AnchorFree,
        )
        .unwrap();

        // 0.5% of each side: area ratio 2.5e-5, under the lowest band.
        let labels = vec![vec![BoxLabel::new(0.5, 0.5, 0.505, 0.505, 0)]];
        let targets = builder
            .build_targets::<B>(&labels, &NdArrayDevice::default())
            .unwrap();

        let total = targets
            .slice([0..1, 0..3549, 0..1])
            .sum()
            .into_scalar()
            .to_f32();
        assert_approx_eq(&total, &0.0, 1e-9);
    }

    #[test]
    fn first_matching_band_wins() {
        // Both bands accept everything; only the stride-16 block may claim.
        let builder = TargetBuilder::new(
            (416, 416),
            20,
            Scale::Multi {
                strides: vec![16, 32],
                bands: vec![
                    AreaBand::new(0.0, f32::INFINITY),
                    AreaBand::new(0.0, f32::INFINITY),
                ],
            },
            Assignment::AnchorFree,
        )
        .unwrap();

        let labels = vec![vec![BoxLabel::new(0.4, 0.4, 0.6, 0.6, 0)]];
        let targets = builder
            .build_targets::<B>(&labels, &NdArrayDevice::default())
            .unwrap();

        let locations = 26 * 26 + 13 * 13;
        let data = read_back(targets);
        assert_eq!(data.len(), locations * 6);

        let claimed = (13 * 26 + 13) * 6;
        assert_approx_eq(&data[claimed], &1.0, 1e-6);

        let total: f32 = data.iter().step_by(6).sum();
        assert_approx_eq(&total, &1.0, 1e-6);
    }

    #[test]
    fn boundary_errors() {
        assert!(matches!(
            TargetBuilder::new((0, 416), 20, Scale::Single { stride: 32 }, Assignment::AnchorFree),
            Err(YoloError::EmptyInputSize(0, 416))
        ));

        assert!(matches!(
            TargetBuilder::new(
                (416, 416),
                20,
                Scale::Multi {
                    strides: vec![8, 16],
                    bands: vec![AreaBand::new(0.0, 1.0)],
                },
                Assignment::AnchorFree,
            ),
            Err(YoloError::BandSpecMismatch { strides: 2, bands: 1 })
        ));

        assert!(matches!(
            TargetBuilder::new(
                (416, 416),
                20,
                Scale::Multi { strides: vec![], bands: vec![] },
                Assignment::AnchorFree,
            ),
            Err(YoloError::EmptyStrides)
        ));

        assert!(matches!(
            TargetBuilder::new(
                (416, 416),
                20,
                Scale::Multi {
                    strides: vec![8],
                    bands: vec![AreaBand::new(0.0, 1.0)],
                },
                Assignment::AnchorBased {
                    anchors: vec![AnchorSize::new(1.0, 1.0)],
                    ignore_thresh: 0.5,
                },
            ),
            Err(YoloError::Unsupported(_))
        ));

        let builder = TargetBuilder::new(
            (416, 416),
            20,
            Scale::Single { stride: 32 },
            Assignment::AnchorFree,
        )
        .unwrap();
        assert!(matches!(
            builder.build_targets::<B>(&[], &NdArrayDevice::default()),
            Err(YoloError::EmptyBatch)
        ));
    }
}
