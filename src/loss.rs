use burn::prelude::Backend;
use burn::tensor::activation::{log_softmax, relu, sigmoid};
use burn::tensor::{Int, Tensor};

use crate::error::{YoloError, YoloResult};
use crate::layout::ChannelLayout;

/// Objectness formulation, picked once when the loss is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectnessLossKind {
    /// Positive and negative cells reduced separately, negatives down-weighted
    /// by 0.5 against the class imbalance of a dense grid.
    Balanced,
    /// Focal BCE, γ = 2, reduced jointly.
    ///
    /// “Focal Loss for Dense Object Detection”
    /// Authors: Tsung-Yi Lin, Priya Goyal, Ross Girshick, Kaiming He,
    ///          Piotr Dollár
    /// Link (official): https://arxiv.org/abs/1708.02002
    Focal,
}

/// The three decomposed loss terms, each a scalar tensor.
///
/// Combining them into one training objective is the training loop's job
/// (see [`crate::config::LossWeights`]); keeping them separate lets the loop
/// log and weight them independently.
#[derive(Debug, Clone)]
pub struct LossOutput<B: Backend> {
    pub objectness: Tensor<B, 1>,
    pub class: Tensor<B, 1>,
    pub boxes: Tensor<B, 1>,
}

/// Computes objectness, classification and box-regression losses from raw
/// predictions against a dense target tensor.
///
/// Both tensors are `[batch, locations, channels]` with the channel orders
/// described by the shared [`ChannelLayout`]; the location axes must be the
/// flattening the target builder produced. Classification and box terms are
/// masked by the objectness target, so cells without an object contribute
/// nothing to them.
#[derive(Debug, Clone)]
pub struct DetectionLoss {
    layout: ChannelLayout,
    objectness: ObjectnessLossKind,
}

impl DetectionLoss {
    pub fn new(layout: ChannelLayout, objectness: ObjectnessLossKind) -> Self {
        DetectionLoss { layout, objectness }
    }

    /// Runs the full decomposed loss.
    ///
    /// # Arguments
    ///
    /// * `pred` - Raw network output, `[batch, locations, 5 + num_classes]`.
    /// * `label` - Dense target tensor from the matching builder.
    ///
    /// # Returns
    ///
    /// The three scalar terms, or [`YoloError::ShapeMismatch`] when either
    /// tensor disagrees with the layout or the two disagree with each other.
    pub fn forward<B: Backend>(
        &self,
        pred: Tensor<B, 3>,
        label: Tensor<B, 3>,
    ) -> YoloResult<LossOutput<B>> {
        let pred_dims = pred.dims();
        let label_dims = label.dims();

        if pred_dims[0] != label_dims[0]
            || pred_dims[1] != label_dims[1]
            || pred_dims[2] != self.layout.pred_channels()
            || label_dims[2] != self.layout.target_channels()
        {
            return Err(YoloError::ShapeMismatch {
                pred: pred_dims,
                target: label_dims,
            });
        }

        let [batch, locations, _] = pred_dims;

        let pred_obj: Tensor<B, 2> = sigmoid(
            pred.clone()
                .slice([0..batch, 0..locations, 0..1])
                .squeeze(2),
        );
        let pred_class = pred
            .clone()
            .slice([0..batch, 0..locations, self.layout.pred_class()]);
        let pred_box = pred.slice([0..batch, 0..locations, self.layout.pred_box()]);

        let pred_xy = sigmoid(pred_box.clone().slice([0..batch, 0..locations, 0..2]));
        let pred_wh = pred_box.slice([0..batch, 0..locations, 2..4]);

        let target_obj: Tensor<B, 2> = label
            .clone()
            .slice([0..batch, 0..locations, 0..1])
            .squeeze(2);
        let target_class: Tensor<B, 2> = label
            .clone()
            .slice([0..batch, 0..locations, 1..2])
            .squeeze(2);
        let target_box = label.slice([0..batch, 0..locations, self.layout.target_box()]);
        let target_xy = target_box.clone().slice([0..batch, 0..locations, 0..2]);
        let target_wh = target_box.slice([0..batch, 0..locations, 2..4]);

        let objectness = self.objectness_loss(pred_obj, target_obj.clone());
        let class = self.class_loss(pred_class, target_class, target_obj.clone());
        let boxes = self.box_loss(pred_xy, pred_wh, target_xy, target_wh, target_obj);

        Ok(LossOutput {
            objectness,
            class,
            boxes,
        })
    }

    /// Binary cross-entropy on the sigmoid objectness probability.
    ///
    /// Probabilities are floored with `+1e-14` inside the logs so an extreme
    /// logit cannot produce `log(0)`. Per-image sums are averaged over the
    /// batch.
    fn objectness_loss<B: Backend>(
        &self,
        pred_obj: Tensor<B, 2>,
        target_obj: Tensor<B, 2>,
    ) -> Tensor<B, 1> {
        let pos = target_obj.equal_elem(1.0).float();
        let neg = Tensor::ones_like(&pos) - pos.clone();

        let log_p = pred_obj.clone().add_scalar(1e-14).log().neg();
        let inverse = Tensor::ones_like(&pred_obj) - pred_obj.clone();
        let log_q = inverse.clone().add_scalar(1e-14).log().neg();

        match self.objectness {
            ObjectnessLossKind::Balanced => {
                let pos_loss = (pos * log_p).sum_dim(1).mean();
                let neg_loss = (neg * log_q).sum_dim(1).mean();
                pos_loss + neg_loss * 0.5
            }
            ObjectnessLossKind::Focal => {
                let pos_loss = pos * inverse.powf_scalar(2.0) * log_p;
                let neg_loss = neg * pred_obj.powf_scalar(2.0) * log_q;
                (pos_loss + neg_loss).sum_dim(1).mean()
            }
        }
    }

    /// Cross-entropy over the class logits, only where an object lives.
    ///
    /// The class channel of negative cells holds a meaningless zero; the
    /// objectness mask removes it before any reduction.
    fn class_loss<B: Backend>(
        &self,
        pred_class: Tensor<B, 3>,
        target_class: Tensor<B, 2>,
        target_obj: Tensor<B, 2>,
    ) -> Tensor<B, 1> {
        let [batch, locations, _] = pred_class.dims();

        let log_probabilities = log_softmax(pred_class, 2);
        let indices: Tensor<B, 3, Int> = target_class.int().reshape([batch, locations, 1]);

        let nll: Tensor<B, 2> = log_probabilities.gather(2, indices).squeeze(2).neg();

        (nll * target_obj).sum_dim(1).mean()
    }

    /// Center-offset MSE plus a size term.
    ///
    /// Offsets compare sigmoid activations against the `[0, 1)` cell
    /// fractions in both modes. The size term is mode-dependent: anchor-based
    /// targets already live in log-ratio space so the raw predictions are
    /// compared directly; anchor-free targets are image fractions compared on
    /// square roots, the YOLO-v1 trick that keeps small boxes from being
    /// drowned out by large ones.
    ///
    /// “You Only Look Once: Unified, Real-Time Object Detection”
    /// Authors: Joseph Redmon, Santosh Divvala, Ross Girshick, Ali Farhadi
    /// Link (official): https://arxiv.org/abs/1506.02640
    ///
    /// Training - Section 2.2
    ///
    /// Our error metric should reflect that small deviations in large boxes
    /// matter less than in small boxes. To partially address this we predict
    /// the square root of the bounding box width and height instead of the
    /// width and height directly.
    fn box_loss<B: Backend>(
        &self,
        pred_xy: Tensor<B, 3>,
        pred_wh: Tensor<B, 3>,
        target_xy: Tensor<B, 3>,
        target_wh: Tensor<B, 3>,
        target_obj: Tensor<B, 2>,
    ) -> Tensor<B, 1> {
        let xy_error: Tensor<B, 2> = (pred_xy - target_xy).powf_scalar(2.0).sum_dim(2).squeeze(2);
        let loss_xy = (xy_error * target_obj.clone()).sum_dim(1).mean();

        let (pred_wh, target_wh) = if self.layout.is_anchor_based() {
            (pred_wh, target_wh)
        } else {
            (relu(pred_wh).sqrt(), target_wh.sqrt())
        };
        let wh_error: Tensor<B, 2> = (pred_wh - target_wh).powf_scalar(2.0).sum_dim(2).squeeze(2);
        let loss_wh = (wh_error * target_obj).sum_dim(1).mean();

        loss_xy + loss_wh
    }
}
