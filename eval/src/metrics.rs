// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Model result records and the metrics that fill them
//!
//! A [`ModelResult`] carries the validation and held-out test scores of one
//! trained classifier. Results are grouped per smell in a [`ModelsDict`],
//! usually as the pair `[DecisionTree, RandomForest]`.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smell name -> model results, in insertion order
pub type ModelsDict = IndexMap<String, Vec<ModelResult>>;

/// Smell name -> optimization time (seconds) per model slot
pub type OptimizeTimes = IndexMap<String, Vec<f64>>;

/// Evaluation summary of one trained classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    /// Display name, used as the report row label
    pub model_name: String,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub roc_auc: f64,
    /// Training wall time in seconds
    pub training_time: f64,
    pub pred_accuracy: f64,
    pub pred_precision: f64,
    pub pred_recall: f64,
    pub pred_f1: f64,
    pub pred_roc: f64,
}

impl ModelResult {
    /// Assemble a result from validation and test scores
    pub fn new(
        model_name: &str,
        validation: &ModelScores,
        test: &ModelScores,
        training_time: f64,
    ) -> Self {
        Self {
            model_name: model_name.to_string(),
            accuracy: validation.accuracy,
            precision: validation.precision,
            recall: validation.recall,
            f1: validation.f1,
            roc_auc: validation.roc_auc,
            training_time,
            pred_accuracy: test.accuracy,
            pred_precision: test.precision,
            pred_recall: test.recall,
            pred_f1: test.f1,
            pred_roc: test.roc_auc,
        }
    }
}

/// Read a models dictionary from JSON: `{"God_Class": [{...}, {...}], ...}`
pub fn load_models_dict(path: &Path) -> Result<ModelsDict> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read model results: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse model results: {}", path.display()))
}

/// Read an optimization-time dictionary from JSON: `{"God_Class": [12.5, 40.1], ...}`
pub fn load_optimize_times(path: &Path) -> Result<OptimizeTimes> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read optimization times: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse optimization times: {}", path.display()))
}

/// Confusion matrix for binary smell detection (`true` = smelly)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(predictions: &[bool], ground_truth: &[bool]) -> Self {
        assert_eq!(predictions.len(), ground_truth.len(), "Prediction and ground truth lengths must match");

        let mut matrix = Self::default();
        for (pred, truth) in predictions.iter().zip(ground_truth.iter()) {
            match (pred, truth) {
                (true, true) => matrix.tp += 1,
                (false, false) => matrix.tn += 1,
                (true, false) => matrix.fp += 1,
                (false, true) => matrix.fn_ += 1,
            }
        }
        matrix
    }

    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    /// Accuracy: (TP + TN) / Total
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.tp + self.tn) as f64 / total as f64
    }

    /// Precision: TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        let denom = self.tp + self.fp;
        if denom == 0 {
            return 0.0;
        }
        self.tp as f64 / denom as f64
    }

    /// Recall: TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        let denom = self.tp + self.fn_;
        if denom == 0 {
            return 0.0;
        }
        self.tp as f64 / denom as f64
    }

    pub fn f1_score(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        let denom = precision + recall;
        if denom == 0.0 {
            return 0.0;
        }
        2.0 * precision * recall / denom
    }
}

/// The five scores reported per evaluation split
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelScores {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub roc_auc: f64,
}

impl ModelScores {
    /// Score hard predictions plus P(smelly) against ground truth
    pub fn from_predictions(predictions: &[bool], ground_truth: &[bool], probabilities: &[f64]) -> Self {
        assert_eq!(probabilities.len(), ground_truth.len(), "Probability and ground truth lengths must match");
        let cm = ConfusionMatrix::from_predictions(predictions, ground_truth);
        Self {
            accuracy: cm.accuracy(),
            precision: cm.precision(),
            recall: cm.recall(),
            f1: cm.f1_score(),
            roc_auc: roc_auc(ground_truth, probabilities),
        }
    }
}

/// Area under the ROC curve, trapezoidal rule over probability-sorted samples
pub fn roc_auc(ground_truth: &[bool], probabilities: &[f64]) -> f64 {
    let mut pairs: Vec<(bool, f64)> = ground_truth
        .iter()
        .copied()
        .zip(probabilities.iter().copied())
        .collect();
    // total_cmp keeps NaN scores in one group at the top of the ranking
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));

    let n_pos = pairs.iter().filter(|(l, _)| *l).count() as f64;
    let n_neg = pairs.len() as f64 - n_pos;
    if n_pos == 0.0 || n_neg == 0.0 {
        return 0.5;
    }

    let mut tp = 0.0;
    let mut fp = 0.0;
    let mut tpr_prev = 0.0;
    let mut fpr_prev = 0.0;
    let mut auc = 0.0;

    // Tied scores form a single threshold step
    let mut i = 0;
    while i < pairs.len() {
        let score = pairs[i].1;
        while i < pairs.len() && pairs[i].1.total_cmp(&score).is_eq() {
            if pairs[i].0 {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
            i += 1;
        }

        let tpr = tp / n_pos;
        let fpr = fp / n_neg;
        auc += (fpr - fpr_prev) * (tpr + tpr_prev) / 2.0;
        tpr_prev = tpr;
        fpr_prev = fpr;
    }

    auc
}
