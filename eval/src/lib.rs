// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Evaluation report aggregation for code smell classifiers
//!
//! This crate provides:
//! - Loading of the pre-mapped QC and MLCQ smell datasets
//! - Model result records (validation and test metrics, timings)
//! - Report tables flattened from per-smell `[DT, RF]` model pairs
//! - CSV export into the `reports/{qc,mlcq,transfer,cross}` layout

pub mod config;
pub mod datasets;
pub mod metrics;
pub mod report;

pub use config::ReportConfig;
pub use datasets::{load_mapped, read_mapped_dataset, DatasetFamily, MappedDatasets, MappedTable, Smell};
pub use metrics::{ConfusionMatrix, ModelResult, ModelScores, ModelsDict, OptimizeTimes};
pub use report::{create_report, export_report, ReportLayout, ReportTable};
