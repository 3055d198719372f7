//! # dicom2fhir Engine
//!
//! 将同一检查的DICOM元数据记录按顺序合并为一个 FHIR ImagingStudy：
//! 检查、序列、实例三级构建，标识符与患者假名化，以及聚合状态机。

pub mod aggregator;
mod fields;
pub mod identifiers;
pub mod instance;
pub mod series;
pub mod study;
pub mod tree;

#[cfg(test)]
mod testing;

pub use aggregator::{aggregate, finalize_modalities, RunSummary, StudyAggregator};
pub use identifiers::SubjectPseudonymizer;
pub use instance::InstanceOutcome;
pub use tree::StudyTree;
