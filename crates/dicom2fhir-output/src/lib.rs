//! # dicom2fhir Output
//!
//! 转换结果的序列化与写出：ImagingStudy JSON 和可选的事务 Bundle。

pub mod bundle;
pub mod writer;

#[cfg(test)]
mod testing;

pub use bundle::{BundleEntry, BundleRequest, TransactionBundle};
pub use writer::{output_stem, strip_instances, StudyWriter};
