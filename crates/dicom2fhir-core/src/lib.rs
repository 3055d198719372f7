//! # dicom2fhir Core
//!
//! 转换系统的核心模块，提供FHIR资源模型、术语表、错误定义、配置和通用工具。

pub mod config;
pub mod error;
pub mod models;
pub mod terminology;
pub mod utils;

pub use config::ConverterConfig;
pub use error::{ConvertError, Result};
pub use models::*;
