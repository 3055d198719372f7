//! 错误定义模块

use std::path::PathBuf;
use thiserror::Error;

/// 转换流程统一错误类型
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("DICOM解析错误 {path:?}: {message}")]
    DicomParse { path: PathBuf, message: String },

    #[error("不是有效的DICOM文件: {0:?}")]
    InvalidDicomFile(PathBuf),

    #[error("目录不存在: {0:?}")]
    DirectoryNotFound(PathBuf),

    #[error("缺少必需的DICOM属性: {0}")]
    MissingAttribute(&'static str),

    #[error("检测到多个检查: 期望 {expected}, 实际 {found}")]
    StudyMismatch { expected: String, found: String },

    #[error("输入中没有任何DICOM实例")]
    EmptyInput,

    #[error("没有可用于命名输出的标识符 (检查号与检查实例UID均缺失)")]
    MissingIdentifier,
}

impl ConvertError {
    /// 是否为可跳过的无效数据源（取决于 skip_invalid_files 配置）
    pub fn is_invalid_source(&self) -> bool {
        matches!(
            self,
            ConvertError::DicomParse { .. } | ConvertError::InvalidDicomFile(_)
        )
    }
}

/// 转换流程统一结果类型
pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_source_classification() {
        assert!(ConvertError::InvalidDicomFile(PathBuf::from("a.txt")).is_invalid_source());
        assert!(ConvertError::DicomParse {
            path: PathBuf::from("b.dcm"),
            message: "truncated".to_string(),
        }
        .is_invalid_source());

        assert!(!ConvertError::MissingAttribute("SOPInstanceUID").is_invalid_source());
        assert!(!ConvertError::StudyMismatch {
            expected: "1.2".to_string(),
            found: "1.3".to_string(),
        }
        .is_invalid_source());
    }
}
