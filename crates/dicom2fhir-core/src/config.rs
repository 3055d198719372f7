//! 配置管理
//!
//! 配置来源依次为：可选的配置文件、`DICOM2FHIR__` 前缀的环境变量。
//! 所有字段都有默认值，不提供任何配置时也能运行。

use crate::error::{ConvertError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 默认的患者标识命名空间
pub const DEFAULT_PATIENT_ID_NAMESPACE: &str =
    "https://fhir.diz.uk-erlangen.de/identifiers/patient-id";
/// 患者ID截取前缀长度
pub const DEFAULT_PATIENT_ID_PREFIX_LENGTH: usize = 9;

/// 转换器完整配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// 目录解析配置
    pub directory_parser: DirectoryParserConfig,
    /// 患者假名化配置
    pub subject: SubjectConfig,
    /// 输出配置
    pub output: OutputConfig,
}

/// 目录解析配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryParserConfig {
    /// 是否跳过无效（非DICOM或无法解析）的文件
    pub skip_invalid_files: bool,
}

/// 患者假名化配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectConfig {
    /// 标识命名空间，参与哈希计算
    pub namespace: String,
    /// 患者ID截取长度
    pub prefix_length: usize,
}

/// 输出配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// 是否输出实例层级
    pub include_instances: bool,
    /// 是否额外输出事务Bundle
    pub build_bundle: bool,
}

impl Default for DirectoryParserConfig {
    fn default() -> Self {
        Self {
            skip_invalid_files: true,
        }
    }
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_PATIENT_ID_NAMESPACE.to_string(),
            prefix_length: DEFAULT_PATIENT_ID_PREFIX_LENGTH,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            include_instances: true,
            build_bundle: false,
        }
    }
}

impl ConverterConfig {
    /// 加载配置
    ///
    /// `config_path` 为 None 时只读取环境变量。
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            debug!("读取配置文件: {}", path);
            builder = builder.add_source(File::with_name(path));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("DICOM2FHIR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConvertError::Config(e.to_string()))?;

        let config: ConverterConfig = settings
            .try_deserialize()
            .map_err(|e| ConvertError::Config(e.to_string()))?;

        config.validate()?;
        info!("配置加载完成: skip_invalid_files={}", config.directory_parser.skip_invalid_files);
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.subject.namespace.trim().is_empty() {
            return Err(ConvertError::Config("subject.namespace 不能为空".to_string()));
        }
        if self.subject.prefix_length == 0 {
            return Err(ConvertError::Config("subject.prefix_length 必须大于0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::default();
        assert!(config.directory_parser.skip_invalid_files);
        assert_eq!(config.subject.namespace, DEFAULT_PATIENT_ID_NAMESPACE);
        assert_eq!(config.subject.prefix_length, 9);
        assert!(config.output.include_instances);
        assert!(!config.output.build_bundle);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dicom2fhir.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[directory_parser]\nskip_invalid_files = false\n").unwrap();
        writeln!(file, "[output]\nbuild_bundle = true\n").unwrap();

        let config = ConverterConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert!(!config.directory_parser.skip_invalid_files);
        assert!(config.output.build_bundle);
        // 未配置的字段保持默认值
        assert!(config.output.include_instances);
        assert_eq!(config.subject.prefix_length, 9);
    }

    #[test]
    fn test_validate_rejects_empty_namespace() {
        let mut config = ConverterConfig::default();
        config.subject.namespace = " ".to_string();
        assert!(config.validate().is_err());
    }
}
