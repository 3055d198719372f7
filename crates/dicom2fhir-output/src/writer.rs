//! 转换结果输出
//!
//! 按检查号（缺失时按检查实例UID）命名，写出 `<stem>_imagingStudy.json`，
//! 需要时再写出 `<stem>_bundle.json`。

use crate::bundle::TransactionBundle;
use dicom2fhir_core::config::OutputConfig;
use dicom2fhir_core::{ConvertError, ImagingStudy, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const STUDY_FILE_SUFFIX: &str = "_imagingStudy.json";
const BUNDLE_FILE_SUFFIX: &str = "_bundle.json";

/// 去掉所有序列的实例数组，保留计数
pub fn strip_instances(study: &mut ImagingStudy) {
    for series in &mut study.series {
        series.instance.clear();
    }
}

/// 输出文件名前缀
pub fn output_stem(study: &ImagingStudy) -> Result<String> {
    study
        .accession_number()
        .filter(|accession| !accession.is_empty())
        .or_else(|| study.study_instance_uid().filter(|uid| !uid.is_empty()))
        .map(str::to_string)
        .ok_or(ConvertError::MissingIdentifier)
}

/// 结果写出器
#[derive(Debug, Clone)]
pub struct StudyWriter {
    output_dir: PathBuf,
    include_instances: bool,
    build_bundle: bool,
}

impl StudyWriter {
    pub fn new<P: AsRef<Path>>(output_dir: P, config: &OutputConfig) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            include_instances: config.include_instances,
            build_bundle: config.build_bundle,
        }
    }

    /// 写出检查及可选的 Bundle，返回写出的文件路径
    pub fn write(&self, study: &ImagingStudy) -> Result<Vec<PathBuf>> {
        let stem = output_stem(study)?;
        fs::create_dir_all(&self.output_dir)?;

        let mut study = study.clone();
        if !self.include_instances {
            debug!("输出不含实例层级");
            strip_instances(&mut study);
        }

        let mut written = Vec::new();
        if self.build_bundle {
            let bundle = TransactionBundle::from_study(study.clone());
            let path = self.output_dir.join(format!("{}{}", stem, BUNDLE_FILE_SUFFIX));
            write_json(&path, &bundle)?;
            written.push(path);
        }

        let path = self.output_dir.join(format!("{}{}", stem, STUDY_FILE_SUFFIX));
        write_json(&path, &study)?;
        written.push(path);

        info!("已写出 {} 个文件到 {}", written.len(), self.output_dir.display());
        Ok(written)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    debug!("写出文件: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_study;
    use tempfile::TempDir;

    fn output_config(include_instances: bool, build_bundle: bool) -> OutputConfig {
        OutputConfig {
            include_instances,
            build_bundle,
        }
    }

    #[test]
    fn test_output_stem() {
        assert_eq!(output_stem(&sample_study(Some("ACC-42"), Some("1.2.3"))).unwrap(), "ACC-42");
        assert_eq!(output_stem(&sample_study(None, Some("1.2.3"))).unwrap(), "1.2.3");
        assert!(matches!(
            output_stem(&sample_study(None, None)),
            Err(ConvertError::MissingIdentifier)
        ));
    }

    #[test]
    fn test_write_study_only() {
        let dir = TempDir::new().unwrap();
        let writer = StudyWriter::new(dir.path(), &output_config(true, false));

        let written = writer.write(&sample_study(Some("ACC-42"), Some("1.2.3"))).unwrap();
        assert_eq!(written, vec![dir.path().join("ACC-42_imagingStudy.json")]);

        let content = fs::read_to_string(&written[0]).unwrap();
        let parsed: ImagingStudy = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.series[0].instance.len(), 2);
    }

    #[test]
    fn test_write_with_bundle_and_without_instances() {
        let dir = TempDir::new().unwrap();
        let writer = StudyWriter::new(dir.path(), &output_config(false, true));

        let written = writer.write(&sample_study(None, Some("1.2.3"))).unwrap();
        assert_eq!(written.len(), 2);
        assert!(dir.path().join("1.2.3_bundle.json").exists());

        let content = fs::read_to_string(dir.path().join("1.2.3_imagingStudy.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(json["series"][0].get("instance").is_none());
        assert_eq!(json["series"][0]["numberOfInstances"], 2);
        assert_eq!(json["numberOfInstances"], 2);
    }

    #[test]
    fn test_missing_identifier_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let writer = StudyWriter::new(dir.path(), &output_config(true, true));

        assert!(writer.write(&sample_study(None, None)).is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
