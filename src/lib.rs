//! # dicom2fhir
//!
//! DICOM 元数据到 FHIR ImagingStudy 的转换入口。
//!
//! 两种输入模式：
//! - 目录模式：递归读取目录中的 DICOM Part-10 文件
//! - 记录模式：调用方提供已解码的元数据记录
//!
//! 两种模式共享同一个聚合过程，结果都是 `Option<ImagingStudy>`，
//! 没有任何可用记录时为 `None`。

use dicom2fhir_core::{ConverterConfig, ImagingStudy, Result};
use dicom2fhir_dicom::{DicomDirectory, MetadataRecord};
use dicom2fhir_engine::aggregate;
use std::path::Path;
use tracing::info;

/// 转换目录中的全部 DICOM 文件
///
/// 文件按路径顺序处理；目录不存在时返回错误。
pub fn process_directory<P: AsRef<Path>>(
    path: P,
    config: &ConverterConfig,
) -> Result<Option<ImagingStudy>> {
    let directory = DicomDirectory::open(path)?;
    info!("开始转换目录: {}", directory.root().display());
    aggregate(directory.records()?, config)
}

/// 转换已解码的元数据记录
pub fn process_records<I, R>(records: I, config: &ConverterConfig) -> Result<Option<ImagingStudy>>
where
    I: IntoIterator<Item = R>,
    R: MetadataRecord,
{
    aggregate(records.into_iter().map(Ok), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom::dictionary_std::tags;
    use dicom::object::InMemDicomObject;
    use dicom2fhir_core::ConvertError;
    use dicom2fhir_dicom::{write_part10_file, RecordBuilder};
    use std::fs;
    use tempfile::TempDir;

    fn record(series_uid: &str, sop_uid: &str, modality: &str) -> InMemDicomObject {
        RecordBuilder::new()
            .text(tags::PATIENT_ID, "123456789")
            .text(tags::ACCESSION_NUMBER, "ACC-7")
            .text(tags::STUDY_INSTANCE_UID, "1.2.826.0.1.1")
            .text(tags::STUDY_DATE, "20230115")
            .text(tags::STUDY_TIME, "141500")
            .text(tags::SERIES_INSTANCE_UID, series_uid)
            .text(tags::SOP_INSTANCE_UID, sop_uid)
            .text(tags::SOP_CLASS_UID, "1.2.840.10008.5.1.4.1.1.2")
            .text(tags::MODALITY, modality)
            .text(tags::BODY_PART_EXAMINED, "CHEST")
            .build()
    }

    #[test]
    fn test_directory_and_records_agree() {
        let dir = TempDir::new().unwrap();
        let records = vec![
            record("1.2.826.0.1.1.1", "1.2.826.0.1.1.1.1", "CT"),
            record("1.2.826.0.1.1.1", "1.2.826.0.1.1.1.2", "CT"),
            record("1.2.826.0.1.1.2", "1.2.826.0.1.1.2.1", "SR"),
        ];
        for (i, r) in records.iter().enumerate() {
            write_part10_file(r, dir.path().join(format!("img{}.dcm", i))).unwrap();
        }

        let config = ConverterConfig::default();
        let from_directory = process_directory(dir.path(), &config).unwrap().unwrap();
        let from_records = process_records(records, &config).unwrap().unwrap();

        assert_eq!(from_directory.number_of_series, 2);
        assert_eq!(from_directory.number_of_instances, 3);
        assert_eq!(from_directory.series, from_records.series);
        assert_eq!(from_directory.modality, from_records.modality);
        assert_eq!(from_directory.subject, from_records.subject);
        assert_eq!(from_directory.accession_number(), Some("ACC-7"));
        assert_eq!(
            from_directory.started.unwrap().to_string(),
            "2023-01-15T14:15:00"
        );
    }

    #[test]
    fn test_directory_skips_non_dicom_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "not a dicom file").unwrap();
        write_part10_file(
            &record("1.2.826.0.1.1.1", "1.2.826.0.1.1.1.1", "CR"),
            dir.path().join("a.dcm"),
        )
        .unwrap();

        let study = process_directory(dir.path(), &ConverterConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(study.number_of_instances, 1);

        let mut strict = ConverterConfig::default();
        strict.directory_parser.skip_invalid_files = false;
        assert!(matches!(
            process_directory(dir.path(), &strict),
            Err(ConvertError::InvalidDicomFile(_))
        ));
    }

    #[test]
    fn test_empty_directory_has_no_study() {
        let dir = TempDir::new().unwrap();
        assert!(process_directory(dir.path(), &ConverterConfig::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = TempDir::new().unwrap();
        let result = process_directory(dir.path().join("absent"), &ConverterConfig::default());
        assert!(matches!(result, Err(ConvertError::DirectoryNotFound(_))));
    }
}
