//! 实例解析
//!
//! 将一条记录作为实例加入指定序列。SOP实例UID在序列内唯一，
//! 重复的记录被丢弃且不改变任何计数。

use crate::fields;
use crate::tree::StudyTree;
use dicom::dictionary_std::tags;
use dicom2fhir_core::terminology::{coding, SOP_CLASS_SYSTEM};
use dicom2fhir_core::{ImagingStudyInstance, Result};
use dicom2fhir_dicom::MetadataRecord;
use tracing::{debug, warn};

/// 结构化报告模态
const STRUCTURED_REPORT_MODALITY: &str = "SR";

/// 记录合并结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceOutcome {
    /// 新实例已加入
    Added,
    /// 实例UID重复，记录被丢弃
    Duplicate,
}

/// 将记录作为实例加入 `series_position` 处的序列
pub(crate) fn resolve_instance<R: MetadataRecord>(
    tree: &mut StudyTree,
    series_position: usize,
    record: &R,
) -> Result<InstanceOutcome> {
    let uid = record.required_text(tags::SOP_INSTANCE_UID, "SOPInstanceUID")?;

    if tree.contains_instance(series_position, &uid) {
        warn!(
            "SOP实例UID不唯一，忽略该记录: {} (序列 {})",
            uid,
            tree.series(series_position).uid
        );
        return Ok(InstanceOutcome::Duplicate);
    }

    let sop_class_uid = record.required_text(tags::SOP_CLASS_UID, "SOPClassUID")?;
    let is_report =
        tree.series(series_position).modality.code() == Some(STRUCTURED_REPORT_MODALITY);

    let instance = ImagingStudyInstance {
        sop_class: coding(&format!("urn:oid:{}", sop_class_uid), SOP_CLASS_SYSTEM),
        number: fields::number(record, tags::INSTANCE_NUMBER),
        title: instance_title(record, is_report),
        uid,
    };

    debug!("加入实例: {}", instance.uid);
    tree.push_instance(series_position, instance);
    Ok(InstanceOutcome::Added)
}

/// 实例标题
///
/// 结构化报告取 Concept Name Code Sequence 第一项的 Code Meaning，
/// 其他模态取 Image Type 各值以反斜杠连接。任何一步缺失都只导致标题为空。
fn instance_title<R: MetadataRecord>(record: &R, is_report: bool) -> Option<String> {
    if is_report {
        return record
            .code_items(tags::CONCEPT_NAME_CODE_SEQUENCE)?
            .into_iter()
            .next()?
            .code_meaning
            .filter(|meaning| !meaning.is_empty());
    }

    let image_type = record.texts(tags::IMAGE_TYPE)?;
    if image_type.is_empty() {
        return None;
    }
    Some(image_type.join("\\"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{base_record, empty_tree, series_record};
    use dicom2fhir_core::terminology::CodeItem;
    use dicom2fhir_dicom::RecordBuilder;

    #[test]
    fn test_duplicate_instance_is_idempotent() {
        let mut tree = empty_tree();
        let record = base_record("1.1", "1.1.1", "1.1.1.1").build();
        let position = tree.push_series(series_record(&record));

        assert_eq!(resolve_instance(&mut tree, position, &record).unwrap(), InstanceOutcome::Added);
        assert_eq!(
            resolve_instance(&mut tree, position, &record).unwrap(),
            InstanceOutcome::Duplicate
        );

        assert_eq!(tree.series(position).number_of_instances, 1);
        assert_eq!(tree.series(position).instance.len(), 1);
        assert_eq!(tree.study().number_of_instances, 1);
    }

    #[test]
    fn test_instance_fields() {
        let mut tree = empty_tree();
        let record = base_record("1.1", "1.1.1", "1.1.1.7")
            .integer(tags::INSTANCE_NUMBER, 7)
            .texts(tags::IMAGE_TYPE, &["ORIGINAL", "PRIMARY", "AXIAL"])
            .build();
        let position = tree.push_series(series_record(&record));

        resolve_instance(&mut tree, position, &record).unwrap();

        let instance = &tree.series(position).instance[0];
        assert_eq!(instance.uid, "1.1.1.7");
        assert_eq!(instance.number, Some(7));
        assert_eq!(instance.title.as_deref(), Some("ORIGINAL\\PRIMARY\\AXIAL"));
        assert_eq!(
            instance.sop_class.code.as_deref(),
            Some("urn:oid:1.2.840.10008.5.1.4.1.1.1")
        );
        assert_eq!(instance.sop_class.system.as_deref(), Some(SOP_CLASS_SYSTEM));
    }

    #[test]
    fn test_report_title_from_concept_name() {
        let mut tree = empty_tree();
        let record = base_record("1.1", "1.1.2", "1.1.2.1")
            .text(tags::MODALITY, "SR")
            .texts(tags::IMAGE_TYPE, &["DERIVED"])
            .code_sequence(
                tags::CONCEPT_NAME_CODE_SEQUENCE,
                &[CodeItem::new("18748-4", "LN", "Diagnostic imaging report")],
            )
            .build();
        let position = tree.push_series(series_record(&record));

        resolve_instance(&mut tree, position, &record).unwrap();
        assert_eq!(
            tree.series(position).instance[0].title.as_deref(),
            Some("Diagnostic imaging report")
        );
    }

    #[test]
    fn test_missing_title_does_not_block_instance() {
        let mut tree = empty_tree();
        let record = base_record("1.1", "1.1.2", "1.1.2.1")
            .text(tags::MODALITY, "SR")
            .build();
        let position = tree.push_series(series_record(&record));

        assert_eq!(resolve_instance(&mut tree, position, &record).unwrap(), InstanceOutcome::Added);
        assert!(tree.series(position).instance[0].title.is_none());
    }

    #[test]
    fn test_missing_sop_instance_uid_is_error() {
        let mut tree = empty_tree();
        let record = RecordBuilder::new()
            .text(tags::SERIES_INSTANCE_UID, "1.1.1")
            .text(tags::MODALITY, "CR")
            .build();
        let position = tree.push_series(series_record(&record));

        assert!(resolve_instance(&mut tree, position, &record).is_err());
        assert_eq!(tree.study().number_of_instances, 0);
    }
}
