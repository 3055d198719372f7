//! 检查构建
//!
//! 由一次转换的第一条记录创建 ImagingStudy，并立即用同一条记录填充第一个序列和实例。

use crate::fields;
use crate::identifiers::{accession_identifier, study_instance_uid_identifier, SubjectPseudonymizer};
use crate::instance::InstanceOutcome;
use crate::series::resolve_series;
use crate::tree::StudyTree;
use dicom::dictionary_std::tags;
use dicom2fhir_core::terminology::{coded_concepts_from_sequence, reason_concept};
use dicom2fhir_core::utils::generate_resource_id;
use dicom2fhir_core::{ImagingStudy, Result};
use dicom2fhir_dicom::MetadataRecord;
use tracing::info;

/// ImagingStudy 的固定状态
const STUDY_STATUS: &str = "available";

/// 由第一条记录创建检查树
pub(crate) fn build_study<R: MetadataRecord>(
    record: &R,
    pseudonymizer: &SubjectPseudonymizer,
) -> Result<(StudyTree, InstanceOutcome)> {
    let study_instance_uid = record.required_text(tags::STUDY_INSTANCE_UID, "StudyInstanceUID")?;
    let accession_number = record.non_empty_text(tags::ACCESSION_NUMBER);
    let patient_id = record.text(tags::PATIENT_ID).unwrap_or_default();

    let procedure_code = record
        .code_items(tags::PROCEDURE_CODE_SEQUENCE)
        .map(|items| coded_concepts_from_sequence(&items))
        .unwrap_or_default();

    let reason_items = record.code_items(tags::REASON_FOR_REQUESTED_PROCEDURE_CODE_SEQUENCE);
    let reason_text = record.text(tags::REASON_FOR_THE_REQUESTED_PROCEDURE);
    let reason_code = reason_concept(reason_items.as_deref(), reason_text.as_deref())
        .into_iter()
        .collect();

    let study = ImagingStudy {
        id: generate_resource_id(),
        identifier: vec![
            accession_identifier(accession_number.as_deref()),
            study_instance_uid_identifier(&study_instance_uid),
        ],
        status: STUDY_STATUS.to_string(),
        modality: Vec::new(),
        subject: pseudonymizer.subject_reference(&patient_id),
        started: fields::started(record, tags::STUDY_DATE, tags::STUDY_TIME),
        number_of_series: 0,
        number_of_instances: 0,
        procedure_code,
        reason_code,
        description: fields::description(record, tags::STUDY_DESCRIPTION),
        series: Vec::new(),
    };

    info!("创建检查: {} (检查号 {:?})", study_instance_uid, accession_number);

    let mut tree = StudyTree::new(study);
    let outcome = resolve_series(&mut tree, record)?;
    Ok((tree, outcome))
}
