//! 测试用记录与检查树

use crate::tree::StudyTree;
use dicom::dictionary_std::tags;
use dicom::object::InMemDicomObject;
use dicom2fhir_core::terminology::{coding, ACQUISITION_MODALITY_SYSTEM};
use dicom2fhir_core::{ImagingStudy, ImagingStudySeries, Reference};
use dicom2fhir_dicom::{MetadataRecord, RecordBuilder};

/// 含全部必需属性的CR记录
pub(crate) fn base_record(study_uid: &str, series_uid: &str, sop_uid: &str) -> RecordBuilder {
    RecordBuilder::new()
        .text(tags::PATIENT_ID, "123456789")
        .text(tags::STUDY_INSTANCE_UID, study_uid)
        .text(tags::SERIES_INSTANCE_UID, series_uid)
        .text(tags::SOP_INSTANCE_UID, sop_uid)
        .text(tags::SOP_CLASS_UID, "1.2.840.10008.5.1.4.1.1.1")
        .text(tags::MODALITY, "CR")
        .text(tags::ACCESSION_NUMBER, "ACC1")
}

pub(crate) fn empty_tree() -> StudyTree {
    StudyTree::new(ImagingStudy {
        id: "test".to_string(),
        identifier: Vec::new(),
        status: "available".to_string(),
        modality: Vec::new(),
        subject: Reference::default(),
        started: None,
        number_of_series: 0,
        number_of_instances: 0,
        procedure_code: Vec::new(),
        reason_code: Vec::new(),
        description: None,
        series: Vec::new(),
    })
}

/// 只含UID与模态的序列
pub(crate) fn series_record(record: &InMemDicomObject) -> ImagingStudySeries {
    let modality = record.text(tags::MODALITY).unwrap_or_else(|| "CR".to_string());
    ImagingStudySeries {
        uid: record.text(tags::SERIES_INSTANCE_UID).unwrap_or_default(),
        number: None,
        modality: coding(&modality, ACQUISITION_MODALITY_SYSTEM),
        description: None,
        number_of_instances: 0,
        body_site: None,
        laterality: None,
        started: None,
        instance: Vec::new(),
    }
}
