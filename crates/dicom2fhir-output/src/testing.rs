//! 测试用检查

use dicom2fhir_core::terminology::{
    codeable_concept, coding, ACQUISITION_MODALITY_SYSTEM, DICOM_UID_SYSTEM,
    IDENTIFIER_TYPE_SYSTEM, SOP_CLASS_SYSTEM,
};
use dicom2fhir_core::{Identifier, ImagingStudy, ImagingStudyInstance, ImagingStudySeries, Reference};

/// 一个序列、两个实例的检查，按参数决定带哪些标识符
pub(crate) fn sample_study(accession: Option<&str>, study_uid: Option<&str>) -> ImagingStudy {
    let mut identifier = Vec::new();
    if let Some(accession) = accession {
        identifier.push(Identifier {
            use_: Some("usual".to_string()),
            type_: Some(codeable_concept(&["ACSN"], IDENTIFIER_TYPE_SYSTEM)),
            system: None,
            value: Some(accession.to_string()),
        });
    }
    if let Some(uid) = study_uid {
        identifier.push(Identifier {
            system: Some(DICOM_UID_SYSTEM.to_string()),
            value: Some(format!("urn:oid:{}", uid)),
            ..Default::default()
        });
    }

    let instance = |uid: &str| ImagingStudyInstance {
        uid: uid.to_string(),
        sop_class: coding("urn:oid:1.2.840.10008.5.1.4.1.1.1", SOP_CLASS_SYSTEM),
        number: None,
        title: None,
    };

    ImagingStudy {
        id: "4f9e2c1a-0000-4000-8000-000000000001".to_string(),
        identifier,
        status: "available".to_string(),
        modality: vec![coding("CR", ACQUISITION_MODALITY_SYSTEM)],
        subject: Reference {
            reference: Some("Patient/abc".to_string()),
            identifier: None,
        },
        started: None,
        number_of_series: 1,
        number_of_instances: 2,
        procedure_code: Vec::new(),
        reason_code: Vec::new(),
        description: None,
        series: vec![ImagingStudySeries {
            uid: "1.2.3.1".to_string(),
            number: Some(1),
            modality: coding("CR", ACQUISITION_MODALITY_SYSTEM),
            description: None,
            number_of_instances: 2,
            body_site: None,
            laterality: None,
            started: None,
            instance: vec![instance("1.2.3.1.1"), instance("1.2.3.1.2")],
        }],
    }
}
