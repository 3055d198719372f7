//! 术语表与编码辅助
//!
//! 将DICOM原始代码映射为带显示名称的FHIR编码。查找失败时退化为
//! 不带显示名称的编码，从不返回错误。

use crate::models::{CodeableConcept, Coding};

/// DICOM 采集模态术语系统 (DCM)
pub const ACQUISITION_MODALITY_SYSTEM: &str = "http://dicom.nema.org/resources/ontology/DCM";
/// SOP 类编码系统
pub const SOP_CLASS_SYSTEM: &str = "urn:ietf:rfc:3986";
/// SNOMED CT
pub const SNOMED_SYSTEM: &str = "http://snomed.info/sct";
/// LOINC
pub const LOINC_SYSTEM: &str = "http://loinc.org";
/// HL7 v2 标识符类型表 (0203)
pub const IDENTIFIER_TYPE_SYSTEM: &str = "http://terminology.hl7.org/CodeSystem/v2-0203";
/// DICOM UID 标识符系统
pub const DICOM_UID_SYSTEM: &str = "urn:dicom:uid";

/// 编码序列中的一个条目 (CodeValue, CodingSchemeDesignator, CodeMeaning)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeItem {
    pub code_value: Option<String>,
    pub coding_scheme_designator: Option<String>,
    pub code_meaning: Option<String>,
}

impl CodeItem {
    pub fn new(code_value: &str, coding_scheme_designator: &str, code_meaning: &str) -> Self {
        Self {
            code_value: Some(code_value.to_string()),
            coding_scheme_designator: Some(coding_scheme_designator.to_string()),
            code_meaning: Some(code_meaning.to_string()),
        }
    }
}

/// 查询代码在指定术语系统中的显示名称
pub fn display_for(code: &str, system: &str) -> Option<&'static str> {
    match system {
        ACQUISITION_MODALITY_SYSTEM => modality_display(code),
        SOP_CLASS_SYSTEM => sop_class_display(code.strip_prefix("urn:oid:").unwrap_or(code)),
        IDENTIFIER_TYPE_SYSTEM => identifier_type_display(code),
        SNOMED_SYSTEM => snomed_display(code),
        _ => None,
    }
}

/// 构造编码，术语表中存在时补充显示名称
pub fn coding(code: &str, system: &str) -> Coding {
    Coding {
        system: Some(system.to_string()),
        code: Some(code.to_string()),
        display: display_for(code, system).map(str::to_string),
    }
}

/// 由同一术语系统中的多个代码构造可编码概念
pub fn codeable_concept(codes: &[&str], system: &str) -> CodeableConcept {
    CodeableConcept {
        coding: codes.iter().map(|code| coding(code, system)).collect(),
        text: None,
    }
}

/// 将编码序列逐条转换为可编码概念（用于检查程序代码等多值字段）
///
/// 缺少 CodeValue 的条目被忽略。
pub fn coded_concepts_from_sequence(items: &[CodeItem]) -> Vec<CodeableConcept> {
    items
        .iter()
        .filter_map(coding_from_item)
        .map(|coding| CodeableConcept {
            text: coding.display.clone(),
            coding: vec![coding],
        })
        .collect()
}

/// 合并编码的检查原因与自由文本原因
///
/// 两者都不存在时返回 None。
pub fn reason_concept(coded: Option<&[CodeItem]>, text: Option<&str>) -> Option<CodeableConcept> {
    let coding: Vec<Coding> = coded
        .unwrap_or_default()
        .iter()
        .filter_map(coding_from_item)
        .collect();
    let text = text.filter(|t| !t.is_empty()).map(str::to_string);

    if coding.is_empty() && text.is_none() {
        return None;
    }

    Some(CodeableConcept { coding, text })
}

fn coding_from_item(item: &CodeItem) -> Option<Coding> {
    let code = item.code_value.as_deref().filter(|c| !c.is_empty())?;
    Some(Coding {
        system: item
            .coding_scheme_designator
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(system_for_scheme),
        code: Some(code.to_string()),
        display: item.code_meaning.clone().filter(|m| !m.is_empty()),
    })
}

/// DICOM 编码方案标识映射为 FHIR 术语系统 URI
pub fn system_for_scheme(designator: &str) -> String {
    match designator {
        "DCM" => ACQUISITION_MODALITY_SYSTEM.to_string(),
        "SCT" | "SRT" | "SNM3" => SNOMED_SYSTEM.to_string(),
        "LN" => LOINC_SYSTEM.to_string(),
        other => other.to_string(),
    }
}

/// 检查部位 (Body Part Examined) 映射为 SNOMED CT 编码
///
/// 未知部位保留原始值，不带术语系统和显示名称。
pub fn body_site_coding(body_part: &str) -> Coding {
    match body_part_snomed(body_part) {
        Some((code, display)) => Coding {
            system: Some(SNOMED_SYSTEM.to_string()),
            code: Some(code.to_string()),
            display: Some(display.to_string()),
        },
        None => Coding::new(body_part, None),
    }
}

/// 侧别 (Laterality) 映射为 SNOMED CT 编码
pub fn laterality_coding(laterality: &str) -> Coding {
    let mapped = match laterality {
        "R" => Some(("24028007", "Right")),
        "L" => Some(("7771000", "Left")),
        "B" => Some(("51440002", "Right and left")),
        _ => None,
    };

    match mapped {
        Some((code, display)) => Coding {
            system: Some(SNOMED_SYSTEM.to_string()),
            code: Some(code.to_string()),
            display: Some(display.to_string()),
        },
        None => Coding::new(laterality, None),
    }
}

fn body_part_snomed(body_part: &str) -> Option<(&'static str, &'static str)> {
    let mapped = match body_part {
        "ABDOMEN" => ("113345001", "Abdomen"),
        "ABDOMENPELVIS" => ("416550000", "Abdomen and Pelvis"),
        "ANKLE" => ("70258002", "Ankle joint"),
        "ARM" => ("40983000", "Upper arm"),
        "BRAIN" => ("12738006", "Brain"),
        "BREAST" => ("76752008", "Breast"),
        "CHEST" => ("43799004", "Chest"),
        "CHESTABDOMEN" => ("416775004", "Chest and Abdomen"),
        "CSPINE" => ("122494005", "Cervical spine"),
        "ELBOW" => ("16953009", "Elbow joint"),
        "EXTREMITY" => ("66019005", "Extremity"),
        "FOOT" => ("56459004", "Foot"),
        "HAND" => ("85562004", "Hand"),
        "HEAD" => ("69536005", "Head"),
        "HEART" => ("80891009", "Heart"),
        "HIP" => ("24136001", "Hip joint"),
        "KIDNEY" => ("64033007", "Kidney"),
        "KNEE" => ("72696002", "Knee"),
        "LEG" => ("30021000", "Lower leg"),
        "LIVER" => ("10200004", "Liver"),
        "LSPINE" => ("122496007", "Lumbar spine"),
        "NECK" => ("45048000", "Neck"),
        "PELVIS" => ("12921003", "Pelvis"),
        "SHOULDER" => ("16982005", "Shoulder"),
        "SKULL" => ("89546000", "Skull"),
        "SPINE" => ("421060004", "Spine"),
        "TSPINE" => ("122495006", "Thoracic spine"),
        "WRIST" => ("74670003", "Wrist joint"),
        _ => return None,
    };
    Some(mapped)
}

fn snomed_display(code: &str) -> Option<&'static str> {
    match code {
        "24028007" => Some("Right"),
        "7771000" => Some("Left"),
        "51440002" => Some("Right and left"),
        _ => None,
    }
}

fn modality_display(code: &str) -> Option<&'static str> {
    match code {
        "AR" => Some("Autorefraction"),
        "AU" => Some("Audio"),
        "BMD" => Some("Bone Mineral Densitometry"),
        "CR" => Some("Computed Radiography"),
        "CT" => Some("Computed Tomography"),
        "DG" => Some("Diaphanography"),
        "DOC" => Some("Document"),
        "DX" => Some("Digital Radiography"),
        "ECG" => Some("Electrocardiography"),
        "ES" => Some("Endoscopy"),
        "GM" => Some("General Microscopy"),
        "IO" => Some("Intra-oral Radiography"),
        "KO" => Some("Key Object Selection"),
        "MG" => Some("Mammography"),
        "MR" => Some("Magnetic Resonance"),
        "NM" => Some("Nuclear Medicine"),
        "OCT" => Some("Optical Coherence Tomography"),
        "OP" => Some("Ophthalmic Photography"),
        "OT" => Some("Other"),
        "PR" => Some("Presentation State"),
        "PT" => Some("Positron emission tomography"),
        "PX" => Some("Panoramic X-Ray"),
        "RF" => Some("Radio Fluoroscopy"),
        "RTIMAGE" => Some("RT Image"),
        "SC" => Some("Secondary Capture"),
        "SEG" => Some("Segmentation"),
        "SM" => Some("Slide Microscopy"),
        "SR" => Some("SR Document"),
        "US" => Some("Ultrasound"),
        "XA" => Some("X-Ray Angiography"),
        "XC" => Some("External-camera Photography"),
        _ => None,
    }
}

fn sop_class_display(uid: &str) -> Option<&'static str> {
    match uid {
        "1.2.840.10008.5.1.4.1.1.1" => Some("Computed Radiography Image Storage"),
        "1.2.840.10008.5.1.4.1.1.1.1" => Some("Digital X-Ray Image Storage - For Presentation"),
        "1.2.840.10008.5.1.4.1.1.1.1.1" => Some("Digital X-Ray Image Storage - For Processing"),
        "1.2.840.10008.5.1.4.1.1.1.2" => Some("Digital Mammography X-Ray Image Storage - For Presentation"),
        "1.2.840.10008.5.1.4.1.1.2" => Some("CT Image Storage"),
        "1.2.840.10008.5.1.4.1.1.2.1" => Some("Enhanced CT Image Storage"),
        "1.2.840.10008.5.1.4.1.1.4" => Some("MR Image Storage"),
        "1.2.840.10008.5.1.4.1.1.4.1" => Some("Enhanced MR Image Storage"),
        "1.2.840.10008.5.1.4.1.1.6.1" => Some("Ultrasound Image Storage"),
        "1.2.840.10008.5.1.4.1.1.7" => Some("Secondary Capture Image Storage"),
        "1.2.840.10008.5.1.4.1.1.12.1" => Some("X-Ray Angiographic Image Storage"),
        "1.2.840.10008.5.1.4.1.1.12.2" => Some("X-Ray Radiofluoroscopic Image Storage"),
        "1.2.840.10008.5.1.4.1.1.20" => Some("Nuclear Medicine Image Storage"),
        "1.2.840.10008.5.1.4.1.1.88.11" => Some("Basic Text SR Storage"),
        "1.2.840.10008.5.1.4.1.1.88.22" => Some("Enhanced SR Storage"),
        "1.2.840.10008.5.1.4.1.1.88.33" => Some("Comprehensive SR Storage"),
        "1.2.840.10008.5.1.4.1.1.104.1" => Some("Encapsulated PDF Storage"),
        "1.2.840.10008.5.1.4.1.1.128" => Some("Positron Emission Tomography Image Storage"),
        _ => None,
    }
}

fn identifier_type_display(code: &str) -> Option<&'static str> {
    match code {
        "MR" => Some("Medical record number"),
        "ACSN" => Some("Accession ID"),
        _ => None,
    }
}
