//! 标识符生成
//!
//! 检查号标识符、检查实例UID标识符，以及由患者ID派生的假名化患者引用。

use dicom2fhir_core::config::{
    SubjectConfig, DEFAULT_PATIENT_ID_NAMESPACE, DEFAULT_PATIENT_ID_PREFIX_LENGTH,
};
use dicom2fhir_core::terminology::{codeable_concept, DICOM_UID_SYSTEM, IDENTIFIER_TYPE_SYSTEM};
use dicom2fhir_core::{Identifier, Reference};
use sha2::{Digest, Sha256};

/// 检查号标识符
///
/// 检查号缺失时仍然生成标识符条目，只是没有 value。
pub fn accession_identifier(accession_number: Option<&str>) -> Identifier {
    Identifier {
        use_: Some("usual".to_string()),
        type_: Some(codeable_concept(&["ACSN"], IDENTIFIER_TYPE_SYSTEM)),
        system: None,
        value: accession_number.map(str::to_string),
    }
}

/// 检查实例UID标识符 (`urn:dicom:uid` / `urn:oid:<uid>`)
pub fn study_instance_uid_identifier(study_instance_uid: &str) -> Identifier {
    Identifier {
        use_: None,
        type_: None,
        system: Some(DICOM_UID_SYSTEM.to_string()),
        value: Some(format!("urn:oid:{}", study_instance_uid)),
    }
}

/// 患者假名化
///
/// 患者ID截取前缀后与命名空间拼接为 `<namespace>|<prefix>`，取SHA-256十六进制摘要
/// 作为 `Patient/<digest>` 引用。截取结果为空时照常生成。
#[derive(Debug, Clone)]
pub struct SubjectPseudonymizer {
    namespace: String,
    prefix_length: usize,
}

impl Default for SubjectPseudonymizer {
    fn default() -> Self {
        Self::new(DEFAULT_PATIENT_ID_NAMESPACE, DEFAULT_PATIENT_ID_PREFIX_LENGTH)
    }
}

impl SubjectPseudonymizer {
    pub fn new(namespace: impl Into<String>, prefix_length: usize) -> Self {
        Self {
            namespace: namespace.into(),
            prefix_length,
        }
    }

    pub fn from_config(config: &SubjectConfig) -> Self {
        Self::new(config.namespace.clone(), config.prefix_length)
    }

    /// 截取患者ID前缀（按字符计）
    pub fn truncate(&self, patient_id: &str) -> String {
        patient_id.chars().take(self.prefix_length).collect()
    }

    /// 计算假名（十六进制SHA-256摘要）
    pub fn pseudonym(&self, patient_id: &str) -> String {
        let prefix = self.truncate(patient_id);
        let mut hasher = Sha256::new();
        hasher.update(format!("{}|{}", self.namespace, prefix).as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// 构造假名化的患者引用，附带可追溯的病历号标识符
    pub fn subject_reference(&self, patient_id: &str) -> Reference {
        Reference {
            reference: Some(format!("Patient/{}", self.pseudonym(patient_id))),
            identifier: Some(Identifier {
                use_: None,
                type_: Some(codeable_concept(&["MR"], IDENTIFIER_TYPE_SYSTEM)),
                system: Some(self.namespace.clone()),
                value: Some(self.truncate(patient_id)),
            }),
        }
    }
}
