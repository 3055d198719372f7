//! FHIR 资源数据模型
//!
//! 只包含 ImagingStudy 及其依赖的数据类型。序列化遵循 FHIR JSON 约定：
//! 字段采用 camelCase，缺失字段与空数组不输出。

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 编码 (code, system, display)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Coding {
    /// 创建不带显示名称的编码
    pub fn new(code: impl Into<String>, system: Option<&str>) -> Self {
        Self {
            system: system.map(str::to_string),
            code: Some(code.into()),
            display: None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

/// 可编码概念
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// 标识符
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// 资源引用
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,
}

/// FHIR date / dateTime
///
/// DICOM 中只有日期没有时间的情况很常见，此时输出 `YYYY-MM-DD`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FhirDateTime {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl fmt::Display for FhirDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FhirDateTime::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            FhirDateTime::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

impl std::str::FromStr for FhirDateTime {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('T') {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").map(FhirDateTime::DateTime)
        } else {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map(FhirDateTime::Date)
        }
    }
}

impl Serialize for FhirDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FhirDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// 影像检查 (ImagingStudy)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType", rename_all = "camelCase")]
pub struct ImagingStudy {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modality: Vec<Coding>,
    pub subject: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<FhirDateTime>,
    pub number_of_series: u32,
    pub number_of_instances: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub procedure_code: Vec<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reason_code: Vec<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub series: Vec<ImagingStudySeries>,
}

impl ImagingStudy {
    /// 检查实例UID（去掉 `urn:oid:` 前缀）
    pub fn study_instance_uid(&self) -> Option<&str> {
        self.identifier
            .iter()
            .find(|id| id.system.as_deref() == Some(crate::terminology::DICOM_UID_SYSTEM))
            .and_then(|id| id.value.as_deref())
            .map(|value| value.strip_prefix("urn:oid:").unwrap_or(value))
    }

    /// 检查号（Accession Number）
    pub fn accession_number(&self) -> Option<&str> {
        self.identifier
            .iter()
            .find(|id| {
                id.type_
                    .as_ref()
                    .map(|t| t.coding.iter().any(|c| c.code() == Some("ACSN")))
                    .unwrap_or(false)
            })
            .and_then(|id| id.value.as_deref())
    }
}

/// 影像序列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagingStudySeries {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    pub modality: Coding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub number_of_instances: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_site: Option<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub laterality: Option<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<FhirDateTime>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instance: Vec<ImagingStudyInstance>,
}

/// 影像实例
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagingStudyInstance {
    pub uid: String,
    pub sop_class: Coding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
