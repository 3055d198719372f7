//! FHIR 事务 Bundle

use dicom2fhir_core::ImagingStudy;
use serde::{Deserialize, Serialize};

const BUNDLE_TYPE: &str = "transaction";
const REQUEST_METHOD: &str = "PUT";

/// 事务 Bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType", rename = "Bundle")]
pub struct TransactionBundle {
    pub id: String,
    #[serde(rename = "type")]
    pub bundle_type: String,
    pub entry: Vec<BundleEntry>,
}

/// Bundle 条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    pub full_url: String,
    pub resource: ImagingStudy,
    pub request: BundleRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleRequest {
    pub method: String,
    pub url: String,
}

impl TransactionBundle {
    /// 以检查创建只含一个 PUT 条目的事务 Bundle
    ///
    /// Bundle ID 取检查实例UID，缺失时使用随机UUID。
    pub fn from_study(study: ImagingStudy) -> Self {
        let id = study
            .study_instance_uid()
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let url = format!("ImagingStudy/{}", study.id);

        Self {
            id,
            bundle_type: BUNDLE_TYPE.to_string(),
            entry: vec![BundleEntry {
                full_url: url.clone(),
                resource: study,
                request: BundleRequest {
                    method: REQUEST_METHOD.to_string(),
                    url,
                },
            }],
        }
    }
}
