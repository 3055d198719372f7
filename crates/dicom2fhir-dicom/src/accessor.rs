//! DICOM属性访问
//!
//! 转换引擎只通过 [`MetadataRecord`] 读取属性，不关心底层的解码方式。
//! 属性不存在 (None) 与属性存在但为空 (`Some("")`) 是两种不同的结果。

use dicom::core::Tag;
use dicom::dictionary_std::tags;
use dicom::object::InMemDicomObject;
use dicom2fhir_core::terminology::CodeItem;
use dicom2fhir_core::{ConvertError, Result};
use tracing::debug;

/// 一条DICOM元数据记录
pub trait MetadataRecord {
    /// 读取字符串属性（多值时以反斜杠连接）
    fn text(&self, tag: Tag) -> Option<String>;

    /// 读取多值字符串属性
    fn texts(&self, tag: Tag) -> Option<Vec<String>>;

    /// 读取编码序列（如 Procedure Code Sequence）
    fn code_items(&self, tag: Tag) -> Option<Vec<CodeItem>>;

    /// 读取整数属性 (IS/US/SS等)
    fn integer(&self, tag: Tag) -> Option<i64> {
        self.text(tag).and_then(|value| value.trim().parse().ok())
    }

    /// 读取非空字符串属性，空字符串视为未设置
    fn non_empty_text(&self, tag: Tag) -> Option<String> {
        self.text(tag).filter(|value| !value.is_empty())
    }

    /// 读取必需的字符串属性
    fn required_text(&self, tag: Tag, name: &'static str) -> Result<String> {
        self.non_empty_text(tag)
            .ok_or(ConvertError::MissingAttribute(name))
    }
}

/// 去掉DICOM值的填充字符
fn clean(value: &str) -> String {
    value
        .trim_end_matches(|c: char| c == '\0' || c == ' ')
        .trim_start_matches(' ')
        .to_string()
}

impl MetadataRecord for InMemDicomObject {
    fn text(&self, tag: Tag) -> Option<String> {
        let element = match self.element(tag) {
            Ok(element) => element,
            Err(_) => {
                debug!("未找到标签: {:?}", tag);
                return None;
            }
        };

        match element.to_str() {
            Ok(value) => Some(clean(&value)),
            Err(_) => {
                debug!("标签 {:?} 不是字符串类型", tag);
                None
            }
        }
    }

    fn texts(&self, tag: Tag) -> Option<Vec<String>> {
        let element = self.element(tag).ok()?;
        let values = element.to_multi_str().ok()?;
        Some(values.iter().map(|value| clean(value)).collect())
    }

    fn code_items(&self, tag: Tag) -> Option<Vec<CodeItem>> {
        let element = self.element(tag).ok()?;
        let items = element.items()?;

        Some(
            items
                .iter()
                .map(|item| CodeItem {
                    code_value: item.text(tags::CODE_VALUE),
                    coding_scheme_designator: item.text(tags::CODING_SCHEME_DESIGNATOR),
                    code_meaning: item.text(tags::CODE_MEANING),
                })
                .collect(),
        )
    }
}
