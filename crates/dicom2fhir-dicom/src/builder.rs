//! 内存DICOM记录构造器
//!
//! 用于预解码记录模式的调用方和测试，按标签写入属性，VR由标签推断。

use dicom::core::value::DataSetSequence;
use dicom::core::{DataElement, Length, PrimitiveValue, Tag, VR};
use dicom::dictionary_std::{tags, uids};
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};
use dicom2fhir_core::terminology::CodeItem;
use dicom2fhir_core::{ConvertError, Result};
use std::path::Path;

use crate::accessor::MetadataRecord;

/// 内存DICOM记录构造器
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    obj: InMemDicomObject,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordBuilder {
    /// 创建空记录
    pub fn new() -> Self {
        Self {
            obj: InMemDicomObject::new_empty(),
        }
    }

    /// 写入字符串属性
    pub fn text(mut self, tag: Tag, value: &str) -> Self {
        self.obj
            .put(DataElement::new(tag, vr_for(tag), PrimitiveValue::from(value)));
        self
    }

    /// 写入多值字符串属性
    pub fn texts(mut self, tag: Tag, values: &[&str]) -> Self {
        let values = values.iter().map(|value| value.to_string()).collect();
        self.obj
            .put(DataElement::new(tag, vr_for(tag), PrimitiveValue::Strs(values)));
        self
    }

    /// 写入整数属性 (IS)
    pub fn integer(self, tag: Tag, value: i64) -> Self {
        self.text(tag, &value.to_string())
    }

    /// 写入编码序列
    pub fn code_sequence(mut self, tag: Tag, items: &[CodeItem]) -> Self {
        let items: Vec<InMemDicomObject> = items.iter().map(code_item_object).collect();
        self.obj.put(DataElement::new(
            tag,
            VR::SQ,
            DataSetSequence::new(items, Length::UNDEFINED),
        ));
        self
    }

    /// 完成构造
    pub fn build(self) -> InMemDicomObject {
        self.obj
    }
}

/// 将记录写为 Part-10 文件（显式VR小端传输语法）
///
/// 文件元信息中的SOP类/实例UID取自记录本身。
pub fn write_part10_file<P: AsRef<Path>>(record: &InMemDicomObject, path: P) -> Result<()> {
    let path = path.as_ref();
    let sop_class_uid = record
        .non_empty_text(tags::SOP_CLASS_UID)
        .unwrap_or_else(|| uids::SECONDARY_CAPTURE_IMAGE_STORAGE.to_string());
    let sop_instance_uid = record
        .non_empty_text(tags::SOP_INSTANCE_UID)
        .unwrap_or_else(|| "2.25.0".to_string());

    let meta = FileMetaTableBuilder::new()
        .media_storage_sop_class_uid(sop_class_uid)
        .media_storage_sop_instance_uid(sop_instance_uid)
        .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN);

    let file_obj = record.clone().with_meta(meta).map_err(|e| ConvertError::DicomParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    file_obj.write_to_file(path).map_err(|e| ConvertError::DicomParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn code_item_object(item: &CodeItem) -> InMemDicomObject {
    let mut obj = InMemDicomObject::new_empty();
    let fields = [
        (tags::CODE_VALUE, &item.code_value),
        (tags::CODING_SCHEME_DESIGNATOR, &item.coding_scheme_designator),
        (tags::CODE_MEANING, &item.code_meaning),
    ];

    for (tag, value) in fields {
        if let Some(value) = value {
            obj.put(DataElement::new(tag, vr_for(tag), PrimitiveValue::from(value.as_str())));
        }
    }
    obj
}

/// 按标签推断VR
fn vr_for(tag: Tag) -> VR {
    match tag {
        tags::STUDY_INSTANCE_UID
        | tags::SERIES_INSTANCE_UID
        | tags::SOP_INSTANCE_UID
        | tags::SOP_CLASS_UID => VR::UI,
        tags::STUDY_DATE | tags::SERIES_DATE => VR::DA,
        tags::STUDY_TIME | tags::SERIES_TIME => VR::TM,
        tags::SERIES_NUMBER | tags::INSTANCE_NUMBER => VR::IS,
        tags::MODALITY
        | tags::BODY_PART_EXAMINED
        | tags::LATERALITY
        | tags::IMAGE_TYPE => VR::CS,
        tags::ACCESSION_NUMBER | tags::CODE_VALUE | tags::CODING_SCHEME_DESIGNATOR => VR::SH,
        tags::PATIENT_NAME => VR::PN,
        _ => VR::LO,
    }
}
