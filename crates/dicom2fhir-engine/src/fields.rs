//! 可选字段提取
//!
//! 每个可选字段独立提取，属性缺失或无法转换时该字段为 None，不影响其他字段。

use dicom::core::Tag;
use dicom2fhir_core::utils::started_datetime;
use dicom2fhir_core::FhirDateTime;
use dicom2fhir_dicom::MetadataRecord;

/// 描述类字段：空字符串视为未设置
pub(crate) fn description<R: MetadataRecord>(record: &R, tag: Tag) -> Option<String> {
    record.non_empty_text(tag)
}

/// 序列号/实例号，负数或无法解析时为 None
pub(crate) fn number<R: MetadataRecord>(record: &R, tag: Tag) -> Option<u32> {
    record.integer(tag).and_then(|n| u32::try_from(n).ok())
}

/// 由日期与时间属性合成开始时间，时间缺失时仅有日期
pub(crate) fn started<R: MetadataRecord>(record: &R, date_tag: Tag, time_tag: Tag) -> Option<FhirDateTime> {
    let date = record.text(date_tag)?;
    let time = record.text(time_tag);
    started_datetime(&date, time.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom::dictionary_std::tags;
    use dicom2fhir_dicom::RecordBuilder;

    #[test]
    fn test_fields_are_independent() {
        let record = RecordBuilder::new()
            .text(tags::SERIES_DESCRIPTION, "")
            .text(tags::SERIES_DATE, "20200101")
            .text(tags::SERIES_NUMBER, "abc")
            .build();

        assert!(description(&record, tags::SERIES_DESCRIPTION).is_none());
        assert!(number(&record, tags::SERIES_NUMBER).is_none());
        assert_eq!(
            started(&record, tags::SERIES_DATE, tags::SERIES_TIME).unwrap().to_string(),
            "2020-01-01"
        );
    }

    #[test]
    fn test_negative_number_is_absent() {
        let record = RecordBuilder::new().integer(tags::INSTANCE_NUMBER, -1).build();
        assert!(number(&record, tags::INSTANCE_NUMBER).is_none());
    }
}
