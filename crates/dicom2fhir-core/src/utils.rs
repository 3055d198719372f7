//! 通用工具函数

use crate::models::FhirDateTime;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

/// 生成不透明的FHIR资源ID
pub fn generate_resource_id() -> String {
    Uuid::new_v4().to_string()
}

/// 合并DICOM日期 (DA) 与时间 (TM) 为FHIR时间值
///
/// 日期无效时返回 None；时间缺失或无效时仅保留日期。
pub fn started_datetime(date: &str, time: Option<&str>) -> Option<FhirDateTime> {
    let date = parse_dicom_date(date)?;

    match time.and_then(parse_dicom_time) {
        Some(time) => Some(FhirDateTime::DateTime(date.and_time(time))),
        None => Some(FhirDateTime::Date(date)),
    }
}

/// 解析DICOM日期 (YYYYMMDD)
pub fn parse_dicom_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    if date.len() != 8 || !date.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y%m%d").ok()
}

/// 解析DICOM时间 (HH, HHMM, HHMMSS, HHMMSS.FFFFFF)，小数部分被丢弃
pub fn parse_dicom_time(time: &str) -> Option<NaiveTime> {
    let time = time.trim();
    let whole = time.split('.').next().unwrap_or(time);

    if !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let field = |range: std::ops::Range<usize>| whole.get(range).and_then(|s| s.parse::<u32>().ok());
    let (hour, minute, second) = match whole.len() {
        2 => (field(0..2)?, 0, 0),
        4 => (field(0..2)?, field(2..4)?, 0),
        6 => (field(0..2)?, field(2..4)?, field(4..6)?),
        _ => return None,
    };

    // 闰秒按59秒处理
    NaiveTime::from_hms_opt(hour, minute, second.min(59))
}
