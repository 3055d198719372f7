//! 序列解析
//!
//! 按序列实例UID将记录归入序列。序列级字段只取自该UID的第一条记录，
//! 后续记录只参与实例解析。

use crate::fields;
use crate::instance::{resolve_instance, InstanceOutcome};
use crate::tree::StudyTree;
use dicom::dictionary_std::tags;
use dicom2fhir_core::terminology::{
    body_site_coding, coding, laterality_coding, ACQUISITION_MODALITY_SYSTEM,
};
use dicom2fhir_core::{ImagingStudySeries, Result};
use dicom2fhir_dicom::MetadataRecord;
use tracing::debug;

/// 将记录归入所属序列，必要时创建新序列
pub(crate) fn resolve_series<R: MetadataRecord>(
    tree: &mut StudyTree,
    record: &R,
) -> Result<InstanceOutcome> {
    let uid = record.required_text(tags::SERIES_INSTANCE_UID, "SeriesInstanceUID")?;

    if let Some(position) = tree.series_position(&uid) {
        return resolve_instance(tree, position, record);
    }

    let series = build_series(uid, record)?;
    debug!("创建序列: {} (模态 {:?})", series.uid, series.modality.code());

    let position = tree.push_series(series);
    resolve_instance(tree, position, record)
}

fn build_series<R: MetadataRecord>(uid: String, record: &R) -> Result<ImagingStudySeries> {
    let modality = record.required_text(tags::MODALITY, "Modality")?;

    Ok(ImagingStudySeries {
        uid,
        number: fields::number(record, tags::SERIES_NUMBER),
        modality: coding(&modality, ACQUISITION_MODALITY_SYSTEM),
        description: fields::description(record, tags::SERIES_DESCRIPTION),
        number_of_instances: 0,
        body_site: record
            .non_empty_text(tags::BODY_PART_EXAMINED)
            .map(|body_part| body_site_coding(&body_part)),
        laterality: record
            .non_empty_text(tags::LATERALITY)
            .map(|laterality| laterality_coding(&laterality)),
        started: fields::started(record, tags::SERIES_DATE, tags::SERIES_TIME),
        instance: Vec::new(),
    })
}
