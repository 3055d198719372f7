//! 检查树
//!
//! ImagingStudy 及其UID索引。序列与实例只通过这里追加，计数器与数组长度
//! 始终保持一致。

use dicom2fhir_core::{ImagingStudy, ImagingStudyInstance, ImagingStudySeries};
use std::collections::{HashMap, HashSet};

/// 带UID索引的检查树
#[derive(Debug, Clone)]
pub struct StudyTree {
    study: ImagingStudy,
    /// 序列UID -> 序列在 `study.series` 中的位置
    series_index: HashMap<String, usize>,
    /// 每个序列已有的实例UID，与 `study.series` 一一对应
    instance_index: Vec<HashSet<String>>,
}

impl StudyTree {
    /// 以一个尚无序列的检查创建
    pub fn new(study: ImagingStudy) -> Self {
        debug_assert!(study.series.is_empty());
        Self {
            study,
            series_index: HashMap::new(),
            instance_index: Vec::new(),
        }
    }

    pub fn study(&self) -> &ImagingStudy {
        &self.study
    }

    pub fn into_study(self) -> ImagingStudy {
        self.study
    }

    /// 查找序列位置
    pub fn series_position(&self, series_uid: &str) -> Option<usize> {
        self.series_index.get(series_uid).copied()
    }

    pub fn series(&self, position: usize) -> &ImagingStudySeries {
        &self.study.series[position]
    }

    /// 追加新序列并更新 numberOfSeries，返回其位置
    pub fn push_series(&mut self, series: ImagingStudySeries) -> usize {
        let position = self.study.series.len();
        self.series_index.insert(series.uid.clone(), position);
        self.instance_index.push(HashSet::new());
        self.study.series.push(series);
        self.study.number_of_series = self.study.series.len() as u32;
        position
    }

    /// 序列中是否已存在该实例UID
    pub fn contains_instance(&self, position: usize, instance_uid: &str) -> bool {
        self.instance_index[position].contains(instance_uid)
    }

    /// 追加实例，序列与检查的实例计数各加一
    pub fn push_instance(&mut self, position: usize, instance: ImagingStudyInstance) {
        self.instance_index[position].insert(instance.uid.clone());
        let series = &mut self.study.series[position];
        series.instance.push(instance);
        series.number_of_instances += 1;
        self.study.number_of_instances += 1;
    }
}
