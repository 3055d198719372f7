//! 检查聚合
//!
//! 按输入顺序逐条合并记录，构建一个去重、计数一致的 ImagingStudy。
//!
//! 聚合器有两个状态：
//! - `Empty`：尚未处理任何记录
//! - `Building`：检查已创建，记录下第一条记录的检查实例UID
//!
//! 出现致命错误时 [`StudyAggregator::fold`] 返回 Err，聚合器随之被丢弃，
//! 不会留下部分构建的结果。

use crate::identifiers::SubjectPseudonymizer;
use crate::instance::InstanceOutcome;
use crate::series::resolve_series;
use crate::study::build_study;
use crate::tree::StudyTree;
use dicom::dictionary_std::tags;
use dicom2fhir_core::{Coding, ConvertError, ConverterConfig, ImagingStudy, Result};
use dicom2fhir_dicom::MetadataRecord;
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

/// 聚合状态
#[derive(Debug)]
enum AggregationState {
    Empty,
    Building {
        study_instance_uid: String,
        tree: StudyTree,
    },
}

/// 一次转换的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 已合并的记录数（含重复）
    pub records: usize,
    /// 因实例UID重复被丢弃的记录数
    pub duplicates: usize,
    /// 被跳过的无效数据源
    pub skipped: usize,
}

/// 检查聚合器
#[derive(Debug)]
pub struct StudyAggregator {
    state: AggregationState,
    pseudonymizer: SubjectPseudonymizer,
    skip_invalid_files: bool,
    summary: RunSummary,
}

impl Default for StudyAggregator {
    fn default() -> Self {
        Self::new(&ConverterConfig::default())
    }
}

impl StudyAggregator {
    /// 按配置创建聚合器
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            state: AggregationState::Empty,
            pseudonymizer: SubjectPseudonymizer::from_config(&config.subject),
            skip_invalid_files: config.directory_parser.skip_invalid_files,
            summary: RunSummary::default(),
        }
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// 当前的检查（尚未整理模态列表）
    pub fn study(&self) -> Option<&ImagingStudy> {
        match &self.state {
            AggregationState::Empty => None,
            AggregationState::Building { tree, .. } => Some(tree.study()),
        }
    }

    /// 合并一条记录
    ///
    /// 检查实例UID与第一条记录不同时返回 [`ConvertError::StudyMismatch`]。
    pub fn fold<R: MetadataRecord>(mut self, record: &R) -> Result<Self> {
        let study_instance_uid =
            record.required_text(tags::STUDY_INSTANCE_UID, "StudyInstanceUID")?;

        let outcome = match self.state {
            AggregationState::Empty => {
                let (tree, outcome) = build_study(record, &self.pseudonymizer)?;
                self.state = AggregationState::Building {
                    study_instance_uid,
                    tree,
                };
                outcome
            }
            AggregationState::Building {
                study_instance_uid: expected,
                mut tree,
            } => {
                if expected != study_instance_uid {
                    return Err(ConvertError::StudyMismatch {
                        expected,
                        found: study_instance_uid,
                    });
                }
                let outcome = resolve_series(&mut tree, record)?;
                self.state = AggregationState::Building {
                    study_instance_uid: expected,
                    tree,
                };
                outcome
            }
        };

        self.summary.records += 1;
        if outcome == InstanceOutcome::Duplicate {
            self.summary.duplicates += 1;
        }
        Ok(self)
    }

    /// 合并一个数据源条目
    ///
    /// 无效数据源（非DICOM文件、解析失败）在 skip_invalid_files 开启时被跳过，
    /// 否则与其他错误一样终止转换。
    pub fn fold_source<R: MetadataRecord>(mut self, item: Result<R>) -> Result<Self> {
        match item {
            Ok(record) => {
                debug!(
                    "处理DICOM实例: {}",
                    record.text(tags::SOP_INSTANCE_UID).unwrap_or_default()
                );
                self.fold(&record).map_err(|e| {
                    error!(
                        "处理DICOM实例 {} 时出错: {}",
                        record
                            .text(tags::SOP_INSTANCE_UID)
                            .unwrap_or_else(|| "unknown".to_string()),
                        e
                    );
                    e
                })
            }
            Err(e) if e.is_invalid_source() && self.skip_invalid_files => {
                warn!("跳过无效的DICOM文件: {}", e);
                self.summary.skipped += 1;
                Ok(self)
            }
            Err(e) => {
                error!("读取DICOM数据源失败: {}", e);
                Err(e)
            }
        }
    }

    /// 结束聚合并整理模态列表
    ///
    /// 没有处理任何记录时返回 None。
    pub fn finish(self) -> Option<ImagingStudy> {
        let summary = self.summary;
        match self.state {
            AggregationState::Empty => {
                warn!("没有处理任何DICOM实例 (跳过 {} 个无效文件)", summary.skipped);
                None
            }
            AggregationState::Building { tree, .. } => {
                let mut study = tree.into_study();
                finalize_modalities(&mut study);
                info!(
                    "检查聚合完成: {} 个序列, {} 个实例, 处理 {} 条记录, 重复 {} 条, 跳过 {} 个文件",
                    study.number_of_series,
                    study.number_of_instances,
                    summary.records,
                    summary.duplicates,
                    summary.skipped
                );
                Some(study)
            }
        }
    }
}

/// 由各序列的模态生成检查的模态列表
///
/// 每个模态代码只保留第一次出现的编码，顺序为首次出现的顺序。
pub fn finalize_modalities(study: &mut ImagingStudy) {
    let mut seen = HashSet::new();
    let modalities: Vec<Coding> = study
        .series
        .iter()
        .filter(|series| seen.insert(series.modality.code.clone()))
        .map(|series| series.modality.clone())
        .collect();
    study.modality = modalities;
}

/// 聚合一组记录为一个检查
///
/// 输入为空时返回 `Ok(None)`；任何致命错误都会丢弃已构建的部分。
pub fn aggregate<I, R>(records: I, config: &ConverterConfig) -> Result<Option<ImagingStudy>>
where
    I: IntoIterator<Item = Result<R>>,
    R: MetadataRecord,
{
    let mut aggregator = StudyAggregator::new(config);
    for item in records {
        aggregator = aggregator.fold_source(item)?;
    }
    Ok(aggregator.finish())
}
