//! DICOM目录数据源
//!
//! 递归遍历目录，按文件名顺序逐个产出解析后的记录。无效文件以错误的形式
//! 产出，是否跳过由调用方的 skip_invalid_files 策略决定。

use crate::parser::DicomParser;
use dicom::object::InMemDicomObject;
use dicom2fhir_core::{ConvertError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// DICOM目录数据源
#[derive(Debug, Clone)]
pub struct DicomDirectory {
    root: PathBuf,
}

impl DicomDirectory {
    /// 打开目录，目录不存在时返回错误
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ConvertError::DirectoryNotFound(root.to_path_buf()));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 列出目录下的所有文件（递归，按文件名排序）
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                ConvertError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        info!("目录 {:?} 中共发现 {} 个文件", self.root, files.len());
        Ok(files)
    }

    /// 按顺序解析目录中的文件
    ///
    /// 非DICOM文件产出 [`ConvertError::InvalidDicomFile`]，解析失败产出
    /// [`ConvertError::DicomParse`]。
    pub fn records(&self) -> Result<impl Iterator<Item = Result<InMemDicomObject>>> {
        let files = self.files()?;
        Ok(files.into_iter().map(|path| {
            if !DicomParser::is_dicom_file(&path) {
                debug!("不是DICOM文件: {:?}", path);
                return Err(ConvertError::InvalidDicomFile(path));
            }
            DicomParser::read_file(&path)
        }))
    }
}
