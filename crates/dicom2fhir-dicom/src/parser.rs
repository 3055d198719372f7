//! DICOM文件解析器
//!
//! 只读取元数据：解析在像素数据之前停止。

use dicom::dictionary_std::tags;
use dicom::object::{InMemDicomObject, OpenFileOptions};
use dicom2fhir_core::{ConvertError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, error};

/// DICOM Part-10 前导区长度
const PREAMBLE_LENGTH: usize = 128;
/// 前导区之后的魔数
const DICM_MAGIC: &[u8; 4] = b"DICM";

/// DICOM文件解析器
pub struct DicomParser;

impl DicomParser {
    /// 判断文件是否为DICOM Part-10文件（第128字节起为 `DICM`）
    ///
    /// 文件无法读取或长度不足时返回 false。
    pub fn is_dicom_file<P: AsRef<Path>>(path: P) -> bool {
        let mut header = [0u8; PREAMBLE_LENGTH + 4];
        match File::open(path.as_ref()).and_then(|mut file| file.read_exact(&mut header)) {
            Ok(()) => &header[PREAMBLE_LENGTH..] == DICM_MAGIC,
            Err(_) => false,
        }
    }

    /// 解析DICOM文件元数据
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<InMemDicomObject> {
        let path = path.as_ref();
        debug!("开始解析DICOM文件: {:?}", path);

        let obj = OpenFileOptions::new()
            .read_until(tags::PIXEL_DATA)
            .open_file(path)
            .map_err(|e| {
                error!("DICOM文件解析失败: {:?}, 错误: {}", path, e);
                ConvertError::DicomParse {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            })?;

        Ok(obj.into_inner())
    }
}
