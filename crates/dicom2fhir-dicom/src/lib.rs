//! # DICOM访问模块
//!
//! 提供DICOM元数据的读取：属性访问、Part-10文件解析和目录遍历。

pub mod accessor;
pub mod builder;
pub mod parser;
pub mod source;

pub use accessor::MetadataRecord;
pub use builder::{write_part10_file, RecordBuilder};
pub use parser::DicomParser;
pub use source::DicomDirectory;
