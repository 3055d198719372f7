//! dicom2fhir 命令行程序

use anyhow::Context;
use clap::Parser;
use dicom2fhir::process_directory;
use dicom2fhir_core::{ConvertError, ConverterConfig};
use dicom2fhir_output::StudyWriter;
use tracing::{error, info};

/// dicom2fhir 命令行参数
#[derive(Parser, Debug)]
#[command(name = "dicom2fhir")]
#[command(about = "将一个检查的 DICOM 文件转换为 FHIR ImagingStudy")]
struct Args {
    /// DICOM检查目录
    #[arg(short, long)]
    input_path: String,

    /// 输出目录
    #[arg(short, long, default_value = ".")]
    output_path: String,

    /// 不输出实例层级
    #[arg(long)]
    exclude_instances: bool,

    /// 额外输出事务Bundle
    #[arg(short, long)]
    build_bundle: bool,

    /// 遇到无效文件时终止转换
    #[arg(long)]
    strict: bool,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// 命令行参数覆盖配置
    fn apply(&self, config: &mut ConverterConfig) {
        if self.exclude_instances {
            config.output.include_instances = false;
        }
        if self.build_bundle {
            config.output.build_bundle = true;
        }
        if self.strict {
            config.directory_parser.skip_invalid_files = false;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(&args.log_level)
        .init();

    info!("启动 dicom2fhir 转换...");

    let mut config =
        ConverterConfig::load(args.config.as_deref()).context("加载配置失败")?;
    args.apply(&mut config);

    info!("转换配置:");
    info!("  输入目录: {}", args.input_path);
    info!("  输出目录: {}", args.output_path);
    info!("  包含实例: {}", config.output.include_instances);
    info!("  生成Bundle: {}", config.output.build_bundle);
    info!("  跳过无效文件: {}", config.directory_parser.skip_invalid_files);

    let study = match process_directory(&args.input_path, &config) {
        Ok(Some(study)) => study,
        Ok(None) => {
            return Err(ConvertError::EmptyInput).context(format!("目录 {}", args.input_path));
        }
        Err(e) => {
            error!("转换失败: {}", e);
            return Err(e.into());
        }
    };

    let writer = StudyWriter::new(&args.output_path, &config.output);
    let written = writer.write(&study).context("写出转换结果失败")?;
    for path in &written {
        info!("输出文件: {}", path.display());
    }

    Ok(())
}
