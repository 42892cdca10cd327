//! GrapheneTrace命令行主程序
//!
//! 扫描压力数据目录并以JSON输出患者分组汇总，
//! 或输出单个文件的完整压力网格。

use clap::Parser;
use graphene_catalog::PatientFileCatalog;
use graphene_core::config::GrapheneConfig;
use graphene_core::{GrapheneError, Result};
use tracing::{error, info};

/// GrapheneTrace命令行参数
#[derive(Parser, Debug)]
#[command(name = "graphene-cli")]
#[command(about = "GrapheneTrace 压力传感数据汇总工具")]
struct Args {
    /// 压力数据根目录（覆盖配置文件取值）
    #[arg(short, long)]
    data_root: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// 患者ID（与--file一起输出完整网格）
    #[arg(short, long)]
    patient: Option<String>,

    /// 数据文件名
    #[arg(short, long)]
    file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(args.log_level.as_str())
        .init();

    let mut config = match &args.config {
        Some(path) => GrapheneConfig::load(path)?,
        None => {
            let config = GrapheneConfig::default();
            config.validate()?;
            config
        }
    };
    if let Some(data_root) = args.data_root {
        config.data_root = data_root;
    }

    info!("数据根目录: {}", config.data_root);

    let catalog = PatientFileCatalog::new(&config.analysis);

    match (&args.patient, &args.file) {
        (Some(patient_id), Some(file_name)) => {
            let grid = catalog
                .get_full_grid(&config.data_root, patient_id, file_name)
                .await?;
            println!("{}", serde_json::to_string_pretty(&grid)?);
        }
        (None, None) => {
            let groups = catalog.list_patient_summaries(&config.data_root).await?;
            info!("共扫描到 {} 个患者分组", groups.len());
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
        _ => {
            error!("--patient 与 --file 必须同时提供");
            return Err(GrapheneError::Validation(
                "--patient 与 --file 必须同时提供".to_string(),
            ));
        }
    }

    Ok(())
}
