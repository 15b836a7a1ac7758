// ==========================================
// 生产批次导入 - 命令行入口
// ==========================================
// 子命令:
//   inspect <file>   解析并匹配，打印批次草稿
//   search  <query>  在库存目录中模糊检索
//   upload  <file>   解析、匹配并顺序上传可上传批次
// ==========================================

use anyhow::{Context, Result};
use bed_import::config::{ConfigManager, ImportConfigReader};
use bed_import::inventory::{InventorySnapshot, InventorySource, StaticInventorySource};
use bed_import::matcher::FuzzyIndex;
use bed_import::{logging, ImportApi, ReviewSession, UploadStatus};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "bed-import", version, about = "生产批次表格导入工具")]
struct Cli {
    /// 配置文件路径（默认: <用户配置目录>/bed-import/config.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 使用本地 JSON 文件作为库存数据（不请求库存接口）
    #[arg(long, global = true)]
    inventory_file: Option<PathBuf>,

    /// 输出 JSON 格式日志
    #[arg(long, global = true)]
    json_log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 解析表格并打印批次草稿
    Inspect { file: PathBuf },
    /// 在库存目录中检索物料
    Search {
        query: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// 解析表格并上传所有可上传批次
    Upload { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json_log {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("生产批次导入 v{}", bed_import::VERSION);

    let manager = ConfigManager::load(cli.config.as_deref()).context("加载配置失败")?;
    let config: Arc<dyn ImportConfigReader> = Arc::new(manager);
    let api = ImportApi::new(config.clone());
    let source = inventory_source(&api, cli.inventory_file.as_deref())?;

    match cli.command {
        Command::Inspect { file } => {
            let session = api.import_file(&file, source.as_ref()).await?;
            print_session(&session);
        }
        Command::Search { query, limit } => {
            let snapshot = Arc::new(InventorySnapshot::load(source.as_ref()).await);
            let index = FuzzyIndex::new(snapshot);
            let limit = limit.unwrap_or_else(|| config.get_search_limit());
            for candidate in index.search(&query, limit) {
                let item = &candidate.item;
                println!(
                    "{:>6}  {}  [{}]",
                    candidate.score,
                    item.name,
                    item.code.as_deref().unwrap_or(&item.id)
                );
            }
        }
        Command::Upload { file } => {
            let mut session = api.import_file(&file, source.as_ref()).await?;
            print_session(&session);

            let production = api.production_api()?;
            let uploader = api.uploader(production);
            let mut run = uploader.start(&mut session);
            while let Some(outcome) = run.next().await {
                match outcome.status {
                    UploadStatus::Success => println!("  ✓ {}", outcome.batch_name),
                    _ => println!(
                        "  ✗ {}: {}",
                        outcome.batch_name,
                        outcome.error_message.as_deref().unwrap_or("")
                    ),
                }
            }
            let report = run.finish();
            println!(
                "上传完成: 尝试 {}，成功 {}，失败 {}",
                report.attempted, report.succeeded, report.failed
            );
            if report.remaining > 0 {
                println!("另有 {} 个批次超出本轮上限，请再次执行上传", report.remaining);
            }
        }
    }

    Ok(())
}

fn inventory_source(
    api: &ImportApi,
    inventory_file: Option<&Path>,
) -> Result<Box<dyn InventorySource>> {
    match inventory_file {
        Some(path) => Ok(Box::new(
            StaticInventorySource::from_file(path)
                .with_context(|| format!("读取库存文件失败: {}", path.display()))?,
        )),
        None => Ok(Box::new(api.inventory_source()?)),
    }
}

fn print_session(session: &ReviewSession) {
    if session.snapshot().is_degraded() {
        println!("警告: 库存读取失败，所有物料均未匹配");
    }
    for batch in session.batches() {
        let flag = if batch.is_valid { "有效" } else { "无效" };
        println!("{} ({}, {} 行)", batch.name, flag, batch.materials.len());
        for line in &batch.materials {
            let target = line.matched_catalog_name.as_deref().unwrap_or("-");
            println!("    {} × {} → {}", line.raw_name, line.quantity, target);
        }
        for error in &batch.validation_errors {
            println!("    ! {}", error);
        }
    }
    let summary = session.summary();
    println!(
        "共 {} 个批次，有效 {}，可上传 {}",
        summary.total, summary.valid, summary.eligible
    );
}
