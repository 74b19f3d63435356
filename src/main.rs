// ==========================================
// SLA Hub 报表系统 - 命令行入口
// ==========================================
// 子命令: process / artifacts list|url|delete
// ==========================================

use anyhow::Context;
use clap::{Parser, Subcommand};
use sla_hub_processor::app::{output_artifact_name, ProcessRequest, ProcessingService};
use sla_hub_processor::artifact::{ArtifactSink, LocalReleaseStore};
use sla_hub_processor::config::PipelineConfig;
use sla_hub_processor::logging;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "sla-hub-processor")]
#[command(about = "Enrich an SLA main table with hub codes and build the HUB/Summary report")]
#[command(version)]
struct Cli {
    /// Pipeline config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a main table against a master table
    Process {
        /// SLA main table (.xlsx / .xls / .csv)
        #[arg(long)]
        main: PathBuf,
        /// Hub master table
        #[arg(long)]
        master: PathBuf,
        /// Output workbook (default: Processed_<main>.xlsx next to the main table)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Publish the result to the artifact store, replacing any same-named artifact
        #[arg(long)]
        publish: bool,
    },
    /// Manage published artifacts
    Artifacts {
        #[command(subcommand)]
        action: ArtifactAction,
    },
}

#[derive(Subcommand)]
enum ArtifactAction {
    /// List published artifacts
    List,
    /// Print the download URL of an artifact
    Url { name: String },
    /// Delete an artifact
    Delete { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    let config = PipelineConfig::load(cli.config.as_deref()).context("加载配置失败")?;
    let store_dir = config.resolve_artifact_store_dir();
    info!(
        version = sla_hub_processor::VERSION,
        artifact_store = %store_dir.display(),
        "{}",
        sla_hub_processor::APP_NAME
    );
    let store = Arc::new(LocalReleaseStore::new(&store_dir));

    match cli.command {
        Commands::Process {
            main,
            master,
            output,
            publish,
        } => {
            // 命令行缺省: 写到主表同目录
            let output = output.unwrap_or_else(|| {
                main.parent()
                    .unwrap_or_else(|| Path::new("."))
                    .join(output_artifact_name(&main))
            });
            let service = ProcessingService::new(config).with_sink(store);
            let outcome = service
                .process(ProcessRequest {
                    main_file: Some(main),
                    master_file: Some(master),
                    output_path: Some(output),
                    publish,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::Artifacts { action } => match action {
            ArtifactAction::List => {
                for artifact in store.list_artifacts().await? {
                    println!("{}\t{}", artifact.name, artifact.size_bytes);
                }
            }
            ArtifactAction::Url { name } => match store.artifact_url(&name).await? {
                Some(url) => println!("{}", url),
                None => anyhow::bail!("制品不存在: {}", name),
            },
            ArtifactAction::Delete { name } => {
                store.delete_artifact(&name).await?;
                println!("已删除: {}", name);
            }
        },
    }

    Ok(())
}
