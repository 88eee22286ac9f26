use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use tracing::info;

use quant_launcher::app_init;
use quant_launcher::ecosystem::{EcosystemConfig, EnvSnapshot};

/// quant_okx 调度进程的启动配置工具
///
/// 只负责读配置、校验和展示，进程本身的拉起与守护由外部进程管理器完成。
#[derive(Parser)]
#[command(name = "quant_launcher", version, about = "quant_okx 启动配置的校验与查看工具")]
struct Cli {
    /// 配置文件路径，可多次传入，后传入的覆盖同名应用
    #[arg(short = 'c', long = "config", default_value = "ecosystem.config.json")]
    config: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 校验配置并按当前宿主环境展开占位符
    Check,
    /// 输出展开后的配置(JSON)
    Show {
        /// 只输出指定名称的应用
        #[arg(long)]
        app: Option<String>,
    },
    /// 输出指定应用的启动计划
    Plan {
        #[arg(long)]
        app: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 设置日志
    app_init().await?;

    let cli = Cli::parse();
    let config = EcosystemConfig::load_many(&cli.config)?;
    let snapshot = EnvSnapshot::capture();

    match cli.command {
        Commands::Check => {
            let resolved = config.resolve(&snapshot)?;
            for app in &resolved.apps {
                info!("应用 {} 校验通过", app.name);
                println!(
                    "✅ {}  script={}  argv={:?}  cwd={}",
                    app.name,
                    app.script,
                    app.args.to_argv(),
                    app.cwd
                );
            }
            println!("共 {} 个应用，全部校验通过", resolved.apps.len());
        }
        Commands::Show { app } => {
            let resolved = config.resolve(&snapshot)?;
            let text = match app {
                Some(name) => {
                    let descriptor = resolved
                        .app(&name)
                        .ok_or_else(|| anyhow!("未找到应用: {}", name))?;
                    serde_json::to_string_pretty(descriptor)?
                }
                None => serde_json::to_string_pretty(&resolved)?,
            };
            println!("{text}");
        }
        Commands::Plan { app } => {
            let resolved = config.resolve(&snapshot)?;
            let descriptor = resolved
                .app(&app)
                .ok_or_else(|| anyhow!("未找到应用: {}", app))?;
            println!("{}", serde_json::to_string_pretty(&descriptor.launch_plan())?);
        }
    }

    Ok(())
}
