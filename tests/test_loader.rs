//! 配置加载集成测试

use quant_launcher::app_init;
use quant_launcher::ecosystem::{AppArgs, EcosystemConfig, EnvSnapshot};
use quant_launcher::error::ConfigError;

#[tokio::test]
async fn test_load_repo_config() -> anyhow::Result<()> {
    app_init().await?;

    let config = EcosystemConfig::load("ecosystem.config.json")?;
    assert_eq!(config.apps.len(), 1);

    let app = config.app("quant_okx").expect("缺少quant_okx应用");
    assert_eq!(app.script, ".venv/bin/python");
    assert_eq!(app.cwd, "/root/quant_sol_project");
    assert_eq!(app.args, AppArgs::Line("-m run.scheduler".to_string()));
    // 未展开前PATH还是占位符
    assert_eq!(app.env.get("PATH"), Some("${PATH}"));

    let resolved = config.resolve(&EnvSnapshot::capture())?;
    assert_eq!(
        resolved.app("quant_okx").unwrap().env.get("PATH"),
        std::env::var("PATH").ok().as_deref()
    );
    Ok(())
}

#[tokio::test]
async fn test_load_many_last_definition_wins() -> anyhow::Result<()> {
    app_init().await?;

    // 同名应用的两个版本：后载入的文件覆盖先载入的
    let config = EcosystemConfig::load_many(&[
        "ecosystem.config.json",
        "tests/fixtures/ecosystem.config.local.json",
    ])?;
    assert_eq!(config.apps.len(), 1);
    let app = config.app("quant_okx").unwrap();
    assert_eq!(app.args, AppArgs::Line("run/scheduler.py".to_string()));
    assert_eq!(app.script, ".venv/bin/python");
    assert_eq!(app.cwd, "/root/quant_sol_project");
    Ok(())
}

#[test]
fn test_duplicate_app_name_in_one_file_rejected() {
    let text = r#"{
        "apps": [
            {
                "name": "quant_okx",
                "script": ".venv/bin/python",
                "args": "-m run.scheduler",
                "cwd": "/root/quant_sol_project"
            },
            {
                "name": "quant_okx",
                "script": ".venv/bin/python",
                "args": "run/scheduler.py",
                "cwd": "/root/quant_sol_project"
            }
        ]
    }"#;
    assert!(matches!(
        EcosystemConfig::parse_str(text),
        Err(ConfigError::DuplicateApp { ref name }) if name == "quant_okx"
    ));
}

#[test]
fn test_load_missing_file_is_io_error() {
    assert!(matches!(
        EcosystemConfig::load("no/such/ecosystem.config.json"),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn test_parse_garbage_is_parse_error() {
    assert!(matches!(
        EcosystemConfig::parse_str("module.exports = { apps: [] }"),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_load_many_without_paths_rejected() {
    let none: [&str; 0] = [];
    assert!(matches!(
        EcosystemConfig::load_many(&none),
        Err(ConfigError::NoInput)
    ));
}

#[test]
fn test_merge_keeps_unrelated_apps() {
    let older = EcosystemConfig::parse_str(
        r#"{
            "apps": [
                {
                    "name": "quant_okx",
                    "script": ".venv/bin/python",
                    "args": "-m run.scheduler",
                    "cwd": "/root/quant_sol_project"
                }
            ]
        }"#,
    )
    .unwrap();
    let newer = EcosystemConfig::parse_str(
        r#"{
            "apps": [
                {
                    "name": "quant_monitor",
                    "script": ".venv/bin/python",
                    "args": "-m run.live_trading_monitor",
                    "cwd": "/root/quant_sol_project"
                }
            ]
        }"#,
    )
    .unwrap();
    let merged = older.merge(newer);
    assert_eq!(merged.apps.len(), 2);
    assert!(merged.app("quant_okx").is_some());
    assert!(merged.app("quant_monitor").is_some());
}
