#![allow(dead_code)]
#![allow(unused_imports)]

pub mod app_config;
pub mod ecosystem;
pub mod error;

use dotenv::dotenv;
use once_cell::sync::OnceCell;

static APP_INIT: OnceCell<()> = OnceCell::new();

/// 应用初始化：加载.env并安装全局日志，可重复调用
pub async fn app_init() -> anyhow::Result<()> {
    dotenv().ok();
    APP_INIT.get_or_try_init(|| app_config::log::setup_logging())?;
    Ok(())
}
