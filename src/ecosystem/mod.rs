//! 启动配置域
//!
//! 应用描述符的数据模型、宿主环境快照与配置加载。这一层只产出数据，
//! 进程的生命周期完全由外部进程管理器负责。

pub mod descriptor;
pub mod env_snapshot;
pub mod loader;

pub use descriptor::{AppArgs, AppDescriptor, EnvMap, LaunchPlan};
pub use env_snapshot::EnvSnapshot;
pub use loader::EcosystemConfig;
