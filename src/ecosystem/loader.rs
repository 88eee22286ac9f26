//! 配置加载
//!
//! 读取 ecosystem 配置文件，做结构校验，按宿主环境快照展开占位符。
//! 多个文件按传入顺序合并，同名应用后者覆盖前者，覆盖动作会留日志。

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ecosystem::descriptor::{AppDescriptor, EnvMap};
use crate::ecosystem::env_snapshot::{EnvSnapshot, ExpandError};
use crate::error::ConfigError;

/// 整个配置文件的形态: `{ "apps": [ ... ] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcosystemConfig {
    pub apps: Vec<AppDescriptor>,
}

impl EcosystemConfig {
    /// 解析配置文本并校验
    pub fn parse_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse_with_context(text, "内联配置")
    }

    /// 读取并解析单个配置文件
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::parse_with_context(&text, &path.display().to_string())?;
        debug!("已加载配置 {}: {} 个应用", path.display(), config.apps.len());
        Ok(config)
    }

    /// 按顺序加载多个配置文件并合并，后载入的定义覆盖同名应用
    pub fn load_many<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ConfigError> {
        let mut merged: Option<Self> = None;
        for path in paths {
            let config = Self::load(path)?;
            merged = Some(match merged {
                Some(older) => older.merge(config),
                None => config,
            });
        }
        merged.ok_or(ConfigError::NoInput)
    }

    fn parse_with_context(text: &str, context: &str) -> Result<Self, ConfigError> {
        let config: EcosystemConfig =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse {
                context: context.to_string(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 合并另一份配置，按应用名后定义覆盖先定义
    pub fn merge(mut self, newer: EcosystemConfig) -> EcosystemConfig {
        for app in newer.apps {
            match self.apps.iter().position(|a| a.name == app.name) {
                Some(pos) => {
                    warn!("应用 {} 的定义被后载入的配置覆盖", app.name);
                    self.apps[pos] = app;
                }
                None => self.apps.push(app),
            }
        }
        self
    }

    /// 全量校验：逐个描述符校验，且应用名在文件内唯一
    ///
    /// 同一文件里出现重名应用直接拒绝加载，不做静默的后者生效。
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for app in &self.apps {
            app.validate()?;
            if !seen.insert(app.name.as_str()) {
                return Err(ConfigError::DuplicateApp {
                    name: app.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// 用宿主环境快照展开所有描述符的环境变量值
    ///
    /// 返回新的配置，原配置不动。展开只发生这一次，之后快照里的值
    /// 就固定在描述符里了。
    pub fn resolve(&self, snapshot: &EnvSnapshot) -> Result<EcosystemConfig, ConfigError> {
        let mut apps = Vec::with_capacity(self.apps.len());
        for app in &self.apps {
            let mut env = EnvMap::new();
            for (key, value) in app.env.iter() {
                let expanded = snapshot.expand(value).map_err(|e| match e {
                    ExpandError::Missing { var } => ConfigError::HostEnvMissing {
                        app: app.name.clone(),
                        var,
                    },
                    ExpandError::Malformed { value } => ConfigError::BadPlaceholder {
                        app: app.name.clone(),
                        value,
                    },
                })?;
                env.insert(key, expanded);
            }
            apps.push(AppDescriptor {
                env,
                ..app.clone()
            });
        }
        Ok(EcosystemConfig { apps })
    }

    /// 按名称查找应用
    pub fn app(&self, name: &str) -> Option<&AppDescriptor> {
        self.apps.iter().find(|a| a.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "apps": [
            {
                "name": "quant_okx",
                "script": ".venv/bin/python",
                "args": "-m run.scheduler",
                "cwd": "/root/quant_sol_project"
            }
        ]
    }"#;

    #[test]
    fn test_parse_minimal() {
        let config = EcosystemConfig::parse_str(MINIMAL).unwrap();
        assert_eq!(config.apps.len(), 1);
        assert_eq!(config.apps[0].name, "quant_okx");
        assert!(config.apps[0].env.is_empty());
    }

    #[test]
    fn test_merge_last_definition_wins() {
        let older = EcosystemConfig::parse_str(MINIMAL).unwrap();
        let newer = EcosystemConfig::parse_str(
            r#"{
                "apps": [
                    {
                        "name": "quant_okx",
                        "script": ".venv/bin/python",
                        "args": "run/scheduler.py",
                        "cwd": "/root/quant_sol_project"
                    }
                ]
            }"#,
        )
        .unwrap();
        let merged = older.merge(newer);
        assert_eq!(merged.apps.len(), 1);
        assert_eq!(
            merged.apps[0].args,
            crate::ecosystem::AppArgs::Line("run/scheduler.py".to_string())
        );
    }
}
