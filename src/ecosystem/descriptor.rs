//! 应用描述符
//!
//! 外部进程管理器消费的声明式记录：名称、解释器、参数、工作目录与
//! 环境变量映射。字段在加载解析完成后即固定，进程的拉起、监控和重启
//! 都不在这里发生。

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// 启动参数，兼容两种写法：整条命令行字符串或有序参数列表
///
/// 字符串写法按原样保存，序列化时不做任何切分。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AppArgs {
    Line(String),
    List(Vec<String>),
}

impl AppArgs {
    /// 展开为实际传给解释器的参数向量
    ///
    /// 字符串写法只在这里按空白切分，列表写法原样返回。
    pub fn to_argv(&self) -> Vec<String> {
        match self {
            AppArgs::Line(line) => line.split_whitespace().map(str::to_string).collect(),
            AppArgs::List(items) => items.clone(),
        }
    }
}

impl Default for AppArgs {
    fn default() -> Self {
        AppArgs::List(Vec::new())
    }
}

/// 环境变量映射，保持写入顺序，键唯一
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvMap(Vec<(String, String)>);

impl EnvMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从键值对构造，不去重，重复键交由 validate 报错
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 写入键值，同名键覆盖旧值
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for EnvMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EnvMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EnvMapVisitor;

        impl<'de> Visitor<'de> for EnvMapVisitor {
            type Value = EnvMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "环境变量映射(键唯一的字符串对象)")
            }

            fn visit_map<A>(self, mut access: A) -> Result<EnvMap, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut pairs: Vec<(String, String)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    // JSON对象里的重复键在这里直接拒绝，不做静默的后者覆盖
                    if pairs.iter().any(|(k, _)| k == &key) {
                        return Err(serde::de::Error::custom(format!(
                            "环境变量 {key} 重复定义"
                        )));
                    }
                    pairs.push((key, value));
                }
                Ok(EnvMap(pairs))
            }
        }

        deserializer.deserialize_map(EnvMapVisitor)
    }
}

/// 应用描述符
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppDescriptor {
    /// 进程管理器用于日志与控制命令的实例名
    pub name: String,
    /// 解释器或可执行文件路径
    pub script: String,
    #[serde(default)]
    pub args: AppArgs,
    /// 绝对路径的工作目录
    pub cwd: String,
    #[serde(default)]
    pub env: EnvMap,
}

impl AppDescriptor {
    /// 结构校验：名称与脚本非空、cwd为绝对路径、环境变量键非空且唯一
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.script.trim().is_empty() {
            return Err(ConfigError::EmptyScript {
                app: self.name.clone(),
            });
        }
        if !Path::new(&self.cwd).is_absolute() {
            return Err(ConfigError::RelativeCwd {
                app: self.name.clone(),
                cwd: self.cwd.clone(),
            });
        }
        let mut seen = HashSet::new();
        for (key, _) in self.env.iter() {
            if key.trim().is_empty() {
                return Err(ConfigError::EmptyEnvKey {
                    app: self.name.clone(),
                });
            }
            if !seen.insert(key) {
                return Err(ConfigError::DuplicateEnvKey {
                    app: self.name.clone(),
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    /// 组装启动计划，只产出数据，不执行任何东西
    pub fn launch_plan(&self) -> LaunchPlan {
        LaunchPlan {
            program: self.script.clone(),
            argv: self.args.to_argv(),
            cwd: self.cwd.clone(),
            env: self.env.clone(),
        }
    }
}

/// 启动计划：进程管理器拉起进程所需的最终形态
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchPlan {
    pub program: String,
    pub argv: Vec<String>,
    pub cwd: String,
    pub env: EnvMap,
}
