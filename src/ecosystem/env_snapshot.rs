//! 宿主环境快照
//!
//! 原始配置里的 PATH 取的是加载那一刻的宿主环境值。这里把这件事做成
//! 显式的一次性拷贝：快照之后宿主环境再怎么变，描述符里看到的值不变。

use std::collections::HashMap;
use std::env;

use chrono::Utc;

/// 快照展开失败
#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    #[error("快照中不存在环境变量: {var}")]
    Missing { var: String },

    #[error("占位符写法不合法: {value}")]
    Malformed { value: String },
}

/// 某一时刻宿主进程环境变量表的拷贝
#[derive(Debug, Clone)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
    taken_at_ms: i64,
}

impl EnvSnapshot {
    /// 读取当前进程环境，整表拷贝一次
    pub fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
            taken_at_ms: Utc::now().timestamp_millis(),
        }
    }

    /// 从给定键值对构造快照，测试用
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            taken_at_ms: Utc::now().timestamp_millis(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// 快照时间，毫秒时间戳
    pub fn taken_at_ms(&self) -> i64 {
        self.taken_at_ms
    }

    /// 展开值里的 `${NAME}` 占位符
    ///
    /// 允许一个值里出现多个占位符；引用不存在的变量或写法不完整都是错误，
    /// 不会静默替换成空串。
    pub fn expand(&self, raw: &str) -> Result<String, ExpandError> {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                return Err(ExpandError::Malformed {
                    value: raw.to_string(),
                });
            };
            let var = &after[..end];
            if var.is_empty() {
                return Err(ExpandError::Malformed {
                    value: raw.to_string(),
                });
            }
            match self.vars.get(var) {
                Some(value) => out.push_str(value),
                None => {
                    return Err(ExpandError::Missing {
                        var: var.to_string(),
                    })
                }
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_plain_value() {
        let snapshot = EnvSnapshot::from_vars([("PATH", "/usr/bin")]);
        assert_eq!(
            snapshot.expand("/root/quant_sol_project").unwrap(),
            "/root/quant_sol_project"
        );
    }

    #[test]
    fn test_expand_multiple_placeholders() {
        let snapshot = EnvSnapshot::from_vars([("HOME", "/root"), ("PROJ", "quant_sol_project")]);
        assert_eq!(
            snapshot.expand("${HOME}/${PROJ}/logs").unwrap(),
            "/root/quant_sol_project/logs"
        );
    }

    #[test]
    fn test_expand_missing_var() {
        let snapshot = EnvSnapshot::from_vars([("PATH", "/usr/bin")]);
        let err = snapshot.expand("${NOT_THERE}").unwrap_err();
        assert!(matches!(err, ExpandError::Missing { ref var } if var == "NOT_THERE"));
    }

    #[test]
    fn test_expand_malformed_placeholder() {
        let snapshot = EnvSnapshot::from_vars([("PATH", "/usr/bin")]);
        assert!(matches!(
            snapshot.expand("${PATH"),
            Err(ExpandError::Malformed { .. })
        ));
        assert!(matches!(
            snapshot.expand("${}"),
            Err(ExpandError::Malformed { .. })
        ));
    }
}
