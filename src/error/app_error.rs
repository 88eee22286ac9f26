use thiserror::Error;

/// 配置错误
///
/// 描述符本身只是数据，脚本或工作目录是否真实存在由外部进程管理器
/// 在拉起进程时检查，这里只负责结构层面的校验。
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("读取配置文件失败: {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 配置内容解析失败
    #[error("配置解析失败({context}): {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// 应用名称为空
    #[error("应用名称不能为空")]
    EmptyName,

    /// 启动脚本为空
    #[error("应用 {app} 的 script 不能为空")]
    EmptyScript { app: String },

    /// 工作目录不是绝对路径
    #[error("应用 {app} 的 cwd 必须是绝对路径: {cwd}")]
    RelativeCwd { app: String, cwd: String },

    /// 环境变量名为空
    #[error("应用 {app} 存在空的环境变量名")]
    EmptyEnvKey { app: String },

    /// 同一描述符内环境变量重复
    #[error("应用 {app} 的环境变量 {key} 重复定义")]
    DuplicateEnvKey { app: String, key: String },

    /// 同一配置文件内应用名称重复
    #[error("应用名称重复定义: {name}")]
    DuplicateApp { name: String },

    /// 占位符引用的宿主环境变量不存在
    #[error("应用 {app} 引用了宿主环境中不存在的变量: {var}")]
    HostEnvMissing { app: String, var: String },

    /// 占位符写法不合法
    #[error("应用 {app} 的环境变量占位符不合法: {value}")]
    BadPlaceholder { app: String, value: String },

    /// 未提供任何配置文件
    #[error("未提供配置文件")]
    NoInput,
}
