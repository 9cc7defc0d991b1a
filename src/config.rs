//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `REPAIR__*` 覆盖（双下划线表示嵌套，如 `REPAIR__STORE__ENDPOINT=./data`）。
//! 缺少必要配置只在启动时告警，不阻止进程启动；相应调用会在首次使用时失败。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub oracle: OracleSection,
}

/// [app] 段
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    pub name: Option<String>,
    /// 集合为空时写入演示技师与备件
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: None,
            seed_demo_data: default_seed_demo_data(),
        }
    }
}

fn default_seed_demo_data() -> bool {
    true
}

/// [store] 段：文档存储连接参数
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    /// 后端：sqlite / memory
    #[serde(default = "default_store_backend")]
    pub backend: String,
    /// 数据库所在目录
    pub endpoint: Option<String>,
    /// 访问密钥；嵌入式 SQLite 不使用，保留以兼容远程文档库配置
    pub key: Option<String>,
    /// 数据库名，对应文件 `<database>.db`
    pub database: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            endpoint: None,
            key: None,
            database: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_store_backend() -> String {
    "sqlite".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl StoreSection {
    /// SQLite 文件路径：endpoint 目录 + database 名；缺失时分别退回 "." 与 "repair_planner"
    pub fn database_path(&self) -> PathBuf {
        let dir = self
            .endpoint
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(".");
        let name = self
            .database
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("repair_planner");
        PathBuf::from(dir).join(format!("{}.db", name))
    }
}

/// [oracle] 段：规划 Agent 所用 LLM 端点与模型部署
#[derive(Debug, Clone, Deserialize)]
pub struct OracleSection {
    /// 后端：openai（任意 OpenAI 兼容端点）/ mock
    #[serde(default = "default_oracle_provider")]
    pub provider: String,
    pub endpoint: Option<String>,
    #[serde(default = "default_model_deployment")]
    pub model_deployment: String,
    /// 未设置时读取 OPENAI_API_KEY
    pub api_key: Option<String>,
}

impl Default for OracleSection {
    fn default() -> Self {
        Self {
            provider: default_oracle_provider(),
            endpoint: None,
            model_deployment: default_model_deployment(),
            api_key: None,
        }
    }
}

fn default_oracle_provider() -> String {
    "openai".to_string()
}

fn default_model_deployment() -> String {
    "gpt-4o-mini".to_string()
}

impl OracleSection {
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

impl AppConfig {
    /// 缺失的必要配置项（键名形如 store.endpoint）
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.store.backend.eq_ignore_ascii_case("sqlite") {
            if is_blank(&self.store.endpoint) {
                missing.push("store.endpoint");
            }
            if is_blank(&self.store.database) {
                missing.push("store.database");
            }
        }
        if self.oracle.provider.eq_ignore_ascii_case("openai") {
            if is_blank(&self.oracle.endpoint) {
                missing.push("oracle.endpoint");
            }
            if self.oracle.model_deployment.trim().is_empty() {
                missing.push("oracle.model_deployment");
            }
            if self.oracle.resolved_api_key().is_none() {
                missing.push("oracle.api_key");
            }
        }
        missing
    }

    /// 每个缺失项告警一次
    pub fn warn_missing(&self) {
        for key in self.missing_settings() {
            tracing::warn!(setting = key, "Configuration value missing; calls depending on it will fail");
        }
    }
}

/// 从 config 目录加载配置，环境变量 REPAIR__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 REPAIR__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("REPAIR")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
