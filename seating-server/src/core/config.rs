use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::db::StorageBackend;
use crate::search::{ExactMatchPolicy, SearchOptions};

/// 默认管理员密码 (仅用于开发环境，启动时会告警)
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// 服务器配置 - 座位管理服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (支持 `.env` 文件)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 格式日志 |
/// | STORAGE_BACKEND | sqlite | memory / json / redb / sqlite |
/// | ADMIN_PASSWORD | admin123 | 管理员密码 |
/// | SESSION_TTL_SECS | 86400 | 管理员会话有效期 (秒) |
/// | LOGIN_DELAY_MS | 500 | 登录失败固定延迟 (毫秒) |
/// | SEARCH_EXACT_POLICY | unique_substring | full_name / unique_substring |
/// | SEARCH_MIN_SIMILARITY | 0.5 | 模糊搜索最低相似度 |
/// | EVENT_NAME / EVENT_DATE / EVENT_LOCATION | (空) | 导出文档的活动信息 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时 (毫秒) |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 优雅关闭超时 (毫秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/seating HTTP_PORT=8080 STORAGE_BACKEND=redb cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据和日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 是否输出 JSON 格式日志
    pub log_json: bool,
    /// 存储后端
    pub storage_backend: StorageBackend,
    /// 管理员密码 (启动时哈希，之后不再使用明文)
    pub admin_password: Secret,
    /// 会话有效期 (秒)，同时作为 Cookie Max-Age
    pub session_ttl_secs: u64,
    /// 登录失败后的固定延迟 (毫秒)
    pub login_delay_ms: u64,
    /// 搜索策略
    pub search: SearchOptions,
    /// 活动信息 (导出文档抬头)
    pub event: EventInfo,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

/// 活动信息
#[derive(Debug, Clone, Default)]
pub struct EventInfo {
    pub name: String,
    pub date: String,
    pub location: String,
}

impl EventInfo {
    /// "name - date" 行，缺失部分省略
    pub fn headline(&self) -> Option<String> {
        let parts: Vec<&str> = [self.name.as_str(), self.date.as_str()]
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" - "))
    }
}

/// 不会出现在 Debug 输出中的敏感字符串
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        let search = SearchOptions {
            exact_policy: env_parse("SEARCH_EXACT_POLICY", ExactMatchPolicy::UniqueSubstring),
            min_similarity: env_parse("SEARCH_MIN_SIMILARITY", 0.5_f64).clamp(0.0, 1.0),
        };

        Self {
            work_dir: env_string("WORK_DIR", "./data"),
            http_port: env_parse("HTTP_PORT", 3000),
            environment: env_string("ENVIRONMENT", "development"),
            log_level: env_string("LOG_LEVEL", "info"),
            log_json: env_parse("LOG_JSON", false),
            storage_backend: env_parse("STORAGE_BACKEND", StorageBackend::Sqlite),
            admin_password: Secret::new(env_string("ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD)),
            session_ttl_secs: env_parse("SESSION_TTL_SECS", 86_400),
            login_delay_ms: env_parse("LOGIN_DELAY_MS", 500),
            search,
            event: EventInfo {
                name: env_string("EVENT_NAME", ""),
                date: env_string("EVENT_DATE", ""),
                location: env_string("EVENT_LOCATION", ""),
            },
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30_000),
            shutdown_timeout_ms: env_parse("SHUTDOWN_TIMEOUT_MS", 10_000),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(
        work_dir: impl Into<String>,
        http_port: u16,
        storage_backend: StorageBackend,
    ) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.storage_backend = storage_backend;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否仍在使用默认管理员密码
    pub fn uses_default_password(&self) -> bool {
        self.admin_password.expose() == DEFAULT_ADMIN_PASSWORD
    }

    /// 数据目录: work_dir/data
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("data")
    }

    /// 日志目录: work_dir/logs
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.data_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
