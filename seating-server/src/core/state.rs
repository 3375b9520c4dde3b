use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use shared::util::snowflake_id;

use crate::auth::{AdminCredentials, SessionStore};
use crate::core::{Config, Result, ServerError};
use crate::db::{SeatingStore, open_store};
use crate::seating::SeatingService;
use crate::services::HttpsService;

/// 过期会话清理间隔
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(300);

/// 资源版本管理器
///
/// 每种资源 ("guest", "table") 一个单调递增的版本号，随 `/api/sync`
/// 一起返回，客户端据此判断本地数据是否过期。
#[derive(Debug)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    /// 创建空的版本管理器
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// 递增指定资源的版本号并返回新值
    ///
    /// 如果资源不存在，从 0 开始递增（返回 1）
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 获取指定资源的当前版本号
    ///
    /// 如果资源不存在，返回 0
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }

    /// 所有资源的当前版本
    pub fn snapshot(&self) -> std::collections::HashMap<String, u64> {
        self.versions
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect()
    }
}

impl Default for ResourceVersions {
    fn default() -> Self {
        Self::new()
    }
}

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Arc<dyn SeatingStore> | 存储后端 |
/// | seating | Arc<SeatingService> | 座位规则 (单写者) |
/// | sessions | Arc<SessionStore> | 管理员会话 |
/// | credentials | AdminCredentials | 管理员密码哈希 |
/// | resource_versions | Arc<ResourceVersions> | 资源版本管理 |
/// | https | HttpsService | HTTP 服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 存储后端
    pub store: Arc<dyn SeatingStore>,
    /// 座位规则服务
    pub seating: Arc<SeatingService>,
    /// 管理员会话表
    pub sessions: Arc<SessionStore>,
    /// 管理员密码 (argon2 哈希)
    pub credentials: AdminCredentials,
    /// 资源版本管理器
    pub resource_versions: Arc<ResourceVersions>,
    /// HTTP 服务
    pub https: HttpsService,
    /// 实例纪元 (每次启动生成)
    pub epoch: String,
    /// 启动时间
    pub started_at: Instant,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("backend", &self.store.backend())
            .field("sessions", &self.sessions.len())
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (data/, logs/)
    /// 2. 存储后端 (STORAGE_BACKEND)
    /// 3. 各服务 (Seating, Sessions, Credentials, HTTP)
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;
        let store = open_store(config).await?;
        Self::with_store(config, store)
    }

    /// 使用已打开的存储构造状态 (测试使用内存存储)
    pub fn with_store(config: &Config, store: Arc<dyn SeatingStore>) -> Result<Self> {
        let credentials = AdminCredentials::from_password(config.admin_password.expose())
            .map_err(|e| ServerError::PasswordHash(e.to_string()))?;

        let resource_versions = Arc::new(ResourceVersions::new());
        let seating = Arc::new(SeatingService::new(
            store.clone(),
            resource_versions.clone(),
        ));
        let sessions = Arc::new(SessionStore::new(Duration::from_secs(
            config.session_ttl_secs,
        )));
        let https = HttpsService::new(config.clone());

        let state = Self {
            config: config.clone(),
            store,
            seating,
            sessions,
            credentials,
            resource_versions,
            https: https.clone(),
            epoch: format!("{:x}", snowflake_id()),
            started_at: Instant::now(),
        };

        // HttpsService 延迟初始化 (需要完整的 state)
        https.initialize(state.clone());

        Ok(state)
    }

    /// 启动后台任务
    ///
    /// - 过期会话清理 (每 5 分钟)
    pub fn start_background_tasks(&self) {
        let sessions = self.sessions.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
            interval.tick().await;
            loop {
                interval.tick().await;
                let purged = sessions.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, "Purged expired admin sessions");
                }
            }
        });
    }

    /// 运行时长
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
