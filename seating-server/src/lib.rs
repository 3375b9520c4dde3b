//! Seating Server - 活动座位管理服务
//!
//! # 架构概述
//!
//! 宾客按桌位登记 (桌位有容量上限)，到场签到，按姓名搜索，导出打印名单。
//!
//! - **存储** (`db`): `SeatingStore` 接口 + memory / json / redb / sqlite 四种后端
//! - **座位规则** (`seating`): 容量校验、删除保护、签到状态、人数重算
//! - **搜索** (`search`): 精确匹配策略 + 模糊匹配 (strsim)
//! - **认证** (`auth`): Argon2 管理员密码 + 内存会话
//! - **导出** (`export`): 基于 `seating-print` 的 PDF 名单
//! - **HTTP API** (`api`): axum 路由和处理器
//!
//! # 模块结构
//!
//! ```text
//! seating-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── db/            # 存储后端
//! ├── seating/       # 座位规则服务
//! ├── search/        # 搜索
//! ├── auth/          # 管理员会话
//! ├── export/        # PDF 导出
//! ├── services/      # HTTP 服务
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、校验、错误
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod export;
pub mod search;
pub mod seating;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use db::{SeatingStore, StorageBackend};
pub use seating::SeatingService;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// 设置运行环境
///
/// 1. 加载 `.env` (如果存在)
/// 2. 确保工作目录结构
/// 3. 初始化日志 (控制台 + work_dir/logs 下的滚动文件)
///
/// 必须在 tokio 运行时内调用 (日志清理任务在此启动)
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    init_logger_with_file(
        &config.log_level,
        config.log_json,
        Some(&log_dir.to_string_lossy()),
    )?;

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
   _____            __  _
  / ___/___  ____ _/ /_(_)___  ____ _
  \__ \/ _ \/ __ `/ __/ / __ \/ __ `/
 ___/ /  __/ /_/ / /_/ / / / / /_/ /
/____/\___/\__,_/\__/_/_/ /_/\__, /
                            /____/
    "#
    );
}
