//! 运行时初始化
//!
//! 日志与存储的启动入口，边界层（HTTP 服务等）在启动时调用。

mod logging;

pub use logging::init_tracing;

use std::sync::Arc;

use crate::errors::Result;
use crate::storage::{Storage, create_storage};

/// 启动上下文：核心对外暴露的共享资源
pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

impl StartupContext {
    pub async fn new() -> Result<Self> {
        let storage = create_storage().await?;
        Ok(Self { storage })
    }
}
