use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::AssignmentPolicyCache;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::AssessmentEngine;
use crate::storage::{LocalAttachmentStore, Storage};
use crate::utils::{Clock, SystemClock};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub engine: AssessmentEngine,
}

/// 准备评测引擎启动的上下文
/// 包括存储（含迁移）、上传目录、策略缓存和各组件装配
pub async fn prepare_engine_startup() -> Result<StartupContext> {
    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let attachments = LocalAttachmentStore::from_config(storage.clone(), clock.clone());
    attachments.ensure_dir().await?;
    debug!("Upload directory ready: {}", attachments.dir().display());

    let cache = AssignmentPolicyCache::new(&config.cache);
    warn!(
        "Assignment policy cache initialized (ttl: {}s, capacity: {})",
        config.cache.default_ttl, config.cache.max_capacity
    );

    let engine = AssessmentEngine::new(
        storage.clone(),
        Arc::new(attachments),
        clock,
        cache,
        config.assessment.clone(),
    );

    Ok(StartupContext { storage, engine })
}
