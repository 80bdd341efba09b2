//! 作业策略缓存
//!
//! 提交流程对作业策略是读多写少的访问模式，这里用 Moka 缓存未删除的作业。
//! 作业目录的每一次写操作都必须在落库之后调用 `invalidate`。
//!
//! 失效会推进一个代数计数。加载在读库前记下代数，写入缓存后再比对一次，
//! 代数变了说明读库期间有写操作完成，这次读到的快照可能已经过期，
//! 于是丢弃缓存项并直接重读存储。这样关闭作业之后不会有旧的 published
//! 策略在 TTL 内残留。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use crate::config::CacheConfig;
use crate::errors::Result;
use crate::models::assignments::entities::Assignment;
use crate::storage::Storage;

#[derive(Clone)]
pub struct AssignmentPolicyCache {
    inner: Cache<i64, Arc<Assignment>>,
    generation: Arc<AtomicU64>,
}

impl AssignmentPolicyCache {
    pub fn new(config: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.default_ttl))
            .build();

        debug!(
            "AssignmentPolicyCache initialized with max capacity: {}",
            config.max_capacity
        );
        Self {
            inner,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// 读取作业策略，未命中时从存储加载
    pub async fn get_or_load(
        &self,
        storage: &dyn Storage,
        assignment_id: i64,
    ) -> Result<Option<Arc<Assignment>>> {
        if let Some(cached) = self.inner.get(&assignment_id).await {
            debug!("Assignment policy cache hit: {}", assignment_id);
            return Ok(Some(cached));
        }

        debug!("Assignment policy cache miss: {}", assignment_id);
        let generation = self.generation.load(Ordering::Acquire);
        let Some(assignment) = storage.get_assignment_by_id(assignment_id).await? else {
            return Ok(None);
        };

        let assignment = Arc::new(assignment);
        self.inner.insert(assignment_id, assignment.clone()).await;

        if self.generation.load(Ordering::Acquire) != generation {
            // 读取期间发生了写操作，丢弃可能过期的快照
            self.inner.invalidate(&assignment_id).await;
            debug!(
                "Assignment {} changed while loading, reading through storage",
                assignment_id
            );
            return Ok(storage
                .get_assignment_by_id(assignment_id)
                .await?
                .map(Arc::new));
        }

        Ok(Some(assignment))
    }

    /// 写操作落库之后调用
    pub async fn invalidate(&self, assignment_id: i64) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.invalidate(&assignment_id).await;
    }
}

impl Default for AssignmentPolicyCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::models::assignments::entities::{AssignmentStatus, AssignmentType};
    use crate::services::test_support::InterceptingStorage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    fn essay() -> Assignment {
        let now = Utc::now();
        Assignment {
            id: 0,
            class_id: 1,
            subject_id: 1,
            created_by: 5,
            title: "Essay".into(),
            description: None,
            assignment_type: AssignmentType::Essay,
            due_date: now + Duration::days(1),
            max_grade: 10.0,
            status: AssignmentStatus::Published,
            auto_grade: false,
            mcq_questions: Vec::new(),
            allowed_file_types: None,
            max_file_size_bytes: 1024,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_cached_until_invalidated() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let cache = AssignmentPolicyCache::default();

        let created = storage.create_assignment(essay()).await.unwrap();
        let first = cache.get_or_load(&storage, created.id).await.unwrap().unwrap();
        assert_eq!(first.status, AssignmentStatus::Published);

        let mut closed = created.clone();
        closed.status = AssignmentStatus::Closed;
        storage.update_assignment(&closed).await.unwrap();

        // 未失效前仍返回旧策略
        let stale = cache.get_or_load(&storage, created.id).await.unwrap().unwrap();
        assert_eq!(stale.status, AssignmentStatus::Published);

        cache.invalidate(created.id).await;
        let fresh = cache.get_or_load(&storage, created.id).await.unwrap().unwrap();
        assert_eq!(fresh.status, AssignmentStatus::Closed);

        assert!(cache.get_or_load(&storage, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_close_during_load_is_not_cached_stale() {
        let inner: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
        let storage = Arc::new(InterceptingStorage::new(inner));
        let cache = AssignmentPolicyCache::default();
        let created = storage.create_assignment(essay()).await.unwrap();

        // 加载读到 published 之后暂停，在它写入缓存前关闭作业
        storage.hold_next_assignment_read();
        let loading = {
            let cache = cache.clone();
            let storage = storage.clone();
            let id = created.id;
            tokio::spawn(async move { cache.get_or_load(storage.as_ref(), id).await })
        };
        storage.assignment_read_held().await;

        let mut closed = created.clone();
        closed.status = AssignmentStatus::Closed;
        storage.update_assignment(&closed).await.unwrap();
        cache.invalidate(created.id).await;
        storage.release_assignment_read();

        let in_flight = loading.await.unwrap().unwrap().unwrap();
        assert_eq!(in_flight.status, AssignmentStatus::Closed);

        let next = cache
            .get_or_load(storage.as_ref(), created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.status, AssignmentStatus::Closed);
    }
}
