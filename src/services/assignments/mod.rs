pub mod create;
pub mod delete;
pub mod detail;
pub mod status;
pub mod update;

mod policy;

use std::sync::Arc;

use crate::cache::AssignmentPolicyCache;
use crate::config::AssessmentConfig;
use crate::errors::{HWSystemError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::assignments::requests::{
    AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use crate::models::users::entities::Caller;
use crate::services::permissions::require_author_or_admin;
use crate::storage::Storage;
use crate::utils::Clock;

/// 作业目录：作业定义及其策略
pub struct AssignmentService {
    storage: Arc<dyn Storage>,
    cache: AssignmentPolicyCache,
    clock: Arc<dyn Clock>,
    settings: AssessmentConfig,
}

impl AssignmentService {
    pub fn new(
        storage: Arc<dyn Storage>,
        cache: AssignmentPolicyCache,
        clock: Arc<dyn Clock>,
        settings: AssessmentConfig,
    ) -> Self {
        Self {
            storage,
            cache,
            clock,
            settings,
        }
    }

    /// 创建作业
    pub async fn create_assignment(
        &self,
        caller: &Caller,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        create::create_assignment(self, caller, req).await
    }

    /// 更新作业
    pub async fn update_assignment(
        &self,
        caller: &Caller,
        assignment_id: i64,
        patch: UpdateAssignmentRequest,
    ) -> Result<Assignment> {
        update::update_assignment(self, caller, assignment_id, patch).await
    }

    /// 发布作业（draft -> published）
    pub async fn publish_assignment(&self, caller: &Caller, assignment_id: i64) -> Result<Assignment> {
        status::publish_assignment(self, caller, assignment_id).await
    }

    /// 关闭作业（published -> closed，不可逆）
    pub async fn close_assignment(&self, caller: &Caller, assignment_id: i64) -> Result<Assignment> {
        status::close_assignment(self, caller, assignment_id).await
    }

    /// 软删除作业
    pub async fn delete_assignment(&self, caller: &Caller, assignment_id: i64) -> Result<()> {
        delete::delete_assignment(self, caller, assignment_id).await
    }

    /// 恢复已删除的作业
    pub async fn restore_assignment(
        &self,
        caller: &Caller,
        assignment_id: i64,
    ) -> Result<Assignment> {
        delete::restore_assignment(self, caller, assignment_id).await
    }

    /// 获取作业详情
    pub async fn get_assignment(&self, caller: &Caller, assignment_id: i64) -> Result<Assignment> {
        detail::get_assignment(self, caller, assignment_id).await
    }

    /// 列出作业
    pub async fn list_assignments(
        &self,
        caller: &Caller,
        query: AssignmentListQuery,
    ) -> Result<Vec<Assignment>> {
        detail::list_assignments(self, caller, query).await
    }

    // 读取待修改的作业并检查调用者是否有权修改
    async fn load_for_write(&self, caller: &Caller, assignment_id: i64) -> Result<Assignment> {
        let assignment = self
            .storage
            .get_assignment_by_id(assignment_id)
            .await?
            .ok_or_else(|| not_found(assignment_id))?;
        require_author_or_admin(caller, assignment.created_by)?;
        Ok(assignment)
    }

    // 写回并使缓存失效
    async fn save(&self, assignment: &Assignment) -> Result<Assignment> {
        let saved = self.storage.update_assignment(assignment).await?;
        self.cache.invalidate(saved.id).await;
        Ok(saved)
    }
}

pub(crate) fn not_found(assignment_id: i64) -> HWSystemError {
    HWSystemError::not_found_on("assignment_id", format!("作业不存在: {assignment_id}"))
}
