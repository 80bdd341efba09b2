use tracing::info;

use super::{AssignmentService, not_found};
use crate::errors::{HWSystemError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::users::entities::Caller;
use crate::services::permissions::require_author_or_admin;

/// 软删除：打上删除时间，提交仍引用该作业
pub async fn delete_assignment(
    service: &AssignmentService,
    caller: &Caller,
    assignment_id: i64,
) -> Result<()> {
    let mut assignment = service.load_for_write(caller, assignment_id).await?;

    let now = service.clock.now();
    assignment.deleted_at = Some(now);
    assignment.updated_at = now;
    service.save(&assignment).await?;

    info!("作业 {} 已由用户 {} 删除", assignment_id, caller.user_id);
    Ok(())
}

pub async fn restore_assignment(
    service: &AssignmentService,
    caller: &Caller,
    assignment_id: i64,
) -> Result<Assignment> {
    let mut assignment = service
        .storage
        .get_assignment_with_deleted(assignment_id)
        .await?
        .ok_or_else(|| not_found(assignment_id))?;
    require_author_or_admin(caller, assignment.created_by)?;

    if assignment.deleted_at.is_none() {
        return Err(HWSystemError::invalid_state(format!(
            "作业 {assignment_id} 未被删除"
        )));
    }

    assignment.deleted_at = None;
    assignment.updated_at = service.clock.now();
    let restored = service.save(&assignment).await?;

    info!("作业 {} 已由用户 {} 恢复", assignment_id, caller.user_id);
    Ok(restored)
}
