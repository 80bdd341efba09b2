use tracing::info;

use super::SubmissionService;
use crate::errors::{HWSystemError, Result};
use crate::models::submissions::entities::SubmissionStatus;
use crate::models::users::entities::Caller;

/// 撤回提交（软删除）
///
/// 学生只能撤回自己尚未评分的提交，教师和管理员可撤回任意提交。
pub async fn withdraw_submission(
    service: &SubmissionService,
    caller: &Caller,
    submission_id: i64,
) -> Result<()> {
    let mut submission = service.load_submission(submission_id).await?;

    if !caller.role.is_staff() {
        if submission.student_id != caller.user_id {
            return Err(HWSystemError::authorization(format!(
                "用户 {} 不能撤回他人的提交",
                caller.user_id
            )));
        }
        if !matches!(
            submission.status,
            SubmissionStatus::Draft | SubmissionStatus::Submitted
        ) {
            return Err(HWSystemError::invalid_state_on(
                "status",
                format!("Submission {submission_id} is {} and can no longer be withdrawn", submission.status),
            ));
        }
    }

    let now = service.clock.now();
    submission.deleted_at = Some(now);
    submission.updated_at = now;
    service.storage.update_submission(&submission).await?;

    info!("提交 {} 已由用户 {} 撤回", submission_id, caller.user_id);
    Ok(())
}
