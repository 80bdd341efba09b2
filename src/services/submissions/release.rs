use tracing::info;

use super::SubmissionService;
use crate::errors::{HWSystemError, Result};
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::users::entities::Caller;
use crate::services::permissions::require_staff;

/// graded -> returned
pub async fn return_submission(
    service: &SubmissionService,
    caller: &Caller,
    submission_id: i64,
) -> Result<Submission> {
    require_staff(caller)?;

    let mut submission = service.load_submission(submission_id).await?;
    if submission.status != SubmissionStatus::Graded {
        return Err(HWSystemError::invalid_state_on(
            "status",
            format!(
                "Only graded submissions can be returned, submission {submission_id} is {}",
                submission.status
            ),
        ));
    }

    submission.status = SubmissionStatus::Returned;
    submission.updated_at = service.clock.now();
    let saved = service.storage.update_submission(&submission).await?;

    info!("提交 {} 已由用户 {} 发还", submission_id, caller.user_id);
    Ok(saved)
}
