use tracing::{info, warn};

use super::{SubmissionService, blank_row, check_attachment_policy, ensure_accepting_work};
use crate::errors::{HWSystemError, Result};
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::submissions::requests::SubmissionPayload;
use crate::models::users::entities::Caller;
use crate::services::permissions::require_acting_student;

/// 保存草稿：只允许在行仍处于 draft（或已撤回）时写入
pub async fn save_draft(
    service: &SubmissionService,
    caller: &Caller,
    assignment_id: i64,
    student_id: i64,
    payload: SubmissionPayload,
) -> Result<Submission> {
    require_acting_student(caller, student_id)?;

    let assignment = service.load_policy(assignment_id).await?;
    ensure_accepting_work(&assignment)?;
    check_attachment_policy(&assignment, &payload.attachments)?;

    let now = service.clock.now();
    let SubmissionPayload {
        content,
        mcq_answers,
        attachments,
    } = payload;
    let mcq_answers = mcq_answers.unwrap_or_default();

    let (previous, saved) = service
        .upsert_row(assignment_id, student_id, |previous| {
            let mut next = match previous {
                Some(prev) if !prev.is_deleted() && prev.status != SubmissionStatus::Draft => {
                    return Err(HWSystemError::invalid_state_on(
                        "status",
                        format!(
                            "Submission {} is already {}, drafts can no longer be saved",
                            prev.id, prev.status
                        ),
                    ));
                }
                Some(prev) => {
                    let mut next = prev.clone();
                    // 撤回后重新开始的草稿，旧的提交时间和迟交标记不再有效
                    if prev.is_deleted() {
                        if prev.has_been_submitted() {
                            next.attempt_number = prev.attempt_number + 1;
                        }
                        next.clear_grading();
                        next.status = SubmissionStatus::Draft;
                        next.submitted_at = None;
                        next.is_late = false;
                        next.deleted_at = None;
                    }
                    next
                }
                None => blank_row(assignment_id, student_id, now),
            };

            next.content = content.clone();
            next.mcq_answers = mcq_answers.clone();
            next.updated_at = now;
            Ok(next)
        })
        .await
        .inspect_err(|e| warn!("学生 {} 保存作业 {} 草稿失败: {}", student_id, assignment_id, e))?;

    if !attachments.is_empty()
        && let Err(e) = service.store_uploads(&saved, attachments).await
    {
        warn!("草稿 {} 的附件保存失败，开始回滚: {}", saved.id, e);
        service.rollback_row(previous, &saved).await;
        return Err(e);
    }

    info!(
        "学生 {} 保存作业 {} 草稿：提交 {}",
        student_id, assignment_id, saved.id
    );
    Ok(saved)
}
