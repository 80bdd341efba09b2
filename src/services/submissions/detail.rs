use super::SubmissionService;
use crate::errors::{HWSystemError, Result};
use crate::models::attachments::entities::Owner;
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::submissions::requests::SubmissionListQuery;
use crate::models::submissions::responses::SubmissionDetail;
use crate::models::users::entities::Caller;
use crate::services::permissions::{require_self_or_staff, require_staff};

pub async fn get_submission(
    service: &SubmissionService,
    caller: &Caller,
    submission_id: i64,
) -> Result<SubmissionDetail> {
    let submission = service.load_submission(submission_id).await?;
    require_self_or_staff(caller, submission.student_id)?;
    with_attachments(service, submission).await
}

pub async fn get_student_submission(
    service: &SubmissionService,
    caller: &Caller,
    assignment_id: i64,
    student_id: i64,
) -> Result<SubmissionDetail> {
    require_self_or_staff(caller, student_id)?;

    let submission = service
        .storage
        .find_submission_row(assignment_id, student_id)
        .await?
        .filter(|s| !s.is_deleted())
        .ok_or_else(|| {
            HWSystemError::not_found(format!(
                "学生 {student_id} 在作业 {assignment_id} 下没有提交"
            ))
        })?;
    with_attachments(service, submission).await
}

pub async fn list_submissions(
    service: &SubmissionService,
    caller: &Caller,
    assignment_id: i64,
    status: Option<SubmissionStatus>,
) -> Result<Vec<Submission>> {
    require_staff(caller)?;
    service.load_policy(assignment_id).await?;

    service
        .storage
        .list_submissions(SubmissionListQuery {
            assignment_id: Some(assignment_id),
            student_id: None,
            status,
        })
        .await
}

async fn with_attachments(
    service: &SubmissionService,
    submission: Submission,
) -> Result<SubmissionDetail> {
    let attachments = service
        .attachments
        .list_attachments(Owner::Submission(submission.id))
        .await?;
    Ok(SubmissionDetail {
        submission,
        attachments,
    })
}
