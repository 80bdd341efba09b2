use tracing::{info, warn};

use super::{SubmissionService, blank_row, check_attachment_policy, ensure_accepting_work};
use crate::errors::{HWSystemError, Result};
use crate::models::assignments::entities::{Assignment, AssignmentType};
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::submissions::requests::SubmissionPayload;
use crate::models::users::entities::Caller;
use crate::services::auto_grader;
use crate::services::permissions::require_acting_student;

pub async fn submit(
    service: &SubmissionService,
    caller: &Caller,
    assignment_id: i64,
    student_id: i64,
    payload: SubmissionPayload,
) -> Result<Submission> {
    require_acting_student(caller, student_id)?;

    let assignment = service.load_policy(assignment_id).await?;
    if let Err(e) = ensure_accepting_work(&assignment) {
        warn!("学生 {} 提交作业 {} 被拒绝: {}", student_id, assignment_id, e);
        return Err(e);
    }
    check_completeness(&assignment, &payload)?;
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
                Some(prev) => {
                    let mut next = prev.clone();
                    // 草稿第一次提交沿用当前次数，之后每次重新提交递增
                    if prev.has_been_submitted() {
                        next.attempt_number = prev.attempt_number + 1;
                    }
                    next
                }
                None => blank_row(assignment_id, student_id, now),
            };

            next.content = content.clone();
            next.mcq_answers = mcq_answers.clone();
            next.clear_grading();
            next.status = SubmissionStatus::Submitted;
            next.submitted_at = Some(now);
            // 只在进入 submitted 时计算一次
            next.is_late = now > assignment.due_date;
            next.updated_at = now;
            next.deleted_at = None;

            if assignment.auto_grades() {
                let result =
                    auto_grader::score(&next.mcq_answers, &assignment.mcq_questions, assignment.max_grade);
                next.grade = Some(result.scaled_score);
                next.feedback = Some(result.feedback());
                next.status = SubmissionStatus::Graded;
                next.graded_at = Some(now);
                next.graded_by = None;
            }

            Ok(next)
        })
        .await?;

    if !attachments.is_empty()
        && let Err(e) = service.store_uploads(&saved, attachments).await
    {
        warn!("提交 {} 的附件保存失败，开始回滚: {}", saved.id, e);
        service.rollback_row(previous, &saved).await;
        return Err(e);
    }

    info!(
        "学生 {} 提交作业 {}：提交 {}，第 {} 次，状态 {}，迟交 {}",
        student_id, assignment_id, saved.id, saved.attempt_number, saved.status, saved.is_late
    );
    Ok(saved)
}

/// 按作业类型检查提交内容是否完整
fn check_completeness(assignment: &Assignment, payload: &SubmissionPayload) -> Result<()> {
    match assignment.assignment_type {
        AssignmentType::Essay => {
            let has_content = payload
                .content
                .as_deref()
                .is_some_and(|c| !c.trim().is_empty());
            if !has_content {
                return Err(HWSystemError::validation_on(
                    "content",
                    "Essay submissions require non-empty content",
                ));
            }
        }
        AssignmentType::FileUpload => {
            if payload.attachments.is_empty() {
                return Err(HWSystemError::validation_on(
                    "attachments",
                    "File upload submissions require at least one attachment",
                ));
            }
        }
        AssignmentType::Mcq => {
            let answered = payload.mcq_answers.as_ref().map_or(0, Vec::len);
            if answered != assignment.mcq_questions.len() {
                return Err(HWSystemError::validation_on(
                    "mcq_answers",
                    format!(
                        "Expected {} answers, got {}",
                        assignment.mcq_questions.len(),
                        answered
                    ),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use crate::errors::HWSystemError;
    use crate::models::assignments::entities::AssignmentType;
    use crate::models::assignments::requests::UpdateAssignmentRequest;
    use crate::models::attachments::entities::Owner;
    use crate::models::submissions::entities::SubmissionStatus;
    use crate::models::submissions::requests::{SubmissionListQuery, SubmissionPayload};
    use crate::models::users::entities::Caller;
    use crate::services::submissions::blank_row;
    use crate::services::test_support::*;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    fn essay(text: &str) -> SubmissionPayload {
        SubmissionPayload {
            content: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_auto_graded_mcq_submission() {
        let env = env().await;
        let teacher = Caller::teacher(5);
        let mut req = assignment_request(AssignmentType::Mcq, env.clock.now() + Duration::days(1));
        req.auto_grade = true;
        req.max_grade = Some(10.0);
        let assignment = env
            .engine
            .assignments
            .create_assignment(&teacher, req)
            .await
            .unwrap();

        let student = Caller::student(20);
        let payload = SubmissionPayload {
            mcq_answers: Some(vec![0, 1, 2, 3]),
            ..Default::default()
        };
        let submission = env
            .engine
            .submissions
            .submit(&student, assignment.id, 20, payload)
            .await
            .unwrap();

        assert_eq!(submission.status, SubmissionStatus::Graded);
        assert_eq!(submission.grade, Some(7.5));
        assert_eq!(submission.feedback.as_deref(), Some("Auto-graded: 3/4 correct"));
        assert_eq!(submission.graded_by, None);
        assert!(submission.graded_at.is_some());
        assert!(!submission.is_late);
    }

    #[tokio::test]
    async fn test_late_flag_is_stable_after_due_date_edit() {
        let env = env_at(at(2025, 1, 8, 9, 0)).await;
        let teacher = Caller::teacher(5);
        let assignment = env
            .engine
            .assignments
            .create_assignment(&teacher, assignment_request(AssignmentType::Essay, at(2025, 1, 9, 23, 59)))
            .await
            .unwrap();

        env.clock.set(at(2025, 1, 10, 10, 0));
        let submission = env
            .engine
            .submissions
            .submit(&Caller::student(20), assignment.id, 20, essay("late essay"))
            .await
            .unwrap();
        assert!(submission.is_late);

        let patch = UpdateAssignmentRequest {
            due_date: Some(at(2025, 1, 15, 0, 0)),
            ..Default::default()
        };
        env.engine
            .assignments
            .update_assignment(&teacher, assignment.id, patch)
            .await
            .unwrap();

        let reloaded = env
            .engine
            .submissions
            .get_submission(&teacher, submission.id)
            .await
            .unwrap();
        assert!(reloaded.submission.is_late);
    }

    #[tokio::test]
    async fn test_resubmission_reuses_row_and_increments_attempt() {
        let env = env().await;
        let teacher = Caller::teacher(5);
        let assignment = env
            .engine
            .assignments
            .create_assignment(&teacher, assignment_request(AssignmentType::Essay, env.clock.now() + Duration::days(1)))
            .await
            .unwrap();
        let student = Caller::student(20);

        let first = env
            .engine
            .submissions
            .submit(&student, assignment.id, 20, essay("v1"))
            .await
            .unwrap();
        assert_eq!(first.attempt_number, 1);

        env.engine
            .submissions
            .grade(&teacher, first.id, crate::models::submissions::requests::GradeSubmissionRequest {
                score: 8.0,
                feedback: Some("ok".into()),
            })
            .await
            .unwrap();

        env.clock.advance(Duration::hours(1));
        let second = env
            .engine
            .submissions
            .submit(&student, assignment.id, 20, essay("v2"))
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.attempt_number, 2);
        assert_eq!(second.status, SubmissionStatus::Submitted);
        assert_eq!(second.content.as_deref(), Some("v2"));
        assert_eq!(second.grade, None);
        assert_eq!(second.graded_by, None);

        let rows = env
            .engine
            .submissions
            .list_submissions(&teacher, assignment.id, None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_rejections() {
        let env = env().await;
        let teacher = Caller::teacher(5);
        let due = env.clock.now() + Duration::days(1);
        let student = Caller::student(20);

        let err = env
            .engine
            .submissions
            .submit(&student, 404, 20, essay("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::NotFound(_)));

        let essay_assignment = env
            .engine
            .assignments
            .create_assignment(&teacher, assignment_request(AssignmentType::Essay, due))
            .await
            .unwrap();
        let err = env
            .engine
            .submissions
            .submit(&student, essay_assignment.id, 20, essay("   "))
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("content"));

        // 只能代表自己提交
        let err = env
            .engine
            .submissions
            .submit(&student, essay_assignment.id, 21, essay("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::Authorization(_)));

        let mcq = env
            .engine
            .assignments
            .create_assignment(&teacher, assignment_request(AssignmentType::Mcq, due))
            .await
            .unwrap();
        let payload = SubmissionPayload {
            mcq_answers: Some(vec![0, 1]),
            ..Default::default()
        };
        let err = env
            .engine
            .submissions
            .submit(&student, mcq.id, 20, payload)
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("mcq_answers"));

        let upload = env
            .engine
            .assignments
            .create_assignment(&teacher, assignment_request(AssignmentType::FileUpload, due))
            .await
            .unwrap();
        let err = env
            .engine
            .submissions
            .submit(&student, upload.id, 20, SubmissionPayload::default())
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("attachments"));

        env.engine
            .assignments
            .close_assignment(&teacher, essay_assignment.id)
            .await
            .unwrap();
        let err = env
            .engine
            .submissions
            .submit(&student, essay_assignment.id, 20, essay("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::AssignmentClosed(_)));
    }

    #[tokio::test]
    async fn test_unpublished_assignment_rejects_submission() {
        let env = env().await;
        let mut req = assignment_request(AssignmentType::Essay, env.clock.now() + Duration::days(1));
        req.status = Some(crate::models::assignments::entities::AssignmentStatus::Draft);
        let assignment = env
            .engine
            .assignments
            .create_assignment(&Caller::teacher(5), req)
            .await
            .unwrap();

        let err = env
            .engine
            .submissions
            .submit(&Caller::student(20), assignment.id, 20, essay("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_attachment_policy_and_storage() {
        let env = env().await;
        let teacher = Caller::teacher(5);
        let mut req = assignment_request(AssignmentType::FileUpload, env.clock.now() + Duration::days(1));
        req.allowed_file_types = Some("pdf".to_string());
        req.max_file_size_bytes = Some(64);
        let assignment = env
            .engine
            .assignments
            .create_assignment(&teacher, req)
            .await
            .unwrap();
        let student = Caller::student(20);

        let wrong_type = SubmissionPayload {
            attachments: vec![pdf_upload("report.docx", 16)],
            ..Default::default()
        };
        let err = env
            .engine
            .submissions
            .submit(&student, assignment.id, 20, wrong_type)
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("attachments"));

        let too_big = SubmissionPayload {
            attachments: vec![pdf_upload("report.pdf", 65)],
            ..Default::default()
        };
        assert!(env
            .engine
            .submissions
            .submit(&student, assignment.id, 20, too_big)
            .await
            .is_err());
        assert_eq!(env.attachments.len(), 0);

        let ok = SubmissionPayload {
            attachments: vec![pdf_upload("report.pdf", 64), pdf_upload("appendix.pdf", 20)],
            ..Default::default()
        };
        let submission = env
            .engine
            .submissions
            .submit(&student, assignment.id, 20, ok)
            .await
            .unwrap();

        let files = env
            .engine
            .attachments
            .resolve(Owner::Submission(submission.id))
            .await
            .unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].file_name, "report.pdf");
        assert_eq!(files[0].uploaded_by, 20);
    }

    #[tokio::test]
    async fn test_attachment_failure_rolls_back_new_row() {
        let env = env().await;
        let assignment = env
            .engine
            .assignments
            .create_assignment(
                &Caller::teacher(5),
                assignment_request(AssignmentType::FileUpload, env.clock.now() + Duration::days(1)),
            )
            .await
            .unwrap();
        let student = Caller::student(20);

        // 第二个附件写入失败
        env.attachments.fail_after(1);
        let payload = SubmissionPayload {
            attachments: vec![pdf_upload("a.pdf", 10), pdf_upload("b.pdf", 10)],
            ..Default::default()
        };
        let err = env
            .engine
            .submissions
            .submit(&student, assignment.id, 20, payload)
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::FileOperation(_)));

        assert_eq!(env.attachments.len(), 0);
        assert!(env
            .storage
            .find_submission_row(assignment.id, 20)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_attachment_failure_restores_previous_attempt() {
        let env = env().await;
        let assignment = env
            .engine
            .assignments
            .create_assignment(
                &Caller::teacher(5),
                assignment_request(AssignmentType::FileUpload, env.clock.now() + Duration::days(1)),
            )
            .await
            .unwrap();
        let student = Caller::student(20);

        let first = env
            .engine
            .submissions
            .submit(
                &student,
                assignment.id,
                20,
                SubmissionPayload {
                    attachments: vec![pdf_upload("v1.pdf", 10)],
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        env.attachments.fail_puts(true);
        env.clock.advance(Duration::minutes(5));
        let result = env
            .engine
            .submissions
            .submit(
                &student,
                assignment.id,
                20,
                SubmissionPayload {
                    attachments: vec![pdf_upload("v2.pdf", 10)],
                    ..Default::default()
                },
            )
            .await;
        assert!(result.is_err());

        let row = env
            .storage
            .find_submission_row(assignment.id, 20)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row, first);
        assert_eq!(env.attachments.len(), 1);
    }

    async fn intercepted_env() -> (TestEnv, Arc<InterceptingStorage>) {
        let inner: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
        let storage = Arc::new(InterceptingStorage::new(inner));
        let env = env_on(at(2025, 1, 1, 8, 0), storage.clone());
        (env, storage)
    }

    #[tokio::test]
    async fn test_concurrent_first_submit_updates_existing_row() {
        let (env, storage) = intercepted_env().await;
        let assignment = env
            .engine
            .assignments
            .create_assignment(
                &Caller::teacher(5),
                assignment_request(AssignmentType::Essay, env.clock.now() + Duration::days(1)),
            )
            .await
            .unwrap();

        // 另一个请求在本次查找和创建之间抢先写入了这一行
        let now = env.clock.now();
        let mut competing = blank_row(assignment.id, 20, now);
        competing.content = Some("from the other tab".into());
        competing.status = SubmissionStatus::Submitted;
        competing.submitted_at = Some(now);
        storage.insert_before_next_create(competing);

        let saved = env
            .engine
            .submissions
            .submit(&Caller::student(20), assignment.id, 20, essay("mine"))
            .await
            .unwrap();
        assert_eq!(storage.submission_creates(), 1);
        assert_eq!(saved.content.as_deref(), Some("mine"));
        assert_eq!(saved.status, SubmissionStatus::Submitted);
        assert_eq!(saved.attempt_number, 2);

        let rows = storage
            .list_submissions(SubmissionListQuery {
                assignment_id: Some(assignment.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, saved.id);
        assert_eq!(rows[0].content.as_deref(), Some("mine"));
    }

    #[tokio::test]
    async fn test_create_failure_without_conflict_is_not_retried() {
        let (env, storage) = intercepted_env().await;
        let assignment = env
            .engine
            .assignments
            .create_assignment(
                &Caller::teacher(5),
                assignment_request(AssignmentType::Essay, env.clock.now() + Duration::days(1)),
            )
            .await
            .unwrap();

        storage.fail_submission_creates(true);
        let err = env
            .engine
            .submissions
            .submit(&Caller::student(20), assignment.id, 20, essay("mine"))
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::DatabaseOperation(_)));
        assert_eq!(storage.submission_creates(), 1);
        assert!(storage
            .find_submission_row(assignment.id, 20)
            .await
            .unwrap()
            .is_none());
    }
}
