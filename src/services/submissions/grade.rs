use tracing::{info, warn};

use super::SubmissionService;
use crate::errors::{HWSystemError, Result};
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::models::users::entities::Caller;
use crate::services::permissions::require_staff;
use crate::utils::round_half_up;

/// 人工评分，重复评分直接覆盖上一次的结果
pub async fn grade_submission(
    service: &SubmissionService,
    caller: &Caller,
    submission_id: i64,
    req: GradeSubmissionRequest,
) -> Result<Submission> {
    require_staff(caller)?;

    let mut submission = service.load_submission(submission_id).await?;
    if !submission.status.is_gradable() {
        warn!(
            "提交 {} 状态为 {}，拒绝评分",
            submission_id, submission.status
        );
        return Err(HWSystemError::invalid_state_on(
            "status",
            format!(
                "Submission {submission_id} is {}, only submitted or graded work can be graded",
                submission.status
            ),
        ));
    }

    let assignment = service.load_policy(submission.assignment_id).await?;
    if !req.score.is_finite() || req.score < 0.0 || req.score > assignment.max_grade {
        return Err(HWSystemError::validation_on(
            "score",
            format!(
                "Score must be within [0, {}], got {}",
                assignment.max_grade, req.score
            ),
        ));
    }

    let now = service.clock.now();
    submission.grade = Some(round_half_up(req.score, 2));
    submission.feedback = req.feedback.filter(|f| !f.trim().is_empty());
    submission.status = SubmissionStatus::Graded;
    submission.graded_at = Some(now);
    submission.graded_by = Some(caller.user_id);
    submission.updated_at = now;

    let saved = service.storage.update_submission(&submission).await?;
    info!(
        "提交 {} 已由用户 {} 评分: {:?}",
        submission_id, caller.user_id, saved.grade
    );
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use crate::errors::HWSystemError;
    use crate::models::assignments::entities::AssignmentType;
    use crate::models::submissions::entities::SubmissionStatus;
    use crate::models::submissions::requests::{GradeSubmissionRequest, SubmissionPayload};
    use crate::models::users::entities::Caller;
    use crate::services::test_support::*;

    fn score(value: f64) -> GradeSubmissionRequest {
        GradeSubmissionRequest {
            score: value,
            feedback: Some("see comments".to_string()),
        }
    }

    #[tokio::test]
    async fn test_grade_regrade_and_bounds() {
        let env = env().await;
        let teacher = Caller::teacher(5);
        let assignment = env
            .engine
            .assignments
            .create_assignment(&teacher, assignment_request(AssignmentType::Essay, env.clock.now() + Duration::days(1)))
            .await
            .unwrap();
        let student = Caller::student(20);
        let payload = SubmissionPayload {
            content: Some("essay".into()),
            ..Default::default()
        };
        let submission = env
            .engine
            .submissions
            .submit(&student, assignment.id, 20, payload)
            .await
            .unwrap();

        for bad in [-0.5, 10.01, f64::INFINITY] {
            let err = env
                .engine
                .submissions
                .grade(&teacher, submission.id, score(bad))
                .await
                .unwrap_err();
            assert_eq!(err.field(), Some("score"));
        }

        let graded = env
            .engine
            .submissions
            .grade(&teacher, submission.id, score(6.666))
            .await
            .unwrap();
        assert_eq!(graded.status, SubmissionStatus::Graded);
        assert_eq!(graded.grade, Some(6.67));
        assert_eq!(graded.graded_by, Some(5));

        // 重新评分覆盖
        let regraded = env
            .engine
            .submissions
            .grade(&Caller::admin(1), submission.id, score(10.0))
            .await
            .unwrap();
        assert_eq!(regraded.grade, Some(10.0));
        assert_eq!(regraded.graded_by, Some(1));

        let err = env
            .engine
            .submissions
            .grade(&student, submission.id, score(1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_drafts_cannot_be_graded() {
        let env = env().await;
        let teacher = Caller::teacher(5);
        let assignment = env
            .engine
            .assignments
            .create_assignment(&teacher, assignment_request(AssignmentType::Essay, env.clock.now() + Duration::days(1)))
            .await
            .unwrap();
        let draft = env
            .engine
            .submissions
            .save_draft(&Caller::student(20), assignment.id, 20, SubmissionPayload::default())
            .await
            .unwrap();

        let err = env
            .engine
            .submissions
            .grade(&teacher, draft.id, score(5.0))
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::InvalidState(_)));

        let err = env
            .engine
            .submissions
            .grade(&teacher, 999, score(5.0))
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::NotFound(_)));
    }
}
