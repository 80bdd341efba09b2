use super::SubmissionService;
use crate::errors::Result;
use crate::models::submissions::entities::SubmissionStatus;
use crate::models::submissions::requests::SubmissionListQuery;
use crate::models::submissions::responses::{AssignmentStats, ScoreStats};
use crate::models::users::entities::Caller;
use crate::services::permissions::require_staff;
use crate::utils::round_half_up;

/// 作业提交统计：各状态数量、迟交数量以及已评分提交的分数分布
pub async fn assignment_stats(
    service: &SubmissionService,
    caller: &Caller,
    assignment_id: i64,
) -> Result<AssignmentStats> {
    require_staff(caller)?;
    service.load_policy(assignment_id).await?;

    let submissions = service
        .storage
        .list_submissions(SubmissionListQuery {
            assignment_id: Some(assignment_id),
            ..Default::default()
        })
        .await?;

    let mut stats = AssignmentStats {
        assignment_id,
        draft_count: 0,
        submitted_count: 0,
        graded_count: 0,
        returned_count: 0,
        late_count: 0,
        score_stats: None,
    };
    let mut scores = Vec::new();

    for submission in &submissions {
        match submission.status {
            SubmissionStatus::Draft => stats.draft_count += 1,
            SubmissionStatus::Submitted => stats.submitted_count += 1,
            SubmissionStatus::Graded => stats.graded_count += 1,
            SubmissionStatus::Returned => stats.returned_count += 1,
        }
        if submission.is_late && submission.status != SubmissionStatus::Draft {
            stats.late_count += 1;
        }
        if matches!(
            submission.status,
            SubmissionStatus::Graded | SubmissionStatus::Returned
        ) && let Some(grade) = submission.grade
        {
            scores.push(grade);
        }
    }

    if !scores.is_empty() {
        let sum: f64 = scores.iter().sum();
        stats.score_stats = Some(ScoreStats {
            average: round_half_up(sum / scores.len() as f64, 2),
            max: scores.iter().copied().fold(f64::MIN, f64::max),
            min: scores.iter().copied().fold(f64::MAX, f64::min),
        });
    }

    Ok(stats)
}
