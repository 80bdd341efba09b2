use serde::Serialize;

use crate::models::attachments::entities::Attachment;
use crate::models::submissions::entities::Submission;

/// 提交详情（附带解析出的附件）
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionDetail {
    pub submission: Submission,
    pub attachments: Vec<Attachment>,
}

/// 分数统计
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoreStats {
    pub average: f64,
    pub max: f64,
    pub min: f64,
}

/// 作业提交统计
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssignmentStats {
    pub assignment_id: i64,
    pub draft_count: i64,
    pub submitted_count: i64,
    pub graded_count: i64,
    pub returned_count: i64,
    pub late_count: i64,
    // 仅统计 graded / returned 的提交
    pub score_stats: Option<ScoreStats>,
}
