use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 提交状态：draft -> submitted -> graded -> returned
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Draft,     // 草稿
    Submitted, // 已提交
    Graded,    // 已评分
    Returned,  // 已发还
}

impl SubmissionStatus {
    pub const DRAFT: &'static str = "draft";
    pub const SUBMITTED: &'static str = "submitted";
    pub const GRADED: &'static str = "graded";
    pub const RETURNED: &'static str = "returned";

    /// 可以（重新）评分的状态
    pub fn is_gradable(&self) -> bool {
        matches!(self, SubmissionStatus::Submitted | SubmissionStatus::Graded)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Draft => write!(f, "{}", SubmissionStatus::DRAFT),
            SubmissionStatus::Submitted => write!(f, "{}", SubmissionStatus::SUBMITTED),
            SubmissionStatus::Graded => write!(f, "{}", SubmissionStatus::GRADED),
            SubmissionStatus::Returned => write!(f, "{}", SubmissionStatus::RETURNED),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SubmissionStatus::DRAFT => Ok(SubmissionStatus::Draft),
            SubmissionStatus::SUBMITTED => Ok(SubmissionStatus::Submitted),
            SubmissionStatus::GRADED => Ok(SubmissionStatus::Graded),
            SubmissionStatus::RETURNED => Ok(SubmissionStatus::Returned),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

/// 学生对某作业的唯一提交行（重复提交复用同一行）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub mcq_answers: Vec<i64>,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub status: SubmissionStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub graded_at: Option<DateTime<Utc>>,
    // None 且已评分表示系统自动评分
    pub graded_by: Option<i64>,
    // 仅在进入 submitted 时计算一次
    pub is_late: bool,
    pub attempt_number: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Submission {
    /// 是否曾经正式提交过（草稿不算）
    pub fn has_been_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// 清空上一轮的评分信息
    pub fn clear_grading(&mut self) {
        self.grade = None;
        self.feedback = None;
        self.graded_at = None;
        self.graded_by = None;
    }
}
