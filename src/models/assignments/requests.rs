use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::assignments::entities::{AssignmentStatus, AssignmentType, McqQuestion};

/// 创建作业请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    pub class_id: i64,
    pub subject_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub assignment_type: AssignmentType,
    pub due_date: DateTime<Utc>, // 必须严格晚于当前时间
    pub max_grade: Option<f64>,  // 默认 10.00
    pub status: Option<AssignmentStatus>, // draft 或 published，默认 published
    #[serde(default)]
    pub auto_grade: bool,
    #[serde(default)]
    pub mcq_questions: Vec<McqQuestion>,
    pub allowed_file_types: Option<String>, // 逗号分隔，如 "pdf,docx"
    pub max_file_size_bytes: Option<i64>,
}

/// 更新作业请求（未提供的字段保持不变）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignment_type: Option<AssignmentType>,
    pub due_date: Option<DateTime<Utc>>, // 编辑时不校验是否在未来
    pub max_grade: Option<f64>,
    pub auto_grade: Option<bool>,
    pub mcq_questions: Option<Vec<McqQuestion>>,
    pub allowed_file_types: Option<String>, // 空字符串表示取消限制
    pub max_file_size_bytes: Option<i64>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone, Default)]
pub struct AssignmentListQuery {
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub status: Option<AssignmentStatus>,
    pub include_deleted: bool,
}
