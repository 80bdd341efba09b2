use serde::Deserialize;

use crate::models::attachments::entities::AttachmentUpload;
use crate::models::submissions::entities::SubmissionStatus;

/// 提交 / 保存草稿的内容
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionPayload {
    pub content: Option<String>,      // essay
    pub mcq_answers: Option<Vec<i64>>, // mcq，按题序的选项下标
    #[serde(default)]
    pub attachments: Vec<AttachmentUpload>, // file_upload / essay
}

/// 评分请求
#[derive(Debug, Clone, Deserialize)]
pub struct GradeSubmissionRequest {
    pub score: f64,
    pub feedback: Option<String>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone, Default)]
pub struct SubmissionListQuery {
    pub assignment_id: Option<i64>,
    pub student_id: Option<i64>,
    pub status: Option<SubmissionStatus>,
}
