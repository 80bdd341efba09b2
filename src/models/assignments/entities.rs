use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 作业类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentType {
    Essay,      // 问答/作文
    Mcq,        // 单选题
    FileUpload, // 文件上传
}

impl AssignmentType {
    pub const ESSAY: &'static str = "essay";
    pub const MCQ: &'static str = "mcq";
    pub const FILE_UPLOAD: &'static str = "file_upload";

    /// 是否适用文件策略（允许类型、大小上限）
    pub fn accepts_files(&self) -> bool {
        matches!(self, AssignmentType::Essay | AssignmentType::FileUpload)
    }
}

impl std::fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentType::Essay => write!(f, "{}", AssignmentType::ESSAY),
            AssignmentType::Mcq => write!(f, "{}", AssignmentType::MCQ),
            AssignmentType::FileUpload => write!(f, "{}", AssignmentType::FILE_UPLOAD),
        }
    }
}

impl std::str::FromStr for AssignmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AssignmentType::ESSAY => Ok(AssignmentType::Essay),
            AssignmentType::MCQ => Ok(AssignmentType::Mcq),
            AssignmentType::FILE_UPLOAD => Ok(AssignmentType::FileUpload),
            _ => Err(format!("Invalid assignment type: {s}")),
        }
    }
}

// 作业状态：draft -> published -> closed（单向）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Draft,
    Published,
    Closed,
}

impl AssignmentStatus {
    pub const DRAFT: &'static str = "draft";
    pub const PUBLISHED: &'static str = "published";
    pub const CLOSED: &'static str = "closed";
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentStatus::Draft => write!(f, "{}", AssignmentStatus::DRAFT),
            AssignmentStatus::Published => write!(f, "{}", AssignmentStatus::PUBLISHED),
            AssignmentStatus::Closed => write!(f, "{}", AssignmentStatus::CLOSED),
        }
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AssignmentStatus::DRAFT => Ok(AssignmentStatus::Draft),
            AssignmentStatus::PUBLISHED => Ok(AssignmentStatus::Published),
            AssignmentStatus::CLOSED => Ok(AssignmentStatus::Closed),
            _ => Err(format!("Invalid assignment status: {s}")),
        }
    }
}

/// 单选题（题库中的一题）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct McqQuestion {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    // 唯一 ID
    pub id: i64,
    // 所属班级与科目
    pub class_id: i64,
    pub subject_id: i64,
    // 创建者（教师/管理员）
    pub created_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub assignment_type: AssignmentType,
    pub due_date: DateTime<Utc>,
    pub max_grade: f64,
    pub status: AssignmentStatus,
    // 仅对 mcq 有意义
    pub auto_grade: bool,
    pub mcq_questions: Vec<McqQuestion>,
    // 逗号分隔的扩展名白名单（小写、无点号），None 表示不限
    pub allowed_file_types: Option<String>,
    pub max_file_size_bytes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Assignment {
    pub fn is_closed(&self) -> bool {
        self.status == AssignmentStatus::Closed
    }

    /// 提交时是否需要自动评分
    pub fn auto_grades(&self) -> bool {
        self.assignment_type == AssignmentType::Mcq && self.auto_grade
    }

    /// 扩展名白名单
    pub fn allowed_extensions(&self) -> Vec<&str> {
        self.allowed_file_types
            .as_deref()
            .map(|types| types.split(',').filter(|t| !t.is_empty()).collect())
            .unwrap_or_default()
    }

    pub fn allows_extension(&self, extension: &str) -> bool {
        let allowed = self.allowed_extensions();
        allowed.is_empty() || allowed.contains(&extension)
    }
}
