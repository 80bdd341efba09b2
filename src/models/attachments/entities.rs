use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 附件归属（多态归属的强类型表示）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "owner_type", content = "owner_id", rename_all = "snake_case")]
pub enum Owner {
    Lesson(i64),
    Assignment(i64),
    Submission(i64),
}

impl Owner {
    pub const LESSON: &'static str = "lesson";
    pub const ASSIGNMENT: &'static str = "assignment";
    pub const SUBMISSION: &'static str = "submission";

    pub fn owner_type(&self) -> &'static str {
        match self {
            Owner::Lesson(_) => Owner::LESSON,
            Owner::Assignment(_) => Owner::ASSIGNMENT,
            Owner::Submission(_) => Owner::SUBMISSION,
        }
    }

    pub fn owner_id(&self) -> i64 {
        match self {
            Owner::Lesson(id) | Owner::Assignment(id) | Owner::Submission(id) => *id,
        }
    }

    /// 从存储中的 (owner_type, owner_id) 还原
    pub fn from_parts(owner_type: &str, owner_id: i64) -> Option<Self> {
        match owner_type {
            Owner::LESSON => Some(Owner::Lesson(owner_id)),
            Owner::ASSIGNMENT => Some(Owner::Assignment(owner_id)),
            Owner::SUBMISSION => Some(Owner::Submission(owner_id)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.owner_type(), self.owner_id())
    }
}

/// 附件元数据（上传方提供）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttachmentMetadata {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_by: i64,
}

/// 附件记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    // 不透明的附件标识
    pub id: String,
    pub owner: Owner,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_by: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// 提交时随附的待上传文件
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AttachmentUpload {
    pub fn size_bytes(&self) -> i64 {
        self.bytes.len() as i64
    }
}
