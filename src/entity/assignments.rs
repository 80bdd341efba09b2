//! 作业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub created_by: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub assignment_type: String,
    pub due_date: i64,
    pub max_grade: f64,
    pub status: String,
    pub auto_grade: bool,
    // JSON 数组，保持题目顺序
    #[sea_orm(column_type = "Text", nullable)]
    pub mcq_questions: Option<String>,
    pub allowed_file_types: Option<String>,
    pub max_file_size_bytes: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_assignment(self) -> crate::errors::Result<crate::models::assignments::entities::Assignment> {
        use super::{from_opt_ts, from_ts};
        use crate::errors::HWSystemError;
        use crate::models::assignments::entities::{
            Assignment, AssignmentStatus, AssignmentType, McqQuestion,
        };

        let assignment_type = self
            .assignment_type
            .parse::<AssignmentType>()
            .map_err(HWSystemError::serialization)?;
        let status = self
            .status
            .parse::<AssignmentStatus>()
            .map_err(HWSystemError::serialization)?;
        let mcq_questions: Vec<McqQuestion> = match self.mcq_questions.as_deref() {
            Some(raw) if !raw.is_empty() => serde_json::from_str(raw)?,
            _ => Vec::new(),
        };

        Ok(Assignment {
            id: self.id,
            class_id: self.class_id,
            subject_id: self.subject_id,
            created_by: self.created_by,
            title: self.title,
            description: self.description,
            assignment_type,
            due_date: from_ts(self.due_date),
            max_grade: self.max_grade,
            status,
            auto_grade: self.auto_grade,
            mcq_questions,
            allowed_file_types: self.allowed_file_types,
            max_file_size_bytes: self.max_file_size_bytes,
            created_at: from_ts(self.created_at),
            updated_at: from_ts(self.updated_at),
            deleted_at: from_opt_ts(self.deleted_at),
        })
    }
}
