//! 提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub mcq_answers: Option<String>,
    pub grade: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub status: String,
    pub submitted_at: Option<i64>,
    pub graded_at: Option<i64>,
    pub graded_by: Option<i64>,
    pub is_late: bool,
    pub attempt_number: i32,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_submission(self) -> crate::errors::Result<crate::models::submissions::entities::Submission> {
        use super::{from_opt_ts, from_ts};
        use crate::errors::HWSystemError;
        use crate::models::submissions::entities::{Submission, SubmissionStatus};

        let status = self
            .status
            .parse::<SubmissionStatus>()
            .map_err(HWSystemError::serialization)?;
        let mcq_answers: Vec<i64> = match self.mcq_answers.as_deref() {
            Some(raw) if !raw.is_empty() => serde_json::from_str(raw)?,
            _ => Vec::new(),
        };

        Ok(Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            content: self.content,
            mcq_answers,
            grade: self.grade,
            feedback: self.feedback,
            status,
            submitted_at: from_opt_ts(self.submitted_at),
            graded_at: from_opt_ts(self.graded_at),
            graded_by: self.graded_by,
            is_late: self.is_late,
            attempt_number: self.attempt_number,
            created_at: from_ts(self.created_at),
            updated_at: from_ts(self.updated_at),
            deleted_at: from_opt_ts(self.deleted_at),
        })
    }
}
