//! 成绩台账实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
    pub grade_value: f64,
    pub grade_type: String,
    pub weight: f64,
    pub term: String,
    pub academic_year: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,
    pub recorded_by: i64,
    pub recorded_at: i64,
    pub is_active: bool,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_grade(self) -> crate::errors::Result<crate::models::grades::entities::Grade> {
        use super::{from_opt_ts, from_ts};
        use crate::errors::HWSystemError;
        use crate::models::grades::entities::{Grade, GradeType, Term};

        Ok(Grade {
            id: self.id,
            student_id: self.student_id,
            subject_id: self.subject_id,
            class_id: self.class_id,
            grade_value: self.grade_value,
            grade_type: self
                .grade_type
                .parse::<GradeType>()
                .map_err(HWSystemError::serialization)?,
            weight: self.weight,
            term: self.term.parse::<Term>().map_err(HWSystemError::serialization)?,
            academic_year: self.academic_year,
            remarks: self.remarks,
            recorded_by: self.recorded_by,
            recorded_at: from_ts(self.recorded_at),
            is_active: self.is_active,
            updated_at: from_ts(self.updated_at),
            deleted_at: from_opt_ts(self.deleted_at),
        })
    }
}
