//! 成绩台账存储操作

use super::SeaOrmStorage;
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::errors::{HWSystemError, Result};
use crate::models::grades::{entities::Grade, requests::GradeQuery};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

fn to_active_model(grade: &Grade) -> ActiveModel {
    ActiveModel {
        student_id: Set(grade.student_id),
        subject_id: Set(grade.subject_id),
        class_id: Set(grade.class_id),
        grade_value: Set(grade.grade_value),
        grade_type: Set(grade.grade_type.to_string()),
        weight: Set(grade.weight),
        term: Set(grade.term.to_string()),
        academic_year: Set(grade.academic_year.clone()),
        remarks: Set(grade.remarks.clone()),
        recorded_by: Set(grade.recorded_by),
        recorded_at: Set(grade.recorded_at.timestamp()),
        is_active: Set(grade.is_active),
        updated_at: Set(grade.updated_at.timestamp()),
        deleted_at: Set(grade.deleted_at.map(|t| t.timestamp())),
        ..Default::default()
    }
}

impl SeaOrmStorage {
    /// 录入成绩
    pub async fn create_grade_impl(&self, grade: Grade) -> Result<Grade> {
        let result = to_active_model(&grade)
            .insert(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("创建成绩失败: {e}")))?;

        result.into_grade()
    }

    /// 通过 ID 获取成绩
    pub async fn get_grade_by_id_impl(&self, grade_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(grade_id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询成绩失败: {e}")))?;

        result.map(|m| m.into_grade()).transpose()
    }

    /// 更新成绩（整行写回）
    pub async fn update_grade_impl(&self, grade: &Grade) -> Result<Grade> {
        let mut model = to_active_model(grade);
        model.id = Set(grade.id);

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("更新成绩失败: {e}")))?;

        result.into_grade()
    }

    /// 按范围列出成绩
    pub async fn list_grades_impl(&self, query: GradeQuery) -> Result<Vec<Grade>> {
        let mut select = Grades::find().filter(Column::DeletedAt.is_null());

        if query.active_only {
            select = select.filter(Column::IsActive.eq(true));
        }

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        if let Some(term) = query.term {
            select = select.filter(Column::Term.eq(term.as_str()));
        }

        if let Some(academic_year) = query.academic_year {
            select = select.filter(Column::AcademicYear.eq(academic_year));
        }

        if let Some(grade_type) = query.grade_type {
            select = select.filter(Column::GradeType.eq(grade_type.to_string()));
        }

        let models = select
            .order_by_asc(Column::RecordedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询成绩列表失败: {e}")))?;

        models.into_iter().map(|m| m.into_grade()).collect()
    }
}
