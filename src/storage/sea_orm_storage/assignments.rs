//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::{HWSystemError, Result};
use crate::models::assignments::{entities::Assignment, requests::AssignmentListQuery};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

// 业务模型 -> ActiveModel（不含 id）
fn to_active_model(assignment: &Assignment) -> Result<ActiveModel> {
    let mcq_questions = if assignment.mcq_questions.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&assignment.mcq_questions)?)
    };

    Ok(ActiveModel {
        class_id: Set(assignment.class_id),
        subject_id: Set(assignment.subject_id),
        created_by: Set(assignment.created_by),
        title: Set(assignment.title.clone()),
        description: Set(assignment.description.clone()),
        assignment_type: Set(assignment.assignment_type.to_string()),
        due_date: Set(assignment.due_date.timestamp()),
        max_grade: Set(assignment.max_grade),
        status: Set(assignment.status.to_string()),
        auto_grade: Set(assignment.auto_grade),
        mcq_questions: Set(mcq_questions),
        allowed_file_types: Set(assignment.allowed_file_types.clone()),
        max_file_size_bytes: Set(assignment.max_file_size_bytes),
        created_at: Set(assignment.created_at.timestamp()),
        updated_at: Set(assignment.updated_at.timestamp()),
        deleted_at: Set(assignment.deleted_at.map(|t| t.timestamp())),
        ..Default::default()
    })
}

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(&self, assignment: Assignment) -> Result<Assignment> {
        let model = to_active_model(&assignment)?;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("创建作业失败: {e}")))?;

        result.into_assignment()
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(
        &self,
        assignment_id: i64,
        with_deleted: bool,
    ) -> Result<Option<Assignment>> {
        let mut select = Assignments::find_by_id(assignment_id);
        if !with_deleted {
            select = select.filter(Column::DeletedAt.is_null());
        }

        let result = select
            .one(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询作业失败: {e}")))?;

        result.map(|m| m.into_assignment()).transpose()
    }

    /// 更新作业（整行写回）
    pub async fn update_assignment_impl(&self, assignment: &Assignment) -> Result<Assignment> {
        let mut model = to_active_model(assignment)?;
        model.id = Set(assignment.id);

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("更新作业失败: {e}")))?;

        result.into_assignment()
    }

    /// 列出作业
    pub async fn list_assignments_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<Vec<Assignment>> {
        let mut select = Assignments::find();

        if !query.include_deleted {
            select = select.filter(Column::DeletedAt.is_null());
        }

        // 班级筛选
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        // 科目筛选
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }

        // 状态筛选
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let models = select
            .order_by_asc(Column::DueDate)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询作业列表失败: {e}")))?;

        models.into_iter().map(|m| m.into_assignment()).collect()
    }
}
