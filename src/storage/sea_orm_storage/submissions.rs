//! 提交存储操作

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{HWSystemError, Result};
use crate::models::submissions::{entities::Submission, requests::SubmissionListQuery};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

fn to_active_model(submission: &Submission) -> Result<ActiveModel> {
    let mcq_answers = if submission.mcq_answers.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&submission.mcq_answers)?)
    };

    Ok(ActiveModel {
        assignment_id: Set(submission.assignment_id),
        student_id: Set(submission.student_id),
        content: Set(submission.content.clone()),
        mcq_answers: Set(mcq_answers),
        grade: Set(submission.grade),
        feedback: Set(submission.feedback.clone()),
        status: Set(submission.status.to_string()),
        submitted_at: Set(submission.submitted_at.map(|t| t.timestamp())),
        graded_at: Set(submission.graded_at.map(|t| t.timestamp())),
        graded_by: Set(submission.graded_by),
        is_late: Set(submission.is_late),
        attempt_number: Set(submission.attempt_number),
        created_at: Set(submission.created_at.timestamp()),
        updated_at: Set(submission.updated_at.timestamp()),
        deleted_at: Set(submission.deleted_at.map(|t| t.timestamp())),
        ..Default::default()
    })
}

impl SeaOrmStorage {
    /// 创建提交
    ///
    /// (assignment_id, student_id) 上有唯一索引，重复插入会失败。
    pub async fn create_submission_impl(&self, submission: Submission) -> Result<Submission> {
        let model = to_active_model(&submission)?;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("创建提交失败: {e}")))?;

        result.into_submission()
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, submission_id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询提交失败: {e}")))?;

        result.map(|m| m.into_submission()).transpose()
    }

    /// 获取学生对作业的提交行（包含已撤回的行）
    pub async fn find_submission_row_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询提交失败: {e}")))?;

        result.map(|m| m.into_submission()).transpose()
    }

    /// 更新提交（整行写回）
    pub async fn update_submission_impl(&self, submission: &Submission) -> Result<Submission> {
        let mut model = to_active_model(submission)?;
        model.id = Set(submission.id);

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("更新提交失败: {e}")))?;

        result.into_submission()
    }

    /// 物理删除提交
    pub async fn purge_submission_impl(&self, submission_id: i64) -> Result<bool> {
        let result = Submissions::delete_by_id(submission_id)
            .exec(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("删除提交失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 列出提交
    pub async fn list_submissions_impl(
        &self,
        query: SubmissionListQuery,
    ) -> Result<Vec<Submission>> {
        let mut select = Submissions::find().filter(Column::DeletedAt.is_null());

        // 作业筛选
        if let Some(assignment_id) = query.assignment_id {
            select = select.filter(Column::AssignmentId.eq(assignment_id));
        }

        // 学生筛选
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        // 状态筛选
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let models = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询提交列表失败: {e}")))?;

        models.into_iter().map(|m| m.into_submission()).collect()
    }
}
