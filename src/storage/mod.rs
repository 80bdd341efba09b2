use std::sync::Arc;

use crate::models::{
    assignments::{entities::Assignment, requests::AssignmentListQuery},
    attachments::entities::{Attachment, AttachmentMetadata, Owner},
    grades::{entities::Grade, requests::GradeQuery},
    submissions::{entities::Submission, requests::SubmissionListQuery},
};

use crate::errors::Result;

pub mod local_attachments;
pub mod sea_orm_storage;

pub use local_attachments::LocalAttachmentStore;

/// 持久化能力
///
/// 时间戳由服务层按注入的时钟写入，存储层不读取系统时间。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 作业管理方法
    // 创建作业（忽略传入的 id）
    async fn create_assignment(&self, assignment: Assignment) -> Result<Assignment>;
    // 通过ID获取作业（不含已删除）
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // 通过ID获取作业（包含已删除，用于恢复）
    async fn get_assignment_with_deleted(&self, id: i64) -> Result<Option<Assignment>>;
    // 整行写回作业
    async fn update_assignment(&self, assignment: &Assignment) -> Result<Assignment>;
    // 列出作业
    async fn list_assignments(&self, query: AssignmentListQuery) -> Result<Vec<Assignment>>;

    /// 提交管理方法
    // 创建提交（忽略传入的 id）
    async fn create_submission(&self, submission: Submission) -> Result<Submission>;
    // 通过ID获取提交（不含已撤回）
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 获取学生对某作业的唯一提交行（包含已撤回）
    async fn find_submission_row(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    // 整行写回提交
    async fn update_submission(&self, submission: &Submission) -> Result<Submission>;
    // 物理删除提交，仅用于失败补偿
    async fn purge_submission(&self, id: i64) -> Result<bool>;
    // 列出提交（不含已撤回）
    async fn list_submissions(&self, query: SubmissionListQuery) -> Result<Vec<Submission>>;

    /// 成绩台账方法
    // 录入成绩（忽略传入的 id）
    async fn create_grade(&self, grade: Grade) -> Result<Grade>;
    // 通过ID获取成绩（不含已撤销）
    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>>;
    // 整行写回成绩
    async fn update_grade(&self, grade: &Grade) -> Result<Grade>;
    // 列出成绩（不含已撤销）
    async fn list_grades(&self, query: GradeQuery) -> Result<Vec<Grade>>;

    /// 附件元数据方法
    // 记录附件
    async fn create_attachment(&self, attachment: Attachment, stored_name: &str)
    -> Result<Attachment>;
    // 列出某归属下的附件
    async fn list_attachments_by_owner(&self, owner: Owner) -> Result<Vec<Attachment>>;
    // 删除附件记录，返回磁盘文件名
    async fn delete_attachment(&self, id: &str) -> Result<Option<String>>;
}

/// 附件存储能力
///
/// 核心逻辑只把附件 id 当作不透明的外键，不读取文件内容。
#[async_trait::async_trait]
pub trait AttachmentStore: Send + Sync {
    async fn put_attachment(
        &self,
        owner: Owner,
        bytes: Vec<u8>,
        metadata: AttachmentMetadata,
    ) -> Result<String>;

    async fn list_attachments(&self, owner: Owner) -> Result<Vec<Attachment>>;

    // 撤销一次 put，用于提交失败时的补偿
    async fn remove_attachment(&self, attachment_id: &str) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
