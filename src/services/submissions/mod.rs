pub mod delete;
pub mod detail;
pub mod draft;
pub mod grade;
pub mod release;
pub mod stats;
pub mod submit;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, warn};

use crate::cache::AssignmentPolicyCache;
use crate::errors::{HWSystemError, Result};
use crate::models::assignments::entities::{Assignment, AssignmentStatus};
use crate::models::attachments::entities::{AttachmentMetadata, AttachmentUpload, Owner};
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::submissions::requests::{GradeSubmissionRequest, SubmissionPayload};
use crate::models::submissions::responses::{AssignmentStats, SubmissionDetail};
use crate::models::users::entities::Caller;
use crate::storage::{AttachmentStore, Storage};
use crate::utils::Clock;
use crate::utils::validate::file_extension;

/// 提交生命周期：draft -> submitted -> graded -> returned
pub struct SubmissionService {
    storage: Arc<dyn Storage>,
    cache: AssignmentPolicyCache,
    attachments: Arc<dyn AttachmentStore>,
    clock: Arc<dyn Clock>,
}

impl SubmissionService {
    pub fn new(
        storage: Arc<dyn Storage>,
        cache: AssignmentPolicyCache,
        attachments: Arc<dyn AttachmentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            storage,
            cache,
            attachments,
            clock,
        }
    }

    /// 正式提交（客观题且开启自动评分时直接进入 graded）
    pub async fn submit(
        &self,
        caller: &Caller,
        assignment_id: i64,
        student_id: i64,
        payload: SubmissionPayload,
    ) -> Result<Submission> {
        submit::submit(self, caller, assignment_id, student_id, payload).await
    }

    /// 保存草稿，不做完整性校验
    pub async fn save_draft(
        &self,
        caller: &Caller,
        assignment_id: i64,
        student_id: i64,
        payload: SubmissionPayload,
    ) -> Result<Submission> {
        draft::save_draft(self, caller, assignment_id, student_id, payload).await
    }

    /// 评分 / 重新评分
    pub async fn grade(
        &self,
        caller: &Caller,
        submission_id: i64,
        req: GradeSubmissionRequest,
    ) -> Result<Submission> {
        grade::grade_submission(self, caller, submission_id, req).await
    }

    /// 发还评分结果（仅 graded 可发还）
    pub async fn return_submission(&self, caller: &Caller, submission_id: i64) -> Result<Submission> {
        release::return_submission(self, caller, submission_id).await
    }

    /// 撤回提交（软删除）
    pub async fn withdraw(&self, caller: &Caller, submission_id: i64) -> Result<()> {
        delete::withdraw_submission(self, caller, submission_id).await
    }

    /// 获取提交详情
    pub async fn get_submission(
        &self,
        caller: &Caller,
        submission_id: i64,
    ) -> Result<SubmissionDetail> {
        detail::get_submission(self, caller, submission_id).await
    }

    /// 获取学生在某作业下的提交
    pub async fn get_student_submission(
        &self,
        caller: &Caller,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<SubmissionDetail> {
        detail::get_student_submission(self, caller, assignment_id, student_id).await
    }

    /// 列出作业的提交
    pub async fn list_submissions(
        &self,
        caller: &Caller,
        assignment_id: i64,
        status: Option<SubmissionStatus>,
    ) -> Result<Vec<Submission>> {
        detail::list_submissions(self, caller, assignment_id, status).await
    }

    /// 作业提交统计
    pub async fn assignment_stats(
        &self,
        caller: &Caller,
        assignment_id: i64,
    ) -> Result<AssignmentStats> {
        stats::assignment_stats(self, caller, assignment_id).await
    }

    // 经缓存读取作业策略
    async fn load_policy(&self, assignment_id: i64) -> Result<Arc<Assignment>> {
        self.cache
            .get_or_load(self.storage.as_ref(), assignment_id)
            .await?
            .ok_or_else(|| crate::services::assignments::not_found(assignment_id))
    }

    async fn load_submission(&self, submission_id: i64) -> Result<Submission> {
        self.storage
            .get_submission_by_id(submission_id)
            .await?
            .ok_or_else(|| {
                HWSystemError::not_found_on(
                    "submission_id",
                    format!("提交不存在: {submission_id}"),
                )
            })
    }

    /// 按 (作业, 学生) 写入唯一的提交行
    ///
    /// 返回写入前的快照（用于补偿）和写入后的行。并发创建撞上唯一索引时，
    /// 重新读取已存在的行再写一次；创建失败但行并不存在时直接返回原错误。
    async fn upsert_row<F>(
        &self,
        assignment_id: i64,
        student_id: i64,
        build: F,
    ) -> Result<(Option<Submission>, Submission)>
    where
        F: Fn(Option<&Submission>) -> Result<Submission>,
    {
        let mut retried = false;
        loop {
            let previous = self
                .storage
                .find_submission_row(assignment_id, student_id)
                .await?;
            let next = build(previous.as_ref())?;

            let saved = match previous {
                Some(_) => self.storage.update_submission(&next).await?,
                None => match self.storage.create_submission(next).await {
                    Ok(saved) => saved,
                    Err(e) if !retried => {
                        // 只有行已被并发创建时才重试，其他失败原样返回
                        if self
                            .storage
                            .find_submission_row(assignment_id, student_id)
                            .await?
                            .is_none()
                        {
                            return Err(e);
                        }
                        warn!(
                            "创建提交行失败，重新读取后重试 (作业 {}, 学生 {}): {}",
                            assignment_id, student_id, e
                        );
                        retried = true;
                        continue;
                    }
                    Err(e) => return Err(e),
                },
            };
            return Ok((previous, saved));
        }
    }

    /// 保存附件；任何一个失败都会撤销本次已保存的附件
    async fn store_uploads(
        &self,
        submission: &Submission,
        uploads: Vec<AttachmentUpload>,
    ) -> Result<Vec<String>> {
        let owner = Owner::Submission(submission.id);
        let mut stored = Vec::with_capacity(uploads.len());

        for upload in uploads {
            let metadata = AttachmentMetadata {
                size_bytes: upload.size_bytes(),
                file_name: upload.file_name,
                content_type: upload.content_type,
                uploaded_by: submission.student_id,
            };
            match self
                .attachments
                .put_attachment(owner, upload.bytes, metadata)
                .await
            {
                Ok(id) => stored.push(id),
                Err(e) => {
                    for id in &stored {
                        if let Err(remove_err) = self.attachments.remove_attachment(id).await {
                            error!("撤销附件 {} 失败: {}", id, remove_err);
                        }
                    }
                    return Err(e);
                }
            }
        }

        Ok(stored)
    }

    /// 把提交行恢复到写入前的快照；原本不存在则删除
    async fn rollback_row(&self, previous: Option<Submission>, written: &Submission) {
        let result = match previous {
            Some(snapshot) => self.storage.update_submission(&snapshot).await.map(|_| ()),
            None => self.storage.purge_submission(written.id).await.map(|_| ()),
        };
        match result {
            Ok(()) => warn!("提交 {} 已回滚到写入前的状态", written.id),
            Err(e) => error!("提交 {} 回滚失败: {}", written.id, e),
        }
    }
}

/// 学生对作业的新提交行
fn blank_row(assignment_id: i64, student_id: i64, now: DateTime<Utc>) -> Submission {
    Submission {
        id: 0,
        assignment_id,
        student_id,
        content: None,
        mcq_answers: Vec::new(),
        grade: None,
        feedback: None,
        status: SubmissionStatus::Draft,
        submitted_at: None,
        graded_at: None,
        graded_by: None,
        is_late: false,
        attempt_number: 1,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

/// 作业是否接受学生作答
fn ensure_accepting_work(assignment: &Assignment) -> Result<()> {
    match assignment.status {
        AssignmentStatus::Published => Ok(()),
        AssignmentStatus::Closed => Err(HWSystemError::assignment_closed(format!(
            "作业 {} 已关闭，不再接受提交",
            assignment.id
        ))),
        AssignmentStatus::Draft => Err(HWSystemError::invalid_state(format!(
            "作业 {} 尚未发布",
            assignment.id
        ))),
    }
}

/// 附件必须符合作业的文件策略（类型白名单、单文件大小）
fn check_attachment_policy(assignment: &Assignment, uploads: &[AttachmentUpload]) -> Result<()> {
    if uploads.is_empty() {
        return Ok(());
    }

    if !assignment.assignment_type.accepts_files() {
        return Err(HWSystemError::validation_on(
            "attachments",
            format!("{} assignments do not accept attachments", assignment.assignment_type),
        ));
    }

    for upload in uploads {
        if upload.bytes.is_empty() {
            return Err(HWSystemError::validation_on(
                "attachments",
                format!("File '{}' is empty", upload.file_name),
            ));
        }

        let extension = file_extension(&upload.file_name).unwrap_or_default();
        if !assignment.allows_extension(&extension) {
            return Err(HWSystemError::validation_on(
                "attachments",
                format!(
                    "File type of '{}' is not allowed, expected one of: {}",
                    upload.file_name,
                    assignment.allowed_extensions().join(", ")
                ),
            ));
        }

        if upload.size_bytes() > assignment.max_file_size_bytes {
            return Err(HWSystemError::validation_on(
                "attachments",
                format!(
                    "File '{}' exceeds the limit of {} bytes",
                    upload.file_name, assignment.max_file_size_bytes
                ),
            ));
        }
    }

    Ok(())
}
