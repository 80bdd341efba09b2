//! 测试用的装配工具：内存 SQLite + 固定时钟 + 内存附件存储

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Notify;

use super::AssessmentEngine;
use crate::cache::AssignmentPolicyCache;
use crate::config::AssessmentConfig;
use crate::errors::{HWSystemError, Result};
use crate::models::assignments::entities::{
    Assignment, AssignmentStatus, AssignmentType, McqQuestion,
};
use crate::models::assignments::requests::{AssignmentListQuery, CreateAssignmentRequest};
use crate::models::attachments::entities::{Attachment, AttachmentMetadata, AttachmentUpload, Owner};
use crate::models::grades::entities::Grade;
use crate::models::grades::requests::GradeQuery;
use crate::models::submissions::entities::Submission;
use crate::models::submissions::requests::SubmissionListQuery;
use crate::storage::sea_orm_storage::SeaOrmStorage;
use crate::storage::{AttachmentStore, Storage};
use crate::utils::FixedClock;
pub use crate::utils::Clock;

/// 内存附件存储，可模拟写入失败
#[derive(Default)]
pub struct MemoryAttachmentStore {
    items: Mutex<HashMap<String, Attachment>>,
    seq: AtomicUsize,
    fail_after: Mutex<Option<usize>>,
    failing: AtomicBool,
}

impl MemoryAttachmentStore {
    /// 之后的所有 put 都失败
    pub fn fail_puts(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// 成功 n 次后开始失败
    pub fn fail_after(&self, n: usize) {
        *self.fail_after.lock().unwrap() = Some(n);
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl AttachmentStore for MemoryAttachmentStore {
    async fn put_attachment(
        &self,
        owner: Owner,
        bytes: Vec<u8>,
        metadata: AttachmentMetadata,
    ) -> Result<String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HWSystemError::file_operation("attachment store unavailable"));
        }
        {
            let mut fail_after = self.fail_after.lock().unwrap();
            if let Some(remaining) = fail_after.as_mut() {
                if *remaining == 0 {
                    return Err(HWSystemError::file_operation("attachment store unavailable"));
                }
                *remaining -= 1;
            }
        }

        let n = self.seq.fetch_add(1, Ordering::SeqCst);
        let id = format!("att-{n}");
        let attachment = Attachment {
            id: id.clone(),
            owner,
            file_name: metadata.file_name,
            content_type: metadata.content_type,
            size_bytes: bytes.len() as i64,
            uploaded_by: metadata.uploaded_by,
            uploaded_at: Utc::now(),
        };
        self.items.lock().unwrap().insert(id.clone(), attachment);
        Ok(id)
    }

    async fn list_attachments(&self, owner: Owner) -> Result<Vec<Attachment>> {
        let mut items: Vec<Attachment> = self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.owner == owner)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    async fn remove_attachment(&self, attachment_id: &str) -> Result<bool> {
        Ok(self.items.lock().unwrap().remove(attachment_id).is_some())
    }
}

/// 包装真实存储，用于制造并发交错和写入失败
pub struct InterceptingStorage {
    inner: Arc<dyn Storage>,
    hold_assignment_read: AtomicBool,
    assignment_read: Notify,
    assignment_release: Notify,
    competing_row: Mutex<Option<Submission>>,
    fail_submission_creates: AtomicBool,
    submission_creates: AtomicUsize,
}

impl InterceptingStorage {
    pub fn new(inner: Arc<dyn Storage>) -> Self {
        Self {
            inner,
            hold_assignment_read: AtomicBool::new(false),
            assignment_read: Notify::new(),
            assignment_release: Notify::new(),
            competing_row: Mutex::new(None),
            fail_submission_creates: AtomicBool::new(false),
            submission_creates: AtomicUsize::new(0),
        }
    }

    /// 下一次按 id 读取作业在读完之后暂停，直到 `release_assignment_read`
    pub fn hold_next_assignment_read(&self) {
        self.hold_assignment_read.store(true, Ordering::SeqCst);
    }

    /// 等待被暂停的读取完成
    pub async fn assignment_read_held(&self) {
        self.assignment_read.notified().await;
    }

    pub fn release_assignment_read(&self) {
        self.assignment_release.notify_one();
    }

    /// 下一次查找提交行返回空之前，先以“另一个请求”的身份写入这一行
    pub fn insert_before_next_create(&self, row: Submission) {
        *self.competing_row.lock().unwrap() = Some(row);
    }

    pub fn fail_submission_creates(&self, failing: bool) {
        self.fail_submission_creates.store(failing, Ordering::SeqCst);
    }

    pub fn submission_creates(&self) -> usize {
        self.submission_creates.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Storage for InterceptingStorage {
    async fn create_assignment(&self, assignment: Assignment) -> Result<Assignment> {
        self.inner.create_assignment(assignment).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        let result = self.inner.get_assignment_by_id(id).await;
        if self.hold_assignment_read.swap(false, Ordering::SeqCst) {
            self.assignment_read.notify_one();
            self.assignment_release.notified().await;
        }
        result
    }

    async fn get_assignment_with_deleted(&self, id: i64) -> Result<Option<Assignment>> {
        self.inner.get_assignment_with_deleted(id).await
    }

    async fn update_assignment(&self, assignment: &Assignment) -> Result<Assignment> {
        self.inner.update_assignment(assignment).await
    }

    async fn list_assignments(&self, query: AssignmentListQuery) -> Result<Vec<Assignment>> {
        self.inner.list_assignments(query).await
    }

    async fn create_submission(&self, submission: Submission) -> Result<Submission> {
        self.submission_creates.fetch_add(1, Ordering::SeqCst);
        if self.fail_submission_creates.load(Ordering::SeqCst) {
            return Err(HWSystemError::database_operation("创建提交失败: connection reset"));
        }
        self.inner.create_submission(submission).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.inner.get_submission_by_id(id).await
    }

    async fn find_submission_row(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let found = self.inner.find_submission_row(assignment_id, student_id).await?;
        if found.is_none() {
            let competing = self.competing_row.lock().unwrap().take();
            if let Some(row) = competing {
                self.inner.create_submission(row).await?;
            }
        }
        Ok(found)
    }

    async fn update_submission(&self, submission: &Submission) -> Result<Submission> {
        self.inner.update_submission(submission).await
    }

    async fn purge_submission(&self, id: i64) -> Result<bool> {
        self.inner.purge_submission(id).await
    }

    async fn list_submissions(&self, query: SubmissionListQuery) -> Result<Vec<Submission>> {
        self.inner.list_submissions(query).await
    }

    async fn create_grade(&self, grade: Grade) -> Result<Grade> {
        self.inner.create_grade(grade).await
    }

    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>> {
        self.inner.get_grade_by_id(id).await
    }

    async fn update_grade(&self, grade: &Grade) -> Result<Grade> {
        self.inner.update_grade(grade).await
    }

    async fn list_grades(&self, query: GradeQuery) -> Result<Vec<Grade>> {
        self.inner.list_grades(query).await
    }

    async fn create_attachment(
        &self,
        attachment: Attachment,
        stored_name: &str,
    ) -> Result<Attachment> {
        self.inner.create_attachment(attachment, stored_name).await
    }

    async fn list_attachments_by_owner(&self, owner: Owner) -> Result<Vec<Attachment>> {
        self.inner.list_attachments_by_owner(owner).await
    }

    async fn delete_attachment(&self, id: &str) -> Result<Option<String>> {
        self.inner.delete_attachment(id).await
    }
}

pub struct TestEnv {
    pub engine: AssessmentEngine,
    pub clock: Arc<FixedClock>,
    pub attachments: Arc<MemoryAttachmentStore>,
    pub storage: Arc<dyn Storage>,
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// 以给定时间为“现在”搭建一套引擎
pub async fn env_at(now: DateTime<Utc>) -> TestEnv {
    let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
    env_on(now, storage)
}

/// 在指定的存储上搭建引擎
pub fn env_on(now: DateTime<Utc>, storage: Arc<dyn Storage>) -> TestEnv {
    let clock = Arc::new(FixedClock::new(now));
    let attachments = Arc::new(MemoryAttachmentStore::default());
    let engine = AssessmentEngine::new(
        storage.clone(),
        attachments.clone(),
        clock.clone(),
        AssignmentPolicyCache::default(),
        AssessmentConfig::default(),
    );
    TestEnv {
        engine,
        clock,
        attachments,
        storage,
    }
}

pub async fn env() -> TestEnv {
    env_at(at(2025, 1, 1, 8, 0)).await
}

pub fn mcq_bank(key: &[usize]) -> Vec<McqQuestion> {
    key.iter()
        .enumerate()
        .map(|(i, correct)| McqQuestion {
            question_text: format!("Question {}", i + 1),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_option_index: *correct,
        })
        .collect()
}

pub fn assignment_request(
    assignment_type: AssignmentType,
    due_date: DateTime<Utc>,
) -> CreateAssignmentRequest {
    CreateAssignmentRequest {
        class_id: 1,
        subject_id: 10,
        title: "Unit test".to_string(),
        description: None,
        assignment_type,
        due_date,
        max_grade: None,
        status: Some(AssignmentStatus::Published),
        auto_grade: false,
        mcq_questions: if assignment_type == AssignmentType::Mcq {
            mcq_bank(&[0, 1, 2, 0])
        } else {
            Vec::new()
        },
        allowed_file_types: None,
        max_file_size_bytes: None,
    }
}

pub fn pdf_upload(name: &str, size: usize) -> AttachmentUpload {
    let mut bytes = b"%PDF-1.7".to_vec();
    bytes.resize(size.max(8), b'x');
    AttachmentUpload {
        file_name: name.to_string(),
        content_type: "application/pdf".to_string(),
        bytes,
    }
}
