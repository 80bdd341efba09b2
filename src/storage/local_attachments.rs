//! 本地磁盘附件存储
//!
//! 文件内容写入上传目录（uuid 文件名），元数据记录到 `Storage`。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use super::{AttachmentStore, Storage};
use crate::config::AppConfig;
use crate::errors::{HWSystemError, Result};
use crate::models::attachments::entities::{Attachment, AttachmentMetadata, Owner};
use crate::utils::validate::file_extension;
use crate::utils::{Clock, content_matches_extension};

pub struct LocalAttachmentStore {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    dir: PathBuf,
    max_size: usize, // 全局硬上限
}

impl LocalAttachmentStore {
    pub fn new(
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        dir: impl Into<PathBuf>,
        max_size: usize,
    ) -> Self {
        Self {
            storage,
            clock,
            dir: dir.into(),
            max_size,
        }
    }

    /// 使用全局配置中的上传目录与大小上限
    pub fn from_config(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        let config = AppConfig::get();
        Self::new(storage, clock, &config.upload.dir, config.upload.max_size)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 确保上传目录存在
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            HWSystemError::file_operation(format!(
                "创建上传目录失败 {}: {e}",
                self.dir.display()
            ))
        })
    }
}

#[async_trait::async_trait]
impl AttachmentStore for LocalAttachmentStore {
    async fn put_attachment(
        &self,
        owner: Owner,
        bytes: Vec<u8>,
        metadata: AttachmentMetadata,
    ) -> Result<String> {
        if bytes.len() > self.max_size {
            return Err(HWSystemError::validation_on(
                "attachments",
                format!(
                    "File '{}' exceeds the upload limit of {} bytes",
                    metadata.file_name, self.max_size
                ),
            ));
        }

        let extension = file_extension(&metadata.file_name).ok_or_else(|| {
            HWSystemError::validation_on(
                "attachments",
                format!("File '{}' has no extension", metadata.file_name),
            )
        })?;

        // 文件头必须与扩展名一致
        if !content_matches_extension(&bytes, &extension) {
            return Err(HWSystemError::validation_on(
                "attachments",
                format!(
                    "Content of '{}' does not match its extension",
                    metadata.file_name
                ),
            ));
        }

        self.ensure_dir().await?;

        let id = Uuid::new_v4().to_string();
        let stored_name = format!("{id}.{extension}");
        let path = self.dir.join(&stored_name);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| HWSystemError::file_operation(format!("写入附件失败: {e}")))?;

        let attachment = Attachment {
            id: id.clone(),
            owner,
            file_name: metadata.file_name,
            content_type: metadata.content_type,
            size_bytes: bytes.len() as i64,
            uploaded_by: metadata.uploaded_by,
            uploaded_at: self.clock.now(),
        };

        // 元数据记录失败时清理已写入的文件
        if let Err(e) = self.storage.create_attachment(attachment, &stored_name).await {
            if let Err(io_err) = tokio::fs::remove_file(&path).await {
                warn!("清理附件文件失败 {}: {io_err}", path.display());
            }
            return Err(e);
        }

        debug!("附件 {} 已保存到 {}", id, owner);
        Ok(id)
    }

    async fn list_attachments(&self, owner: Owner) -> Result<Vec<Attachment>> {
        self.storage.list_attachments_by_owner(owner).await
    }

    async fn remove_attachment(&self, attachment_id: &str) -> Result<bool> {
        let Some(stored_name) = self.storage.delete_attachment(attachment_id).await? else {
            return Ok(false);
        };

        match tokio::fs::remove_file(self.dir.join(&stored_name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(HWSystemError::file_operation(format!("删除附件文件失败: {e}"))),
        }
    }
}
