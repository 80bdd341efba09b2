//! 附件元数据存储操作

use super::SeaOrmStorage;
use crate::entity::attachments::{ActiveModel, Column, Entity as Attachments};
use crate::errors::{HWSystemError, Result};
use crate::models::attachments::entities::{Attachment, Owner};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 记录附件
    pub async fn create_attachment_impl(
        &self,
        attachment: Attachment,
        stored_name: &str,
    ) -> Result<Attachment> {
        let model = ActiveModel {
            id: Set(attachment.id),
            owner_type: Set(attachment.owner.owner_type().to_string()),
            owner_id: Set(attachment.owner.owner_id()),
            file_name: Set(attachment.file_name),
            stored_name: Set(stored_name.to_string()),
            content_type: Set(attachment.content_type),
            size_bytes: Set(attachment.size_bytes),
            uploaded_by: Set(attachment.uploaded_by),
            uploaded_at: Set(attachment.uploaded_at.timestamp()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("记录附件失败: {e}")))?;

        result.into_attachment()
    }

    /// 列出某归属下的附件（按上传顺序）
    pub async fn list_attachments_by_owner_impl(&self, owner: Owner) -> Result<Vec<Attachment>> {
        let models = Attachments::find()
            .filter(Column::OwnerType.eq(owner.owner_type()))
            .filter(Column::OwnerId.eq(owner.owner_id()))
            .order_by_asc(Column::UploadedAt)
            .order_by_asc(Column::StoredName)
            .all(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询附件失败: {e}")))?;

        models.into_iter().map(|m| m.into_attachment()).collect()
    }

    /// 删除附件记录
    pub async fn delete_attachment_impl(&self, attachment_id: &str) -> Result<Option<String>> {
        let existing = Attachments::find_by_id(attachment_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询附件失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        Attachments::delete_by_id(attachment_id.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("删除附件失败: {e}")))?;

        Ok(Some(existing.stored_name))
    }
}
