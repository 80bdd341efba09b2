//! 附件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_type: String,
    pub owner_id: i64,
    pub file_name: String,
    // 磁盘上的文件名（uuid）
    pub stored_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_by: i64,
    pub uploaded_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_attachment(self) -> crate::errors::Result<crate::models::attachments::entities::Attachment> {
        use super::from_ts;
        use crate::errors::HWSystemError;
        use crate::models::attachments::entities::{Attachment, Owner};

        let owner = Owner::from_parts(&self.owner_type, self.owner_id).ok_or_else(|| {
            HWSystemError::serialization(format!("未知的附件归属类型: {}", self.owner_type))
        })?;

        Ok(Attachment {
            id: self.id,
            owner,
            file_name: self.file_name,
            content_type: self.content_type,
            size_bytes: self.size_bytes,
            uploaded_by: self.uploaded_by,
            uploaded_at: from_ts(self.uploaded_at),
        })
    }
}
