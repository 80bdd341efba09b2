use std::sync::Arc;

use tracing::debug;

use crate::errors::Result;
use crate::models::attachments::entities::{Attachment, Owner};
use crate::storage::AttachmentStore;

/// 附件引用解析：按归属查询附件元数据（只读）
pub struct AttachmentResolver {
    store: Arc<dyn AttachmentStore>,
}

impl AttachmentResolver {
    pub fn new(store: Arc<dyn AttachmentStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, owner: Owner) -> Result<Vec<Attachment>> {
        let attachments = self.store.list_attachments(owner).await?;
        debug!("{} 关联附件 {} 个", owner, attachments.len());
        Ok(attachments)
    }
}
