use tracing::info;

use super::GradeService;
use crate::errors::Result;
use crate::models::users::entities::Caller;

/// 撤销成绩：软删除，不再参与任何查询和聚合
pub async fn retract_grade(service: &GradeService, caller: &Caller, grade_id: i64) -> Result<()> {
    let mut grade = service.load_for_write(caller, grade_id).await?;

    let now = service.clock.now();
    grade.deleted_at = Some(now);
    grade.updated_at = now;
    service.storage.update_grade(&grade).await?;

    info!("成绩 {} 已由用户 {} 撤销", grade_id, caller.user_id);
    Ok(())
}
