use super::GradeService;
use crate::errors::Result;
use crate::models::grades::entities::Grade;
use crate::models::grades::requests::GradeQuery;
use crate::models::users::entities::{Caller, UserRole};
use crate::services::permissions::require_self_or_staff;

pub async fn get_grade(service: &GradeService, caller: &Caller, grade_id: i64) -> Result<Grade> {
    let grade = service.load_grade(grade_id).await?;
    require_self_or_staff(caller, grade.student_id)?;
    Ok(grade)
}

/// 按范围列出成绩；学生只能看到自己的条目
pub async fn list_grades(
    service: &GradeService,
    caller: &Caller,
    mut query: GradeQuery,
) -> Result<Vec<Grade>> {
    if caller.role == UserRole::Student {
        match query.student_id {
            Some(student_id) => require_self_or_staff(caller, student_id)?,
            None => query.student_id = Some(caller.user_id),
        }
    }
    service.storage.list_grades(query).await
}
