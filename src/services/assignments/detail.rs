use super::{AssignmentService, not_found};
use crate::errors::Result;
use crate::models::assignments::entities::{Assignment, AssignmentStatus};
use crate::models::assignments::requests::AssignmentListQuery;
use crate::models::users::entities::Caller;

/// 获取作业，学生看不到未发布的草稿
pub async fn get_assignment(
    service: &AssignmentService,
    caller: &Caller,
    assignment_id: i64,
) -> Result<Assignment> {
    let assignment = service
        .storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| not_found(assignment_id))?;

    if !caller.role.is_staff() && assignment.status == AssignmentStatus::Draft {
        return Err(not_found(assignment_id));
    }

    Ok(assignment)
}

pub async fn list_assignments(
    service: &AssignmentService,
    caller: &Caller,
    mut query: AssignmentListQuery,
) -> Result<Vec<Assignment>> {
    let is_staff = caller.role.is_staff();
    if !is_staff {
        query.include_deleted = false;
    }

    let mut assignments = service.storage.list_assignments(query).await?;
    if !is_staff {
        assignments.retain(|a| a.status != AssignmentStatus::Draft);
    }
    Ok(assignments)
}
