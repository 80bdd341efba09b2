use tracing::{info, warn};

use super::{AssignmentService, policy};
use crate::errors::{HWSystemError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::assignments::requests::UpdateAssignmentRequest;
use crate::models::users::entities::Caller;

pub async fn update_assignment(
    service: &AssignmentService,
    caller: &Caller,
    assignment_id: i64,
    patch: UpdateAssignmentRequest,
) -> Result<Assignment> {
    let mut assignment = service.load_for_write(caller, assignment_id).await?;

    if assignment.is_closed() {
        warn!("作业 {} 已关闭，拒绝更新", assignment_id);
        return Err(HWSystemError::assignment_closed(format!(
            "作业 {assignment_id} 已关闭，不能再修改"
        )));
    }

    if let Some(title) = patch.title {
        assignment.title = title;
    }
    if let Some(description) = patch.description {
        assignment.description = Some(description).filter(|d| !d.trim().is_empty());
    }
    if let Some(assignment_type) = patch.assignment_type {
        assignment.assignment_type = assignment_type;
    }
    // 编辑时允许任意截止时间，已有提交的迟交标记不会重算
    if let Some(due_date) = patch.due_date {
        assignment.due_date = due_date;
    }
    if let Some(max_grade) = patch.max_grade {
        assignment.max_grade = max_grade;
    }
    if let Some(auto_grade) = patch.auto_grade {
        assignment.auto_grade = auto_grade;
    }
    if let Some(mcq_questions) = patch.mcq_questions {
        assignment.mcq_questions = mcq_questions;
    }
    if let Some(allowed_file_types) = patch.allowed_file_types {
        assignment.allowed_file_types = Some(allowed_file_types).filter(|t| !t.trim().is_empty());
    }
    if let Some(max_file_size_bytes) = patch.max_file_size_bytes {
        assignment.max_file_size_bytes = max_file_size_bytes;
    }

    policy::normalize_and_validate(&mut assignment)?;
    assignment.updated_at = service.clock.now();

    let saved = service.save(&assignment).await?;
    info!("作业 {} 已由用户 {} 更新", assignment_id, caller.user_id);
    Ok(saved)
}
