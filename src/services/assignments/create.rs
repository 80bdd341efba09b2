use tracing::{info, warn};

use super::{AssignmentService, policy};
use crate::errors::{HWSystemError, Result};
use crate::models::assignments::entities::{Assignment, AssignmentStatus};
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::users::entities::Caller;
use crate::services::permissions::require_staff;

pub async fn create_assignment(
    service: &AssignmentService,
    caller: &Caller,
    req: CreateAssignmentRequest,
) -> Result<Assignment> {
    require_staff(caller)?;

    let now = service.clock.now();

    // 截止时间只在创建时要求晚于当前时间
    if req.due_date <= now {
        warn!(
            "用户 {} 创建作业被拒绝：截止时间 {} 不晚于当前时间",
            caller.user_id, req.due_date
        );
        return Err(HWSystemError::validation_on(
            "due_date",
            "Due date must be in the future",
        ));
    }

    let status = match req.status {
        None | Some(AssignmentStatus::Published) => AssignmentStatus::Published,
        Some(AssignmentStatus::Draft) => AssignmentStatus::Draft,
        Some(AssignmentStatus::Closed) => {
            return Err(HWSystemError::validation_on(
                "status",
                "An assignment cannot be created closed",
            ));
        }
    };

    let mut assignment = Assignment {
        id: 0,
        class_id: req.class_id,
        subject_id: req.subject_id,
        created_by: caller.user_id,
        title: req.title,
        description: req.description.filter(|d| !d.trim().is_empty()),
        assignment_type: req.assignment_type,
        due_date: req.due_date,
        max_grade: req.max_grade.unwrap_or(service.settings.default_max_grade),
        status,
        auto_grade: req.auto_grade,
        mcq_questions: req.mcq_questions,
        allowed_file_types: req.allowed_file_types,
        max_file_size_bytes: req
            .max_file_size_bytes
            .unwrap_or(service.settings.default_max_file_size_bytes),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    policy::normalize_and_validate(&mut assignment)?;

    let created = service.storage.create_assignment(assignment).await?;
    info!(
        "作业 {} 已创建：类型 {}，状态 {}，创建者 {}",
        created.id, created.assignment_type, created.status, caller.user_id
    );
    Ok(created)
}
