use tracing::{info, warn};

use super::AssignmentService;
use crate::errors::{HWSystemError, Result};
use crate::models::assignments::entities::{Assignment, AssignmentStatus};
use crate::models::users::entities::Caller;

/// draft -> published
pub async fn publish_assignment(
    service: &AssignmentService,
    caller: &Caller,
    assignment_id: i64,
) -> Result<Assignment> {
    transition(
        service,
        caller,
        assignment_id,
        AssignmentStatus::Draft,
        AssignmentStatus::Published,
    )
    .await
}

/// published -> closed，关闭后不再接受提交
pub async fn close_assignment(
    service: &AssignmentService,
    caller: &Caller,
    assignment_id: i64,
) -> Result<Assignment> {
    transition(
        service,
        caller,
        assignment_id,
        AssignmentStatus::Published,
        AssignmentStatus::Closed,
    )
    .await
}

async fn transition(
    service: &AssignmentService,
    caller: &Caller,
    assignment_id: i64,
    from: AssignmentStatus,
    to: AssignmentStatus,
) -> Result<Assignment> {
    let mut assignment = service.load_for_write(caller, assignment_id).await?;

    if assignment.status != from {
        warn!(
            "作业 {} 状态为 {}，不能切换到 {}",
            assignment_id, assignment.status, to
        );
        return Err(HWSystemError::invalid_state_on(
            "status",
            format!(
                "Assignment {assignment_id} is {}, expected {from} to become {to}",
                assignment.status
            ),
        ));
    }

    assignment.status = to;
    assignment.updated_at = service.clock.now();
    let saved = service.save(&assignment).await?;

    info!(
        "作业 {} 状态 {} -> {}，操作者 {}",
        assignment_id, from, to, caller.user_id
    );
    Ok(saved)
}
