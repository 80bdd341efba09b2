use tracing::{info, warn};

use super::{GradeService, validate_entry};
use crate::errors::Result;
use crate::models::grades::entities::Grade;
use crate::models::grades::requests::RecordGradeRequest;
use crate::models::users::entities::Caller;
use crate::services::permissions::require_staff;
use crate::utils::academic_year_for;

/// 录入成绩，缺省的权重和学年按规则推导
pub async fn record_grade(
    service: &GradeService,
    caller: &Caller,
    req: RecordGradeRequest,
) -> Result<Grade> {
    require_staff(caller)?;

    let now = service.clock.now();
    let grade = Grade {
        id: 0,
        student_id: req.student_id,
        subject_id: req.subject_id,
        class_id: req.class_id,
        grade_value: req.grade_value,
        grade_type: req.grade_type,
        weight: req.weight.unwrap_or_else(|| req.grade_type.default_weight()),
        term: req.term,
        academic_year: req
            .academic_year
            .map(|y| y.trim().to_string())
            .unwrap_or_else(|| academic_year_for(now, service.academic_year_start_month)),
        remarks: req.remarks.filter(|r| !r.trim().is_empty()),
        recorded_by: caller.user_id,
        recorded_at: now,
        is_active: true,
        updated_at: now,
        deleted_at: None,
    };

    if let Err(e) = validate_entry(&grade) {
        warn!("用户 {} 录入成绩被拒绝: {}", caller.user_id, e);
        return Err(e);
    }

    let saved = service.storage.create_grade(grade).await?;
    info!(
        "成绩 {} 已录入: 学生 {}, 科目 {}, {} {} {}",
        saved.id, saved.student_id, saved.subject_id, saved.grade_type, saved.term, saved.academic_year
    );
    Ok(saved)
}
