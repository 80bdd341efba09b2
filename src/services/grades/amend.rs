use tracing::info;

use super::{GradeService, validate_entry};
use crate::errors::Result;
use crate::models::grades::entities::Grade;
use crate::models::grades::requests::AmendGradeRequest;
use crate::models::users::entities::Caller;

pub async fn amend_grade(
    service: &GradeService,
    caller: &Caller,
    grade_id: i64,
    patch: AmendGradeRequest,
) -> Result<Grade> {
    let mut grade = service.load_for_write(caller, grade_id).await?;

    if let Some(value) = patch.grade_value {
        grade.grade_value = value;
    }
    if let Some(grade_type) = patch.grade_type {
        // 类型变化且未指定权重时重新推导
        if grade_type != grade.grade_type && patch.weight.is_none() {
            grade.weight = grade_type.default_weight();
        }
        grade.grade_type = grade_type;
    }
    if let Some(weight) = patch.weight {
        grade.weight = weight;
    }
    if let Some(term) = patch.term {
        grade.term = term;
    }
    if let Some(year) = patch.academic_year {
        grade.academic_year = year.trim().to_string();
    }
    if let Some(remarks) = patch.remarks {
        grade.remarks = Some(remarks).filter(|r| !r.trim().is_empty());
    }
    if let Some(is_active) = patch.is_active {
        grade.is_active = is_active;
    }

    validate_entry(&grade)?;
    grade.updated_at = service.clock.now();

    let saved = service.storage.update_grade(&grade).await?;
    info!("成绩 {} 已由用户 {} 修改", grade_id, caller.user_id);
    Ok(saved)
}
