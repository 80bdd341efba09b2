pub mod amend;
pub mod list;
pub mod record;
pub mod retract;

use std::sync::Arc;

use crate::errors::{HWSystemError, Result};
use crate::models::grades::entities::Grade;
use crate::models::grades::requests::{AmendGradeRequest, GradeQuery, RecordGradeRequest};
use crate::models::users::entities::Caller;
use crate::services::permissions::require_author_or_admin;
use crate::storage::Storage;
use crate::utils::Clock;
use crate::utils::validate::{validate_academic_year, validate_remarks};

pub const GRADE_VALUE_MAX: f64 = 10.0;
pub const WEIGHT_MAX: f64 = 100.0;

/// 成绩台账：独立于提交流程的正式成绩记录
pub struct GradeService {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    academic_year_start_month: u32,
}

impl GradeService {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>, academic_year_start_month: u32) -> Self {
        Self {
            storage,
            clock,
            academic_year_start_month,
        }
    }

    /// 录入成绩
    pub async fn record(&self, caller: &Caller, req: RecordGradeRequest) -> Result<Grade> {
        record::record_grade(self, caller, req).await
    }

    /// 修改成绩
    pub async fn amend(&self, caller: &Caller, grade_id: i64, patch: AmendGradeRequest) -> Result<Grade> {
        amend::amend_grade(self, caller, grade_id, patch).await
    }

    /// 撤销成绩（软删除）
    pub async fn retract(&self, caller: &Caller, grade_id: i64) -> Result<()> {
        retract::retract_grade(self, caller, grade_id).await
    }

    pub async fn get(&self, caller: &Caller, grade_id: i64) -> Result<Grade> {
        list::get_grade(self, caller, grade_id).await
    }

    pub async fn list(&self, caller: &Caller, query: GradeQuery) -> Result<Vec<Grade>> {
        list::list_grades(self, caller, query).await
    }

    async fn load_grade(&self, grade_id: i64) -> Result<Grade> {
        self.storage
            .get_grade_by_id(grade_id)
            .await?
            .ok_or_else(|| HWSystemError::not_found_on("grade_id", format!("成绩不存在: {grade_id}")))
    }

    // 读取并校验写权限
    async fn load_for_write(&self, caller: &Caller, grade_id: i64) -> Result<Grade> {
        let grade = self.load_grade(grade_id).await?;
        require_author_or_admin(caller, grade.recorded_by)?;
        Ok(grade)
    }
}

/// 台账条目的数值与格式约束
fn validate_entry(grade: &Grade) -> Result<()> {
    if !grade.grade_value.is_finite() || !(0.0..=GRADE_VALUE_MAX).contains(&grade.grade_value) {
        return Err(HWSystemError::validation_on(
            "grade_value",
            format!("Grade value must be within [0, {GRADE_VALUE_MAX}], got {}", grade.grade_value),
        ));
    }
    if !grade.weight.is_finite() || grade.weight <= 0.0 || grade.weight > WEIGHT_MAX {
        return Err(HWSystemError::validation_on(
            "weight",
            format!("Weight must be within (0, {WEIGHT_MAX}], got {}", grade.weight),
        ));
    }
    validate_academic_year(&grade.academic_year)
        .map_err(|msg| HWSystemError::validation_on("academic_year", msg))?;
    if let Some(remarks) = &grade.remarks {
        validate_remarks(remarks).map_err(|msg| HWSystemError::validation_on("remarks", msg))?;
    }
    Ok(())
}
