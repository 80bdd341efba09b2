use std::collections::BTreeMap;

use super::AggregationService;
use super::calc::{WeightedTotal, weighted_total};
use crate::errors::Result;
use crate::models::grades::entities::Grade;
use crate::models::grades::requests::AggregationScope;
use crate::models::grades::responses::StudentAverage;
use crate::models::users::entities::Caller;
use crate::services::permissions::require_staff;
use crate::utils::round_half_up;

async fn load_scope(
    service: &AggregationService,
    caller: &Caller,
    scope: &AggregationScope,
) -> Result<Vec<Grade>> {
    require_staff(caller)?;
    service.storage.list_grades(scope.to_query(None)).await
}

fn totals_by_student(grades: &[Grade]) -> BTreeMap<i64, WeightedTotal> {
    let mut by_student: BTreeMap<i64, WeightedTotal> = BTreeMap::new();
    for grade in grades {
        by_student.entry(grade.student_id).or_default().add(grade);
    }
    by_student
}

/// 班级内所有条目一起计算的加权平均
///
/// 条目多的学生占比更大，与 `mean_of_student_averages` 结果一般不同。
pub async fn class_average_for_subject(
    service: &AggregationService,
    caller: &Caller,
    scope: &AggregationScope,
) -> Result<f64> {
    let grades = load_scope(service, caller, scope).await?;
    Ok(weighted_total(&grades).average())
}

pub async fn student_averages_for_class(
    service: &AggregationService,
    caller: &Caller,
    scope: &AggregationScope,
) -> Result<Vec<StudentAverage>> {
    let grades = load_scope(service, caller, scope).await?;

    Ok(totals_by_student(&grades)
        .into_iter()
        .map(|(student_id, total)| StudentAverage {
            student_id,
            average: total.average(),
            entry_count: total.entry_count,
            total_weight: total.total_weight,
        })
        .collect())
}

/// 每个学生权重相同的班级平均
pub async fn mean_of_student_averages(
    service: &AggregationService,
    caller: &Caller,
    scope: &AggregationScope,
) -> Result<f64> {
    let grades = load_scope(service, caller, scope).await?;
    let by_student = totals_by_student(&grades);
    if by_student.is_empty() {
        return Ok(0.0);
    }

    let sum: f64 = by_student.values().map(|t| t.raw_average()).sum();
    Ok(round_half_up(sum / by_student.len() as f64, 2))
}
