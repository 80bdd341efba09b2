pub mod calc;
pub mod class;
pub mod student;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::grades::entities::Term;
use crate::models::grades::requests::AggregationScope;
use crate::models::grades::responses::{StudentAverage, StudentTermReport};
use crate::models::users::entities::Caller;
use crate::storage::Storage;

/// 聚合引擎：只读成绩台账，按范围计算加权平均
///
/// 只统计 `is_active = true` 且未删除的条目，结果四舍五入到两位小数。
pub struct AggregationService {
    storage: Arc<dyn Storage>,
}

impl AggregationService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 学生在 (班级, 科目, 学期, 学年) 范围内的加权平均，无条目时为 0
    pub async fn average_for_student(
        &self,
        caller: &Caller,
        student_id: i64,
        scope: &AggregationScope,
    ) -> Result<f64> {
        student::average_for_student(self, caller, student_id, scope).await
    }

    /// 全班所有条目的加权平均（不按学生分组）
    pub async fn class_average_for_subject(
        &self,
        caller: &Caller,
        scope: &AggregationScope,
    ) -> Result<f64> {
        class::class_average_for_subject(self, caller, scope).await
    }

    /// 每个学生的加权平均明细
    pub async fn student_averages_for_class(
        &self,
        caller: &Caller,
        scope: &AggregationScope,
    ) -> Result<Vec<StudentAverage>> {
        class::student_averages_for_class(self, caller, scope).await
    }

    /// 学生平均分的算术平均
    pub async fn mean_of_student_averages(
        &self,
        caller: &Caller,
        scope: &AggregationScope,
    ) -> Result<f64> {
        class::mean_of_student_averages(self, caller, scope).await
    }

    /// 学生学期成绩单（各科目加权平均）
    pub async fn student_term_report(
        &self,
        caller: &Caller,
        student_id: i64,
        class_id: i64,
        term: Term,
        academic_year: &str,
    ) -> Result<StudentTermReport> {
        student::student_term_report(self, caller, student_id, class_id, term, academic_year).await
    }
}
