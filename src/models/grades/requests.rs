use serde::Deserialize;

use crate::models::grades::entities::{GradeType, Term};

/// 录入成绩请求
#[derive(Debug, Clone, Deserialize)]
pub struct RecordGradeRequest {
    pub student_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
    pub grade_value: f64,
    pub grade_type: GradeType,
    pub weight: Option<f64>,           // 省略时按 grade_type 推导
    pub term: Term,
    pub academic_year: Option<String>, // 省略时按当前日期推导
    pub remarks: Option<String>,
}

/// 修改成绩请求（未提供的字段保持不变）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AmendGradeRequest {
    pub grade_value: Option<f64>,
    pub grade_type: Option<GradeType>,
    pub weight: Option<f64>,
    pub term: Option<Term>,
    pub academic_year: Option<String>,
    pub remarks: Option<String>,
    pub is_active: Option<bool>,
}

/// 成绩查询范围
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeQuery {
    pub student_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub class_id: Option<i64>,
    pub term: Option<Term>,
    pub academic_year: Option<String>,
    pub grade_type: Option<GradeType>,
    // 仅返回计入平均分的条目
    #[serde(default)]
    pub active_only: bool,
}

/// 聚合范围（班级 + 科目 + 学期 + 学年）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationScope {
    pub class_id: i64,
    pub subject_id: i64,
    pub term: Term,
    pub academic_year: String,
}

impl AggregationScope {
    pub fn new(class_id: i64, subject_id: i64, term: Term, academic_year: impl Into<String>) -> Self {
        Self {
            class_id,
            subject_id,
            term,
            academic_year: academic_year.into(),
        }
    }

    pub(crate) fn to_query(&self, student_id: Option<i64>) -> GradeQuery {
        GradeQuery {
            student_id,
            subject_id: Some(self.subject_id),
            class_id: Some(self.class_id),
            term: Some(self.term),
            academic_year: Some(self.academic_year.clone()),
            grade_type: None,
            active_only: true,
        }
    }
}
