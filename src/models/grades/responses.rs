use serde::Serialize;

/// 单个学生在某范围内的加权平均
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StudentAverage {
    pub student_id: i64,
    pub average: f64,
    pub entry_count: usize,
    pub total_weight: f64,
}

/// 学生某学期各科目的加权平均
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubjectAverage {
    pub subject_id: i64,
    pub average: f64,
    pub entry_count: usize,
}

/// 学生学期成绩单
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StudentTermReport {
    pub student_id: i64,
    pub class_id: i64,
    pub term: String,
    pub academic_year: String,
    pub subjects: Vec<SubjectAverage>,
}
