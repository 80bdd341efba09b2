use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 成绩类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GradeType {
    Homework,
    Quiz,
    Midterm,
    Final,
    Assignment,
    Participation,
}

impl GradeType {
    pub const HOMEWORK: &'static str = "homework";
    pub const QUIZ: &'static str = "quiz";
    pub const MIDTERM: &'static str = "midterm";
    pub const FINAL: &'static str = "final";
    pub const ASSIGNMENT: &'static str = "assignment";
    pub const PARTICIPATION: &'static str = "participation";

    /// 未显式指定权重时按类型推导
    pub fn default_weight(&self) -> f64 {
        match self {
            GradeType::Homework => 1.0,
            GradeType::Quiz => 1.5,
            GradeType::Assignment => 2.0,
            GradeType::Midterm => 2.5,
            GradeType::Final => 3.0,
            GradeType::Participation => 0.5,
        }
    }
}

impl std::fmt::Display for GradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GradeType::Homework => GradeType::HOMEWORK,
            GradeType::Quiz => GradeType::QUIZ,
            GradeType::Midterm => GradeType::MIDTERM,
            GradeType::Final => GradeType::FINAL,
            GradeType::Assignment => GradeType::ASSIGNMENT,
            GradeType::Participation => GradeType::PARTICIPATION,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for GradeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            GradeType::HOMEWORK => Ok(GradeType::Homework),
            GradeType::QUIZ => Ok(GradeType::Quiz),
            GradeType::MIDTERM => Ok(GradeType::Midterm),
            GradeType::FINAL => Ok(GradeType::Final),
            GradeType::ASSIGNMENT => Ok(GradeType::Assignment),
            GradeType::PARTICIPATION => Ok(GradeType::Participation),
            _ => Err(format!("Invalid grade type: {s}")),
        }
    }
}

// 学期
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Term {
    #[serde(rename = "1")]
    First,
    #[serde(rename = "2")]
    Second,
    #[serde(rename = "final")]
    Final,
}

impl Term {
    pub const FIRST: &'static str = "1";
    pub const SECOND: &'static str = "2";
    pub const FINAL: &'static str = "final";

    pub fn as_str(&self) -> &'static str {
        match self {
            Term::First => Term::FIRST,
            Term::Second => Term::SECOND,
            Term::Final => Term::FINAL,
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Term {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Term::FIRST => Ok(Term::First),
            Term::SECOND => Ok(Term::Second),
            Term::FINAL => Ok(Term::Final),
            _ => Err(format!("Invalid term: {s}")),
        }
    }
}

/// 成绩台账条目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
    pub grade_value: f64, // 0 - 10
    pub grade_type: GradeType,
    pub weight: f64,
    pub term: Term,
    pub academic_year: String, // "YYYY-YYYY"
    pub remarks: Option<String>,
    pub recorded_by: i64,
    pub recorded_at: DateTime<Utc>,
    // 为 false 时不参与平均分计算
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Grade {
    /// 是否计入加权平均
    pub fn counts_toward_average(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }
}
