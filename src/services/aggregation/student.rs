use std::collections::BTreeMap;

use tracing::debug;

use super::AggregationService;
use super::calc::{WeightedTotal, weighted_total};
use crate::errors::Result;
use crate::models::grades::entities::Term;
use crate::models::grades::requests::{AggregationScope, GradeQuery};
use crate::models::grades::responses::{StudentTermReport, SubjectAverage};
use crate::models::users::entities::Caller;
use crate::services::permissions::require_self_or_staff;

pub async fn average_for_student(
    service: &AggregationService,
    caller: &Caller,
    student_id: i64,
    scope: &AggregationScope,
) -> Result<f64> {
    require_self_or_staff(caller, student_id)?;

    let grades = service.storage.list_grades(scope.to_query(Some(student_id))).await?;
    let total = weighted_total(&grades);
    debug!(
        "学生 {} 科目 {} 加权平均: {} ({} 条)",
        student_id, scope.subject_id, total.average(), total.entry_count
    );
    Ok(total.average())
}

pub async fn student_term_report(
    service: &AggregationService,
    caller: &Caller,
    student_id: i64,
    class_id: i64,
    term: Term,
    academic_year: &str,
) -> Result<StudentTermReport> {
    require_self_or_staff(caller, student_id)?;

    let grades = service
        .storage
        .list_grades(GradeQuery {
            student_id: Some(student_id),
            class_id: Some(class_id),
            term: Some(term),
            academic_year: Some(academic_year.to_string()),
            active_only: true,
            ..Default::default()
        })
        .await?;

    let mut by_subject: BTreeMap<i64, WeightedTotal> = BTreeMap::new();
    for grade in &grades {
        by_subject.entry(grade.subject_id).or_default().add(grade);
    }

    let subjects = by_subject
        .into_iter()
        .map(|(subject_id, total)| SubjectAverage {
            subject_id,
            average: total.average(),
            entry_count: total.entry_count,
        })
        .collect();

    Ok(StudentTermReport {
        student_id,
        class_id,
        term: term.to_string(),
        academic_year: academic_year.to_string(),
        subjects,
    })
}

#[cfg(test)]
mod tests {
    use crate::errors::HWSystemError;
    use crate::models::grades::entities::{GradeType, Term};
    use crate::models::grades::requests::{AggregationScope, AmendGradeRequest, RecordGradeRequest};
    use crate::models::users::entities::Caller;
    use crate::services::test_support::*;

    fn entry(subject_id: i64, value: f64, weight: f64) -> RecordGradeRequest {
        RecordGradeRequest {
            student_id: 20,
            subject_id,
            class_id: 1,
            grade_value: value,
            grade_type: GradeType::Homework,
            weight: Some(weight),
            term: Term::First,
            academic_year: Some("2024-2025".into()),
            remarks: None,
        }
    }

    fn scope() -> AggregationScope {
        AggregationScope::new(1, 10, Term::First, "2024-2025")
    }

    #[tokio::test]
    async fn test_weighted_average_for_student() {
        let env = env().await;
        let teacher = Caller::teacher(5);
        env.engine.grades.record(&teacher, entry(10, 8.0, 1.0)).await.unwrap();
        env.engine.grades.record(&teacher, entry(10, 6.0, 2.0)).await.unwrap();
        // 其他科目、其他学期不计入
        env.engine.grades.record(&teacher, entry(11, 1.0, 1.0)).await.unwrap();
        env.engine
            .grades
            .record(
                &teacher,
                RecordGradeRequest {
                    term: Term::Second,
                    ..entry(10, 1.0, 1.0)
                },
            )
            .await
            .unwrap();

        let average = env
            .engine
            .aggregation
            .average_for_student(&Caller::student(20), 20, &scope())
            .await
            .unwrap();
        assert_eq!(average, 6.67);
    }

    #[tokio::test]
    async fn test_no_entries_is_zero() {
        let env = env().await;
        let average = env
            .engine
            .aggregation
            .average_for_student(&Caller::teacher(5), 20, &scope())
            .await
            .unwrap();
        assert_eq!(average, 0.0);
    }

    #[tokio::test]
    async fn test_inactive_and_retracted_entries_excluded() {
        let env = env().await;
        let teacher = Caller::teacher(5);
        env.engine.grades.record(&teacher, entry(10, 9.0, 1.0)).await.unwrap();
        let inactive = env.engine.grades.record(&teacher, entry(10, 1.0, 1.0)).await.unwrap();
        let retracted = env.engine.grades.record(&teacher, entry(10, 2.0, 1.0)).await.unwrap();

        env.engine
            .grades
            .amend(
                &teacher,
                inactive.id,
                AmendGradeRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        env.engine.grades.retract(&teacher, retracted.id).await.unwrap();

        let average = env
            .engine
            .aggregation
            .average_for_student(&teacher, 20, &scope())
            .await
            .unwrap();
        assert_eq!(average, 9.0);
    }

    #[tokio::test]
    async fn test_term_report_and_access() {
        let env = env().await;
        let teacher = Caller::teacher(5);
        env.engine.grades.record(&teacher, entry(11, 5.0, 1.0)).await.unwrap();
        env.engine.grades.record(&teacher, entry(10, 8.0, 1.0)).await.unwrap();
        env.engine.grades.record(&teacher, entry(10, 6.0, 2.0)).await.unwrap();

        let report = env
            .engine
            .aggregation
            .student_term_report(&Caller::student(20), 20, 1, Term::First, "2024-2025")
            .await
            .unwrap();
        assert_eq!(report.term, "1");
        assert_eq!(report.subjects.len(), 2);
        assert_eq!(report.subjects[0].subject_id, 10);
        assert_eq!(report.subjects[0].average, 6.67);
        assert_eq!(report.subjects[0].entry_count, 2);
        assert_eq!(report.subjects[1].average, 5.0);

        let err = env
            .engine
            .aggregation
            .average_for_student(&Caller::student(21), 20, &scope())
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::Authorization(_)));
    }
}
