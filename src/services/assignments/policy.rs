use crate::errors::{HWSystemError, Result};
use crate::models::assignments::entities::{Assignment, AssignmentType};
use crate::utils::round_half_up;
use crate::utils::validate::{normalize_extension_list, validate_title};

pub(super) const MAX_GRADE_LOWER_BOUND: f64 = 0.01;
pub(super) const MAX_GRADE_UPPER_BOUND: f64 = 100.0;

/// 规范化并校验作业策略，创建与更新共用
pub(super) fn normalize_and_validate(assignment: &mut Assignment) -> Result<()> {
    validate_title(&assignment.title).map_err(|e| HWSystemError::validation_on("title", e))?;
    assignment.title = assignment.title.trim().to_string();

    if !assignment.max_grade.is_finite()
        || assignment.max_grade < MAX_GRADE_LOWER_BOUND
        || assignment.max_grade > MAX_GRADE_UPPER_BOUND
    {
        return Err(HWSystemError::validation_on(
            "max_grade",
            format!(
                "Max grade must be within [0.01, 100], got {}",
                assignment.max_grade
            ),
        ));
    }
    // 满分与评分一样保留两位小数
    assignment.max_grade = round_half_up(assignment.max_grade, 2);

    if assignment.assignment_type == AssignmentType::Mcq {
        validate_question_bank(assignment)?;
        // 客观题不接收附件
        assignment.allowed_file_types = None;
    } else {
        // 自动评分只对客观题有意义
        assignment.auto_grade = false;
        assignment.mcq_questions.clear();
        if let Some(raw) = assignment.allowed_file_types.as_deref() {
            assignment.allowed_file_types = normalize_extension_list(raw)
                .map_err(|e| HWSystemError::validation_on("allowed_file_types", e))?;
        }
    }

    if assignment.max_file_size_bytes <= 0 {
        return Err(HWSystemError::validation_on(
            "max_file_size_bytes",
            "Max file size must be positive",
        ));
    }

    Ok(())
}

fn validate_question_bank(assignment: &Assignment) -> Result<()> {
    if assignment.mcq_questions.is_empty() {
        return Err(HWSystemError::validation_on(
            "mcq_questions",
            "MCQ assignments require at least one question",
        ));
    }

    for (i, question) in assignment.mcq_questions.iter().enumerate() {
        let field = format!("mcq_questions[{i}]");
        if question.question_text.trim().is_empty() {
            return Err(HWSystemError::validation_on(
                field,
                "Question text must not be empty",
            ));
        }
        if question.options.len() < 2 {
            return Err(HWSystemError::validation_on(
                field,
                "A question needs at least 2 options",
            ));
        }
        if question.correct_option_index >= question.options.len() {
            return Err(HWSystemError::validation_on(
                field,
                format!(
                    "Correct option index {} is out of range for {} options",
                    question.correct_option_index,
                    question.options.len()
                ),
            ));
        }
    }

    Ok(())
}
