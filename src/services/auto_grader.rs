//! 客观题自动评分
//!
//! 纯函数，无副作用，可重复执行。

use serde::Serialize;

use crate::models::assignments::entities::McqQuestion;
use crate::utils::round_half_up;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AutoGradeResult {
    pub correct_count: usize,
    pub question_count: usize,
    pub scaled_score: f64,
}

impl AutoGradeResult {
    pub fn feedback(&self) -> String {
        format!(
            "Auto-graded: {}/{} correct",
            self.correct_count, self.question_count
        )
    }
}

/// 按题序比对作答与标准答案，按满分比例折算并保留两位小数
///
/// 缺失、越界或负数的作答都记为错误；题库为空时得分为 0。
pub fn score(answers: &[i64], questions: &[McqQuestion], max_grade: f64) -> AutoGradeResult {
    let correct_count = questions
        .iter()
        .enumerate()
        .filter(|(i, question)| {
            answers
                .get(*i)
                .and_then(|answer| usize::try_from(*answer).ok())
                .is_some_and(|answer| {
                    answer < question.options.len() && answer == question.correct_option_index
                })
        })
        .count();

    let scaled_score = if questions.is_empty() {
        0.0
    } else {
        round_half_up(
            correct_count as f64 / questions.len() as f64 * max_grade,
            2,
        )
    };

    AutoGradeResult {
        correct_count,
        question_count: questions.len(),
        scaled_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank(key: &[usize]) -> Vec<McqQuestion> {
        key.iter()
            .enumerate()
            .map(|(i, correct)| McqQuestion {
                question_text: format!("Q{}", i + 1),
                options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                correct_option_index: *correct,
            })
            .collect()
    }

    #[test]
    fn test_three_of_four_correct() {
        let result = score(&[0, 1, 2, 3], &bank(&[0, 1, 2, 0]), 10.0);
        assert_eq!(result.correct_count, 3);
        assert_eq!(result.question_count, 4);
        assert_eq!(result.scaled_score, 7.5);
        assert_eq!(result.feedback(), "Auto-graded: 3/4 correct");
    }

    #[test]
    fn test_missing_and_out_of_range_answers_are_wrong() {
        let questions = bank(&[0, 1, 2]);
        let result = score(&[0, 9], &questions, 10.0);
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.scaled_score, 3.33);

        let result = score(&[-1, 1, 2, 5], &questions, 10.0);
        assert_eq!(result.correct_count, 2);
        assert_eq!(result.scaled_score, 6.67);
    }

    #[test]
    fn test_deterministic() {
        let questions = bank(&[3, 2, 1]);
        let answers = [3, 2, 0];
        let first = score(&answers, &questions, 7.0);
        for _ in 0..10 {
            assert_eq!(score(&answers, &questions, 7.0), first);
        }
        assert_eq!(first.scaled_score, 4.67);
    }

    #[test]
    fn test_empty_bank_scores_zero() {
        let result = score(&[0, 1], &[], 10.0);
        assert_eq!(result.correct_count, 0);
        assert_eq!(result.scaled_score, 0.0);
    }
}
