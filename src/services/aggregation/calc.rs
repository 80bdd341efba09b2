//! 加权平均的纯计算部分

use crate::models::grades::entities::Grade;
use crate::utils::round_half_up;

/// Σ(value × weight) 与 Σ(weight) 的累加器
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedTotal {
    pub weighted_sum: f64,
    pub total_weight: f64,
    pub entry_count: usize,
}

impl WeightedTotal {
    pub fn add(&mut self, grade: &Grade) {
        if !grade.counts_toward_average() {
            return;
        }
        self.weighted_sum += grade.grade_value * grade.weight;
        self.total_weight += grade.weight;
        self.entry_count += 1;
    }

    /// 未取整的加权平均，没有条目时为 0
    pub fn raw_average(&self) -> f64 {
        if self.total_weight > 0.0 {
            self.weighted_sum / self.total_weight
        } else {
            0.0
        }
    }

    pub fn average(&self) -> f64 {
        round_half_up(self.raw_average(), 2)
    }
}

pub fn weighted_total<'a>(grades: impl IntoIterator<Item = &'a Grade>) -> WeightedTotal {
    let mut total = WeightedTotal::default();
    for grade in grades {
        total.add(grade);
    }
    total
}
