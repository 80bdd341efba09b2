pub mod aggregation;
pub mod assignments;
pub mod attachments;
pub mod auto_grader;
pub mod grades;
pub(crate) mod permissions;
pub mod submissions;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use crate::cache::AssignmentPolicyCache;
use crate::config::AssessmentConfig;
use crate::storage::{AttachmentStore, Storage};
use crate::utils::Clock;

pub use aggregation::AggregationService;
pub use assignments::AssignmentService;
pub use attachments::AttachmentResolver;
pub use grades::GradeService;
pub use submissions::SubmissionService;

/// 评测引擎：各组件共享同一存储、时钟和作业策略缓存
pub struct AssessmentEngine {
    pub assignments: AssignmentService,
    pub submissions: SubmissionService,
    pub grades: GradeService,
    pub aggregation: AggregationService,
    pub attachments: AttachmentResolver,
}

impl AssessmentEngine {
    pub fn new(
        storage: Arc<dyn Storage>,
        attachments: Arc<dyn AttachmentStore>,
        clock: Arc<dyn Clock>,
        cache: AssignmentPolicyCache,
        settings: AssessmentConfig,
    ) -> Self {
        let academic_year_start_month = settings.academic_year_start_month;
        Self {
            assignments: AssignmentService::new(
                storage.clone(),
                cache.clone(),
                clock.clone(),
                settings,
            ),
            submissions: SubmissionService::new(
                storage.clone(),
                cache,
                attachments.clone(),
                clock.clone(),
            ),
            grades: GradeService::new(storage.clone(), clock, academic_year_start_month),
            aggregation: AggregationService::new(storage),
            attachments: AttachmentResolver::new(attachments),
        }
    }
}
