//! The onboarding workflow: steps, answers, the transition table, assignee
//! resolution and the timeline projection.

mod answers;
mod assignment;
mod engine;
mod planner;
mod step;
mod timeline;

pub use self::answers::{
    AnswersError, AnswersShapeError, BiomedicalAnswers, ContractReviewAnswers,
    FinanceAnswers, FinancialApprovalAnswers, GuestServicesAnswers, LicensingAnswers,
    OrientationAnswers, PersonnelAnswers, StepAnswers, SystemsAnswers, TaskAnswers,
};
pub use self::assignment::{UnassignedRole, assign, holder_of};
pub use self::engine::{
    Assignee, CONTRACT_STARTED, Completion, Decision, INITIAL_TASK, Outcome, TaskSpec,
    TransitionTable,
};
#[cfg(test)]
pub use self::planner::MockTransitionPlanner;
pub use self::planner::{
    CompletionContext, PlanningError, TransitionPlan, TransitionPlanner, WorkflowPlanner,
    initial_task,
};
pub use self::step::{ParallelGroup, Step, StepParseError, StepSet};
pub use self::timeline::{StepProgress, StepProjection, project};
