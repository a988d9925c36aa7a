//! Transition table for the onboarding workflow.
//!
//! The engine is pure: given the contract's status, the answers of the task
//! that was just completed and the set of steps completed so far, it returns a
//! [`Decision`] describing the effects. Applying those effects is the job of
//! the record store.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{ParallelGroup, Step, StepAnswers, StepSet};
use crate::domain::{ContractStatus, Role};

/// Classification of a completion result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// New tasks were created and the status moved on.
    Advanced,
    /// The contract did not arrive; the originating department is notified.
    BackToStart,
    /// A parallel sibling is still open.
    Waiting,
    /// The review was not approved; nothing follows.
    NoAction,
    /// No rule exists for the contract's status.
    Undefined,
}

impl Outcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Advanced => "ADVANCED",
            Self::BackToStart => "BACK_TO_START",
            Self::Waiting => "WAITING",
            Self::NoAction => "NO_ACTION",
            Self::Undefined => "UNDEFINED",
        }
    }
}

/// Who receives a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assignee {
    /// The lowest-id user holding this role.
    Role(Role),
    /// The user who started the contract.
    ContractCreator,
}

/// A task the engine wants created, before assignee resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    pub step: Step,
    pub assignee: Assignee,
    pub description: &'static str,
}

/// Effects of one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub outcome: Outcome,
    pub message: &'static str,
    pub new_status: Option<ContractStatus>,
    pub tasks: Vec<TaskSpec>,
}

impl Decision {
    fn quiet(outcome: Outcome, message: &'static str) -> Self {
        Self {
            outcome,
            message,
            new_status: None,
            tasks: Vec::new(),
        }
    }

    fn advance(message: &'static str, status: ContractStatus, tasks: &[TaskSpec]) -> Self {
        Self {
            outcome: Outcome::Advanced,
            message,
            new_status: Some(status),
            tasks: tasks.to_vec(),
        }
    }

    /// The single step created by a sequential move, if that is what happened.
    pub fn next_step(&self) -> Option<Step> {
        match self.tasks.as_slice() {
            [only] => Some(only.step),
            _ => None,
        }
    }
}

/// Engine input for one completion.
#[derive(Debug, Clone, Copy)]
pub struct Completion<'a> {
    pub status: ContractStatus,
    pub answers: &'a StepAnswers,
    /// Steps with a completed task on the contract, including this one.
    pub completed: StepSet,
}

/// Task opened when a contract starts.
pub const INITIAL_TASK: TaskSpec = TaskSpec {
    step: Step::MaliGmy,
    assignee: Assignee::ContractCreator,
    description: "Doktor bilgilerini doğrulayın ve süreci başlatın.",
};

pub const CONTRACT_STARTED: &str = "Sözleşme başarıyla başlatıldı.";

const REVIEW_TASK: TaskSpec = TaskSpec {
    step: Step::MerkezHakedis,
    assignee: Assignee::Role(Role::MerkezHakedis),
    description: "Sözleşmenin ulaşım durumunu kontrol edin.",
};

const GROUP_A_TASKS: [TaskSpec; 2] = [
    TaskSpec {
        step: Step::InsanKaynaklari,
        assignee: Assignee::Role(Role::InsanKaynaklari),
        description: "Oracle girişi ve özlük işlemlerini yapın.",
    },
    TaskSpec {
        step: Step::Ruhsatlandirma,
        assignee: Assignee::Role(Role::Ruhsatlandirma),
        description: "e-imza istemini yapın.",
    },
];

const FINANCE_TASK: TaskSpec = TaskSpec {
    step: Step::MaliIsler,
    assignee: Assignee::Role(Role::MaliIsler),
    description: "Hakkediş entegrasyonunu yapın.",
};

const SYSTEMS_TASK: TaskSpec = TaskSpec {
    step: Step::BilgiSistemleri,
    assignee: Assignee::Role(Role::BilgiSistemleri),
    description: "Pusula, Comed ve e-imza entegrasyonunu tamamlayın.",
};

const GROUP_B_TASKS: [TaskSpec; 2] = [
    TaskSpec {
        step: Step::MisafirHizmetleri,
        assignee: Assignee::Role(Role::MisafirHizmetleri),
        description: "Randevu ekranlarını ve oda altyapısını hazırlayın.",
    },
    TaskSpec {
        step: Step::Biyomedikal,
        assignee: Assignee::Role(Role::Biyomedikal),
        description: "Medikal ekipman hazırlığını tamamlayın.",
    },
];

const ORIENTATION_TASK: TaskSpec = TaskSpec {
    step: Step::Oryantasyon,
    assignee: Assignee::ContractCreator,
    description: "Doktor konumunu ve eğitim verilecek birimleri belirleyin.",
};

/// A rule attached to one contract status.
#[derive(Debug, Clone)]
enum Rule {
    /// Unconditionally open the next tasks.
    Forward {
        tasks: &'static [TaskSpec],
        status: ContractStatus,
        message: &'static str,
    },
    /// Merkez Hakediş review: branch on arrival and approval.
    Review {
        tasks: &'static [TaskSpec],
        status: ContractStatus,
    },
    /// Wait for every member of a parallel group, then open the next task.
    Join {
        group: ParallelGroup,
        then: TaskSpec,
        status: ContractStatus,
        waiting: &'static str,
        done: &'static str,
    },
}

impl Rule {
    fn apply(&self, completion: &Completion<'_>) -> Decision {
        match self {
            Self::Forward {
                tasks,
                status,
                message,
            } => Decision::advance(*message, *status, tasks),
            Self::Review { tasks, status } => {
                let review = completion
                    .answers
                    .contract_review()
                    .cloned()
                    .unwrap_or_default();
                if review.arrived == Some(false) {
                    Decision::quiet(
                        Outcome::BackToStart,
                        "Sözleşme ulaşmadı! Mali GMY ye bildirim atılıyor.",
                    )
                } else if review.approved == Some(true) {
                    Decision::advance(
                        "Sözleşme onaylandı. İK ve Ruhsat birimlerine görev atandı.",
                        *status,
                        tasks,
                    )
                } else {
                    Decision::quiet(
                        Outcome::NoAction,
                        "Sözleşme onaylanmadı; sonraki adım oluşturulmadı.",
                    )
                }
            }
            Self::Join {
                group,
                then,
                status,
                waiting,
                done,
            } => {
                if completion.completed.covers(group.required()) {
                    Decision::advance(*done, *status, std::slice::from_ref(then))
                } else {
                    Decision::quiet(Outcome::Waiting, *waiting)
                }
            }
        }
    }
}

/// Map from contract status to the rule that fires when a task completes.
///
/// # Examples
/// ```
/// use onboarding_backend::domain::ContractStatus;
/// use onboarding_backend::domain::workflow::{
///     Completion, Outcome, Step, StepAnswers, StepSet, TransitionTable,
/// };
///
/// let table = TransitionTable::standard();
/// let answers = StepAnswers::Tamamlandi;
/// let decision = table.advance(&Completion {
///     status: ContractStatus::MaliGmy,
///     answers: &answers,
///     completed: StepSet::empty().with(Step::MaliGmy),
/// });
/// assert_eq!(decision.outcome, Outcome::Advanced);
/// assert_eq!(decision.next_step(), Some(Step::MerkezHakedis));
/// ```
#[derive(Debug, Clone)]
pub struct TransitionTable {
    rules: HashMap<ContractStatus, Rule>,
}

impl TransitionTable {
    /// Rules up to the finance hand-off.
    pub fn standard() -> Self {
        let mut rules = HashMap::new();
        rules.insert(
            ContractStatus::MaliGmy,
            Rule::Forward {
                tasks: std::slice::from_ref(&REVIEW_TASK),
                status: ContractStatus::MerkezHakedis,
                message: "Merkez Hakediş birimine yönlendirildi.",
            },
        );
        rules.insert(
            ContractStatus::MerkezHakedis,
            Rule::Review {
                tasks: &GROUP_A_TASKS,
                status: ContractStatus::ParalelSurec,
            },
        );
        rules.insert(
            ContractStatus::ParalelSurec,
            Rule::Join {
                group: ParallelGroup::A,
                then: FINANCE_TASK,
                status: ContractStatus::MaliIsler,
                waiting: "Görev tamamlandı. Diğer paralel birim (IK/Ruhsat) bitmeyi bekliyor.",
                done: "İK ve Ruhsat süreçleri tamamlandı. Mali İşlere gönderildi.",
            },
        );
        Self { rules }
    }

    /// Standard rules plus the systems, group B and orientation stages.
    pub fn extended() -> Self {
        let mut table = Self::standard();
        table.rules.insert(
            ContractStatus::MaliIsler,
            Rule::Forward {
                tasks: std::slice::from_ref(&SYSTEMS_TASK),
                status: ContractStatus::BilgiSistemleri,
                message: "Bilgi Sistemleri birimine yönlendirildi.",
            },
        );
        table.rules.insert(
            ContractStatus::BilgiSistemleri,
            Rule::Forward {
                tasks: &GROUP_B_TASKS,
                status: ContractStatus::ParalelSurecB,
                message: "Misafir Hizmetleri ve Biyomedikal birimlerine görev atandı.",
            },
        );
        table.rules.insert(
            ContractStatus::ParalelSurecB,
            Rule::Join {
                group: ParallelGroup::B,
                then: ORIENTATION_TASK,
                status: ContractStatus::Oryantasyon,
                waiting: "Görev tamamlandı. Diğer paralel birim (Misafir Hizmetleri/Biyomedikal) bitmeyi bekliyor.",
                done: "Misafir Hizmetleri ve Biyomedikal süreçleri tamamlandı. Oryantasyon planlamasına gönderildi.",
            },
        );
        table
    }

    pub fn for_sequence(extended: bool) -> Self {
        if extended {
            Self::extended()
        } else {
            Self::standard()
        }
    }

    /// Evaluate the rule for `completion.status`.
    pub fn advance(&self, completion: &Completion<'_>) -> Decision {
        match self.rules.get(&completion.status) {
            Some(rule) => rule.apply(completion),
            None => Decision::quiet(Outcome::Undefined, "Tanımsız durum."),
        }
    }
}
