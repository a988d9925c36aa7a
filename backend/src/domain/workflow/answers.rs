//! Answers submitted when a task is completed.
//!
//! [`TaskAnswers`] is the raw JSON object, stored verbatim. [`StepAnswers`] is
//! the typed view of the same object for the step the task belongs to. Known
//! keys must carry their expected JSON type; unknown keys are ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Step;
use crate::domain::UnitId;

/// Raw answers exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskAnswers(Map<String, Value>);

/// Raised when submitted answers are not a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("answers must be a JSON object, got {found}")]
pub struct AnswersShapeError {
    pub found: &'static str,
}

impl TaskAnswers {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for TaskAnswers {
    type Error = AnswersShapeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(AnswersShapeError { found: "null" }),
            Value::Bool(_) => Err(AnswersShapeError { found: "a boolean" }),
            Value::Number(_) => Err(AnswersShapeError { found: "a number" }),
            Value::String(_) => Err(AnswersShapeError { found: "a string" }),
            Value::Array(_) => Err(AnswersShapeError { found: "an array" }),
        }
    }
}

/// A known answer key carried the wrong JSON type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid answers for {step}: {message}")]
pub struct AnswersError {
    pub step: Step,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FinancialApprovalAnswers {
    pub satis_onaylandi_mi: Option<bool>,
    pub hakedise_gonderildi_mi: Option<bool>,
}

/// Merkez Hakediş review: did the contract arrive and is it approved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContractReviewAnswers {
    #[serde(rename = "sozlesme_ulasti_mi")]
    pub arrived: Option<bool>,
    #[serde(rename = "sozlesme_onaylandi_mi")]
    pub approved: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PersonnelAnswers {
    pub oracle_girisi: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LicensingAnswers {
    pub esign_istendi: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FinanceAnswers {
    pub hakkedis: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SystemsAnswers {
    pub pusula_kuruldu_mu: Option<bool>,
    pub comed_kuruldu_mu: Option<bool>,
    pub esign_integrasyon: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GuestServicesAnswers {
    pub randevu_tanimlandi: Option<bool>,
    pub oda_altyapi: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BiomedicalAnswers {
    pub ekipman_tamam: Option<bool>,
}

/// Orientation planning: where the doctor sits and which units train them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrientationAnswers {
    pub doktor_konumu: Option<String>,
    #[serde(default)]
    pub secilen_birimler: Vec<UnitId>,
}

/// Typed answers, tagged by the step whose task produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAnswers {
    MaliGmy(FinancialApprovalAnswers),
    MerkezHakedis(ContractReviewAnswers),
    InsanKaynaklari(PersonnelAnswers),
    Ruhsatlandirma(LicensingAnswers),
    MaliIsler(FinanceAnswers),
    BilgiSistemleri(SystemsAnswers),
    MisafirHizmetleri(GuestServicesAnswers),
    Biyomedikal(BiomedicalAnswers),
    Oryantasyon(OrientationAnswers),
    /// The terminal step collects nothing.
    Tamamlandi,
}

impl StepAnswers {
    /// Interpret raw answers for `step`.
    ///
    /// # Examples
    /// ```
    /// use onboarding_backend::domain::workflow::{Step, StepAnswers, TaskAnswers};
    /// use serde_json::json;
    ///
    /// let raw = TaskAnswers::try_from(json!({ "sozlesme_ulasti_mi": false, "not": "x" }))
    ///     .expect("object");
    /// let parsed = StepAnswers::parse(Step::MerkezHakedis, &raw).expect("valid answers");
    /// assert_eq!(parsed.contract_review().and_then(|r| r.arrived), Some(false));
    /// ```
    pub fn parse(step: Step, answers: &TaskAnswers) -> Result<Self, AnswersError> {
        let parsed = match step {
            Step::MaliGmy => Self::MaliGmy(typed(step, answers)?),
            Step::MerkezHakedis => Self::MerkezHakedis(typed(step, answers)?),
            Step::InsanKaynaklari => Self::InsanKaynaklari(typed(step, answers)?),
            Step::Ruhsatlandirma => Self::Ruhsatlandirma(typed(step, answers)?),
            Step::MaliIsler => Self::MaliIsler(typed(step, answers)?),
            Step::BilgiSistemleri => Self::BilgiSistemleri(typed(step, answers)?),
            Step::MisafirHizmetleri => Self::MisafirHizmetleri(typed(step, answers)?),
            Step::Biyomedikal => Self::Biyomedikal(typed(step, answers)?),
            Step::Oryantasyon => Self::Oryantasyon(typed(step, answers)?),
            Step::Tamamlandi => Self::Tamamlandi,
        };
        Ok(parsed)
    }

    /// Review answers, when these came from a Merkez Hakediş task.
    pub fn contract_review(&self) -> Option<&ContractReviewAnswers> {
        match self {
            Self::MerkezHakedis(review) => Some(review),
            _ => None,
        }
    }
}

fn typed<T: DeserializeOwned>(step: Step, answers: &TaskAnswers) -> Result<T, AnswersError> {
    serde_json::from_value(Value::Object(answers.0.clone())).map_err(|err| AnswersError {
        step,
        message: err.to_string(),
    })
}
