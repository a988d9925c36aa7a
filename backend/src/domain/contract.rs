//! Onboarding contracts: the aggregate root of the workflow.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{ContractId, UserId};

/// Where a contract currently sits in the onboarding workflow.
///
/// The status is the sole input that selects the next transition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    MaliGmy,
    MerkezHakedis,
    /// Human resources and licensing are working in parallel.
    ParalelSurec,
    MaliIsler,
    BilgiSistemleri,
    /// Guest services and biomedical are working in parallel.
    ParalelSurecB,
    Oryantasyon,
    Tamamlandi,
}

impl ContractStatus {
    pub const ALL: [ContractStatus; 8] = [
        ContractStatus::MaliGmy,
        ContractStatus::MerkezHakedis,
        ContractStatus::ParalelSurec,
        ContractStatus::MaliIsler,
        ContractStatus::BilgiSistemleri,
        ContractStatus::ParalelSurecB,
        ContractStatus::Oryantasyon,
        ContractStatus::Tamamlandi,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MaliGmy => "MALI_GMY",
            Self::MerkezHakedis => "MERKEZ_HAKEDIS",
            Self::ParalelSurec => "PARALEL_SUREC",
            Self::MaliIsler => "MALI_ISLER",
            Self::BilgiSistemleri => "BILGI_SISTEMLERI",
            Self::ParalelSurecB => "PARALEL_SUREC_B",
            Self::Oryantasyon => "ORYANTASYON",
            Self::Tamamlandi => "TAMAMLANDI",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown contract status: {value}")]
pub struct ContractStatusParseError {
    pub value: String,
}

impl FromStr for ContractStatus {
    type Err = ContractStatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ContractStatusParseError {
                value: value.to_owned(),
            })
    }
}

/// Intake data captured when the contract is started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractData {
    pub doctor_name: String,
    pub doctor_role: String,
    pub start_date: NaiveDate,
}

/// A stored contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub current_status: ContractStatus,
    pub created_by: UserId,
    pub data: ContractData,
    pub created_at: DateTime<Utc>,
}

/// A contract joined with its creator's name, as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSummary {
    pub contract: Contract,
    pub created_by_name: Option<String>,
}

/// Intake field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContractValidationError {
    #[error("{field} must not be empty")]
    Missing { field: &'static str },
    #[error("start_date must be a calendar date formatted YYYY-MM-DD")]
    MalformedStartDate,
}

impl ContractValidationError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field } => field,
            Self::MalformedStartDate => "start_date",
        }
    }
}

/// Validated request to start a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractDraft {
    data: ContractData,
    created_by: UserId,
}

impl ContractDraft {
    /// Validate raw intake fields.
    ///
    /// Fields are trimmed; each must be non-empty and `start_date` must parse
    /// as an ISO calendar date.
    ///
    /// # Examples
    /// ```
    /// use onboarding_backend::domain::{ContractDraft, UserId};
    ///
    /// let draft = ContractDraft::new("Dr. Ahmet Kaya", "Kardiyoloji", "2025-03-01", UserId::new(1))
    ///     .expect("valid draft");
    /// assert_eq!(draft.data().doctor_name, "Dr. Ahmet Kaya");
    /// ```
    pub fn new(
        doctor_name: &str,
        doctor_role: &str,
        start_date: &str,
        created_by: UserId,
    ) -> Result<Self, ContractValidationError> {
        let doctor_name = required("doctor_name", doctor_name)?;
        let doctor_role = required("doctor_role", doctor_role)?;
        let start_date = required("start_date", start_date)?;
        let start_date = NaiveDate::parse_from_str(start_date, "%Y-%m-%d")
            .map_err(|_| ContractValidationError::MalformedStartDate)?;
        Ok(Self {
            data: ContractData {
                doctor_name: doctor_name.to_owned(),
                doctor_role: doctor_role.to_owned(),
                start_date,
            },
            created_by,
        })
    }

    pub fn data(&self) -> &ContractData {
        &self.data
    }

    pub fn created_by(&self) -> UserId {
        self.created_by
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ContractValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ContractValidationError::Missing { field });
    }
    Ok(trimmed)
}
