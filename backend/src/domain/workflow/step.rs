//! Workflow steps, parallel groups and the completion bitset used by joins.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One step of the onboarding sequence.
///
/// Steps sharing an [`Step::order`] belong to the same parallel group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    MaliGmy,
    MerkezHakedis,
    InsanKaynaklari,
    Ruhsatlandirma,
    MaliIsler,
    BilgiSistemleri,
    MisafirHizmetleri,
    Biyomedikal,
    Oryantasyon,
    Tamamlandi,
}

impl Step {
    /// All steps in timeline order.
    pub const ALL: [Step; 10] = [
        Step::MaliGmy,
        Step::MerkezHakedis,
        Step::InsanKaynaklari,
        Step::Ruhsatlandirma,
        Step::MaliIsler,
        Step::BilgiSistemleri,
        Step::MisafirHizmetleri,
        Step::Biyomedikal,
        Step::Oryantasyon,
        Step::Tamamlandi,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MaliGmy => "MALI_GMY",
            Self::MerkezHakedis => "MERKEZ_HAKEDIS",
            Self::InsanKaynaklari => "INSAN_KAYNAKLARI",
            Self::Ruhsatlandirma => "RUHSATLANDIRMA",
            Self::MaliIsler => "MALI_ISLER",
            Self::BilgiSistemleri => "BILGI_SISTEMLERI",
            Self::MisafirHizmetleri => "MISAFIR_HIZMETLERI",
            Self::Biyomedikal => "BIYOMEDIKAL",
            Self::Oryantasyon => "ORYANTASYON",
            Self::Tamamlandi => "TAMAMLANDI",
        }
    }

    /// Timeline label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::MaliGmy => "Mali GMY Onayı",
            Self::MerkezHakedis => "Merkez Hakediş",
            Self::InsanKaynaklari => "İnsan Kaynakları",
            Self::Ruhsatlandirma => "Ruhsatlandırma",
            Self::MaliIsler => "Mali İşler",
            Self::BilgiSistemleri => "Bilgi Sistemleri",
            Self::MisafirHizmetleri => "Misafir Hizmetleri",
            Self::Biyomedikal => "Biyomedikal",
            Self::Oryantasyon => "Oryantasyon Planlaması",
            Self::Tamamlandi => "Süreç Tamamlandı",
        }
    }

    /// Position in the sequence; parallel siblings share a value.
    pub const fn order(self) -> u8 {
        match self {
            Self::MaliGmy => 1,
            Self::MerkezHakedis => 2,
            Self::InsanKaynaklari | Self::Ruhsatlandirma => 3,
            Self::MaliIsler => 4,
            Self::BilgiSistemleri => 5,
            Self::MisafirHizmetleri | Self::Biyomedikal => 6,
            Self::Oryantasyon => 7,
            Self::Tamamlandi => 8,
        }
    }

    /// The parallel group this step belongs to, if any.
    pub const fn parallel_group(self) -> Option<ParallelGroup> {
        match self {
            Self::InsanKaynaklari | Self::Ruhsatlandirma => Some(ParallelGroup::A),
            Self::MisafirHizmetleri | Self::Biyomedikal => Some(ParallelGroup::B),
            _ => None,
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown workflow step: {value}")]
pub struct StepParseError {
    pub value: String,
}

impl FromStr for Step {
    type Err = StepParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|step| step.as_str() == value)
            .ok_or_else(|| StepParseError {
                value: value.to_owned(),
            })
    }
}

/// A named set of steps that run concurrently and must all finish before the
/// sequence continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParallelGroup {
    /// Human resources and licensing.
    A,
    /// Guest services and biomedical.
    B,
}

impl ParallelGroup {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }

    /// Steps that must complete for the group to join.
    pub const fn members(self) -> &'static [Step] {
        match self {
            Self::A => &[Step::InsanKaynaklari, Step::Ruhsatlandirma],
            Self::B => &[Step::MisafirHizmetleri, Step::Biyomedikal],
        }
    }

    pub fn required(self) -> StepSet {
        self.members().iter().copied().collect()
    }
}

/// Bitset of steps, one bit per [`Step`].
///
/// # Examples
/// ```
/// use onboarding_backend::domain::workflow::{ParallelGroup, Step, StepSet};
///
/// let done: StepSet = [Step::InsanKaynaklari].into_iter().collect();
/// assert!(!done.covers(ParallelGroup::A.required()));
/// assert!(done.with(Step::Ruhsatlandirma).covers(ParallelGroup::A.required()));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StepSet(u16);

impl StepSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn with(self, step: Step) -> Self {
        Self(self.0 | step.bit())
    }

    pub fn insert(&mut self, step: Step) {
        self.0 |= step.bit();
    }

    pub const fn contains(self, step: Step) -> bool {
        self.0 & step.bit() != 0
    }

    /// True when every step of `other` is also in `self`.
    pub const fn covers(self, other: StepSet) -> bool {
        self.0 & other.0 == other.0
    }
}

impl FromIterator<Step> for StepSet {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}
