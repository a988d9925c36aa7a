//! Department roles held by staff members.
//!
//! Roles double as routing keys for the workflow: a transition names the role
//! that owns the next step and the assignment policy picks a user holding it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A department or administrative role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    MaliGmy,
    MerkezHakedis,
    InsanKaynaklari,
    Ruhsatlandirma,
    MaliIsler,
    BilgiSistemleri,
    MisafirHizmetleri,
    Biyomedikal,
    IsgEgitmeni,
    KaliteEgitmeni,
    Admin,
}

impl Role {
    /// Every role, in catalogue order.
    pub const ALL: [Role; 11] = [
        Role::MaliGmy,
        Role::MerkezHakedis,
        Role::InsanKaynaklari,
        Role::Ruhsatlandirma,
        Role::MaliIsler,
        Role::BilgiSistemleri,
        Role::MisafirHizmetleri,
        Role::Biyomedikal,
        Role::IsgEgitmeni,
        Role::KaliteEgitmeni,
        Role::Admin,
    ];

    /// Stable identifier used in storage and on the wire.
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
            Self::IsgEgitmeni => "ISG_EGITMENI",
            Self::KaliteEgitmeni => "KALITE_EGITMENI",
            Self::Admin => "ADMIN",
        }
    }

    /// Human-readable department name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::MaliGmy => "Mali GMY",
            Self::MerkezHakedis => "Merkez Hakediş",
            Self::InsanKaynaklari => "İnsan Kaynakları",
            Self::Ruhsatlandirma => "Ruhsatlandırma",
            Self::MaliIsler => "Mali İşler",
            Self::BilgiSistemleri => "Bilgi Sistemleri",
            Self::MisafirHizmetleri => "Misafir Hizmetleri",
            Self::Biyomedikal => "Biyomedikal",
            Self::IsgEgitmeni => "İSG Eğitmeni",
            Self::KaliteEgitmeni => "Kalite Eğitmeni",
            Self::Admin => "Admin",
        }
    }

    /// Short summary of the department's responsibility.
    pub const fn description(self) -> &'static str {
        match self {
            Self::MaliGmy => "Sözleşme başlatma ve onaylama",
            Self::MerkezHakedis => "Sözleşme ulaşım kontrolü",
            Self::InsanKaynaklari => "Oracle ve özlük işlemleri",
            Self::Ruhsatlandirma => "e-İmza işlemleri",
            Self::MaliIsler => "Hakediş entegrasyonu",
            Self::BilgiSistemleri => "Pusula ve e-imza kontrolü",
            Self::MisafirHizmetleri => "Oda ve randevu hazırlık",
            Self::Biyomedikal => "Medikal ekipman hazırlık",
            Self::IsgEgitmeni => "İSG eğitimi",
            Self::KaliteEgitmeni => "Kalite eğitimi",
            Self::Admin => "Sistem yöneticisi",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text does not name a known role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {value}")]
pub struct RoleParseError {
    pub value: String,
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| RoleParseError {
                value: value.to_owned(),
            })
    }
}
