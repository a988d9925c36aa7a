//! Organisational units that receive orientation training.

use serde::{Deserialize, Serialize};

use super::{UnitId, UserId};

/// A unit together with its training contact's name, when one is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub training_contact_user_id: Option<UserId>,
    pub trainer_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitValidationError {
    #[error("name must not be empty")]
    EmptyName,
}

/// Validated input for creating or replacing a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDraft {
    name: String,
    training_contact: Option<UserId>,
}

impl UnitDraft {
    pub fn new(
        name: impl AsRef<str>,
        training_contact: Option<UserId>,
    ) -> Result<Self, UnitValidationError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(UnitValidationError::EmptyName);
        }
        Ok(Self {
            name: name.to_owned(),
            training_contact,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn training_contact(&self) -> Option<UserId> {
        self.training_contact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        assert_eq!(
            UnitDraft::new(" ", None),
            Err(UnitValidationError::EmptyName)
        );
    }

    #[test]
    fn keeps_training_contact() {
        let draft = UnitDraft::new("Acil Servis", Some(UserId::new(9))).expect("valid draft");
        assert_eq!(draft.name(), "Acil Servis");
        assert_eq!(draft.training_contact(), Some(UserId::new(9)));
    }
}
