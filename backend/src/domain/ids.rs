//! Integer identifiers for stored records.
//!
//! Records are keyed by database-assigned serial integers. Each record kind
//! gets its own newtype so a task id cannot be passed where a user id is
//! expected.

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw identifier.
            #[must_use]
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// Raw integer value.
            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id! {
    /// Identifier of a staff member.
    UserId
}

define_id! {
    /// Identifier of an organisational unit.
    UnitId
}

define_id! {
    /// Identifier of an onboarding contract.
    ContractId
}

define_id! {
    /// Identifier of a workflow task.
    TaskId
}
