//! `define_port_error!` generates a `thiserror` enum for a driven port along
//! with snake_case constructors, one per variant.
//!
//! Struct-variant constructors take `impl Into<T>` for every field so callers
//! can pass `&str` where the variant stores a `String`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use crate::domain::TaskId;

    define_port_error! {
        pub enum SamplePortError {
            Offline => "store offline",
            Query { message: String } => "query failed: {message}",
            Missing { task_id: TaskId } => "task {task_id} not found",
            Both { message: String, attempts: u32 } => "{message} after {attempts}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SamplePortError::offline(), SamplePortError::Offline);
        assert_eq!(SamplePortError::offline().to_string(), "store offline");
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(
            SamplePortError::query("syntax error").to_string(),
            "query failed: syntax error"
        );
    }

    #[test]
    fn typed_fields_keep_their_type() {
        let err = SamplePortError::missing(TaskId::new(8));
        assert_eq!(
            err,
            SamplePortError::Missing {
                task_id: TaskId::new(8)
            }
        );
        assert_eq!(err.to_string(), "task 8 not found");
    }

    #[test]
    fn multiple_fields_are_positional() {
        assert_eq!(
            SamplePortError::both("timeout", 3_u32).to_string(),
            "timeout after 3"
        );
    }
}
