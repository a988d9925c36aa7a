//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Staff directory. `email` is unique.
    users (id) {
        id -> Int4,
        name -> Varchar,
        email -> Varchar,
        /// Write-only; never selected by read paths.
        password -> Nullable<Varchar>,
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    units (id) {
        id -> Int4,
        name -> Varchar,
        training_contact_user_id -> Nullable<Int4>,
    }
}

diesel::table! {
    /// Onboarding contracts. `data` holds the intake fields as JSONB.
    contracts (id) {
        id -> Int4,
        current_status -> Varchar,
        created_by -> Int4,
        data -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Department tasks. `data` holds the completion answers.
    tasks (id) {
        id -> Int4,
        contract_id -> Int4,
        assigned_to -> Int4,
        step_name -> Varchar,
        description -> Text,
        status -> Varchar,
        data -> Nullable<Jsonb>,
        created_at -> Timestamptz,
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(units -> users (training_contact_user_id));
diesel::joinable!(contracts -> users (created_by));
diesel::joinable!(tasks -> contracts (contract_id));
diesel::joinable!(tasks -> users (assigned_to));

diesel::allow_tables_to_appear_in_same_query!(users, units, contracts, tasks);
