//! HTTP inbound adapter exposing the REST endpoints under `/api`.

pub mod contracts;
pub mod dto;
pub mod error;
pub mod health;
pub mod roles;
pub mod schemas;
pub mod state;
pub mod tasks;
#[cfg(test)]
pub mod test_utils;
pub mod units;
pub mod users;
pub mod validation;

pub use error::ApiResult;
