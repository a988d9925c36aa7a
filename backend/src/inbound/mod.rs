//! Inbound adapters translating external requests into driving port calls.
//!
//! Only HTTP exists today; handlers live under [`http`].

pub mod http;
