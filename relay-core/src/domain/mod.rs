//! Core domain types
//!
//! This module contains the structures shared by the HTTP client (which maps
//! wire responses into them) and the poller (which drives its state machine
//! off them).

pub mod definition;
pub mod job;
pub mod status;
