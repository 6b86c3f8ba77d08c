//! Relay Core
//!
//! Core types and abstractions for triggering and awaiting remote Azure DevOps jobs.
//!
//! This crate contains:
//! - Domain types: job handles, stage statuses, status vocabularies and the
//!   pure completeness/outcome classification
//! - DTOs: wire representations of the Azure DevOps build and release APIs

pub mod domain;
pub mod dto;
