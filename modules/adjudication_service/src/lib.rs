//! Adjudication Service Module
//!
//! Merit-ordered assignment of candidates (postulantes) to healthcare
//! positions (plazas) across networks, facilities and occupational
//! groups. Exposes a REST API over a relational store.

// Public exports
pub mod contract;
pub use contract::{
    AdjudicationError, Assignment, AssignmentState, Candidate, Facility, Network,
    OccupationalGroup, Position,
};

pub mod domain;
pub use domain::Service;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod infra;
