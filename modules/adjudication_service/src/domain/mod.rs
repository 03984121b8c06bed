//! Domain layer - business logic and services

pub mod repository;
pub mod service;
pub mod validation;

pub use repository::{
    AssignmentRepository, CandidateRepository, FacilityRepository, ImportRepository,
    NetworkRepository, OccupationalGroupRepository, PositionRepository,
};
pub use service::Service;
