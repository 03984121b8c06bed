//! Public contract for the adjudication service
//!
//! Transport-agnostic domain models and error types. Everything the REST
//! layer and external callers see goes through this module.

pub mod error;
pub mod model;

pub use error::AdjudicationError;
pub use model::{
    Assignment, AssignmentFilter, AssignmentRecord, AssignmentState, AssignmentStats,
    BulkAssignmentOutcome, Candidate, CandidateFilter, CandidateWithStatus, Dashboard, Facility,
    GroupStats, ImportCandidateRow, ImportDataset, ImportPositionRow, ImportSummary, Network,
    NetworkAssignmentStats, NetworkPositionStats, NewCandidate, NewPosition, OccupationalGroup,
    Position, PositionAvailability, PositionFilter, PositionStats, PositionWithDetails, Validation,
};
