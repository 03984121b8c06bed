//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{
    AdjudicationError, Assignment, AssignmentFilter, AssignmentRecord, AssignmentState,
    AssignmentStats, Candidate, CandidateFilter, CandidateWithStatus, Facility, GroupStats,
    ImportDataset, ImportSummary, Network, NetworkAssignmentStats, NetworkPositionStats,
    NewCandidate, NewPosition, OccupationalGroup, Position, PositionAvailability, PositionFilter,
    PositionStats, PositionWithDetails,
};
use async_trait::async_trait;

type Result<T> = std::result::Result<T, AdjudicationError>;

/// Repository for networks (redes)
#[async_trait]
pub trait NetworkRepository: Send + Sync {
    /// Create a new network
    async fn create(&self, nombre: &str) -> Result<Network>;

    /// Find a network by id
    async fn find_by_id(&self, id: i32) -> Result<Option<Network>>;

    /// Find a network by case-insensitive name
    async fn find_by_name(&self, nombre: &str) -> Result<Option<Network>>;

    /// List all networks ordered by name
    async fn list(&self) -> Result<Vec<Network>>;

    /// Update a network's name
    async fn update(&self, id: i32, nombre: &str) -> Result<Network>;

    /// Delete a network; fails with DependentRecords when facilities reference it
    async fn delete(&self, id: i32) -> Result<()>;

    /// Count all networks
    async fn count(&self) -> Result<i64>;
}

/// Repository for facilities (IPRESS)
#[async_trait]
pub trait FacilityRepository: Send + Sync {
    /// Create a new facility in a network
    async fn create(&self, nombre: &str, red_id: i32) -> Result<Facility>;

    /// Find a facility by id
    async fn find_by_id(&self, id: i32) -> Result<Option<Facility>>;

    /// Find a facility by case-insensitive name within a network
    async fn find_by_name(&self, red_id: i32, nombre: &str) -> Result<Option<Facility>>;

    /// List facilities, optionally restricted to one network
    async fn list(&self, red_id: Option<i32>) -> Result<Vec<Facility>>;

    /// Update a facility
    async fn update(&self, id: i32, nombre: &str, red_id: i32) -> Result<Facility>;

    /// Delete a facility; fails with DependentRecords when positions reference it
    async fn delete(&self, id: i32) -> Result<()>;
}

/// Repository for occupational groups
#[async_trait]
pub trait OccupationalGroupRepository: Send + Sync {
    /// Create a new occupational group
    async fn create(&self, nombre: &str) -> Result<OccupationalGroup>;

    /// Find a group by id
    async fn find_by_id(&self, id: i32) -> Result<Option<OccupationalGroup>>;

    /// Find a group by case-insensitive name
    async fn find_by_name(&self, nombre: &str) -> Result<Option<OccupationalGroup>>;

    /// List all groups ordered by name
    async fn list(&self) -> Result<Vec<OccupationalGroup>>;

    /// Update a group's name
    async fn update(&self, id: i32, nombre: &str) -> Result<OccupationalGroup>;

    /// Delete a group; fails with DependentRecords when candidates or
    /// positions reference it
    async fn delete(&self, id: i32) -> Result<()>;
}

/// Repository for positions (plazas)
#[async_trait]
pub trait PositionRepository: Send + Sync {
    /// Create a new position
    async fn create(&self, position: &NewPosition) -> Result<Position>;

    /// Find a position by id
    async fn find_by_id(&self, id: i32) -> Result<Option<Position>>;

    /// Find a position with facility, network and group names joined in
    async fn find_with_details(&self, id: i32) -> Result<Option<PositionWithDetails>>;

    /// Find a position by its composite natural key
    async fn find_by_composite(
        &self,
        ipress_id: i32,
        grupo_ocupacional_id: i32,
        subunidad: Option<&str>,
        especialidad: Option<&str>,
    ) -> Result<Option<Position>>;

    /// List positions with computed availability, applying filters
    async fn list_availability(&self, filter: &PositionFilter) -> Result<Vec<PositionAvailability>>;

    /// Computed availability for a single position
    async fn availability(&self, id: i32) -> Result<Option<PositionAvailability>>;

    /// Positions with free slots for a group, ordered by network then facility
    async fn available_for_group(
        &self,
        grupo_ocupacional_id: i32,
    ) -> Result<Vec<PositionAvailability>>;

    /// Update a position
    async fn update(&self, id: i32, position: &NewPosition) -> Result<Position>;

    /// Delete a position; fails with DependentRecords when assignments
    /// reference it
    async fn delete(&self, id: i32) -> Result<()>;

    /// Capacity counters across all positions
    async fn stats(&self) -> Result<PositionStats>;

    /// Capacity counters grouped by network
    async fn stats_by_network(&self) -> Result<Vec<NetworkPositionStats>>;

    /// Capacity counters grouped by occupational group
    async fn stats_by_group(&self) -> Result<Vec<NetworkPositionStats>>;
}

/// Repository for candidates (postulantes)
#[async_trait]
pub trait CandidateRepository: Send + Sync {
    /// Create a candidate together with its initial pending assignment,
    /// atomically
    async fn create_with_pending(&self, candidate: &NewCandidate) -> Result<Candidate>;

    /// Find a candidate by id
    async fn find_by_id(&self, id: i32) -> Result<Option<Candidate>>;

    /// Find a candidate with status by DNI
    async fn find_by_dni(&self, dni: &str) -> Result<Option<CandidateWithStatus>>;

    /// Find a candidate by merit rank within a group
    async fn find_by_merit(
        &self,
        grupo_ocupacional_id: i32,
        orden_merito: i32,
    ) -> Result<Option<Candidate>>;

    /// List candidates with assignment status, applying filters; ordered by
    /// group then merit rank
    async fn list_with_status(&self, filter: &CandidateFilter) -> Result<Vec<CandidateWithStatus>>;

    /// Pending candidates of a group in merit order, optionally capped
    async fn pending_by_group(
        &self,
        grupo_ocupacional_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<Candidate>>;

    /// Update a candidate
    async fn update(&self, id: i32, candidate: &NewCandidate) -> Result<Candidate>;

    /// Delete a candidate and its assignment; fails with DependentRecords
    /// unless the assignment is still pending
    async fn delete(&self, id: i32) -> Result<()>;

    /// Candidate state counters per occupational group
    async fn stats_by_group(&self) -> Result<Vec<GroupStats>>;
}

/// Repository for assignment records (adjudicaciones)
///
/// The lifecycle mutations are conditional transactional operations: each
/// one re-checks its preconditions inside the transaction and fails with a
/// Conflict when the row changed underneath.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Find an assignment by id
    async fn find_by_id(&self, id: i32) -> Result<Option<Assignment>>;

    /// Find the assignment of a candidate
    async fn find_by_candidate(&self, postulante_id: i32) -> Result<Option<Assignment>>;

    /// Paginated full listing with filters; returns the page and the total
    /// row count before pagination
    async fn list(
        &self,
        filter: &AssignmentFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<AssignmentRecord>, u64)>;

    /// Unpaginated full listing with filters
    async fn list_full(&self, filter: &AssignmentFilter) -> Result<Vec<AssignmentRecord>>;

    /// Assignments referencing a position
    async fn list_by_position(&self, plaza_id: i32) -> Result<Vec<AssignmentRecord>>;

    /// Assign a pending candidate to a position with free capacity and a
    /// matching group; sets estado = adjudicado and fecha_adjudicacion
    async fn assign(
        &self,
        postulante_id: i32,
        plaza_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment>;

    /// pendiente -> desistido; sets fecha_desistimiento
    async fn mark_withdrawn(
        &self,
        postulante_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment>;

    /// adjudicado -> renuncio; keeps the position reference for the record
    async fn mark_resigned(
        &self,
        postulante_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment>;

    /// pendiente -> ausente
    async fn mark_absent(
        &self,
        postulante_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment>;

    /// {desistido, ausente, renuncio} -> pendiente; clears position and
    /// both timestamps
    async fn reassign_to_pending(
        &self,
        postulante_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment>;

    /// adjudicado -> pendiente by assignment id; clears position and
    /// fecha_adjudicacion
    async fn revert(&self, id: i32, observaciones: Option<&str>) -> Result<Assignment>;

    /// Direct state set with timestamp bookkeeping
    async fn update_state(
        &self,
        id: i32,
        estado: AssignmentState,
        observaciones: Option<&str>,
    ) -> Result<Assignment>;

    /// Reset an assignment to a blank pending record
    async fn reset(&self, id: i32) -> Result<Assignment>;

    /// Aggregated state counters
    async fn stats(&self) -> Result<AssignmentStats>;

    /// State counters grouped by network
    async fn stats_by_network(&self) -> Result<Vec<NetworkAssignmentStats>>;
}

/// Repository for the bulk import transaction
#[async_trait]
pub trait ImportRepository: Send + Sync {
    /// Load a validated dataset in a single transaction: networks,
    /// facilities and groups are reused by case-insensitive name, positions
    /// by composite key (adding capacity), and every candidate is inserted
    /// with a fresh pending assignment. Any failure rolls everything back.
    async fn import_dataset(&self, dataset: &ImportDataset) -> Result<ImportSummary>;
}
