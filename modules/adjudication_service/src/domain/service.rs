//! Domain service - business logic orchestration

use super::repository::{
    AssignmentRepository, CandidateRepository, FacilityRepository, ImportRepository,
    NetworkRepository, OccupationalGroupRepository, PositionRepository,
};
use super::validation;
use crate::contract::{
    AdjudicationError, Assignment, AssignmentFilter, AssignmentRecord, AssignmentStats,
    BulkAssignmentOutcome, Candidate, CandidateFilter, CandidateWithStatus, Dashboard, Facility,
    GroupStats, ImportDataset, ImportSummary, Network, NetworkAssignmentStats,
    NetworkPositionStats, NewCandidate, NewPosition, OccupationalGroup, PositionAvailability,
    PositionFilter, PositionStats, PositionWithDetails, Validation,
};
use crate::contract::{AssignmentState, Position};
use std::sync::Arc;

type Result<T> = std::result::Result<T, AdjudicationError>;

/// States accepted by the direct state update endpoint.
const DIRECT_UPDATE_STATES: [AssignmentState; 4] = [
    AssignmentState::Pendiente,
    AssignmentState::Adjudicado,
    AssignmentState::Desistido,
    AssignmentState::Renuncio,
];

/// Domain service for the adjudication campaign
pub struct Service {
    networks: Arc<dyn NetworkRepository>,
    facilities: Arc<dyn FacilityRepository>,
    groups: Arc<dyn OccupationalGroupRepository>,
    positions: Arc<dyn PositionRepository>,
    candidates: Arc<dyn CandidateRepository>,
    assignments: Arc<dyn AssignmentRepository>,
    import: Arc<dyn ImportRepository>,
}

impl Service {
    /// Create a new service instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        networks: Arc<dyn NetworkRepository>,
        facilities: Arc<dyn FacilityRepository>,
        groups: Arc<dyn OccupationalGroupRepository>,
        positions: Arc<dyn PositionRepository>,
        candidates: Arc<dyn CandidateRepository>,
        assignments: Arc<dyn AssignmentRepository>,
        import: Arc<dyn ImportRepository>,
    ) -> Self {
        Self {
            networks,
            facilities,
            groups,
            positions,
            candidates,
            assignments,
            import,
        }
    }

    // ===== Network Operations =====

    pub async fn list_networks(&self) -> Result<Vec<Network>> {
        self.networks.list().await
    }

    pub async fn get_network(&self, id: i32) -> Result<Network> {
        self.networks
            .find_by_id(id)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Red", id))
    }

    pub async fn network_facilities(&self, id: i32) -> Result<Vec<Facility>> {
        self.get_network(id).await?;
        self.facilities.list(Some(id)).await
    }

    pub async fn count_networks(&self) -> Result<i64> {
        self.networks.count().await
    }

    pub async fn create_network(&self, nombre: &str) -> Result<Network> {
        let nombre = nombre.trim();
        if nombre.is_empty() {
            return Err(AdjudicationError::validation(
                "El nombre de la red es obligatorio",
            ));
        }
        if self.networks.find_by_name(nombre).await?.is_some() {
            return Err(AdjudicationError::conflict(format!(
                "Ya existe una red con el nombre '{nombre}'"
            )));
        }
        self.networks.create(nombre).await
    }

    pub async fn update_network(&self, id: i32, nombre: &str) -> Result<Network> {
        self.get_network(id).await?;
        let nombre = nombre.trim();
        if nombre.is_empty() {
            return Err(AdjudicationError::validation(
                "El nombre de la red es obligatorio",
            ));
        }
        if let Some(other) = self.networks.find_by_name(nombre).await? {
            if other.id != id {
                return Err(AdjudicationError::conflict(format!(
                    "Ya existe una red con el nombre '{nombre}'"
                )));
            }
        }
        self.networks.update(id, nombre).await
    }

    pub async fn delete_network(&self, id: i32) -> Result<()> {
        self.get_network(id).await?;
        self.networks.delete(id).await
    }

    // ===== Facility Operations =====

    pub async fn list_facilities(&self, red_id: Option<i32>) -> Result<Vec<Facility>> {
        self.facilities.list(red_id).await
    }

    pub async fn get_facility(&self, id: i32) -> Result<Facility> {
        self.facilities
            .find_by_id(id)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("IPRESS", id))
    }

    pub async fn create_facility(&self, nombre: &str, red_id: i32) -> Result<Facility> {
        let nombre = nombre.trim();
        if nombre.is_empty() {
            return Err(AdjudicationError::validation(
                "El nombre de la IPRESS es obligatorio",
            ));
        }
        if self.networks.find_by_id(red_id).await?.is_none() {
            return Err(AdjudicationError::validation(
                "La red especificada no existe",
            ));
        }
        if self.facilities.find_by_name(red_id, nombre).await?.is_some() {
            return Err(AdjudicationError::conflict(format!(
                "Ya existe una IPRESS con el nombre '{nombre}' en la red"
            )));
        }
        self.facilities.create(nombre, red_id).await
    }

    pub async fn update_facility(&self, id: i32, nombre: &str, red_id: i32) -> Result<Facility> {
        self.get_facility(id).await?;
        let nombre = nombre.trim();
        if nombre.is_empty() {
            return Err(AdjudicationError::validation(
                "El nombre de la IPRESS es obligatorio",
            ));
        }
        if self.networks.find_by_id(red_id).await?.is_none() {
            return Err(AdjudicationError::validation(
                "La red especificada no existe",
            ));
        }
        if let Some(other) = self.facilities.find_by_name(red_id, nombre).await? {
            if other.id != id {
                return Err(AdjudicationError::conflict(format!(
                    "Ya existe una IPRESS con el nombre '{nombre}' en la red"
                )));
            }
        }
        self.facilities.update(id, nombre, red_id).await
    }

    pub async fn delete_facility(&self, id: i32) -> Result<()> {
        self.get_facility(id).await?;
        self.facilities.delete(id).await
    }

    // ===== Occupational Group Operations =====

    pub async fn list_groups(&self) -> Result<Vec<OccupationalGroup>> {
        self.groups.list().await
    }

    pub async fn get_group(&self, id: i32) -> Result<OccupationalGroup> {
        self.groups
            .find_by_id(id)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Grupo ocupacional", id))
    }

    pub async fn create_group(&self, nombre: &str) -> Result<OccupationalGroup> {
        let nombre = nombre.trim();
        if nombre.is_empty() {
            return Err(AdjudicationError::validation(
                "El nombre del grupo ocupacional es obligatorio",
            ));
        }
        if self.groups.find_by_name(nombre).await?.is_some() {
            return Err(AdjudicationError::conflict(format!(
                "Ya existe un grupo ocupacional con el nombre '{nombre}'"
            )));
        }
        self.groups.create(nombre).await
    }

    pub async fn update_group(&self, id: i32, nombre: &str) -> Result<OccupationalGroup> {
        self.get_group(id).await?;
        let nombre = nombre.trim();
        if nombre.is_empty() {
            return Err(AdjudicationError::validation(
                "El nombre del grupo ocupacional es obligatorio",
            ));
        }
        if let Some(other) = self.groups.find_by_name(nombre).await? {
            if other.id != id {
                return Err(AdjudicationError::conflict(format!(
                    "Ya existe un grupo ocupacional con el nombre '{nombre}'"
                )));
            }
        }
        self.groups.update(id, nombre).await
    }

    pub async fn delete_group(&self, id: i32) -> Result<()> {
        self.get_group(id).await?;
        self.groups.delete(id).await
    }

    pub async fn group_statistics(&self) -> Result<Vec<GroupStats>> {
        self.candidates.stats_by_group().await
    }

    // ===== Position Operations =====

    pub async fn list_positions(
        &self,
        filter: &PositionFilter,
    ) -> Result<Vec<PositionAvailability>> {
        self.positions.list_availability(filter).await
    }

    pub async fn available_positions(
        &self,
        grupo_ocupacional_id: Option<i32>,
    ) -> Result<Vec<PositionAvailability>> {
        let filter = PositionFilter {
            solo_disponibles: true,
            grupo_ocupacional_id,
            ..Default::default()
        };
        self.positions.list_availability(&filter).await
    }

    pub async fn get_position(&self, id: i32) -> Result<PositionWithDetails> {
        self.positions
            .find_with_details(id)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Plaza", id))
    }

    pub async fn position_availability(&self, id: i32) -> Result<PositionAvailability> {
        self.positions
            .availability(id)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Plaza", id))
    }

    pub async fn position_assignments(&self, id: i32) -> Result<Vec<AssignmentRecord>> {
        self.get_position(id).await?;
        self.assignments.list_by_position(id).await
    }

    pub async fn create_position(&self, position: &NewPosition) -> Result<Position> {
        self.validate_position(position, None).await?;
        self.positions.create(position).await
    }

    pub async fn update_position(&self, id: i32, position: &NewPosition) -> Result<Position> {
        self.get_position(id).await?;
        self.validate_position(position, Some(id)).await?;
        self.positions.update(id, position).await
    }

    pub async fn delete_position(&self, id: i32) -> Result<()> {
        self.get_position(id).await?;
        self.positions.delete(id).await
    }

    pub async fn position_stats(&self) -> Result<PositionStats> {
        self.positions.stats().await
    }

    pub async fn position_stats_by_network(&self) -> Result<Vec<NetworkPositionStats>> {
        self.positions.stats_by_network().await
    }

    pub async fn position_stats_by_group(&self) -> Result<Vec<NetworkPositionStats>> {
        self.positions.stats_by_group().await
    }

    // ===== Candidate Operations =====

    pub async fn list_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<CandidateWithStatus>> {
        self.candidates.list_with_status(filter).await
    }

    pub async fn pending_candidates(
        &self,
        grupo_ocupacional_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<Candidate>> {
        self.get_group(grupo_ocupacional_id).await?;
        self.candidates
            .pending_by_group(grupo_ocupacional_id, limit)
            .await
    }

    pub async fn candidate_stats_by_group(&self) -> Result<Vec<GroupStats>> {
        self.candidates.stats_by_group().await
    }

    pub async fn get_candidate(&self, id: i32) -> Result<Candidate> {
        self.candidates
            .find_by_id(id)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Postulante", id))
    }

    pub async fn get_candidate_by_dni(&self, dni: &str) -> Result<CandidateWithStatus> {
        self.candidates
            .find_by_dni(dni)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Postulante con DNI", dni))
    }

    pub async fn create_candidate(&self, candidate: &NewCandidate) -> Result<Candidate> {
        self.validate_candidate(candidate, None).await?;
        self.candidates.create_with_pending(candidate).await
    }

    pub async fn update_candidate(&self, id: i32, candidate: &NewCandidate) -> Result<Candidate> {
        self.get_candidate(id).await?;
        self.validate_candidate(candidate, Some(id)).await?;
        self.candidates.update(id, candidate).await
    }

    pub async fn delete_candidate(&self, id: i32) -> Result<()> {
        self.get_candidate(id).await?;
        self.candidates.delete(id).await
    }

    // ===== Assignment Operations =====

    pub async fn list_assignments(
        &self,
        filter: &AssignmentFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<AssignmentRecord>, u64)> {
        self.assignments.list(filter, page, limit).await
    }

    pub async fn list_assignments_full(
        &self,
        filter: &AssignmentFilter,
    ) -> Result<Vec<AssignmentRecord>> {
        self.assignments.list_full(filter).await
    }

    pub async fn get_assignment(&self, id: i32) -> Result<Assignment> {
        self.assignments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Adjudicación", id))
    }

    pub async fn assignment_by_candidate(&self, postulante_id: i32) -> Result<Assignment> {
        self.get_candidate(postulante_id).await?;
        self.assignments
            .find_by_candidate(postulante_id)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Adjudicación de postulante", postulante_id))
    }

    /// Check whether a candidate can be assigned to a position. Failing
    /// reasons are reported in fixed order: existence, current state, free
    /// capacity, group match.
    pub async fn validate(&self, postulante_id: i32, plaza_id: i32) -> Result<Validation> {
        let Some(candidate) = self.candidates.find_by_id(postulante_id).await? else {
            return Ok(Validation::fail("Postulante no encontrado"));
        };
        let Some(availability) = self.positions.availability(plaza_id).await? else {
            return Ok(Validation::fail("Plaza no encontrada"));
        };
        let assignment = self.assignment_by_candidate(postulante_id).await?;
        if assignment.estado == AssignmentState::Adjudicado {
            return Ok(Validation::fail(
                "El postulante ya tiene una plaza adjudicada",
            ));
        }
        if assignment.estado == AssignmentState::Renuncio {
            return Ok(Validation::fail(
                "El postulante renunció y no puede ser adjudicado",
            ));
        }
        if !availability.disponible() {
            return Ok(Validation::fail("La plaza no tiene cupos disponibles"));
        }
        let position = self
            .positions
            .find_by_id(plaza_id)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Plaza", plaza_id))?;
        if position.grupo_ocupacional_id != candidate.grupo_ocupacional_id {
            return Ok(Validation::fail(
                "El grupo ocupacional del postulante no coincide con el de la plaza",
            ));
        }
        Ok(Validation::ok())
    }

    /// Assign a candidate to a position. Preconditions are validated here
    /// for friendly messages; the repository re-checks them inside the
    /// transaction.
    pub async fn assign_automatic(
        &self,
        postulante_id: i32,
        plaza_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        let validation = self.validate(postulante_id, plaza_id).await?;
        if !validation.valido {
            return Err(AdjudicationError::validation(validation.mensaje));
        }
        self.assignments
            .assign(postulante_id, plaza_id, observaciones)
            .await
    }

    pub async fn mark_withdrawn(
        &self,
        postulante_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        let assignment = self.assignment_by_candidate(postulante_id).await?;
        if assignment.estado == AssignmentState::Adjudicado {
            return Err(AdjudicationError::validation(
                "El postulante tiene una plaza adjudicada; revierta la adjudicación primero",
            ));
        }
        self.assignments
            .mark_withdrawn(postulante_id, observaciones)
            .await
    }

    pub async fn mark_resigned(
        &self,
        postulante_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        let assignment = self.assignment_by_candidate(postulante_id).await?;
        if assignment.estado != AssignmentState::Adjudicado {
            return Err(AdjudicationError::validation(
                "El postulante no tiene una plaza adjudicada activa",
            ));
        }
        self.assignments
            .mark_resigned(postulante_id, observaciones)
            .await
    }

    pub async fn mark_absent(
        &self,
        postulante_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        let assignment = self.assignment_by_candidate(postulante_id).await?;
        if assignment.estado != AssignmentState::Pendiente {
            return Err(AdjudicationError::validation(
                "Solo se puede marcar como ausente desde el estado pendiente",
            ));
        }
        self.assignments
            .mark_absent(postulante_id, observaciones)
            .await
    }

    pub async fn reassign_to_pending(
        &self,
        postulante_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        let assignment = self.assignment_by_candidate(postulante_id).await?;
        if !assignment.estado.is_reassignable() {
            return Err(AdjudicationError::validation(
                "Solo se puede reasignar a postulantes desistidos, ausentes o con renuncia",
            ));
        }
        self.assignments
            .reassign_to_pending(postulante_id, observaciones)
            .await
    }

    pub async fn revert_assignment(
        &self,
        id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        let assignment = self.get_assignment(id).await?;
        if assignment.estado != AssignmentState::Adjudicado {
            return Err(AdjudicationError::validation(
                "La adjudicación no tiene una plaza activa para revertir",
            ));
        }
        self.assignments.revert(id, observaciones).await
    }

    /// Assign up to `count` pending candidates of a group, lowest merit
    /// rank first, pairing each with the next available position row
    /// ordered by network and facility. One candidate per row; per-pair
    /// failures are logged and skipped without consuming the row.
    pub async fn bulk_assign(
        &self,
        grupo_ocupacional_id: i32,
        count: u64,
    ) -> Result<BulkAssignmentOutcome> {
        self.get_group(grupo_ocupacional_id).await?;
        let pending = self
            .candidates
            .pending_by_group(grupo_ocupacional_id, Some(count))
            .await?;
        if pending.is_empty() {
            return Err(AdjudicationError::validation(
                "No hay postulantes pendientes en el grupo ocupacional",
            ));
        }
        let available = self
            .positions
            .available_for_group(grupo_ocupacional_id)
            .await?;
        if available.is_empty() {
            return Err(AdjudicationError::validation(
                "No hay plazas disponibles para el grupo ocupacional",
            ));
        }

        let mut outcome = BulkAssignmentOutcome::default();
        let mut row = 0usize;
        for candidate in pending {
            let Some(position) = available.get(row) else {
                break;
            };
            match self
                .assignments
                .assign(candidate.id, position.id, None)
                .await
            {
                Ok(assignment) => {
                    row += 1;
                    outcome.asignados.push(assignment);
                }
                Err(err) => {
                    tracing::warn!(
                        postulante_id = candidate.id,
                        plaza_id = position.id,
                        error = %err,
                        "adjudicación masiva: par omitido"
                    );
                    outcome.omitidos += 1;
                }
            }
        }
        Ok(outcome)
    }

    /// Direct state update (`PUT /{id}/estado`). Only a subset of states
    /// can be set this way.
    pub async fn update_state(
        &self,
        id: i32,
        estado: &str,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        let parsed = AssignmentState::parse(estado)
            .filter(|s| DIRECT_UPDATE_STATES.contains(s))
            .ok_or_else(|| {
                AdjudicationError::validation(
                    "Estado inválido. Estados válidos: pendiente, adjudicado, desistido, renuncio",
                )
            })?;
        self.get_assignment(id).await?;
        self.assignments.update_state(id, parsed, observaciones).await
    }

    /// Clearing an assignment resets it to a blank pending record instead
    /// of removing the row, preserving the one-assignment-per-candidate
    /// invariant.
    pub async fn delete_assignment(&self, id: i32) -> Result<Assignment> {
        self.get_assignment(id).await?;
        self.assignments.reset(id).await
    }

    pub async fn assignment_stats(&self) -> Result<AssignmentStats> {
        self.assignments.stats().await
    }

    pub async fn assignment_stats_by_network(&self) -> Result<Vec<NetworkAssignmentStats>> {
        self.assignments.stats_by_network().await
    }

    pub async fn dashboard(&self) -> Result<Dashboard> {
        Ok(Dashboard {
            adjudicaciones: self.assignments.stats().await?,
            plazas: self.positions.stats().await?,
            por_grupo: self.candidates.stats_by_group().await?,
        })
    }

    // ===== Import Operations =====

    /// Validate and load a bulk dataset in one transaction.
    pub async fn import(&self, dataset: &ImportDataset) -> Result<ImportSummary> {
        validation::validate_dataset(dataset)?;
        let summary = self.import.import_dataset(dataset).await?;
        tracing::info!(
            postulantes = summary.postulantes,
            plazas = summary.plazas,
            "importación masiva completada"
        );
        Ok(summary)
    }

    // ===== Helper Methods =====

    async fn validate_position(
        &self,
        position: &NewPosition,
        exclude_id: Option<i32>,
    ) -> Result<()> {
        if position.total < 0 {
            return Err(AdjudicationError::validation(
                "El total de plazas no puede ser negativo",
            ));
        }
        if self
            .facilities
            .find_by_id(position.ipress_id)
            .await?
            .is_none()
        {
            return Err(AdjudicationError::validation(
                "La IPRESS especificada no existe",
            ));
        }
        if self
            .groups
            .find_by_id(position.grupo_ocupacional_id)
            .await?
            .is_none()
        {
            return Err(AdjudicationError::validation(
                "El grupo ocupacional especificado no existe",
            ));
        }
        if let Some(existing) = self
            .positions
            .find_by_composite(
                position.ipress_id,
                position.grupo_ocupacional_id,
                position.subunidad.as_deref(),
                position.especialidad.as_deref(),
            )
            .await?
        {
            if exclude_id != Some(existing.id) {
                return Err(AdjudicationError::conflict(
                    "Ya existe una plaza con la misma IPRESS, grupo ocupacional, subunidad y especialidad",
                ));
            }
        }
        Ok(())
    }

    async fn validate_candidate(
        &self,
        candidate: &NewCandidate,
        exclude_id: Option<i32>,
    ) -> Result<()> {
        if candidate.apellidos_nombres.trim().is_empty() {
            return Err(AdjudicationError::validation(
                "Apellidos y nombres es obligatorio",
            ));
        }
        if candidate.orden_merito <= 0 {
            return Err(AdjudicationError::validation(
                "El orden de mérito debe ser un número positivo",
            ));
        }
        if self
            .groups
            .find_by_id(candidate.grupo_ocupacional_id)
            .await?
            .is_none()
        {
            return Err(AdjudicationError::validation(
                "El grupo ocupacional especificado no existe",
            ));
        }
        if let Some(existing) = self
            .candidates
            .find_by_merit(candidate.grupo_ocupacional_id, candidate.orden_merito)
            .await?
        {
            if exclude_id != Some(existing.id) {
                return Err(AdjudicationError::conflict(format!(
                    "Ya existe un postulante con orden de mérito {} en el grupo ocupacional",
                    candidate.orden_merito
                )));
            }
        }
        if let Some(dni) = candidate.dni.as_deref() {
            if !validation::is_valid_dni(dni) {
                return Err(AdjudicationError::validation(format!("DNI inválido: {dni}")));
            }
            if let Some(existing) = self.candidates.find_by_dni(dni).await? {
                if exclude_id != Some(existing.candidate.id) {
                    return Err(AdjudicationError::conflict(format!(
                        "Ya existe un postulante con DNI {dni}"
                    )));
                }
            }
        }
        Ok(())
    }
}
