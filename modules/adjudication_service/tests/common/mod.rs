//! Common test utilities: in-memory repositories over the domain traits
//! and fixture helpers for seeding a campaign.

#![allow(dead_code)]

use adjudication_service::contract::*;
use adjudication_service::domain::repository::{
    AssignmentRepository, CandidateRepository, FacilityRepository, ImportRepository,
    NetworkRepository, OccupationalGroupRepository, PositionRepository,
};
use adjudication_service::domain::Service;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

type Result<T> = std::result::Result<T, AdjudicationError>;

#[derive(Default)]
struct State {
    redes: HashMap<i32, Network>,
    ipress: HashMap<i32, Facility>,
    grupos: HashMap<i32, OccupationalGroup>,
    plazas: HashMap<i32, Position>,
    postulantes: HashMap<i32, Candidate>,
    adjudicaciones: HashMap<i32, Assignment>,
    next_id: i32,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn asignados(&self, plaza_id: i32) -> i64 {
        self.adjudicaciones
            .values()
            .filter(|a| a.plaza_id == Some(plaza_id) && a.estado == AssignmentState::Adjudicado)
            .count() as i64
    }

    fn availability_of(&self, position: &Position) -> Option<PositionAvailability> {
        let facility = self.ipress.get(&position.ipress_id)?;
        let red = self.redes.get(&facility.red_id)?;
        let grupo = self.grupos.get(&position.grupo_ocupacional_id)?;
        let asignados = self.asignados(position.id);
        Some(PositionAvailability {
            id: position.id,
            red: red.nombre.clone(),
            ipress: facility.nombre.clone(),
            grupo_ocupacional: grupo.nombre.clone(),
            subunidad: position.subunidad.clone(),
            especialidad: position.especialidad.clone(),
            total: position.total as i64,
            asignados,
            libres: position.total as i64 - asignados,
        })
    }

    fn with_status(&self, candidate: &Candidate) -> Option<CandidateWithStatus> {
        let grupo = self.grupos.get(&candidate.grupo_ocupacional_id)?;
        let assignment = self
            .adjudicaciones
            .values()
            .find(|a| a.postulante_id == candidate.id)?;
        Some(CandidateWithStatus {
            candidate: candidate.clone(),
            grupo_ocupacional_nombre: grupo.nombre.clone(),
            estado: assignment.estado,
            fecha_adjudicacion: assignment.fecha_adjudicacion,
            fecha_desistimiento: assignment.fecha_desistimiento,
        })
    }

    fn record_of(&self, assignment: &Assignment) -> Option<AssignmentRecord> {
        let candidate = self.postulantes.get(&assignment.postulante_id)?;
        let grupo = self.grupos.get(&candidate.grupo_ocupacional_id)?;
        let position = assignment.plaza_id.and_then(|id| self.plazas.get(&id));
        let facility = position.and_then(|p| self.ipress.get(&p.ipress_id));
        let red = facility.and_then(|f| self.redes.get(&f.red_id));
        Some(AssignmentRecord {
            assignment: assignment.clone(),
            orden_merito: candidate.orden_merito,
            apellidos_nombres: candidate.apellidos_nombres.clone(),
            dni: candidate.dni.clone(),
            grupo_ocupacional: grupo.nombre.clone(),
            especialidad: candidate.especialidad.clone(),
            ipress_nombre: facility.map(|f| f.nombre.clone()),
            red_nombre: red.map(|r| r.nombre.clone()),
        })
    }

    fn records(&self, filter: &AssignmentFilter) -> Vec<AssignmentRecord> {
        let mut records: Vec<AssignmentRecord> = self
            .adjudicaciones
            .values()
            .filter_map(|a| self.record_of(a))
            .filter(|r| {
                filter.estado.map_or(true, |e| r.assignment.estado == e)
                    && filter.red_id.map_or(true, |red_id| {
                        r.assignment
                            .plaza_id
                            .and_then(|id| self.plazas.get(&id))
                            .and_then(|p| self.ipress.get(&p.ipress_id))
                            .is_some_and(|f| f.red_id == red_id)
                    })
                    && filter.grupo_ocupacional_id.map_or(true, |grupo_id| {
                        self.postulantes
                            .get(&r.assignment.postulante_id)
                            .is_some_and(|c| c.grupo_ocupacional_id == grupo_id)
                    })
                    && filter
                        .fecha_desde
                        .map_or(true, |desde| r.assignment.fecha_adjudicacion >= Some(desde))
                    && filter
                        .fecha_hasta
                        .map_or(true, |hasta| r.assignment.fecha_adjudicacion <= Some(hasta))
            })
            .collect();
        records.sort_by(|a, b| {
            (&a.grupo_ocupacional, a.orden_merito).cmp(&(&b.grupo_ocupacional, b.orden_merito))
        });
        records
    }

    fn insert_pending_assignment(&mut self, postulante_id: i32) {
        let now = Utc::now();
        let id = self.next_id();
        self.adjudicaciones.insert(
            id,
            Assignment {
                id,
                postulante_id,
                plaza_id: None,
                estado: AssignmentState::Pendiente,
                fecha_adjudicacion: None,
                fecha_desistimiento: None,
                observaciones: None,
                created_at: now,
                updated_at: now,
            },
        );
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Single in-memory store implementing every repository trait. Cloning
/// shares the underlying state.
#[derive(Clone, Default)]
pub struct InMemoryRepos {
    state: Arc<RwLock<State>>,
}

impl InMemoryRepos {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn service(&self) -> Service {
        Service::new(
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
        )
    }

    // ----- fixture helpers -----

    pub fn seed_network(&self, nombre: &str) -> Network {
        let mut state = self.state.write();
        let now = Utc::now();
        let id = state.next_id();
        let red = Network {
            id,
            nombre: nombre.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.redes.insert(id, red.clone());
        red
    }

    pub fn seed_facility(&self, nombre: &str, red_id: i32) -> Facility {
        let mut state = self.state.write();
        let now = Utc::now();
        let id = state.next_id();
        let facility = Facility {
            id,
            nombre: nombre.to_string(),
            red_id,
            created_at: now,
            updated_at: now,
        };
        state.ipress.insert(id, facility.clone());
        facility
    }

    pub fn seed_group(&self, nombre: &str) -> OccupationalGroup {
        let mut state = self.state.write();
        let now = Utc::now();
        let id = state.next_id();
        let grupo = OccupationalGroup {
            id,
            nombre: nombre.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.grupos.insert(id, grupo.clone());
        grupo
    }

    pub fn seed_position(&self, ipress_id: i32, grupo_ocupacional_id: i32, total: i32) -> Position {
        let mut state = self.state.write();
        let now = Utc::now();
        let id = state.next_id();
        let plaza = Position {
            id,
            ipress_id,
            grupo_ocupacional_id,
            subunidad: None,
            especialidad: None,
            total,
            created_at: now,
            updated_at: now,
        };
        state.plazas.insert(id, plaza.clone());
        plaza
    }

    pub fn seed_candidate(
        &self,
        grupo_ocupacional_id: i32,
        orden_merito: i32,
        apellidos_nombres: &str,
    ) -> Candidate {
        let mut state = self.state.write();
        let now = Utc::now();
        let id = state.next_id();
        let candidate = Candidate {
            id,
            orden_merito,
            apellidos_nombres: apellidos_nombres.to_string(),
            dni: None,
            grupo_ocupacional_id,
            especialidad: None,
            tiempo_servicio_anios: None,
            tiempo_servicio_meses: None,
            tiempo_servicio_dias: None,
            created_at: now,
            updated_at: now,
        };
        state.postulantes.insert(id, candidate.clone());
        state.insert_pending_assignment(id);
        candidate
    }

    /// Current assignment of a candidate, panicking if missing.
    pub fn assignment_of(&self, postulante_id: i32) -> Assignment {
        self.state
            .read()
            .adjudicaciones
            .values()
            .find(|a| a.postulante_id == postulante_id)
            .cloned()
            .unwrap()
    }

    pub fn network_count(&self) -> usize {
        self.state.read().redes.len()
    }

    pub fn facility_count(&self) -> usize {
        self.state.read().ipress.len()
    }

    pub fn group_count(&self) -> usize {
        self.state.read().grupos.len()
    }

    pub fn position_count(&self) -> usize {
        self.state.read().plazas.len()
    }

    pub fn candidate_count(&self) -> usize {
        self.state.read().postulantes.len()
    }

    pub fn position_by_id(&self, id: i32) -> Option<Position> {
        self.state.read().plazas.get(&id).cloned()
    }
}

// ===== Catalog repositories =====

#[async_trait]
impl NetworkRepository for InMemoryRepos {
    async fn create(&self, nombre: &str) -> Result<Network> {
        Ok(self.seed_network(nombre.trim()))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Network>> {
        Ok(self.state.read().redes.get(&id).cloned())
    }

    async fn find_by_name(&self, nombre: &str) -> Result<Option<Network>> {
        Ok(self
            .state
            .read()
            .redes
            .values()
            .find(|r| same_name(&r.nombre, nombre))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Network>> {
        let mut redes: Vec<Network> = self.state.read().redes.values().cloned().collect();
        redes.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        Ok(redes)
    }

    async fn update(&self, id: i32, nombre: &str) -> Result<Network> {
        let mut state = self.state.write();
        let red = state
            .redes
            .get_mut(&id)
            .ok_or_else(|| AdjudicationError::not_found("Red", id))?;
        red.nombre = nombre.trim().to_string();
        red.updated_at = Utc::now();
        Ok(red.clone())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let mut state = self.state.write();
        let dependents = state.ipress.values().filter(|f| f.red_id == id).count();
        if dependents > 0 {
            return Err(AdjudicationError::dependent_records(
                "la red",
                format!("{dependents} IPRESS"),
            ));
        }
        state.redes.remove(&id);
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.state.read().redes.len() as i64)
    }
}

#[async_trait]
impl FacilityRepository for InMemoryRepos {
    async fn create(&self, nombre: &str, red_id: i32) -> Result<Facility> {
        Ok(self.seed_facility(nombre.trim(), red_id))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Facility>> {
        Ok(self.state.read().ipress.get(&id).cloned())
    }

    async fn find_by_name(&self, red_id: i32, nombre: &str) -> Result<Option<Facility>> {
        Ok(self
            .state
            .read()
            .ipress
            .values()
            .find(|f| f.red_id == red_id && same_name(&f.nombre, nombre))
            .cloned())
    }

    async fn list(&self, red_id: Option<i32>) -> Result<Vec<Facility>> {
        let mut ipress: Vec<Facility> = self
            .state
            .read()
            .ipress
            .values()
            .filter(|f| red_id.map_or(true, |id| f.red_id == id))
            .cloned()
            .collect();
        ipress.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        Ok(ipress)
    }

    async fn update(&self, id: i32, nombre: &str, red_id: i32) -> Result<Facility> {
        let mut state = self.state.write();
        let facility = state
            .ipress
            .get_mut(&id)
            .ok_or_else(|| AdjudicationError::not_found("IPRESS", id))?;
        facility.nombre = nombre.trim().to_string();
        facility.red_id = red_id;
        facility.updated_at = Utc::now();
        Ok(facility.clone())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let mut state = self.state.write();
        let dependents = state.plazas.values().filter(|p| p.ipress_id == id).count();
        if dependents > 0 {
            return Err(AdjudicationError::dependent_records(
                "la IPRESS",
                format!("{dependents} plazas"),
            ));
        }
        state.ipress.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl OccupationalGroupRepository for InMemoryRepos {
    async fn create(&self, nombre: &str) -> Result<OccupationalGroup> {
        Ok(self.seed_group(nombre.trim()))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<OccupationalGroup>> {
        Ok(self.state.read().grupos.get(&id).cloned())
    }

    async fn find_by_name(&self, nombre: &str) -> Result<Option<OccupationalGroup>> {
        Ok(self
            .state
            .read()
            .grupos
            .values()
            .find(|g| same_name(&g.nombre, nombre))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<OccupationalGroup>> {
        let mut grupos: Vec<OccupationalGroup> =
            self.state.read().grupos.values().cloned().collect();
        grupos.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        Ok(grupos)
    }

    async fn update(&self, id: i32, nombre: &str) -> Result<OccupationalGroup> {
        let mut state = self.state.write();
        let grupo = state
            .grupos
            .get_mut(&id)
            .ok_or_else(|| AdjudicationError::not_found("Grupo ocupacional", id))?;
        grupo.nombre = nombre.trim().to_string();
        grupo.updated_at = Utc::now();
        Ok(grupo.clone())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let mut state = self.state.write();
        let postulantes = state
            .postulantes
            .values()
            .filter(|c| c.grupo_ocupacional_id == id)
            .count();
        let plazas = state
            .plazas
            .values()
            .filter(|p| p.grupo_ocupacional_id == id)
            .count();
        if postulantes > 0 || plazas > 0 {
            let mut parts = Vec::new();
            if postulantes > 0 {
                parts.push(format!("{postulantes} postulantes"));
            }
            if plazas > 0 {
                parts.push(format!("{plazas} plazas"));
            }
            return Err(AdjudicationError::dependent_records(
                "el grupo ocupacional",
                parts.join(" y "),
            ));
        }
        state.grupos.remove(&id);
        Ok(())
    }
}

// ===== Position repository =====

#[async_trait]
impl PositionRepository for InMemoryRepos {
    async fn create(&self, position: &NewPosition) -> Result<Position> {
        let mut state = self.state.write();
        let now = Utc::now();
        let id = state.next_id();
        let plaza = Position {
            id,
            ipress_id: position.ipress_id,
            grupo_ocupacional_id: position.grupo_ocupacional_id,
            subunidad: position.subunidad.clone(),
            especialidad: position.especialidad.clone(),
            total: position.total,
            created_at: now,
            updated_at: now,
        };
        state.plazas.insert(id, plaza.clone());
        Ok(plaza)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Position>> {
        Ok(self.state.read().plazas.get(&id).cloned())
    }

    async fn find_with_details(&self, id: i32) -> Result<Option<PositionWithDetails>> {
        let state = self.state.read();
        let Some(position) = state.plazas.get(&id) else {
            return Ok(None);
        };
        let facility = state
            .ipress
            .get(&position.ipress_id)
            .ok_or_else(|| AdjudicationError::internal("IPRESS huérfana"))?;
        let red = state
            .redes
            .get(&facility.red_id)
            .ok_or_else(|| AdjudicationError::internal("red huérfana"))?;
        let grupo = state
            .grupos
            .get(&position.grupo_ocupacional_id)
            .ok_or_else(|| AdjudicationError::internal("grupo huérfano"))?;
        Ok(Some(PositionWithDetails {
            position: position.clone(),
            ipress_nombre: facility.nombre.clone(),
            red_nombre: red.nombre.clone(),
            grupo_ocupacional_nombre: grupo.nombre.clone(),
        }))
    }

    async fn find_by_composite(
        &self,
        ipress_id: i32,
        grupo_ocupacional_id: i32,
        subunidad: Option<&str>,
        especialidad: Option<&str>,
    ) -> Result<Option<Position>> {
        Ok(self
            .state
            .read()
            .plazas
            .values()
            .find(|p| {
                p.ipress_id == ipress_id
                    && p.grupo_ocupacional_id == grupo_ocupacional_id
                    && p.subunidad.as_deref() == subunidad
                    && p.especialidad.as_deref() == especialidad
            })
            .cloned())
    }

    async fn list_availability(&self, filter: &PositionFilter) -> Result<Vec<PositionAvailability>> {
        let state = self.state.read();
        let mut rows: Vec<PositionAvailability> = state
            .plazas
            .values()
            .filter(|p| {
                filter
                    .ipress_id
                    .map_or(true, |ipress_id| p.ipress_id == ipress_id)
                    && filter
                        .grupo_ocupacional_id
                        .map_or(true, |grupo_id| p.grupo_ocupacional_id == grupo_id)
                    && filter.red_id.map_or(true, |red_id| {
                        state
                            .ipress
                            .get(&p.ipress_id)
                            .is_some_and(|f| f.red_id == red_id)
                    })
                    && filter.especialidad.as_deref().map_or(true, |needle| {
                        p.especialidad
                            .as_deref()
                            .is_some_and(|e| e.to_lowercase().contains(&needle.to_lowercase()))
                    })
            })
            .filter_map(|p| state.availability_of(p))
            .filter(|row| !filter.solo_disponibles || row.disponible())
            .collect();
        rows.sort_by(|a, b| {
            (&a.red, &a.ipress, &a.grupo_ocupacional, a.id).cmp(&(
                &b.red,
                &b.ipress,
                &b.grupo_ocupacional,
                b.id,
            ))
        });
        Ok(rows)
    }

    async fn availability(&self, id: i32) -> Result<Option<PositionAvailability>> {
        let state = self.state.read();
        Ok(state
            .plazas
            .get(&id)
            .and_then(|p| state.availability_of(p)))
    }

    async fn available_for_group(
        &self,
        grupo_ocupacional_id: i32,
    ) -> Result<Vec<PositionAvailability>> {
        let filter = PositionFilter {
            solo_disponibles: true,
            grupo_ocupacional_id: Some(grupo_ocupacional_id),
            ..Default::default()
        };
        self.list_availability(&filter).await
    }

    async fn update(&self, id: i32, position: &NewPosition) -> Result<Position> {
        let mut state = self.state.write();
        let plaza = state
            .plazas
            .get_mut(&id)
            .ok_or_else(|| AdjudicationError::not_found("Plaza", id))?;
        plaza.ipress_id = position.ipress_id;
        plaza.grupo_ocupacional_id = position.grupo_ocupacional_id;
        plaza.subunidad = position.subunidad.clone();
        plaza.especialidad = position.especialidad.clone();
        plaza.total = position.total;
        plaza.updated_at = Utc::now();
        Ok(plaza.clone())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let mut state = self.state.write();
        let dependents = state
            .adjudicaciones
            .values()
            .filter(|a| a.plaza_id == Some(id))
            .count();
        if dependents > 0 {
            return Err(AdjudicationError::dependent_records(
                "la plaza",
                format!("{dependents} adjudicaciones"),
            ));
        }
        state.plazas.remove(&id);
        Ok(())
    }

    async fn stats(&self) -> Result<PositionStats> {
        let state = self.state.read();
        let mut stats = PositionStats::default();
        for plaza in state.plazas.values() {
            stats.total_posiciones += 1;
            stats.total_plazas += plaza.total as i64;
            stats.total_asignados += state.asignados(plaza.id);
        }
        stats.total_libres = stats.total_plazas - stats.total_asignados;
        Ok(stats)
    }

    async fn stats_by_network(&self) -> Result<Vec<NetworkPositionStats>> {
        let state = self.state.read();
        let mut grouped: BTreeMap<String, PositionStats> = BTreeMap::new();
        for plaza in state.plazas.values() {
            let Some(red) = state
                .ipress
                .get(&plaza.ipress_id)
                .and_then(|f| state.redes.get(&f.red_id))
            else {
                continue;
            };
            let entry = grouped.entry(red.nombre.clone()).or_default();
            entry.total_posiciones += 1;
            entry.total_plazas += plaza.total as i64;
            entry.total_asignados += state.asignados(plaza.id);
            entry.total_libres = entry.total_plazas - entry.total_asignados;
        }
        Ok(grouped
            .into_iter()
            .map(|(nombre, stats)| NetworkPositionStats { nombre, stats })
            .collect())
    }

    async fn stats_by_group(&self) -> Result<Vec<NetworkPositionStats>> {
        let state = self.state.read();
        let mut grouped: BTreeMap<String, PositionStats> = BTreeMap::new();
        for plaza in state.plazas.values() {
            let Some(grupo) = state.grupos.get(&plaza.grupo_ocupacional_id) else {
                continue;
            };
            let entry = grouped.entry(grupo.nombre.clone()).or_default();
            entry.total_posiciones += 1;
            entry.total_plazas += plaza.total as i64;
            entry.total_asignados += state.asignados(plaza.id);
            entry.total_libres = entry.total_plazas - entry.total_asignados;
        }
        Ok(grouped
            .into_iter()
            .map(|(nombre, stats)| NetworkPositionStats { nombre, stats })
            .collect())
    }
}

// ===== Candidate repository =====

#[async_trait]
impl CandidateRepository for InMemoryRepos {
    async fn create_with_pending(&self, candidate: &NewCandidate) -> Result<Candidate> {
        let mut state = self.state.write();
        let now = Utc::now();
        let id = state.next_id();
        let created = Candidate {
            id,
            orden_merito: candidate.orden_merito,
            apellidos_nombres: candidate.apellidos_nombres.trim().to_string(),
            dni: candidate.dni.clone(),
            grupo_ocupacional_id: candidate.grupo_ocupacional_id,
            especialidad: candidate.especialidad.clone(),
            tiempo_servicio_anios: candidate.tiempo_servicio_anios,
            tiempo_servicio_meses: candidate.tiempo_servicio_meses,
            tiempo_servicio_dias: candidate.tiempo_servicio_dias,
            created_at: now,
            updated_at: now,
        };
        state.postulantes.insert(id, created.clone());
        state.insert_pending_assignment(id);
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Candidate>> {
        Ok(self.state.read().postulantes.get(&id).cloned())
    }

    async fn find_by_dni(&self, dni: &str) -> Result<Option<CandidateWithStatus>> {
        let state = self.state.read();
        Ok(state
            .postulantes
            .values()
            .find(|c| c.dni.as_deref() == Some(dni))
            .and_then(|c| state.with_status(c)))
    }

    async fn find_by_merit(
        &self,
        grupo_ocupacional_id: i32,
        orden_merito: i32,
    ) -> Result<Option<Candidate>> {
        Ok(self
            .state
            .read()
            .postulantes
            .values()
            .find(|c| {
                c.grupo_ocupacional_id == grupo_ocupacional_id && c.orden_merito == orden_merito
            })
            .cloned())
    }

    async fn list_with_status(&self, filter: &CandidateFilter) -> Result<Vec<CandidateWithStatus>> {
        let state = self.state.read();
        let mut rows: Vec<CandidateWithStatus> = state
            .postulantes
            .values()
            .filter_map(|c| state.with_status(c))
            .filter(|row| {
                filter
                    .grupo_ocupacional_id
                    .map_or(true, |id| row.candidate.grupo_ocupacional_id == id)
                    && filter.estado.map_or(true, |e| row.estado == e)
                    && filter.nombre.as_deref().map_or(true, |needle| {
                        row.candidate
                            .apellidos_nombres
                            .to_lowercase()
                            .contains(&needle.to_lowercase())
                    })
                    && filter
                        .dni
                        .as_deref()
                        .map_or(true, |dni| row.candidate.dni.as_deref() == Some(dni))
                    && filter
                        .orden_merito_desde
                        .map_or(true, |desde| row.candidate.orden_merito >= desde)
                    && filter
                        .orden_merito_hasta
                        .map_or(true, |hasta| row.candidate.orden_merito <= hasta)
            })
            .collect();
        rows.sort_by(|a, b| {
            (&a.grupo_ocupacional_nombre, a.candidate.orden_merito)
                .cmp(&(&b.grupo_ocupacional_nombre, b.candidate.orden_merito))
        });
        Ok(rows)
    }

    async fn pending_by_group(
        &self,
        grupo_ocupacional_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<Candidate>> {
        let state = self.state.read();
        let mut pending: Vec<Candidate> = state
            .postulantes
            .values()
            .filter(|c| c.grupo_ocupacional_id == grupo_ocupacional_id)
            .filter(|c| {
                state
                    .adjudicaciones
                    .values()
                    .any(|a| a.postulante_id == c.id && a.estado == AssignmentState::Pendiente)
            })
            .cloned()
            .collect();
        pending.sort_by_key(|c| c.orden_merito);
        if let Some(limit) = limit {
            pending.truncate(limit as usize);
        }
        Ok(pending)
    }

    async fn update(&self, id: i32, candidate: &NewCandidate) -> Result<Candidate> {
        let mut state = self.state.write();
        let existing = state
            .postulantes
            .get_mut(&id)
            .ok_or_else(|| AdjudicationError::not_found("Postulante", id))?;
        existing.orden_merito = candidate.orden_merito;
        existing.apellidos_nombres = candidate.apellidos_nombres.trim().to_string();
        existing.dni = candidate.dni.clone();
        existing.grupo_ocupacional_id = candidate.grupo_ocupacional_id;
        existing.especialidad = candidate.especialidad.clone();
        existing.tiempo_servicio_anios = candidate.tiempo_servicio_anios;
        existing.tiempo_servicio_meses = candidate.tiempo_servicio_meses;
        existing.tiempo_servicio_dias = candidate.tiempo_servicio_dias;
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let mut state = self.state.write();
        let assignment = state
            .adjudicaciones
            .values()
            .find(|a| a.postulante_id == id)
            .cloned();
        if let Some(assignment) = &assignment {
            if assignment.estado != AssignmentState::Pendiente {
                return Err(AdjudicationError::dependent_records(
                    "el postulante",
                    "una adjudicación no pendiente",
                ));
            }
        }
        if let Some(assignment) = assignment {
            state.adjudicaciones.remove(&assignment.id);
        }
        state.postulantes.remove(&id);
        Ok(())
    }

    async fn stats_by_group(&self) -> Result<Vec<GroupStats>> {
        let state = self.state.read();
        let mut grouped: BTreeMap<String, GroupStats> = BTreeMap::new();
        for candidate in state.postulantes.values() {
            let Some(grupo) = state.grupos.get(&candidate.grupo_ocupacional_id) else {
                continue;
            };
            let Some(row) = state.with_status(candidate) else {
                continue;
            };
            let entry = grouped
                .entry(grupo.nombre.clone())
                .or_insert_with(|| GroupStats {
                    grupo_ocupacional: grupo.nombre.clone(),
                    total_postulantes: 0,
                    pendientes: 0,
                    adjudicados: 0,
                    desistidos: 0,
                    renuncias: 0,
                });
            entry.total_postulantes += 1;
            match row.estado {
                AssignmentState::Pendiente => entry.pendientes += 1,
                AssignmentState::Adjudicado => entry.adjudicados += 1,
                AssignmentState::Desistido => entry.desistidos += 1,
                AssignmentState::Renuncio => entry.renuncias += 1,
                AssignmentState::Ausente => {}
            }
        }
        Ok(grouped.into_values().collect())
    }
}

// ===== Assignment repository =====

#[async_trait]
impl AssignmentRepository for InMemoryRepos {
    async fn find_by_id(&self, id: i32) -> Result<Option<Assignment>> {
        Ok(self.state.read().adjudicaciones.get(&id).cloned())
    }

    async fn find_by_candidate(&self, postulante_id: i32) -> Result<Option<Assignment>> {
        Ok(self
            .state
            .read()
            .adjudicaciones
            .values()
            .find(|a| a.postulante_id == postulante_id)
            .cloned())
    }

    async fn list(
        &self,
        filter: &AssignmentFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<AssignmentRecord>, u64)> {
        let records = self.state.read().records(filter);
        let total = records.len() as u64;
        let page = page.max(1);
        let limit = limit.max(1);
        let start = ((page - 1) * limit) as usize;
        let rows = records
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();
        Ok((rows, total))
    }

    async fn list_full(&self, filter: &AssignmentFilter) -> Result<Vec<AssignmentRecord>> {
        Ok(self.state.read().records(filter))
    }

    async fn list_by_position(&self, plaza_id: i32) -> Result<Vec<AssignmentRecord>> {
        Ok(self
            .state
            .read()
            .records(&AssignmentFilter::default())
            .into_iter()
            .filter(|r| r.assignment.plaza_id == Some(plaza_id))
            .collect())
    }

    async fn assign(
        &self,
        postulante_id: i32,
        plaza_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        let mut state = self.state.write();
        let assignment = state
            .adjudicaciones
            .values()
            .find(|a| a.postulante_id == postulante_id)
            .cloned()
            .ok_or_else(|| {
                AdjudicationError::not_found("Adjudicación de postulante", postulante_id)
            })?;
        match assignment.estado {
            AssignmentState::Adjudicado => {
                return Err(AdjudicationError::conflict(
                    "El postulante ya tiene una plaza adjudicada",
                ));
            }
            AssignmentState::Renuncio => {
                return Err(AdjudicationError::conflict(
                    "El postulante renunció y no puede ser adjudicado",
                ));
            }
            _ => {}
        }
        let position = state
            .plazas
            .get(&plaza_id)
            .cloned()
            .ok_or_else(|| AdjudicationError::not_found("Plaza", plaza_id))?;
        let candidate = state
            .postulantes
            .get(&postulante_id)
            .cloned()
            .ok_or_else(|| AdjudicationError::not_found("Postulante", postulante_id))?;
        if candidate.grupo_ocupacional_id != position.grupo_ocupacional_id {
            return Err(AdjudicationError::conflict(
                "El grupo ocupacional del postulante no coincide con el de la plaza",
            ));
        }
        if state.asignados(plaza_id) >= position.total as i64 {
            return Err(AdjudicationError::conflict(
                "La plaza no tiene cupos disponibles",
            ));
        }
        let stored = state
            .adjudicaciones
            .get_mut(&assignment.id)
            .ok_or_else(|| AdjudicationError::internal("adjudicación desaparecida"))?;
        stored.estado = AssignmentState::Adjudicado;
        stored.plaza_id = Some(plaza_id);
        stored.fecha_adjudicacion = Some(Utc::now());
        if let Some(obs) = observaciones {
            stored.observaciones = Some(obs.to_string());
        }
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn mark_withdrawn(
        &self,
        postulante_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        self.transition(
            postulante_id,
            &[
                AssignmentState::Pendiente,
                AssignmentState::Desistido,
                AssignmentState::Ausente,
                AssignmentState::Renuncio,
            ],
            AssignmentState::Desistido,
            observaciones,
            "El postulante tiene una plaza adjudicada; revierta la adjudicación primero",
        )
    }

    async fn mark_resigned(
        &self,
        postulante_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        self.transition(
            postulante_id,
            &[AssignmentState::Adjudicado],
            AssignmentState::Renuncio,
            observaciones,
            "El postulante no tiene una plaza adjudicada activa",
        )
    }

    async fn mark_absent(
        &self,
        postulante_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        self.transition(
            postulante_id,
            &[AssignmentState::Pendiente],
            AssignmentState::Ausente,
            observaciones,
            "Solo se puede marcar como ausente desde el estado pendiente",
        )
    }

    async fn reassign_to_pending(
        &self,
        postulante_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        self.transition(
            postulante_id,
            &[
                AssignmentState::Desistido,
                AssignmentState::Ausente,
                AssignmentState::Renuncio,
            ],
            AssignmentState::Pendiente,
            observaciones,
            "Solo se puede reasignar a postulantes desistidos, ausentes o con renuncia",
        )
    }

    async fn revert(&self, id: i32, observaciones: Option<&str>) -> Result<Assignment> {
        let mut state = self.state.write();
        let assignment = state
            .adjudicaciones
            .get_mut(&id)
            .ok_or_else(|| AdjudicationError::not_found("Adjudicación", id))?;
        if assignment.estado != AssignmentState::Adjudicado {
            return Err(AdjudicationError::conflict(
                "La adjudicación no tiene una plaza activa para revertir",
            ));
        }
        assignment.estado = AssignmentState::Pendiente;
        assignment.plaza_id = None;
        assignment.fecha_adjudicacion = None;
        if let Some(obs) = observaciones {
            assignment.observaciones = Some(obs.to_string());
        }
        assignment.updated_at = Utc::now();
        Ok(assignment.clone())
    }

    async fn update_state(
        &self,
        id: i32,
        estado: AssignmentState,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        let mut state = self.state.write();
        let assignment = state
            .adjudicaciones
            .get_mut(&id)
            .ok_or_else(|| AdjudicationError::not_found("Adjudicación", id))?;
        assignment.estado = estado;
        match estado {
            AssignmentState::Adjudicado => {
                assignment.fecha_adjudicacion = Some(Utc::now());
            }
            AssignmentState::Desistido | AssignmentState::Renuncio => {
                assignment.fecha_desistimiento = Some(Utc::now());
            }
            AssignmentState::Pendiente => {
                assignment.plaza_id = None;
                assignment.fecha_adjudicacion = None;
                assignment.fecha_desistimiento = None;
            }
            AssignmentState::Ausente => {}
        }
        if let Some(obs) = observaciones {
            assignment.observaciones = Some(obs.to_string());
        }
        assignment.updated_at = Utc::now();
        Ok(assignment.clone())
    }

    async fn reset(&self, id: i32) -> Result<Assignment> {
        let mut state = self.state.write();
        let assignment = state
            .adjudicaciones
            .get_mut(&id)
            .ok_or_else(|| AdjudicationError::not_found("Adjudicación", id))?;
        assignment.estado = AssignmentState::Pendiente;
        assignment.plaza_id = None;
        assignment.fecha_adjudicacion = None;
        assignment.fecha_desistimiento = None;
        assignment.observaciones = None;
        assignment.updated_at = Utc::now();
        Ok(assignment.clone())
    }

    async fn stats(&self) -> Result<AssignmentStats> {
        let state = self.state.read();
        let mut stats = AssignmentStats::default();
        for assignment in state.adjudicaciones.values() {
            stats.total_adjudicaciones += 1;
            match assignment.estado {
                AssignmentState::Pendiente => stats.pendientes += 1,
                AssignmentState::Adjudicado => stats.adjudicados += 1,
                AssignmentState::Desistido => stats.desistidos += 1,
                AssignmentState::Renuncio => stats.renuncias += 1,
                AssignmentState::Ausente => stats.ausentes += 1,
            }
        }
        if stats.total_adjudicaciones > 0 {
            let pct = stats.adjudicados as f64 * 100.0 / stats.total_adjudicaciones as f64;
            stats.porcentaje_adjudicado = (pct * 100.0).round() / 100.0;
        }
        Ok(stats)
    }

    async fn stats_by_network(&self) -> Result<Vec<NetworkAssignmentStats>> {
        let state = self.state.read();
        let mut grouped: BTreeMap<String, NetworkAssignmentStats> = BTreeMap::new();
        for assignment in state.adjudicaciones.values() {
            let Some(red) = assignment
                .plaza_id
                .and_then(|id| state.plazas.get(&id))
                .and_then(|p| state.ipress.get(&p.ipress_id))
                .and_then(|f| state.redes.get(&f.red_id))
            else {
                continue;
            };
            let entry = grouped
                .entry(red.nombre.clone())
                .or_insert_with(|| NetworkAssignmentStats {
                    red: red.nombre.clone(),
                    total_adjudicaciones: 0,
                    adjudicados: 0,
                    desistidos: 0,
                    renuncias: 0,
                });
            entry.total_adjudicaciones += 1;
            match assignment.estado {
                AssignmentState::Adjudicado => entry.adjudicados += 1,
                AssignmentState::Desistido => entry.desistidos += 1,
                AssignmentState::Renuncio => entry.renuncias += 1,
                _ => {}
            }
        }
        Ok(grouped.into_values().collect())
    }
}

impl InMemoryRepos {
    fn transition(
        &self,
        postulante_id: i32,
        from: &[AssignmentState],
        to: AssignmentState,
        observaciones: Option<&str>,
        conflict_message: &str,
    ) -> Result<Assignment> {
        let mut state = self.state.write();
        let assignment = state
            .adjudicaciones
            .values_mut()
            .find(|a| a.postulante_id == postulante_id)
            .ok_or_else(|| {
                AdjudicationError::not_found("Adjudicación de postulante", postulante_id)
            })?;
        if !from.contains(&assignment.estado) {
            return Err(AdjudicationError::conflict(conflict_message));
        }
        assignment.estado = to;
        match to {
            AssignmentState::Desistido | AssignmentState::Renuncio => {
                assignment.fecha_desistimiento = Some(Utc::now());
            }
            AssignmentState::Pendiente => {
                assignment.plaza_id = None;
                assignment.fecha_adjudicacion = None;
                assignment.fecha_desistimiento = None;
            }
            _ => {}
        }
        if let Some(obs) = observaciones {
            assignment.observaciones = Some(obs.to_string());
        }
        assignment.updated_at = Utc::now();
        Ok(assignment.clone())
    }
}

// ===== Import repository =====

#[async_trait]
impl ImportRepository for InMemoryRepos {
    async fn import_dataset(&self, dataset: &ImportDataset) -> Result<ImportSummary> {
        let mut state = self.state.write();
        let mut summary = ImportSummary::default();

        for row in &dataset.plazas {
            let red_id = match state
                .redes
                .values()
                .find(|r| same_name(&r.nombre, &row.red))
            {
                Some(red) => red.id,
                None => {
                    let now = Utc::now();
                    let id = state.next_id();
                    state.redes.insert(
                        id,
                        Network {
                            id,
                            nombre: row.red.trim().to_string(),
                            created_at: now,
                            updated_at: now,
                        },
                    );
                    summary.redes += 1;
                    id
                }
            };
            let ipress_id = match state
                .ipress
                .values()
                .find(|f| f.red_id == red_id && same_name(&f.nombre, &row.ipress))
            {
                Some(facility) => facility.id,
                None => {
                    let now = Utc::now();
                    let id = state.next_id();
                    state.ipress.insert(
                        id,
                        Facility {
                            id,
                            nombre: row.ipress.trim().to_string(),
                            red_id,
                            created_at: now,
                            updated_at: now,
                        },
                    );
                    summary.ipress += 1;
                    id
                }
            };
            let grupo_id =
                find_or_create_grupo(&mut state, &row.grupo_ocupacional, &mut summary)?;

            let subunidad = row.subunidad.as_deref().filter(|s| !s.trim().is_empty());
            let especialidad = row.especialidad.as_deref().filter(|s| !s.trim().is_empty());
            let existing = state
                .plazas
                .values()
                .find(|p| {
                    p.ipress_id == ipress_id
                        && p.grupo_ocupacional_id == grupo_id
                        && p.subunidad.as_deref() == subunidad
                        && p.especialidad.as_deref() == especialidad
                })
                .map(|p| p.id);
            match existing {
                Some(id) => {
                    if let Some(plaza) = state.plazas.get_mut(&id) {
                        plaza.total += row.total;
                        plaza.updated_at = Utc::now();
                    }
                }
                None => {
                    let now = Utc::now();
                    let id = state.next_id();
                    let plaza = Position {
                        id,
                        ipress_id,
                        grupo_ocupacional_id: grupo_id,
                        subunidad: subunidad.map(str::to_string),
                        especialidad: especialidad.map(str::to_string),
                        total: row.total,
                        created_at: now,
                        updated_at: now,
                    };
                    state.plazas.insert(id, plaza);
                }
            }
            summary.plazas += 1;
        }

        for row in &dataset.postulantes {
            let grupo_id =
                find_or_create_grupo(&mut state, &row.grupo_ocupacional, &mut summary)?;
            let now = Utc::now();
            let id = state.next_id();
            let candidate = Candidate {
                id,
                orden_merito: row.orden_merito,
                apellidos_nombres: row.apellidos_nombres.trim().to_string(),
                dni: row.dni.clone().filter(|d| !d.trim().is_empty()),
                grupo_ocupacional_id: grupo_id,
                especialidad: row.especialidad.clone().filter(|e| !e.trim().is_empty()),
                tiempo_servicio_anios: row.tiempo_servicio_anios,
                tiempo_servicio_meses: row.tiempo_servicio_meses,
                tiempo_servicio_dias: row.tiempo_servicio_dias,
                created_at: now,
                updated_at: now,
            };
            state.postulantes.insert(id, candidate);
            state.insert_pending_assignment(id);
            summary.postulantes += 1;
        }

        Ok(summary)
    }
}

fn find_or_create_grupo(
    state: &mut State,
    nombre: &str,
    summary: &mut ImportSummary,
) -> Result<i32> {
    if let Some(grupo) = state.grupos.values().find(|g| same_name(&g.nombre, nombre)) {
        return Ok(grupo.id);
    }
    let now = Utc::now();
    let id = state.next_id();
    state.grupos.insert(
        id,
        OccupationalGroup {
            id,
            nombre: nombre.trim().to_string(),
            created_at: now,
            updated_at: now,
        },
    );
    summary.grupos_ocupacionales += 1;
    Ok(id)
}
