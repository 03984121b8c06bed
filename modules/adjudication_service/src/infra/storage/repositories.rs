//! SeaORM repository implementations

use crate::contract::{
    AdjudicationError, Assignment, AssignmentFilter, AssignmentRecord, AssignmentState,
    AssignmentStats, Candidate, CandidateFilter, CandidateWithStatus, Facility, GroupStats,
    ImportDataset, ImportSummary, Network, NetworkAssignmentStats, NetworkPositionStats,
    NewCandidate, NewPosition, OccupationalGroup, Position, PositionAvailability, PositionFilter,
    PositionStats, PositionWithDetails,
};
use crate::domain::repository::{
    AssignmentRepository, CandidateRepository, FacilityRepository, ImportRepository,
    NetworkRepository, OccupationalGroupRepository, PositionRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, TransactionTrait,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::entity::{adjudicacion, grupo_ocupacional, ipress, plaza, postulante, red};
use super::mapper::estado_from_db;

type Result<T> = std::result::Result<T, AdjudicationError>;

/// Case-insensitive name equality with Unicode folding. SQL `LOWER` is
/// ASCII-only on SQLite, so the folding happens in Rust over fetched rows.
fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn none_if_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ===== Network Repository =====

pub struct SeaOrmNetworkRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmNetworkRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NetworkRepository for SeaOrmNetworkRepository {
    async fn create(&self, nombre: &str) -> Result<Network> {
        let now = Utc::now();
        let active = red::ActiveModel {
            id: NotSet,
            nombre: Set(nombre.trim().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = active.insert(&*self.db).await?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Network>> {
        let result = red::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(|e| e.into()))
    }

    async fn find_by_name(&self, nombre: &str) -> Result<Option<Network>> {
        let result = red::Entity::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .find(|m| names_match(&m.nombre, nombre));
        Ok(result.map(|e| e.into()))
    }

    async fn list(&self) -> Result<Vec<Network>> {
        let results = red::Entity::find()
            .order_by_asc(red::Column::Nombre)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(|e| e.into()).collect())
    }

    async fn update(&self, id: i32, nombre: &str) -> Result<Network> {
        let existing = red::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Red", id))?;
        let mut active: red::ActiveModel = existing.into();
        active.nombre = Set(nombre.trim().to_string());
        active.updated_at = Set(Utc::now());
        let model = active.update(&*self.db).await?;
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let dependents = ipress::Entity::find()
            .filter(ipress::Column::RedId.eq(id))
            .count(&*self.db)
            .await?;
        if dependents > 0 {
            return Err(AdjudicationError::dependent_records(
                "la red",
                format!("{dependents} IPRESS"),
            ));
        }
        red::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let count = red::Entity::find().count(&*self.db).await?;
        Ok(count as i64)
    }
}

// ===== Facility Repository =====

pub struct SeaOrmFacilityRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmFacilityRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FacilityRepository for SeaOrmFacilityRepository {
    async fn create(&self, nombre: &str, red_id: i32) -> Result<Facility> {
        let now = Utc::now();
        let active = ipress::ActiveModel {
            id: NotSet,
            nombre: Set(nombre.trim().to_string()),
            red_id: Set(red_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = active.insert(&*self.db).await?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Facility>> {
        let result = ipress::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(|e| e.into()))
    }

    async fn find_by_name(&self, red_id: i32, nombre: &str) -> Result<Option<Facility>> {
        let result = ipress::Entity::find()
            .filter(ipress::Column::RedId.eq(red_id))
            .all(&*self.db)
            .await?
            .into_iter()
            .find(|m| names_match(&m.nombre, nombre));
        Ok(result.map(|e| e.into()))
    }

    async fn list(&self, red_id: Option<i32>) -> Result<Vec<Facility>> {
        let mut query = ipress::Entity::find();
        if let Some(red_id) = red_id {
            query = query.filter(ipress::Column::RedId.eq(red_id));
        }
        let results = query
            .order_by_asc(ipress::Column::Nombre)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(|e| e.into()).collect())
    }

    async fn update(&self, id: i32, nombre: &str, red_id: i32) -> Result<Facility> {
        let existing = ipress::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("IPRESS", id))?;
        let mut active: ipress::ActiveModel = existing.into();
        active.nombre = Set(nombre.trim().to_string());
        active.red_id = Set(red_id);
        active.updated_at = Set(Utc::now());
        let model = active.update(&*self.db).await?;
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let dependents = plaza::Entity::find()
            .filter(plaza::Column::IpressId.eq(id))
            .count(&*self.db)
            .await?;
        if dependents > 0 {
            return Err(AdjudicationError::dependent_records(
                "la IPRESS",
                format!("{dependents} plazas"),
            ));
        }
        ipress::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }
}

// ===== Occupational Group Repository =====

pub struct SeaOrmOccupationalGroupRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmOccupationalGroupRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OccupationalGroupRepository for SeaOrmOccupationalGroupRepository {
    async fn create(&self, nombre: &str) -> Result<OccupationalGroup> {
        let now = Utc::now();
        let active = grupo_ocupacional::ActiveModel {
            id: NotSet,
            nombre: Set(nombre.trim().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = active.insert(&*self.db).await?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<OccupationalGroup>> {
        let result = grupo_ocupacional::Entity::find_by_id(id)
            .one(&*self.db)
            .await?;
        Ok(result.map(|e| e.into()))
    }

    async fn find_by_name(&self, nombre: &str) -> Result<Option<OccupationalGroup>> {
        let result = grupo_ocupacional::Entity::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .find(|m| names_match(&m.nombre, nombre));
        Ok(result.map(|e| e.into()))
    }

    async fn list(&self) -> Result<Vec<OccupationalGroup>> {
        let results = grupo_ocupacional::Entity::find()
            .order_by_asc(grupo_ocupacional::Column::Nombre)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(|e| e.into()).collect())
    }

    async fn update(&self, id: i32, nombre: &str) -> Result<OccupationalGroup> {
        let existing = grupo_ocupacional::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Grupo ocupacional", id))?;
        let mut active: grupo_ocupacional::ActiveModel = existing.into();
        active.nombre = Set(nombre.trim().to_string());
        active.updated_at = Set(Utc::now());
        let model = active.update(&*self.db).await?;
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let postulantes = postulante::Entity::find()
            .filter(postulante::Column::GrupoOcupacionalId.eq(id))
            .count(&*self.db)
            .await?;
        let plazas = plaza::Entity::find()
            .filter(plaza::Column::GrupoOcupacionalId.eq(id))
            .count(&*self.db)
            .await?;
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
        grupo_ocupacional::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}

// ===== Position Repository =====

pub struct SeaOrmPositionRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmPositionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn details_query(filter: &PositionFilter) -> sea_orm::Select<plaza::Entity> {
        let mut query = plaza::Entity::find()
            .join(JoinType::InnerJoin, plaza::Relation::Ipress.def())
            .join(JoinType::InnerJoin, ipress::Relation::Red.def())
            .join(JoinType::InnerJoin, plaza::Relation::GrupoOcupacional.def());
        if let Some(red_id) = filter.red_id {
            query = query.filter(ipress::Column::RedId.eq(red_id));
        }
        if let Some(ipress_id) = filter.ipress_id {
            query = query.filter(plaza::Column::IpressId.eq(ipress_id));
        }
        if let Some(grupo_id) = filter.grupo_ocupacional_id {
            query = query.filter(plaza::Column::GrupoOcupacionalId.eq(grupo_id));
        }
        if let Some(especialidad) = &filter.especialidad {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((
                    plaza::Entity,
                    plaza::Column::Especialidad,
                ))))
                .like(format!("%{}%", especialidad.trim().to_lowercase())),
            );
        }
        query
            .order_by_asc(red::Column::Nombre)
            .order_by_asc(ipress::Column::Nombre)
            .order_by_asc(grupo_ocupacional::Column::Nombre)
            .order_by_asc(plaza::Column::Id)
    }

    async fn assigned_counts(&self, plaza_id: Option<i32>) -> Result<HashMap<i32, i64>> {
        let mut query = adjudicacion::Entity::find()
            .select_only()
            .column(adjudicacion::Column::PlazaId)
            .column_as(adjudicacion::Column::Id.count(), "asignados")
            .filter(adjudicacion::Column::Estado.eq(AssignmentState::Adjudicado.as_str()))
            .filter(adjudicacion::Column::PlazaId.is_not_null())
            .group_by(adjudicacion::Column::PlazaId);
        if let Some(id) = plaza_id {
            query = query.filter(adjudicacion::Column::PlazaId.eq(id));
        }
        let rows = query.into_model::<PlazaCountRow>().all(&*self.db).await?;
        Ok(rows.into_iter().map(|r| (r.plaza_id, r.asignados)).collect())
    }

    async fn availability_rows(&self, filter: &PositionFilter) -> Result<Vec<PositionAvailability>> {
        let rows = Self::details_query(filter)
            .select_only()
            .columns([
                plaza::Column::Id,
                plaza::Column::IpressId,
                plaza::Column::GrupoOcupacionalId,
                plaza::Column::Subunidad,
                plaza::Column::Especialidad,
                plaza::Column::Total,
                plaza::Column::CreatedAt,
                plaza::Column::UpdatedAt,
            ])
            .column_as(ipress::Column::Nombre, "ipress_nombre")
            .column_as(red::Column::Nombre, "red_nombre")
            .column_as(grupo_ocupacional::Column::Nombre, "grupo_nombre")
            .into_model::<PlazaDetailsRow>()
            .all(&*self.db)
            .await?;
        let counts = self.assigned_counts(None).await?;

        let mut availability: Vec<PositionAvailability> = rows
            .into_iter()
            .map(|row| {
                let asignados = counts.get(&row.id).copied().unwrap_or(0);
                PositionAvailability {
                    id: row.id,
                    red: row.red_nombre,
                    ipress: row.ipress_nombre,
                    grupo_ocupacional: row.grupo_nombre,
                    subunidad: row.subunidad,
                    especialidad: row.especialidad,
                    total: row.total as i64,
                    asignados,
                    libres: row.total as i64 - asignados,
                }
            })
            .collect();
        if filter.solo_disponibles {
            availability.retain(|p| p.libres > 0);
        }
        Ok(availability)
    }
}

#[async_trait]
impl PositionRepository for SeaOrmPositionRepository {
    async fn create(&self, position: &NewPosition) -> Result<Position> {
        let mut active: plaza::ActiveModel = position.into();
        active.subunidad = Set(none_if_blank(position.subunidad.as_deref()));
        active.especialidad = Set(none_if_blank(position.especialidad.as_deref()));
        let model = active.insert(&*self.db).await?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Position>> {
        let result = plaza::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(|e| e.into()))
    }

    async fn find_with_details(&self, id: i32) -> Result<Option<PositionWithDetails>> {
        let row = Self::details_query(&PositionFilter::default())
            .filter(plaza::Column::Id.eq(id))
            .select_only()
            .columns([
                plaza::Column::Id,
                plaza::Column::IpressId,
                plaza::Column::GrupoOcupacionalId,
                plaza::Column::Subunidad,
                plaza::Column::Especialidad,
                plaza::Column::Total,
                plaza::Column::CreatedAt,
                plaza::Column::UpdatedAt,
            ])
            .column_as(ipress::Column::Nombre, "ipress_nombre")
            .column_as(red::Column::Nombre, "red_nombre")
            .column_as(grupo_ocupacional::Column::Nombre, "grupo_nombre")
            .into_model::<PlazaDetailsRow>()
            .one(&*self.db)
            .await?;
        Ok(row.map(PositionWithDetails::from))
    }

    async fn find_by_composite(
        &self,
        ipress_id: i32,
        grupo_ocupacional_id: i32,
        subunidad: Option<&str>,
        especialidad: Option<&str>,
    ) -> Result<Option<Position>> {
        let result = find_plaza_by_composite(
            &*self.db,
            ipress_id,
            grupo_ocupacional_id,
            subunidad,
            especialidad,
        )
        .await?;
        Ok(result.map(|e| e.into()))
    }

    async fn list_availability(&self, filter: &PositionFilter) -> Result<Vec<PositionAvailability>> {
        self.availability_rows(filter).await
    }

    async fn availability(&self, id: i32) -> Result<Option<PositionAvailability>> {
        let mut rows = self.availability_rows(&PositionFilter::default()).await?;
        rows.retain(|p| p.id == id);
        Ok(rows.pop())
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
        self.availability_rows(&filter).await
    }

    async fn update(&self, id: i32, position: &NewPosition) -> Result<Position> {
        let existing = plaza::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Plaza", id))?;
        let mut active: plaza::ActiveModel = existing.into();
        active.ipress_id = Set(position.ipress_id);
        active.grupo_ocupacional_id = Set(position.grupo_ocupacional_id);
        active.subunidad = Set(none_if_blank(position.subunidad.as_deref()));
        active.especialidad = Set(none_if_blank(position.especialidad.as_deref()));
        active.total = Set(position.total);
        active.updated_at = Set(Utc::now());
        let model = active.update(&*self.db).await?;
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let dependents = adjudicacion::Entity::find()
            .filter(adjudicacion::Column::PlazaId.eq(id))
            .count(&*self.db)
            .await?;
        if dependents > 0 {
            return Err(AdjudicationError::dependent_records(
                "la plaza",
                format!("{dependents} adjudicaciones"),
            ));
        }
        plaza::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }

    async fn stats(&self) -> Result<PositionStats> {
        let capacity = plaza::Entity::find()
            .select_only()
            .column_as(plaza::Column::Total.sum(), "total_plazas")
            .column_as(plaza::Column::Id.count(), "total_posiciones")
            .into_model::<CapacityRow>()
            .one(&*self.db)
            .await?
            .unwrap_or_default();
        let asignados = adjudicacion::Entity::find()
            .filter(adjudicacion::Column::Estado.eq(AssignmentState::Adjudicado.as_str()))
            .filter(adjudicacion::Column::PlazaId.is_not_null())
            .count(&*self.db)
            .await? as i64;
        let total_plazas = capacity.total_plazas.unwrap_or(0);
        Ok(PositionStats {
            total_plazas,
            total_posiciones: capacity.total_posiciones,
            total_asignados: asignados,
            total_libres: total_plazas - asignados,
        })
    }

    async fn stats_by_network(&self) -> Result<Vec<NetworkPositionStats>> {
        let capacity = plaza::Entity::find()
            .join(JoinType::InnerJoin, plaza::Relation::Ipress.def())
            .join(JoinType::InnerJoin, ipress::Relation::Red.def())
            .select_only()
            .column_as(red::Column::Nombre, "nombre")
            .column_as(plaza::Column::Total.sum(), "total_plazas")
            .column_as(plaza::Column::Id.count(), "total_posiciones")
            .group_by(red::Column::Nombre)
            .order_by_asc(red::Column::Nombre)
            .into_model::<GroupedCapacityRow>()
            .all(&*self.db)
            .await?;
        let asignados = adjudicacion::Entity::find()
            .join(JoinType::InnerJoin, adjudicacion::Relation::Plaza.def())
            .join(JoinType::InnerJoin, plaza::Relation::Ipress.def())
            .join(JoinType::InnerJoin, ipress::Relation::Red.def())
            .select_only()
            .column_as(red::Column::Nombre, "nombre")
            .column_as(adjudicacion::Column::Id.count(), "asignados")
            .filter(adjudicacion::Column::Estado.eq(AssignmentState::Adjudicado.as_str()))
            .group_by(red::Column::Nombre)
            .into_model::<GroupedCountRow>()
            .all(&*self.db)
            .await?;
        Ok(merge_capacity(capacity, asignados))
    }

    async fn stats_by_group(&self) -> Result<Vec<NetworkPositionStats>> {
        let capacity = plaza::Entity::find()
            .join(JoinType::InnerJoin, plaza::Relation::GrupoOcupacional.def())
            .select_only()
            .column_as(grupo_ocupacional::Column::Nombre, "nombre")
            .column_as(plaza::Column::Total.sum(), "total_plazas")
            .column_as(plaza::Column::Id.count(), "total_posiciones")
            .group_by(grupo_ocupacional::Column::Nombre)
            .order_by_asc(grupo_ocupacional::Column::Nombre)
            .into_model::<GroupedCapacityRow>()
            .all(&*self.db)
            .await?;
        let asignados = adjudicacion::Entity::find()
            .join(JoinType::InnerJoin, adjudicacion::Relation::Plaza.def())
            .join(JoinType::InnerJoin, plaza::Relation::GrupoOcupacional.def())
            .select_only()
            .column_as(grupo_ocupacional::Column::Nombre, "nombre")
            .column_as(adjudicacion::Column::Id.count(), "asignados")
            .filter(adjudicacion::Column::Estado.eq(AssignmentState::Adjudicado.as_str()))
            .group_by(grupo_ocupacional::Column::Nombre)
            .into_model::<GroupedCountRow>()
            .all(&*self.db)
            .await?;
        Ok(merge_capacity(capacity, asignados))
    }
}

// ===== Candidate Repository =====

pub struct SeaOrmCandidateRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmCandidateRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn status_query() -> sea_orm::Select<postulante::Entity> {
        postulante::Entity::find()
            .join(
                JoinType::InnerJoin,
                postulante::Relation::GrupoOcupacional.def(),
            )
            .join(JoinType::InnerJoin, postulante::Relation::Adjudicacion.def())
            .select_only()
            .columns([
                postulante::Column::Id,
                postulante::Column::OrdenMerito,
                postulante::Column::ApellidosNombres,
                postulante::Column::Dni,
                postulante::Column::GrupoOcupacionalId,
                postulante::Column::Especialidad,
                postulante::Column::TiempoServicioAnios,
                postulante::Column::TiempoServicioMeses,
                postulante::Column::TiempoServicioDias,
                postulante::Column::CreatedAt,
                postulante::Column::UpdatedAt,
            ])
            .column_as(grupo_ocupacional::Column::Nombre, "grupo_nombre")
            .column_as(adjudicacion::Column::Estado, "estado")
            .column_as(adjudicacion::Column::FechaAdjudicacion, "fecha_adjudicacion")
            .column_as(
                adjudicacion::Column::FechaDesistimiento,
                "fecha_desistimiento",
            )
    }
}

#[async_trait]
impl CandidateRepository for SeaOrmCandidateRepository {
    async fn create_with_pending(&self, candidate: &NewCandidate) -> Result<Candidate> {
        let txn = self.db.begin().await?;
        let mut active: postulante::ActiveModel = candidate.into();
        active.dni = Set(none_if_blank(candidate.dni.as_deref()));
        active.especialidad = Set(none_if_blank(candidate.especialidad.as_deref()));
        let model = active.insert(&txn).await?;
        insert_pending_assignment(&txn, model.id).await?;
        txn.commit().await?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Candidate>> {
        let result = postulante::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(|e| e.into()))
    }

    async fn find_by_dni(&self, dni: &str) -> Result<Option<CandidateWithStatus>> {
        let row = Self::status_query()
            .filter(postulante::Column::Dni.eq(dni.trim()))
            .into_model::<PostulanteStatusRow>()
            .one(&*self.db)
            .await?;
        row.map(CandidateWithStatus::try_from).transpose()
    }

    async fn find_by_merit(
        &self,
        grupo_ocupacional_id: i32,
        orden_merito: i32,
    ) -> Result<Option<Candidate>> {
        let result = postulante::Entity::find()
            .filter(postulante::Column::GrupoOcupacionalId.eq(grupo_ocupacional_id))
            .filter(postulante::Column::OrdenMerito.eq(orden_merito))
            .one(&*self.db)
            .await?;
        Ok(result.map(|e| e.into()))
    }

    async fn list_with_status(&self, filter: &CandidateFilter) -> Result<Vec<CandidateWithStatus>> {
        let mut query = Self::status_query();
        if let Some(grupo_id) = filter.grupo_ocupacional_id {
            query = query.filter(postulante::Column::GrupoOcupacionalId.eq(grupo_id));
        }
        if let Some(estado) = filter.estado {
            query = query.filter(adjudicacion::Column::Estado.eq(estado.as_str()));
        }
        if let Some(nombre) = &filter.nombre {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((
                    postulante::Entity,
                    postulante::Column::ApellidosNombres,
                ))))
                .like(format!("%{}%", nombre.trim().to_lowercase())),
            );
        }
        if let Some(dni) = &filter.dni {
            query = query.filter(postulante::Column::Dni.eq(dni.trim()));
        }
        if let Some(desde) = filter.orden_merito_desde {
            query = query.filter(postulante::Column::OrdenMerito.gte(desde));
        }
        if let Some(hasta) = filter.orden_merito_hasta {
            query = query.filter(postulante::Column::OrdenMerito.lte(hasta));
        }
        let rows = query
            .order_by_asc(grupo_ocupacional::Column::Nombre)
            .order_by_asc(postulante::Column::OrdenMerito)
            .into_model::<PostulanteStatusRow>()
            .all(&*self.db)
            .await?;
        rows.into_iter().map(CandidateWithStatus::try_from).collect()
    }

    async fn pending_by_group(
        &self,
        grupo_ocupacional_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<Candidate>> {
        let mut query = postulante::Entity::find()
            .join(JoinType::InnerJoin, postulante::Relation::Adjudicacion.def())
            .filter(postulante::Column::GrupoOcupacionalId.eq(grupo_ocupacional_id))
            .filter(adjudicacion::Column::Estado.eq(AssignmentState::Pendiente.as_str()))
            .order_by_asc(postulante::Column::OrdenMerito);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let results = query.all(&*self.db).await?;
        Ok(results.into_iter().map(|e| e.into()).collect())
    }

    async fn update(&self, id: i32, candidate: &NewCandidate) -> Result<Candidate> {
        let existing = postulante::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Postulante", id))?;
        let mut active: postulante::ActiveModel = existing.into();
        active.orden_merito = Set(candidate.orden_merito);
        active.apellidos_nombres = Set(candidate.apellidos_nombres.trim().to_string());
        active.dni = Set(none_if_blank(candidate.dni.as_deref()));
        active.grupo_ocupacional_id = Set(candidate.grupo_ocupacional_id);
        active.especialidad = Set(none_if_blank(candidate.especialidad.as_deref()));
        active.tiempo_servicio_anios = Set(candidate.tiempo_servicio_anios);
        active.tiempo_servicio_meses = Set(candidate.tiempo_servicio_meses);
        active.tiempo_servicio_dias = Set(candidate.tiempo_servicio_dias);
        active.updated_at = Set(Utc::now());
        let model = active.update(&*self.db).await?;
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        let assignment = adjudicacion::Entity::find()
            .filter(adjudicacion::Column::PostulanteId.eq(id))
            .one(&txn)
            .await?;
        if let Some(assignment) = assignment {
            if assignment.estado != AssignmentState::Pendiente.as_str() {
                return Err(AdjudicationError::dependent_records(
                    "el postulante",
                    "una adjudicación no pendiente".to_string(),
                ));
            }
            adjudicacion::Entity::delete_by_id(assignment.id)
                .exec(&txn)
                .await?;
        }
        postulante::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn stats_by_group(&self) -> Result<Vec<GroupStats>> {
        let rows = postulante::Entity::find()
            .join(
                JoinType::InnerJoin,
                postulante::Relation::GrupoOcupacional.def(),
            )
            .join(JoinType::InnerJoin, postulante::Relation::Adjudicacion.def())
            .select_only()
            .column_as(grupo_ocupacional::Column::Nombre, "nombre")
            .column_as(adjudicacion::Column::Estado, "estado")
            .column_as(postulante::Column::Id.count(), "cnt")
            .group_by(grupo_ocupacional::Column::Nombre)
            .group_by(adjudicacion::Column::Estado)
            .into_model::<EstadoPorGrupoRow>()
            .all(&*self.db)
            .await?;

        let mut grouped: BTreeMap<String, GroupStats> = BTreeMap::new();
        for row in rows {
            let entry = grouped
                .entry(row.nombre.clone())
                .or_insert_with(|| GroupStats {
                    grupo_ocupacional: row.nombre.clone(),
                    total_postulantes: 0,
                    pendientes: 0,
                    adjudicados: 0,
                    desistidos: 0,
                    renuncias: 0,
                });
            entry.total_postulantes += row.cnt;
            match estado_from_db(&row.estado)? {
                AssignmentState::Pendiente => entry.pendientes += row.cnt,
                AssignmentState::Adjudicado => entry.adjudicados += row.cnt,
                AssignmentState::Desistido => entry.desistidos += row.cnt,
                AssignmentState::Renuncio => entry.renuncias += row.cnt,
                AssignmentState::Ausente => {}
            }
        }
        Ok(grouped.into_values().collect())
    }
}

// ===== Assignment Repository =====

pub struct SeaOrmAssignmentRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAssignmentRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn record_query(filter: &AssignmentFilter) -> sea_orm::Select<adjudicacion::Entity> {
        let mut query = adjudicacion::Entity::find()
            .join(JoinType::InnerJoin, adjudicacion::Relation::Postulante.def())
            .join(
                JoinType::InnerJoin,
                postulante::Relation::GrupoOcupacional.def(),
            )
            .join(JoinType::LeftJoin, adjudicacion::Relation::Plaza.def())
            .join(JoinType::LeftJoin, plaza::Relation::Ipress.def())
            .join(JoinType::LeftJoin, ipress::Relation::Red.def());
        if let Some(estado) = filter.estado {
            query = query.filter(adjudicacion::Column::Estado.eq(estado.as_str()));
        }
        if let Some(red_id) = filter.red_id {
            query = query.filter(ipress::Column::RedId.eq(red_id));
        }
        if let Some(grupo_id) = filter.grupo_ocupacional_id {
            query = query.filter(postulante::Column::GrupoOcupacionalId.eq(grupo_id));
        }
        if let Some(desde) = filter.fecha_desde {
            query = query.filter(adjudicacion::Column::FechaAdjudicacion.gte(desde));
        }
        if let Some(hasta) = filter.fecha_hasta {
            query = query.filter(adjudicacion::Column::FechaAdjudicacion.lte(hasta));
        }
        query
    }

    fn select_record_columns(
        query: sea_orm::Select<adjudicacion::Entity>,
    ) -> sea_orm::Select<adjudicacion::Entity> {
        query
            .select_only()
            .columns([
                adjudicacion::Column::Id,
                adjudicacion::Column::PostulanteId,
                adjudicacion::Column::PlazaId,
                adjudicacion::Column::Estado,
                adjudicacion::Column::FechaAdjudicacion,
                adjudicacion::Column::FechaDesistimiento,
                adjudicacion::Column::Observaciones,
                adjudicacion::Column::CreatedAt,
                adjudicacion::Column::UpdatedAt,
            ])
            .column_as(postulante::Column::OrdenMerito, "orden_merito")
            .column_as(postulante::Column::ApellidosNombres, "apellidos_nombres")
            .column_as(postulante::Column::Dni, "dni")
            .column_as(grupo_ocupacional::Column::Nombre, "grupo_ocupacional")
            .column_as(postulante::Column::Especialidad, "especialidad")
            .column_as(ipress::Column::Nombre, "ipress_nombre")
            .column_as(red::Column::Nombre, "red_nombre")
            .order_by_asc(grupo_ocupacional::Column::Nombre)
            .order_by_asc(postulante::Column::OrdenMerito)
    }
}

#[async_trait]
impl AssignmentRepository for SeaOrmAssignmentRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Assignment>> {
        let result = adjudicacion::Entity::find_by_id(id).one(&*self.db).await?;
        result.map(Assignment::try_from).transpose()
    }

    async fn find_by_candidate(&self, postulante_id: i32) -> Result<Option<Assignment>> {
        let result = adjudicacion::Entity::find()
            .filter(adjudicacion::Column::PostulanteId.eq(postulante_id))
            .one(&*self.db)
            .await?;
        result.map(Assignment::try_from).transpose()
    }

    async fn list(
        &self,
        filter: &AssignmentFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<AssignmentRecord>, u64)> {
        let total = Self::record_query(filter).count(&*self.db).await?;
        let page = page.max(1);
        let limit = limit.max(1);
        let rows = Self::select_record_columns(Self::record_query(filter))
            .offset((page - 1) * limit)
            .limit(limit)
            .into_model::<AdjudicacionRow>()
            .all(&*self.db)
            .await?;
        let records = rows
            .into_iter()
            .map(AssignmentRecord::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok((records, total))
    }

    async fn list_full(&self, filter: &AssignmentFilter) -> Result<Vec<AssignmentRecord>> {
        let rows = Self::select_record_columns(Self::record_query(filter))
            .into_model::<AdjudicacionRow>()
            .all(&*self.db)
            .await?;
        rows.into_iter().map(AssignmentRecord::try_from).collect()
    }

    async fn list_by_position(&self, plaza_id: i32) -> Result<Vec<AssignmentRecord>> {
        let rows = Self::select_record_columns(
            Self::record_query(&AssignmentFilter::default())
                .filter(adjudicacion::Column::PlazaId.eq(plaza_id)),
        )
        .into_model::<AdjudicacionRow>()
        .all(&*self.db)
        .await?;
        rows.into_iter().map(AssignmentRecord::try_from).collect()
    }

    async fn assign(
        &self,
        postulante_id: i32,
        plaza_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        let txn = self.db.begin().await?;
        let assignment = find_assignment_by_candidate(&txn, postulante_id).await?;
        match estado_from_db(&assignment.estado)? {
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
        let position = plaza::Entity::find_by_id(plaza_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Plaza", plaza_id))?;
        let candidate = postulante::Entity::find_by_id(postulante_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Postulante", postulante_id))?;
        if candidate.grupo_ocupacional_id != position.grupo_ocupacional_id {
            return Err(AdjudicationError::conflict(
                "El grupo ocupacional del postulante no coincide con el de la plaza",
            ));
        }
        let asignados = adjudicacion::Entity::find()
            .filter(adjudicacion::Column::PlazaId.eq(plaza_id))
            .filter(adjudicacion::Column::Estado.eq(AssignmentState::Adjudicado.as_str()))
            .count(&txn)
            .await?;
        if asignados >= position.total as u64 {
            return Err(AdjudicationError::conflict(
                "La plaza no tiene cupos disponibles",
            ));
        }

        let mut active: adjudicacion::ActiveModel = assignment.into();
        active.estado = Set(AssignmentState::Adjudicado.as_str().to_string());
        active.plaza_id = Set(Some(plaza_id));
        active.fecha_adjudicacion = Set(Some(Utc::now()));
        if let Some(obs) = observaciones {
            active.observaciones = Set(none_if_blank(Some(obs)));
        }
        active.updated_at = Set(Utc::now());
        let model = active.update(&txn).await?;
        txn.commit().await?;
        model.try_into()
    }

    async fn mark_withdrawn(
        &self,
        postulante_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        self.transition_by_candidate(
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
        .await
    }

    async fn mark_resigned(
        &self,
        postulante_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        self.transition_by_candidate(
            postulante_id,
            &[AssignmentState::Adjudicado],
            AssignmentState::Renuncio,
            observaciones,
            "El postulante no tiene una plaza adjudicada activa",
        )
        .await
    }

    async fn mark_absent(
        &self,
        postulante_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        self.transition_by_candidate(
            postulante_id,
            &[AssignmentState::Pendiente],
            AssignmentState::Ausente,
            observaciones,
            "Solo se puede marcar como ausente desde el estado pendiente",
        )
        .await
    }

    async fn reassign_to_pending(
        &self,
        postulante_id: i32,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        self.transition_by_candidate(
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
        .await
    }

    async fn revert(&self, id: i32, observaciones: Option<&str>) -> Result<Assignment> {
        let txn = self.db.begin().await?;
        let assignment = adjudicacion::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Adjudicación", id))?;
        if assignment.estado != AssignmentState::Adjudicado.as_str() {
            return Err(AdjudicationError::conflict(
                "La adjudicación no tiene una plaza activa para revertir",
            ));
        }
        let mut active: adjudicacion::ActiveModel = assignment.into();
        active.estado = Set(AssignmentState::Pendiente.as_str().to_string());
        active.plaza_id = Set(None);
        active.fecha_adjudicacion = Set(None);
        if let Some(obs) = observaciones {
            active.observaciones = Set(none_if_blank(Some(obs)));
        }
        active.updated_at = Set(Utc::now());
        let model = active.update(&txn).await?;
        txn.commit().await?;
        model.try_into()
    }

    async fn update_state(
        &self,
        id: i32,
        estado: AssignmentState,
        observaciones: Option<&str>,
    ) -> Result<Assignment> {
        let txn = self.db.begin().await?;
        let assignment = adjudicacion::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Adjudicación", id))?;
        let mut active: adjudicacion::ActiveModel = assignment.into();
        active.estado = Set(estado.as_str().to_string());
        match estado {
            AssignmentState::Adjudicado => {
                active.fecha_adjudicacion = Set(Some(Utc::now()));
            }
            AssignmentState::Desistido | AssignmentState::Renuncio => {
                active.fecha_desistimiento = Set(Some(Utc::now()));
            }
            AssignmentState::Pendiente => {
                active.plaza_id = Set(None);
                active.fecha_adjudicacion = Set(None);
                active.fecha_desistimiento = Set(None);
            }
            AssignmentState::Ausente => {}
        }
        if let Some(obs) = observaciones {
            active.observaciones = Set(none_if_blank(Some(obs)));
        }
        active.updated_at = Set(Utc::now());
        let model = active.update(&txn).await?;
        txn.commit().await?;
        model.try_into()
    }

    async fn reset(&self, id: i32) -> Result<Assignment> {
        let existing = adjudicacion::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| AdjudicationError::not_found("Adjudicación", id))?;
        let mut active: adjudicacion::ActiveModel = existing.into();
        active.estado = Set(AssignmentState::Pendiente.as_str().to_string());
        active.plaza_id = Set(None);
        active.fecha_adjudicacion = Set(None);
        active.fecha_desistimiento = Set(None);
        active.observaciones = Set(None);
        active.updated_at = Set(Utc::now());
        let model = active.update(&*self.db).await?;
        model.try_into()
    }

    async fn stats(&self) -> Result<AssignmentStats> {
        let rows = adjudicacion::Entity::find()
            .select_only()
            .column(adjudicacion::Column::Estado)
            .column_as(adjudicacion::Column::Id.count(), "cnt")
            .group_by(adjudicacion::Column::Estado)
            .into_model::<EstadoCountRow>()
            .all(&*self.db)
            .await?;

        let mut stats = AssignmentStats::default();
        for row in rows {
            stats.total_adjudicaciones += row.cnt;
            match estado_from_db(&row.estado)? {
                AssignmentState::Pendiente => stats.pendientes += row.cnt,
                AssignmentState::Adjudicado => stats.adjudicados += row.cnt,
                AssignmentState::Desistido => stats.desistidos += row.cnt,
                AssignmentState::Renuncio => stats.renuncias += row.cnt,
                AssignmentState::Ausente => stats.ausentes += row.cnt,
            }
        }
        if stats.total_adjudicaciones > 0 {
            let pct = stats.adjudicados as f64 * 100.0 / stats.total_adjudicaciones as f64;
            stats.porcentaje_adjudicado = (pct * 100.0).round() / 100.0;
        }
        Ok(stats)
    }

    async fn stats_by_network(&self) -> Result<Vec<NetworkAssignmentStats>> {
        let rows = adjudicacion::Entity::find()
            .join(JoinType::InnerJoin, adjudicacion::Relation::Plaza.def())
            .join(JoinType::InnerJoin, plaza::Relation::Ipress.def())
            .join(JoinType::InnerJoin, ipress::Relation::Red.def())
            .select_only()
            .column_as(red::Column::Nombre, "nombre")
            .column_as(adjudicacion::Column::Estado, "estado")
            .column_as(adjudicacion::Column::Id.count(), "cnt")
            .group_by(red::Column::Nombre)
            .group_by(adjudicacion::Column::Estado)
            .into_model::<EstadoPorGrupoRow>()
            .all(&*self.db)
            .await?;

        let mut grouped: BTreeMap<String, NetworkAssignmentStats> = BTreeMap::new();
        for row in rows {
            let entry = grouped
                .entry(row.nombre.clone())
                .or_insert_with(|| NetworkAssignmentStats {
                    red: row.nombre.clone(),
                    total_adjudicaciones: 0,
                    adjudicados: 0,
                    desistidos: 0,
                    renuncias: 0,
                });
            entry.total_adjudicaciones += row.cnt;
            match estado_from_db(&row.estado)? {
                AssignmentState::Adjudicado => entry.adjudicados += row.cnt,
                AssignmentState::Desistido => entry.desistidos += row.cnt,
                AssignmentState::Renuncio => entry.renuncias += row.cnt,
                _ => {}
            }
        }
        Ok(grouped.into_values().collect())
    }
}

impl SeaOrmAssignmentRepository {
    /// State transition keyed by candidate, with the expected-state check
    /// re-run inside the transaction.
    async fn transition_by_candidate(
        &self,
        postulante_id: i32,
        from: &[AssignmentState],
        to: AssignmentState,
        observaciones: Option<&str>,
        conflict_message: &str,
    ) -> Result<Assignment> {
        let txn = self.db.begin().await?;
        let assignment = find_assignment_by_candidate(&txn, postulante_id).await?;
        let current = estado_from_db(&assignment.estado)?;
        if !from.contains(&current) {
            return Err(AdjudicationError::conflict(conflict_message));
        }
        let mut active: adjudicacion::ActiveModel = assignment.into();
        active.estado = Set(to.as_str().to_string());
        match to {
            AssignmentState::Desistido | AssignmentState::Renuncio => {
                active.fecha_desistimiento = Set(Some(Utc::now()));
            }
            AssignmentState::Pendiente => {
                active.plaza_id = Set(None);
                active.fecha_adjudicacion = Set(None);
                active.fecha_desistimiento = Set(None);
            }
            _ => {}
        }
        if let Some(obs) = observaciones {
            active.observaciones = Set(none_if_blank(Some(obs)));
        }
        active.updated_at = Set(Utc::now());
        let model = active.update(&txn).await?;
        txn.commit().await?;
        model.try_into()
    }
}

// ===== Import Repository =====

pub struct SeaOrmImportRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmImportRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ImportRepository for SeaOrmImportRepository {
    async fn import_dataset(&self, dataset: &ImportDataset) -> Result<ImportSummary> {
        let txn = self.db.begin().await?;
        let mut summary = ImportSummary::default();
        let mut redes: HashMap<String, i32> = HashMap::new();
        let mut grupos: HashMap<String, i32> = HashMap::new();
        let mut facilities: HashMap<(i32, String), i32> = HashMap::new();

        for row in &dataset.plazas {
            let red_id =
                find_or_create_red(&txn, &row.red, &mut redes, &mut summary.redes).await?;
            let ipress_id = find_or_create_ipress(
                &txn,
                red_id,
                &row.ipress,
                &mut facilities,
                &mut summary.ipress,
            )
            .await?;
            let grupo_id = find_or_create_grupo(
                &txn,
                &row.grupo_ocupacional,
                &mut grupos,
                &mut summary.grupos_ocupacionales,
            )
            .await?;

            let subunidad = none_if_blank(row.subunidad.as_deref());
            let especialidad = none_if_blank(row.especialidad.as_deref());
            let existing = find_plaza_by_composite(
                &txn,
                ipress_id,
                grupo_id,
                subunidad.as_deref(),
                especialidad.as_deref(),
            )
            .await?;
            match existing {
                Some(model) => {
                    let total = model.total + row.total;
                    let mut active: plaza::ActiveModel = model.into();
                    active.total = Set(total);
                    active.updated_at = Set(Utc::now());
                    active.update(&txn).await?;
                }
                None => {
                    let now = Utc::now();
                    let active = plaza::ActiveModel {
                        id: NotSet,
                        ipress_id: Set(ipress_id),
                        grupo_ocupacional_id: Set(grupo_id),
                        subunidad: Set(subunidad),
                        especialidad: Set(especialidad),
                        total: Set(row.total),
                        created_at: Set(now),
                        updated_at: Set(now),
                    };
                    active.insert(&txn).await?;
                }
            }
            summary.plazas += 1;
        }

        for row in &dataset.postulantes {
            let grupo_id = find_or_create_grupo(
                &txn,
                &row.grupo_ocupacional,
                &mut grupos,
                &mut summary.grupos_ocupacionales,
            )
            .await?;
            let now = Utc::now();
            let active = postulante::ActiveModel {
                id: NotSet,
                orden_merito: Set(row.orden_merito),
                apellidos_nombres: Set(row.apellidos_nombres.trim().to_string()),
                dni: Set(none_if_blank(row.dni.as_deref())),
                grupo_ocupacional_id: Set(grupo_id),
                especialidad: Set(none_if_blank(row.especialidad.as_deref())),
                tiempo_servicio_anios: Set(row.tiempo_servicio_anios),
                tiempo_servicio_meses: Set(row.tiempo_servicio_meses),
                tiempo_servicio_dias: Set(row.tiempo_servicio_dias),
                created_at: Set(now),
                updated_at: Set(now),
            };
            let model = active.insert(&txn).await?;
            insert_pending_assignment(&txn, model.id).await?;
            summary.postulantes += 1;
        }

        txn.commit().await?;
        Ok(summary)
    }
}

// ===== Shared query helpers =====

async fn find_assignment_by_candidate<C: ConnectionTrait>(
    conn: &C,
    postulante_id: i32,
) -> Result<adjudicacion::Model> {
    adjudicacion::Entity::find()
        .filter(adjudicacion::Column::PostulanteId.eq(postulante_id))
        .one(conn)
        .await?
        .ok_or_else(|| AdjudicationError::not_found("Adjudicación de postulante", postulante_id))
}

async fn insert_pending_assignment<C: ConnectionTrait>(conn: &C, postulante_id: i32) -> Result<()> {
    let now = Utc::now();
    let active = adjudicacion::ActiveModel {
        id: NotSet,
        postulante_id: Set(postulante_id),
        plaza_id: Set(None),
        estado: Set(AssignmentState::Pendiente.as_str().to_string()),
        fecha_adjudicacion: Set(None),
        fecha_desistimiento: Set(None),
        observaciones: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active.insert(conn).await?;
    Ok(())
}

async fn find_plaza_by_composite<C: ConnectionTrait>(
    conn: &C,
    ipress_id: i32,
    grupo_ocupacional_id: i32,
    subunidad: Option<&str>,
    especialidad: Option<&str>,
) -> Result<Option<plaza::Model>> {
    let mut query = plaza::Entity::find()
        .filter(plaza::Column::IpressId.eq(ipress_id))
        .filter(plaza::Column::GrupoOcupacionalId.eq(grupo_ocupacional_id));
    query = match subunidad {
        Some(value) => query.filter(plaza::Column::Subunidad.eq(value)),
        None => query.filter(plaza::Column::Subunidad.is_null()),
    };
    query = match especialidad {
        Some(value) => query.filter(plaza::Column::Especialidad.eq(value)),
        None => query.filter(plaza::Column::Especialidad.is_null()),
    };
    Ok(query.one(conn).await?)
}

async fn find_or_create_red<C: ConnectionTrait>(
    conn: &C,
    nombre: &str,
    cache: &mut HashMap<String, i32>,
    created: &mut usize,
) -> Result<i32> {
    let key = nombre.trim().to_lowercase();
    if let Some(&id) = cache.get(&key) {
        return Ok(id);
    }
    let existing = red::Entity::find()
        .all(conn)
        .await?
        .into_iter()
        .find(|m| names_match(&m.nombre, nombre));
    let id = match existing {
        Some(model) => model.id,
        None => {
            let now = Utc::now();
            let active = red::ActiveModel {
                id: NotSet,
                nombre: Set(nombre.trim().to_string()),
                created_at: Set(now),
                updated_at: Set(now),
            };
            *created += 1;
            active.insert(conn).await?.id
        }
    };
    cache.insert(key, id);
    Ok(id)
}

async fn find_or_create_ipress<C: ConnectionTrait>(
    conn: &C,
    red_id: i32,
    nombre: &str,
    cache: &mut HashMap<(i32, String), i32>,
    created: &mut usize,
) -> Result<i32> {
    let key = (red_id, nombre.trim().to_lowercase());
    if let Some(&id) = cache.get(&key) {
        return Ok(id);
    }
    let existing = ipress::Entity::find()
        .filter(ipress::Column::RedId.eq(red_id))
        .all(conn)
        .await?
        .into_iter()
        .find(|m| names_match(&m.nombre, nombre));
    let id = match existing {
        Some(model) => model.id,
        None => {
            let now = Utc::now();
            let active = ipress::ActiveModel {
                id: NotSet,
                nombre: Set(nombre.trim().to_string()),
                red_id: Set(red_id),
                created_at: Set(now),
                updated_at: Set(now),
            };
            *created += 1;
            active.insert(conn).await?.id
        }
    };
    cache.insert(key, id);
    Ok(id)
}

async fn find_or_create_grupo<C: ConnectionTrait>(
    conn: &C,
    nombre: &str,
    cache: &mut HashMap<String, i32>,
    created: &mut usize,
) -> Result<i32> {
    let key = nombre.trim().to_lowercase();
    if let Some(&id) = cache.get(&key) {
        return Ok(id);
    }
    let existing = grupo_ocupacional::Entity::find()
        .all(conn)
        .await?
        .into_iter()
        .find(|m| names_match(&m.nombre, nombre));
    let id = match existing {
        Some(model) => model.id,
        None => {
            let now = Utc::now();
            let active = grupo_ocupacional::ActiveModel {
                id: NotSet,
                nombre: Set(nombre.trim().to_string()),
                created_at: Set(now),
                updated_at: Set(now),
            };
            *created += 1;
            active.insert(conn).await?.id
        }
    };
    cache.insert(key, id);
    Ok(id)
}

// ===== Query result rows =====

#[derive(FromQueryResult)]
struct PlazaCountRow {
    plaza_id: i32,
    asignados: i64,
}

#[derive(FromQueryResult)]
struct PlazaDetailsRow {
    id: i32,
    ipress_id: i32,
    grupo_ocupacional_id: i32,
    subunidad: Option<String>,
    especialidad: Option<String>,
    total: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    ipress_nombre: String,
    red_nombre: String,
    grupo_nombre: String,
}

impl From<PlazaDetailsRow> for PositionWithDetails {
    fn from(row: PlazaDetailsRow) -> Self {
        Self {
            position: Position {
                id: row.id,
                ipress_id: row.ipress_id,
                grupo_ocupacional_id: row.grupo_ocupacional_id,
                subunidad: row.subunidad,
                especialidad: row.especialidad,
                total: row.total,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            ipress_nombre: row.ipress_nombre,
            red_nombre: row.red_nombre,
            grupo_ocupacional_nombre: row.grupo_nombre,
        }
    }
}

#[derive(FromQueryResult)]
struct CapacityRow {
    total_plazas: Option<i64>,
    total_posiciones: i64,
}

impl Default for CapacityRow {
    fn default() -> Self {
        Self {
            total_plazas: Some(0),
            total_posiciones: 0,
        }
    }
}

#[derive(FromQueryResult)]
struct GroupedCapacityRow {
    nombre: String,
    total_plazas: Option<i64>,
    total_posiciones: i64,
}

#[derive(FromQueryResult)]
struct GroupedCountRow {
    nombre: String,
    asignados: i64,
}

fn merge_capacity(
    capacity: Vec<GroupedCapacityRow>,
    assigned: Vec<GroupedCountRow>,
) -> Vec<NetworkPositionStats> {
    let counts: HashMap<String, i64> = assigned
        .into_iter()
        .map(|r| (r.nombre, r.asignados))
        .collect();
    capacity
        .into_iter()
        .map(|row| {
            let asignados = counts.get(&row.nombre).copied().unwrap_or(0);
            let total_plazas = row.total_plazas.unwrap_or(0);
            NetworkPositionStats {
                nombre: row.nombre,
                stats: PositionStats {
                    total_plazas,
                    total_posiciones: row.total_posiciones,
                    total_asignados: asignados,
                    total_libres: total_plazas - asignados,
                },
            }
        })
        .collect()
}

#[derive(FromQueryResult)]
struct PostulanteStatusRow {
    id: i32,
    orden_merito: i32,
    apellidos_nombres: String,
    dni: Option<String>,
    grupo_ocupacional_id: i32,
    especialidad: Option<String>,
    tiempo_servicio_anios: Option<i32>,
    tiempo_servicio_meses: Option<i32>,
    tiempo_servicio_dias: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    grupo_nombre: String,
    estado: String,
    fecha_adjudicacion: Option<DateTime<Utc>>,
    fecha_desistimiento: Option<DateTime<Utc>>,
}

impl TryFrom<PostulanteStatusRow> for CandidateWithStatus {
    type Error = AdjudicationError;

    fn try_from(row: PostulanteStatusRow) -> Result<Self> {
        Ok(Self {
            candidate: Candidate {
                id: row.id,
                orden_merito: row.orden_merito,
                apellidos_nombres: row.apellidos_nombres,
                dni: row.dni,
                grupo_ocupacional_id: row.grupo_ocupacional_id,
                especialidad: row.especialidad,
                tiempo_servicio_anios: row.tiempo_servicio_anios,
                tiempo_servicio_meses: row.tiempo_servicio_meses,
                tiempo_servicio_dias: row.tiempo_servicio_dias,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            grupo_ocupacional_nombre: row.grupo_nombre,
            estado: estado_from_db(&row.estado)?,
            fecha_adjudicacion: row.fecha_adjudicacion,
            fecha_desistimiento: row.fecha_desistimiento,
        })
    }
}

#[derive(FromQueryResult)]
struct AdjudicacionRow {
    id: i32,
    postulante_id: i32,
    plaza_id: Option<i32>,
    estado: String,
    fecha_adjudicacion: Option<DateTime<Utc>>,
    fecha_desistimiento: Option<DateTime<Utc>>,
    observaciones: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    orden_merito: i32,
    apellidos_nombres: String,
    dni: Option<String>,
    grupo_ocupacional: String,
    especialidad: Option<String>,
    ipress_nombre: Option<String>,
    red_nombre: Option<String>,
}

impl TryFrom<AdjudicacionRow> for AssignmentRecord {
    type Error = AdjudicationError;

    fn try_from(row: AdjudicacionRow) -> Result<Self> {
        Ok(Self {
            assignment: Assignment {
                id: row.id,
                postulante_id: row.postulante_id,
                plaza_id: row.plaza_id,
                estado: estado_from_db(&row.estado)?,
                fecha_adjudicacion: row.fecha_adjudicacion,
                fecha_desistimiento: row.fecha_desistimiento,
                observaciones: row.observaciones,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            orden_merito: row.orden_merito,
            apellidos_nombres: row.apellidos_nombres,
            dni: row.dni,
            grupo_ocupacional: row.grupo_ocupacional,
            especialidad: row.especialidad,
            ipress_nombre: row.ipress_nombre,
            red_nombre: row.red_nombre,
        })
    }
}

#[derive(FromQueryResult)]
struct EstadoCountRow {
    estado: String,
    cnt: i64,
}

#[derive(FromQueryResult)]
struct EstadoPorGrupoRow {
    nombre: String,
    estado: String,
    cnt: i64,
}
