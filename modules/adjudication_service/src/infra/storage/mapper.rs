//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity;
use crate::contract::{
    AdjudicationError, Assignment, AssignmentState, Candidate, Facility, Network, NewCandidate,
    NewPosition, OccupationalGroup, Position,
};

// ===== Catalog Conversions =====

impl From<entity::red::Model> for Network {
    fn from(entity: entity::red::Model) -> Self {
        Self {
            id: entity.id,
            nombre: entity.nombre,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<entity::ipress::Model> for Facility {
    fn from(entity: entity::ipress::Model) -> Self {
        Self {
            id: entity.id,
            nombre: entity.nombre,
            red_id: entity.red_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<entity::grupo_ocupacional::Model> for OccupationalGroup {
    fn from(entity: entity::grupo_ocupacional::Model) -> Self {
        Self {
            id: entity.id,
            nombre: entity.nombre,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

// ===== Position Conversions =====

impl From<entity::plaza::Model> for Position {
    fn from(entity: entity::plaza::Model) -> Self {
        Self {
            id: entity.id,
            ipress_id: entity.ipress_id,
            grupo_ocupacional_id: entity.grupo_ocupacional_id,
            subunidad: entity.subunidad,
            especialidad: entity.especialidad,
            total: entity.total,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&NewPosition> for entity::plaza::ActiveModel {
    fn from(model: &NewPosition) -> Self {
        use sea_orm::ActiveValue::*;

        let now = chrono::Utc::now();
        Self {
            id: NotSet,
            ipress_id: Set(model.ipress_id),
            grupo_ocupacional_id: Set(model.grupo_ocupacional_id),
            subunidad: Set(model.subunidad.clone()),
            especialidad: Set(model.especialidad.clone()),
            total: Set(model.total),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

// ===== Candidate Conversions =====

impl From<entity::postulante::Model> for Candidate {
    fn from(entity: entity::postulante::Model) -> Self {
        Self {
            id: entity.id,
            orden_merito: entity.orden_merito,
            apellidos_nombres: entity.apellidos_nombres,
            dni: entity.dni,
            grupo_ocupacional_id: entity.grupo_ocupacional_id,
            especialidad: entity.especialidad,
            tiempo_servicio_anios: entity.tiempo_servicio_anios,
            tiempo_servicio_meses: entity.tiempo_servicio_meses,
            tiempo_servicio_dias: entity.tiempo_servicio_dias,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&NewCandidate> for entity::postulante::ActiveModel {
    fn from(model: &NewCandidate) -> Self {
        use sea_orm::ActiveValue::*;

        let now = chrono::Utc::now();
        Self {
            id: NotSet,
            orden_merito: Set(model.orden_merito),
            apellidos_nombres: Set(model.apellidos_nombres.trim().to_string()),
            dni: Set(model.dni.clone()),
            grupo_ocupacional_id: Set(model.grupo_ocupacional_id),
            especialidad: Set(model.especialidad.clone()),
            tiempo_servicio_anios: Set(model.tiempo_servicio_anios),
            tiempo_servicio_meses: Set(model.tiempo_servicio_meses),
            tiempo_servicio_dias: Set(model.tiempo_servicio_dias),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

// ===== Assignment Conversions =====

/// Parse a stored estado value. The column is constrained by the
/// application, so an unknown value means corrupted data.
pub fn estado_from_db(value: &str) -> Result<AssignmentState, AdjudicationError> {
    AssignmentState::parse(value)
        .ok_or_else(|| AdjudicationError::internal(format!("estado desconocido en BD: {value}")))
}

impl TryFrom<entity::adjudicacion::Model> for Assignment {
    type Error = AdjudicationError;

    fn try_from(entity: entity::adjudicacion::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            postulante_id: entity.postulante_id,
            plaza_id: entity.plaza_id,
            estado: estado_from_db(&entity.estado)?,
            fecha_adjudicacion: entity.fecha_adjudicacion,
            fecha_desistimiento: entity.fecha_desistimiento,
            observaciones: entity.observaciones,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}
