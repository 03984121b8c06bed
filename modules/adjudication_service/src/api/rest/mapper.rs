//! Mapper implementations for converting between DTOs and contract models

use super::dto::*;
use crate::contract;

// ===== Catalog conversions =====

impl From<contract::Network> for RedDto {
    fn from(model: contract::Network) -> Self {
        Self {
            id: model.id,
            nombre: model.nombre,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<contract::Facility> for IpressDto {
    fn from(model: contract::Facility) -> Self {
        Self {
            id: model.id,
            nombre: model.nombre,
            red_id: model.red_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<contract::OccupationalGroup> for GrupoOcupacionalDto {
    fn from(model: contract::OccupationalGroup) -> Self {
        Self {
            id: model.id,
            nombre: model.nombre,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

// ===== Position conversions =====

impl From<contract::Position> for PlazaDto {
    fn from(model: contract::Position) -> Self {
        Self {
            id: model.id,
            ipress_id: model.ipress_id,
            grupo_ocupacional_id: model.grupo_ocupacional_id,
            subunidad: model.subunidad,
            especialidad: model.especialidad,
            total: model.total,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<contract::PositionWithDetails> for PlazaDetalleDto {
    fn from(model: contract::PositionWithDetails) -> Self {
        Self {
            plaza: model.position.into(),
            ipress_nombre: model.ipress_nombre,
            red_nombre: model.red_nombre,
            grupo_ocupacional_nombre: model.grupo_ocupacional_nombre,
        }
    }
}

impl From<contract::PositionAvailability> for DisponibilidadDto {
    fn from(model: contract::PositionAvailability) -> Self {
        Self {
            id: model.id,
            red: model.red,
            ipress: model.ipress,
            grupo_ocupacional: model.grupo_ocupacional,
            subunidad: model.subunidad,
            especialidad: model.especialidad,
            total: model.total,
            asignados: model.asignados,
            libres: model.libres,
        }
    }
}

impl From<&PlazaRequest> for contract::NewPosition {
    fn from(req: &PlazaRequest) -> Self {
        Self {
            ipress_id: req.ipress_id,
            grupo_ocupacional_id: req.grupo_ocupacional_id,
            subunidad: req.subunidad.clone(),
            especialidad: req.especialidad.clone(),
            total: req.total,
        }
    }
}

impl From<contract::PositionStats> for EstadisticasPlazasDto {
    fn from(model: contract::PositionStats) -> Self {
        Self {
            total_plazas: model.total_plazas,
            total_posiciones: model.total_posiciones,
            total_asignados: model.total_asignados,
            total_libres: model.total_libres,
        }
    }
}

impl From<contract::NetworkPositionStats> for EstadisticasPlazasAgrupadasDto {
    fn from(model: contract::NetworkPositionStats) -> Self {
        Self {
            nombre: model.nombre,
            estadisticas: model.stats.into(),
        }
    }
}

// ===== Candidate conversions =====

impl From<contract::Candidate> for PostulanteDto {
    fn from(model: contract::Candidate) -> Self {
        Self {
            id: model.id,
            orden_merito: model.orden_merito,
            apellidos_nombres: model.apellidos_nombres,
            dni: model.dni,
            grupo_ocupacional_id: model.grupo_ocupacional_id,
            especialidad: model.especialidad,
            tiempo_servicio_anios: model.tiempo_servicio_anios,
            tiempo_servicio_meses: model.tiempo_servicio_meses,
            tiempo_servicio_dias: model.tiempo_servicio_dias,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<contract::CandidateWithStatus> for PostulanteEstadoDto {
    fn from(model: contract::CandidateWithStatus) -> Self {
        Self {
            postulante: model.candidate.into(),
            grupo_ocupacional_nombre: model.grupo_ocupacional_nombre,
            estado: model.estado.to_string(),
            fecha_adjudicacion: model.fecha_adjudicacion,
            fecha_desistimiento: model.fecha_desistimiento,
        }
    }
}

impl From<&PostulanteRequest> for contract::NewCandidate {
    fn from(req: &PostulanteRequest) -> Self {
        Self {
            orden_merito: req.orden_merito,
            apellidos_nombres: req.apellidos_nombres.clone(),
            dni: req.dni.clone(),
            grupo_ocupacional_id: req.grupo_ocupacional_id,
            especialidad: req.especialidad.clone(),
            tiempo_servicio_anios: req.tiempo_servicio_anios,
            tiempo_servicio_meses: req.tiempo_servicio_meses,
            tiempo_servicio_dias: req.tiempo_servicio_dias,
        }
    }
}

impl From<contract::GroupStats> for EstadisticasGrupoDto {
    fn from(model: contract::GroupStats) -> Self {
        Self {
            grupo_ocupacional: model.grupo_ocupacional,
            total_postulantes: model.total_postulantes,
            pendientes: model.pendientes,
            adjudicados: model.adjudicados,
            desistidos: model.desistidos,
            renuncias: model.renuncias,
        }
    }
}

// ===== Assignment conversions =====

impl From<contract::Assignment> for AdjudicacionDto {
    fn from(model: contract::Assignment) -> Self {
        Self {
            id: model.id,
            postulante_id: model.postulante_id,
            plaza_id: model.plaza_id,
            estado: model.estado.to_string(),
            fecha_adjudicacion: model.fecha_adjudicacion,
            fecha_desistimiento: model.fecha_desistimiento,
            observaciones: model.observaciones,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<contract::AssignmentRecord> for AdjudicacionCompletaDto {
    fn from(model: contract::AssignmentRecord) -> Self {
        Self {
            adjudicacion: model.assignment.into(),
            orden_merito: model.orden_merito,
            apellidos_nombres: model.apellidos_nombres,
            dni: model.dni,
            grupo_ocupacional: model.grupo_ocupacional,
            especialidad: model.especialidad,
            ipress_nombre: model.ipress_nombre,
            red_nombre: model.red_nombre,
        }
    }
}

impl From<contract::Validation> for ValidacionDto {
    fn from(model: contract::Validation) -> Self {
        Self {
            valido: model.valido,
            mensaje: model.mensaje,
        }
    }
}

impl From<contract::BulkAssignmentOutcome> for AdjudicacionMasivaDto {
    fn from(model: contract::BulkAssignmentOutcome) -> Self {
        Self {
            asignados: model.asignados.into_iter().map(|a| a.into()).collect(),
            omitidos: model.omitidos,
        }
    }
}

impl From<contract::AssignmentStats> for EstadisticasAdjudicacionDto {
    fn from(model: contract::AssignmentStats) -> Self {
        Self {
            total_adjudicaciones: model.total_adjudicaciones,
            pendientes: model.pendientes,
            adjudicados: model.adjudicados,
            desistidos: model.desistidos,
            renuncias: model.renuncias,
            ausentes: model.ausentes,
            porcentaje_adjudicado: model.porcentaje_adjudicado,
        }
    }
}

impl From<contract::NetworkAssignmentStats> for EstadisticasPorRedDto {
    fn from(model: contract::NetworkAssignmentStats) -> Self {
        Self {
            red: model.red,
            total_adjudicaciones: model.total_adjudicaciones,
            adjudicados: model.adjudicados,
            desistidos: model.desistidos,
            renuncias: model.renuncias,
        }
    }
}

impl From<contract::Dashboard> for DashboardDto {
    fn from(model: contract::Dashboard) -> Self {
        Self {
            adjudicaciones: model.adjudicaciones.into(),
            plazas: model.plazas.into(),
            por_grupo: model.por_grupo.into_iter().map(|g| g.into()).collect(),
        }
    }
}

// ===== Import conversions =====

impl From<ImportRequest> for contract::ImportDataset {
    fn from(req: ImportRequest) -> Self {
        Self {
            postulantes: req
                .postulantes
                .into_iter()
                .map(|row| contract::ImportCandidateRow {
                    orden_merito: row.orden_merito,
                    apellidos_nombres: row.apellidos_nombres,
                    dni: row.dni,
                    grupo_ocupacional: row.grupo_ocupacional,
                    especialidad: row.especialidad,
                    tiempo_servicio_anios: row.tiempo_servicio_anios,
                    tiempo_servicio_meses: row.tiempo_servicio_meses,
                    tiempo_servicio_dias: row.tiempo_servicio_dias,
                })
                .collect(),
            plazas: req
                .plazas
                .into_iter()
                .map(|row| contract::ImportPositionRow {
                    red: row.red,
                    ipress: row.ipress,
                    grupo_ocupacional: row.grupo_ocupacional,
                    subunidad: row.subunidad,
                    especialidad: row.especialidad,
                    total: row.total,
                })
                .collect(),
        }
    }
}

impl From<contract::ImportSummary> for ImportResumenDto {
    fn from(model: contract::ImportSummary) -> Self {
        Self {
            postulantes: model.postulantes,
            plazas: model.plazas,
            grupos_ocupacionales: model.grupos_ocupacionales,
            redes: model.redes,
            ipress: model.ipress,
        }
    }
}
