//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ===== Response envelope =====

/// Uniform response envelope for every endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: message.into(),
            error: None,
        }
    }
}

/// Paginated listing payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

// ===== Catalog DTOs =====

/// Network response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RedDto {
    pub id: i32,
    pub nombre: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Facility response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IpressDto {
    pub id: i32,
    pub nombre: String,
    pub red_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Occupational group response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GrupoOcupacionalDto {
    pub id: i32,
    pub nombre: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update request for networks and occupational groups
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NombreRequest {
    #[schema(example = "Red Asistencial Lima")]
    pub nombre: String,
}

/// Create/update request for facilities
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IpressRequest {
    #[schema(example = "Hospital Nacional Edgardo Rebagliati")]
    pub nombre: String,
    pub red_id: i32,
}

/// Total row count payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConteoDto {
    pub total: i64,
}

// ===== Position DTOs =====

/// Position response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlazaDto {
    pub id: i32,
    pub ipress_id: i32,
    pub grupo_ocupacional_id: i32,
    pub subunidad: Option<String>,
    pub especialidad: Option<String>,
    pub total: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Position with facility, network and group names
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlazaDetalleDto {
    #[serde(flatten)]
    pub plaza: PlazaDto,
    pub ipress_nombre: String,
    pub red_nombre: String,
    pub grupo_ocupacional_nombre: String,
}

/// Position availability row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DisponibilidadDto {
    pub id: i32,
    pub red: String,
    pub ipress: String,
    pub grupo_ocupacional: String,
    pub subunidad: Option<String>,
    pub especialidad: Option<String>,
    pub total: i64,
    pub asignados: i64,
    pub libres: i64,
}

/// Create/update request for positions
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PlazaRequest {
    pub ipress_id: i32,
    pub grupo_ocupacional_id: i32,
    pub subunidad: Option<String>,
    pub especialidad: Option<String>,
    pub total: i32,
}

/// Capacity counters, overall or per grouping
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EstadisticasPlazasDto {
    pub total_plazas: i64,
    pub total_posiciones: i64,
    pub total_asignados: i64,
    pub total_libres: i64,
}

/// Capacity counters labelled by network or group name
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EstadisticasPlazasAgrupadasDto {
    pub nombre: String,
    #[serde(flatten)]
    pub estadisticas: EstadisticasPlazasDto,
}

// ===== Candidate DTOs =====

/// Candidate response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostulanteDto {
    pub id: i32,
    pub orden_merito: i32,
    pub apellidos_nombres: String,
    pub dni: Option<String>,
    pub grupo_ocupacional_id: i32,
    pub especialidad: Option<String>,
    pub tiempo_servicio_anios: Option<i32>,
    pub tiempo_servicio_meses: Option<i32>,
    pub tiempo_servicio_dias: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Candidate with group name and assignment status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostulanteEstadoDto {
    #[serde(flatten)]
    pub postulante: PostulanteDto,
    pub grupo_ocupacional_nombre: String,
    #[schema(example = "pendiente")]
    pub estado: String,
    pub fecha_adjudicacion: Option<DateTime<Utc>>,
    pub fecha_desistimiento: Option<DateTime<Utc>>,
}

/// Create/update request for candidates
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PostulanteRequest {
    pub orden_merito: i32,
    pub apellidos_nombres: String,
    pub dni: Option<String>,
    pub grupo_ocupacional_id: i32,
    pub especialidad: Option<String>,
    pub tiempo_servicio_anios: Option<i32>,
    pub tiempo_servicio_meses: Option<i32>,
    pub tiempo_servicio_dias: Option<i32>,
}

/// Candidate state counters per group
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EstadisticasGrupoDto {
    pub grupo_ocupacional: String,
    pub total_postulantes: i64,
    pub pendientes: i64,
    pub adjudicados: i64,
    pub desistidos: i64,
    pub renuncias: i64,
}

// ===== Assignment DTOs =====

/// Assignment record DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdjudicacionDto {
    pub id: i32,
    pub postulante_id: i32,
    pub plaza_id: Option<i32>,
    #[schema(example = "adjudicado")]
    pub estado: String,
    pub fecha_adjudicacion: Option<DateTime<Utc>>,
    pub fecha_desistimiento: Option<DateTime<Utc>>,
    pub observaciones: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Assignment joined with candidate, group, position and network names
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdjudicacionCompletaDto {
    #[serde(flatten)]
    pub adjudicacion: AdjudicacionDto,
    pub orden_merito: i32,
    pub apellidos_nombres: String,
    pub dni: Option<String>,
    pub grupo_ocupacional: String,
    pub especialidad: Option<String>,
    pub ipress_nombre: Option<String>,
    pub red_nombre: Option<String>,
}

/// Validity check result
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidacionDto {
    pub valido: bool,
    pub mensaje: String,
}

/// Assignment request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdjudicarRequest {
    pub postulante_id: i32,
    pub plaza_id: i32,
    pub observaciones: Option<String>,
}

/// Bulk assignment request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdjudicacionMasivaRequest {
    pub grupo_ocupacional_id: i32,
    #[serde(default = "default_cantidad")]
    pub cantidad: u64,
}

fn default_cantidad() -> u64 {
    10
}

/// Bulk assignment outcome
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdjudicacionMasivaDto {
    pub asignados: Vec<AdjudicacionDto>,
    pub omitidos: usize,
}

/// Free-form notes accompanying a lifecycle transition
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ObservacionesRequest {
    pub observaciones: Option<String>,
}

/// Direct state update request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EstadoRequest {
    #[schema(example = "desistido")]
    pub estado: String,
    pub observaciones: Option<String>,
}

/// Aggregated assignment counters
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EstadisticasAdjudicacionDto {
    pub total_adjudicaciones: i64,
    pub pendientes: i64,
    pub adjudicados: i64,
    pub desistidos: i64,
    pub renuncias: i64,
    pub ausentes: i64,
    pub porcentaje_adjudicado: f64,
}

/// Assignment counters per network
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EstadisticasPorRedDto {
    pub red: String,
    pub total_adjudicaciones: i64,
    pub adjudicados: i64,
    pub desistidos: i64,
    pub renuncias: i64,
}

/// Combined dashboard payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardDto {
    pub adjudicaciones: EstadisticasAdjudicacionDto,
    pub plazas: EstadisticasPlazasDto,
    pub por_grupo: Vec<EstadisticasGrupoDto>,
}

// ===== Import DTOs =====

/// Candidate row of the import dataset
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImportPostulanteDto {
    pub orden_merito: i32,
    pub apellidos_nombres: String,
    pub dni: Option<String>,
    pub grupo_ocupacional: String,
    pub especialidad: Option<String>,
    pub tiempo_servicio_anios: Option<i32>,
    pub tiempo_servicio_meses: Option<i32>,
    pub tiempo_servicio_dias: Option<i32>,
}

/// Position row of the import dataset
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImportPlazaDto {
    pub red: String,
    pub ipress: String,
    pub grupo_ocupacional: String,
    pub subunidad: Option<String>,
    pub especialidad: Option<String>,
    pub total: i32,
}

/// Two-sheet bulk import request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImportRequest {
    #[serde(default)]
    pub postulantes: Vec<ImportPostulanteDto>,
    #[serde(default)]
    pub plazas: Vec<ImportPlazaDto>,
}

/// Rows written by a successful import
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportResumenDto {
    pub postulantes: usize,
    pub plazas: usize,
    pub grupos_ocupacionales: usize,
    pub redes: usize,
    pub ipress: usize,
}
