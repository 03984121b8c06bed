//! Contract models for the adjudication domain
//!
//! Spanish table/field names are kept from the source system (EsSalud
//! adjudication campaigns); type and method names are English.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a candidate's assignment record.
///
/// `pendiente` is the initial state. There is no terminal state:
/// `desistido`, `renuncio` and `ausente` can all return to `pendiente`
/// through an explicit reassignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentState {
    Pendiente,
    Adjudicado,
    Desistido,
    Renuncio,
    Ausente,
}

impl AssignmentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pendiente => "pendiente",
            Self::Adjudicado => "adjudicado",
            Self::Desistido => "desistido",
            Self::Renuncio => "renuncio",
            Self::Ausente => "ausente",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pendiente" => Some(Self::Pendiente),
            "adjudicado" => Some(Self::Adjudicado),
            "desistido" => Some(Self::Desistido),
            "renuncio" => Some(Self::Renuncio),
            "ausente" => Some(Self::Ausente),
            _ => None,
        }
    }

    /// States a candidate can be reassigned to `pendiente` from.
    pub fn is_reassignable(&self) -> bool {
        matches!(self, Self::Desistido | Self::Ausente | Self::Renuncio)
    }
}

impl std::fmt::Display for AssignmentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network of facilities (red).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub id: i32,
    pub nombre: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Healthcare facility (IPRESS) belonging to a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    pub id: i32,
    pub nombre: String,
    pub red_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Occupational group (grupo ocupacional), shared classifier for
/// candidates and positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupationalGroup {
    pub id: i32,
    pub nombre: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Open position (plaza) at a facility for one occupational group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: i32,
    pub ipress_id: i32,
    pub grupo_ocupacional_id: i32,
    pub subunidad: Option<String>,
    pub especialidad: Option<String>,
    /// Total capacity, non-negative.
    pub total: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Position joined with its facility, network and group names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionWithDetails {
    #[serde(flatten)]
    pub position: Position,
    pub ipress_nombre: String,
    pub red_nombre: String,
    pub grupo_ocupacional_nombre: String,
}

/// Row of the derived availability computation: capacity minus the count
/// of `adjudicado` assignments referencing the position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionAvailability {
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

impl PositionAvailability {
    pub fn disponible(&self) -> bool {
        self.libres > 0
    }
}

/// Job candidate (postulante) with a merit rank unique within their
/// occupational group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
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

impl Candidate {
    /// Total service time in days (years x 365 + months x 30 + days).
    pub fn tiempo_servicio_total_dias(&self) -> i32 {
        self.tiempo_servicio_anios.unwrap_or(0) * 365
            + self.tiempo_servicio_meses.unwrap_or(0) * 30
            + self.tiempo_servicio_dias.unwrap_or(0)
    }
}

/// Candidate joined with their group name and assignment status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateWithStatus {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub grupo_ocupacional_nombre: String,
    pub estado: AssignmentState,
    pub fecha_adjudicacion: Option<DateTime<Utc>>,
    pub fecha_desistimiento: Option<DateTime<Utc>>,
}

/// Assignment record (adjudicación), exactly one per candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i32,
    pub postulante_id: i32,
    pub plaza_id: Option<i32>,
    pub estado: AssignmentState,
    pub fecha_adjudicacion: Option<DateTime<Utc>>,
    pub fecha_desistimiento: Option<DateTime<Utc>>,
    pub observaciones: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Assignment joined with candidate, group, position, facility and
/// network information (the "completas" listing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub orden_merito: i32,
    pub apellidos_nombres: String,
    pub dni: Option<String>,
    pub grupo_ocupacional: String,
    pub especialidad: Option<String>,
    pub ipress_nombre: Option<String>,
    pub red_nombre: Option<String>,
}

/// Outcome of the assignment validity check, with the first failing
/// reason in fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub valido: bool,
    pub mensaje: String,
}

impl Validation {
    pub fn ok() -> Self {
        Self {
            valido: true,
            mensaje: "Adjudicación válida".to_string(),
        }
    }

    pub fn fail(mensaje: impl Into<String>) -> Self {
        Self {
            valido: false,
            mensaje: mensaje.into(),
        }
    }
}

/// Fields accepted when creating or updating a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPosition {
    pub ipress_id: i32,
    pub grupo_ocupacional_id: i32,
    pub subunidad: Option<String>,
    pub especialidad: Option<String>,
    pub total: i32,
}

/// Fields accepted when creating or updating a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCandidate {
    pub orden_merito: i32,
    pub apellidos_nombres: String,
    pub dni: Option<String>,
    pub grupo_ocupacional_id: i32,
    pub especialidad: Option<String>,
    pub tiempo_servicio_anios: Option<i32>,
    pub tiempo_servicio_meses: Option<i32>,
    pub tiempo_servicio_dias: Option<i32>,
}

/// Result of a bulk assignment batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAssignmentOutcome {
    pub asignados: Vec<Assignment>,
    pub omitidos: usize,
}

/// Combined dashboard payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub adjudicaciones: AssignmentStats,
    pub plazas: PositionStats,
    pub por_grupo: Vec<GroupStats>,
}

// ===== Filters =====

/// Filters for position availability listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionFilter {
    pub solo_disponibles: bool,
    pub red_id: Option<i32>,
    pub ipress_id: Option<i32>,
    pub grupo_ocupacional_id: Option<i32>,
    pub especialidad: Option<String>,
}

/// Filters for candidate status listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    pub grupo_ocupacional_id: Option<i32>,
    pub estado: Option<AssignmentState>,
    pub nombre: Option<String>,
    pub dni: Option<String>,
    pub orden_merito_desde: Option<i32>,
    pub orden_merito_hasta: Option<i32>,
}

/// Filters for the full assignment listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentFilter {
    pub estado: Option<AssignmentState>,
    pub red_id: Option<i32>,
    pub grupo_ocupacional_id: Option<i32>,
    pub fecha_desde: Option<DateTime<Utc>>,
    pub fecha_hasta: Option<DateTime<Utc>>,
}

// ===== Statistics =====

/// Aggregated assignment counters across the whole campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentStats {
    pub total_adjudicaciones: i64,
    pub pendientes: i64,
    pub adjudicados: i64,
    pub desistidos: i64,
    pub renuncias: i64,
    pub ausentes: i64,
    pub porcentaje_adjudicado: f64,
}

/// Assignment counters grouped by network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAssignmentStats {
    pub red: String,
    pub total_adjudicaciones: i64,
    pub adjudicados: i64,
    pub desistidos: i64,
    pub renuncias: i64,
}

/// Position capacity counters, overall or grouped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionStats {
    pub total_plazas: i64,
    pub total_posiciones: i64,
    pub total_asignados: i64,
    pub total_libres: i64,
}

/// Position capacity counters for one network or occupational group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPositionStats {
    pub nombre: String,
    #[serde(flatten)]
    pub stats: PositionStats,
}

/// Candidate state counters for one occupational group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStats {
    pub grupo_ocupacional: String,
    pub total_postulantes: i64,
    pub pendientes: i64,
    pub adjudicados: i64,
    pub desistidos: i64,
    pub renuncias: i64,
}

// ===== Bulk import =====

/// One candidate row from the import dataset. Row numbering in error
/// messages starts at 2 (row 1 is the spreadsheet header).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCandidateRow {
    pub orden_merito: i32,
    pub apellidos_nombres: String,
    pub dni: Option<String>,
    pub grupo_ocupacional: String,
    pub especialidad: Option<String>,
    pub tiempo_servicio_anios: Option<i32>,
    pub tiempo_servicio_meses: Option<i32>,
    pub tiempo_servicio_dias: Option<i32>,
}

/// One position row from the import dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPositionRow {
    pub red: String,
    pub ipress: String,
    pub grupo_ocupacional: String,
    pub subunidad: Option<String>,
    pub especialidad: Option<String>,
    pub total: i32,
}

/// Parsed two-sheet dataset (candidates, positions).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDataset {
    pub postulantes: Vec<ImportCandidateRow>,
    pub plazas: Vec<ImportPositionRow>,
}

/// Counts of rows written by a successful import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub postulantes: usize,
    pub plazas: usize,
    pub grupos_ocupacionales: usize,
    pub redes: usize,
    pub ipress: usize,
}
