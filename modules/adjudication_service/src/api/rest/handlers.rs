//! HTTP request handlers - thin layer that delegates to domain service

use super::dto::*;
use super::error::{map_domain_error, ApiError};
use crate::contract::{AssignmentFilter, AssignmentState, CandidateFilter, PositionFilter};
use crate::domain::Service;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

const MSG_LISTED: &str = "Registros obtenidos exitosamente";
const MSG_FETCHED: &str = "Registro obtenido exitosamente";
const MSG_CREATED: &str = "Registro creado exitosamente";
const MSG_UPDATED: &str = "Registro actualizado exitosamente";
const MSG_DELETED: &str = "Registro eliminado exitosamente";
const MSG_STATS: &str = "Estadísticas obtenidas exitosamente";

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

fn parse_estado(value: &str) -> Result<AssignmentState, ApiError> {
    AssignmentState::parse(value).ok_or_else(|| {
        ApiError::new(StatusCode::BAD_REQUEST, "Error de validación")
            .with_detail(format!("Estado inválido: {value}"))
    })
}

// ===== Network Handlers =====

pub async fn list_redes(Extension(service): Extension<Arc<Service>>) -> ApiResult<Vec<RedDto>> {
    let redes = service.list_networks().await.map_err(map_domain_error)?;
    let data = redes.into_iter().map(RedDto::from).collect();
    Ok(Json(ApiResponse::ok(data, MSG_LISTED)))
}

pub async fn get_red(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
) -> ApiResult<RedDto> {
    let red = service.get_network(id).await.map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(red.into(), MSG_FETCHED)))
}

pub async fn get_red_ipress(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<IpressDto>> {
    let ipress = service
        .network_facilities(id)
        .await
        .map_err(map_domain_error)?;
    let data = ipress.into_iter().map(IpressDto::from).collect();
    Ok(Json(ApiResponse::ok(data, MSG_LISTED)))
}

pub async fn count_redes(Extension(service): Extension<Arc<Service>>) -> ApiResult<ConteoDto> {
    let total = service.count_networks().await.map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(
        ConteoDto { total },
        "Conteo realizado exitosamente",
    )))
}

pub async fn create_red(
    Extension(service): Extension<Arc<Service>>,
    Json(req): Json<NombreRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RedDto>>), ApiError> {
    let red = service
        .create_network(&req.nombre)
        .await
        .map_err(map_domain_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(red.into(), MSG_CREATED)),
    ))
}

pub async fn update_red(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
    Json(req): Json<NombreRequest>,
) -> ApiResult<RedDto> {
    let red = service
        .update_network(id, &req.nombre)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(red.into(), MSG_UPDATED)))
}

pub async fn delete_red(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    service.delete_network(id).await.map_err(map_domain_error)?;
    Ok(Json(ApiResponse::message(MSG_DELETED)))
}

// ===== Facility Handlers =====

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpressQuery {
    pub red_id: Option<i32>,
}

pub async fn list_ipress(
    Extension(service): Extension<Arc<Service>>,
    Query(query): Query<IpressQuery>,
) -> ApiResult<Vec<IpressDto>> {
    let ipress = service
        .list_facilities(query.red_id)
        .await
        .map_err(map_domain_error)?;
    let data = ipress.into_iter().map(IpressDto::from).collect();
    Ok(Json(ApiResponse::ok(data, MSG_LISTED)))
}

pub async fn get_ipress(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
) -> ApiResult<IpressDto> {
    let ipress = service.get_facility(id).await.map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(ipress.into(), MSG_FETCHED)))
}

pub async fn create_ipress(
    Extension(service): Extension<Arc<Service>>,
    Json(req): Json<IpressRequest>,
) -> Result<(StatusCode, Json<ApiResponse<IpressDto>>), ApiError> {
    let ipress = service
        .create_facility(&req.nombre, req.red_id)
        .await
        .map_err(map_domain_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ipress.into(), MSG_CREATED)),
    ))
}

pub async fn update_ipress(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
    Json(req): Json<IpressRequest>,
) -> ApiResult<IpressDto> {
    let ipress = service
        .update_facility(id, &req.nombre, req.red_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(ipress.into(), MSG_UPDATED)))
}

pub async fn delete_ipress(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    service.delete_facility(id).await.map_err(map_domain_error)?;
    Ok(Json(ApiResponse::message(MSG_DELETED)))
}

// ===== Occupational Group Handlers =====

pub async fn list_grupos(
    Extension(service): Extension<Arc<Service>>,
) -> ApiResult<Vec<GrupoOcupacionalDto>> {
    let grupos = service.list_groups().await.map_err(map_domain_error)?;
    let data = grupos.into_iter().map(GrupoOcupacionalDto::from).collect();
    Ok(Json(ApiResponse::ok(data, MSG_LISTED)))
}

pub async fn grupos_stats(
    Extension(service): Extension<Arc<Service>>,
) -> ApiResult<Vec<EstadisticasGrupoDto>> {
    let stats = service.group_statistics().await.map_err(map_domain_error)?;
    let data = stats.into_iter().map(EstadisticasGrupoDto::from).collect();
    Ok(Json(ApiResponse::ok(data, MSG_STATS)))
}

pub async fn get_grupo(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
) -> ApiResult<GrupoOcupacionalDto> {
    let grupo = service.get_group(id).await.map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(grupo.into(), MSG_FETCHED)))
}

pub async fn create_grupo(
    Extension(service): Extension<Arc<Service>>,
    Json(req): Json<NombreRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GrupoOcupacionalDto>>), ApiError> {
    let grupo = service
        .create_group(&req.nombre)
        .await
        .map_err(map_domain_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(grupo.into(), MSG_CREATED)),
    ))
}

pub async fn update_grupo(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
    Json(req): Json<NombreRequest>,
) -> ApiResult<GrupoOcupacionalDto> {
    let grupo = service
        .update_group(id, &req.nombre)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(grupo.into(), MSG_UPDATED)))
}

pub async fn delete_grupo(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    service.delete_group(id).await.map_err(map_domain_error)?;
    Ok(Json(ApiResponse::message(MSG_DELETED)))
}

// ===== Position Handlers =====

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlazasQuery {
    #[serde(default)]
    pub solo_disponibles: bool,
    pub red_id: Option<i32>,
    pub ipress_id: Option<i32>,
    pub grupo_ocupacional_id: Option<i32>,
    pub especialidad: Option<String>,
}

impl From<PlazasQuery> for PositionFilter {
    fn from(query: PlazasQuery) -> Self {
        Self {
            solo_disponibles: query.solo_disponibles,
            red_id: query.red_id,
            ipress_id: query.ipress_id,
            grupo_ocupacional_id: query.grupo_ocupacional_id,
            especialidad: query.especialidad,
        }
    }
}

pub async fn list_plazas(
    Extension(service): Extension<Arc<Service>>,
    Query(query): Query<PlazasQuery>,
) -> ApiResult<Vec<DisponibilidadDto>> {
    let plazas = service
        .list_positions(&query.into())
        .await
        .map_err(map_domain_error)?;
    let data = plazas.into_iter().map(DisponibilidadDto::from).collect();
    Ok(Json(ApiResponse::ok(data, MSG_LISTED)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisponiblesQuery {
    pub grupo_ocupacional_id: Option<i32>,
}

pub async fn plazas_disponibles(
    Extension(service): Extension<Arc<Service>>,
    Query(query): Query<DisponiblesQuery>,
) -> ApiResult<Vec<DisponibilidadDto>> {
    let plazas = service
        .available_positions(query.grupo_ocupacional_id)
        .await
        .map_err(map_domain_error)?;
    let data = plazas.into_iter().map(DisponibilidadDto::from).collect();
    Ok(Json(ApiResponse::ok(data, MSG_LISTED)))
}

pub async fn plazas_stats(
    Extension(service): Extension<Arc<Service>>,
) -> ApiResult<EstadisticasPlazasDto> {
    let stats = service.position_stats().await.map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(stats.into(), MSG_STATS)))
}

pub async fn plazas_stats_por_red(
    Extension(service): Extension<Arc<Service>>,
) -> ApiResult<Vec<EstadisticasPlazasAgrupadasDto>> {
    let stats = service
        .position_stats_by_network()
        .await
        .map_err(map_domain_error)?;
    let data = stats
        .into_iter()
        .map(EstadisticasPlazasAgrupadasDto::from)
        .collect();
    Ok(Json(ApiResponse::ok(data, MSG_STATS)))
}

pub async fn plazas_stats_por_grupo(
    Extension(service): Extension<Arc<Service>>,
) -> ApiResult<Vec<EstadisticasPlazasAgrupadasDto>> {
    let stats = service
        .position_stats_by_group()
        .await
        .map_err(map_domain_error)?;
    let data = stats
        .into_iter()
        .map(EstadisticasPlazasAgrupadasDto::from)
        .collect();
    Ok(Json(ApiResponse::ok(data, MSG_STATS)))
}

pub async fn get_plaza(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
) -> ApiResult<PlazaDetalleDto> {
    let plaza = service.get_position(id).await.map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(plaza.into(), MSG_FETCHED)))
}

pub async fn plaza_disponibilidad(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
) -> ApiResult<DisponibilidadDto> {
    let disponibilidad = service
        .position_availability(id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(disponibilidad.into(), MSG_FETCHED)))
}

pub async fn plaza_adjudicaciones(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<AdjudicacionCompletaDto>> {
    let records = service
        .position_assignments(id)
        .await
        .map_err(map_domain_error)?;
    let data = records
        .into_iter()
        .map(AdjudicacionCompletaDto::from)
        .collect();
    Ok(Json(ApiResponse::ok(data, MSG_LISTED)))
}

pub async fn create_plaza(
    Extension(service): Extension<Arc<Service>>,
    Json(req): Json<PlazaRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PlazaDto>>), ApiError> {
    let plaza = service
        .create_position(&(&req).into())
        .await
        .map_err(map_domain_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(plaza.into(), MSG_CREATED)),
    ))
}

pub async fn update_plaza(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
    Json(req): Json<PlazaRequest>,
) -> ApiResult<PlazaDto> {
    let plaza = service
        .update_position(id, &(&req).into())
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(plaza.into(), MSG_UPDATED)))
}

pub async fn delete_plaza(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    service.delete_position(id).await.map_err(map_domain_error)?;
    Ok(Json(ApiResponse::message(MSG_DELETED)))
}

// ===== Candidate Handlers =====

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostulantesQuery {
    pub grupo_ocupacional_id: Option<i32>,
    pub estado: Option<String>,
    pub nombre: Option<String>,
    pub dni: Option<String>,
    pub orden_merito_desde: Option<i32>,
    pub orden_merito_hasta: Option<i32>,
}

pub async fn list_postulantes(
    Extension(service): Extension<Arc<Service>>,
    Query(query): Query<PostulantesQuery>,
) -> ApiResult<Vec<PostulanteEstadoDto>> {
    let estado = query.estado.as_deref().map(parse_estado).transpose()?;
    let filter = CandidateFilter {
        grupo_ocupacional_id: query.grupo_ocupacional_id,
        estado,
        nombre: query.nombre,
        dni: query.dni,
        orden_merito_desde: query.orden_merito_desde,
        orden_merito_hasta: query.orden_merito_hasta,
    };
    let postulantes = service
        .list_candidates(&filter)
        .await
        .map_err(map_domain_error)?;
    let data = postulantes
        .into_iter()
        .map(PostulanteEstadoDto::from)
        .collect();
    Ok(Json(ApiResponse::ok(data, MSG_LISTED)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendientesQuery {
    pub grupo_ocupacional_id: i32,
    pub limite: Option<u64>,
}

pub async fn postulantes_pendientes(
    Extension(service): Extension<Arc<Service>>,
    Query(query): Query<PendientesQuery>,
) -> ApiResult<Vec<PostulanteDto>> {
    let pendientes = service
        .pending_candidates(query.grupo_ocupacional_id, query.limite)
        .await
        .map_err(map_domain_error)?;
    let data = pendientes.into_iter().map(PostulanteDto::from).collect();
    Ok(Json(ApiResponse::ok(data, MSG_LISTED)))
}

pub async fn postulantes_stats_por_grupo(
    Extension(service): Extension<Arc<Service>>,
) -> ApiResult<Vec<EstadisticasGrupoDto>> {
    let stats = service
        .candidate_stats_by_group()
        .await
        .map_err(map_domain_error)?;
    let data = stats.into_iter().map(EstadisticasGrupoDto::from).collect();
    Ok(Json(ApiResponse::ok(data, MSG_STATS)))
}

pub async fn get_postulante_por_dni(
    Extension(service): Extension<Arc<Service>>,
    Path(dni): Path<String>,
) -> ApiResult<PostulanteEstadoDto> {
    let postulante = service
        .get_candidate_by_dni(&dni)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(postulante.into(), MSG_FETCHED)))
}

pub async fn get_postulante(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
) -> ApiResult<PostulanteDto> {
    let postulante = service.get_candidate(id).await.map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(postulante.into(), MSG_FETCHED)))
}

pub async fn create_postulante(
    Extension(service): Extension<Arc<Service>>,
    Json(req): Json<PostulanteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostulanteDto>>), ApiError> {
    let postulante = service
        .create_candidate(&(&req).into())
        .await
        .map_err(map_domain_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(postulante.into(), MSG_CREATED)),
    ))
}

pub async fn update_postulante(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
    Json(req): Json<PostulanteRequest>,
) -> ApiResult<PostulanteDto> {
    let postulante = service
        .update_candidate(id, &(&req).into())
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(postulante.into(), MSG_UPDATED)))
}

pub async fn delete_postulante(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    service.delete_candidate(id).await.map_err(map_domain_error)?;
    Ok(Json(ApiResponse::message(MSG_DELETED)))
}

// ===== Assignment Handlers =====

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjudicacionesQuery {
    pub estado: Option<String>,
    pub red_id: Option<i32>,
    pub grupo_ocupacional_id: Option<i32>,
    pub fecha_desde: Option<DateTime<Utc>>,
    pub fecha_hasta: Option<DateTime<Utc>>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl AdjudicacionesQuery {
    fn filter(&self) -> Result<AssignmentFilter, ApiError> {
        let estado = self.estado.as_deref().map(parse_estado).transpose()?;
        Ok(AssignmentFilter {
            estado,
            red_id: self.red_id,
            grupo_ocupacional_id: self.grupo_ocupacional_id,
            fecha_desde: self.fecha_desde,
            fecha_hasta: self.fecha_hasta,
        })
    }
}

pub async fn list_adjudicaciones(
    Extension(service): Extension<Arc<Service>>,
    Query(query): Query<AdjudicacionesQuery>,
) -> ApiResult<Paginated<AdjudicacionCompletaDto>> {
    let filter = query.filter()?;
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let (records, total) = service
        .list_assignments(&filter, page, limit)
        .await
        .map_err(map_domain_error)?;
    let data = records
        .into_iter()
        .map(AdjudicacionCompletaDto::from)
        .collect();
    let payload = Paginated {
        data,
        pagination: Pagination::new(page, limit, total),
    };
    Ok(Json(ApiResponse::ok(payload, MSG_LISTED)))
}

pub async fn adjudicaciones_completas(
    Extension(service): Extension<Arc<Service>>,
    Query(query): Query<AdjudicacionesQuery>,
) -> ApiResult<Vec<AdjudicacionCompletaDto>> {
    let filter = query.filter()?;
    let records = service
        .list_assignments_full(&filter)
        .await
        .map_err(map_domain_error)?;
    let data = records
        .into_iter()
        .map(AdjudicacionCompletaDto::from)
        .collect();
    Ok(Json(ApiResponse::ok(data, MSG_LISTED)))
}

pub async fn adjudicaciones_stats(
    Extension(service): Extension<Arc<Service>>,
) -> ApiResult<EstadisticasAdjudicacionDto> {
    let stats = service.assignment_stats().await.map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(stats.into(), MSG_STATS)))
}

pub async fn adjudicaciones_stats_por_red(
    Extension(service): Extension<Arc<Service>>,
) -> ApiResult<Vec<EstadisticasPorRedDto>> {
    let stats = service
        .assignment_stats_by_network()
        .await
        .map_err(map_domain_error)?;
    let data = stats.into_iter().map(EstadisticasPorRedDto::from).collect();
    Ok(Json(ApiResponse::ok(data, MSG_STATS)))
}

pub async fn dashboard(Extension(service): Extension<Arc<Service>>) -> ApiResult<DashboardDto> {
    let dashboard = service.dashboard().await.map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(dashboard.into(), MSG_STATS)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidarQuery {
    pub postulante_id: i32,
    pub plaza_id: i32,
}

pub async fn validar(
    Extension(service): Extension<Arc<Service>>,
    Query(query): Query<ValidarQuery>,
) -> ApiResult<ValidacionDto> {
    let validation = service
        .validate(query.postulante_id, query.plaza_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(
        validation.into(),
        "Validación realizada",
    )))
}

pub async fn get_adjudicacion_por_postulante(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
) -> ApiResult<AdjudicacionDto> {
    let assignment = service
        .assignment_by_candidate(id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(assignment.into(), MSG_FETCHED)))
}

pub async fn get_adjudicaciones_por_plaza(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<AdjudicacionCompletaDto>> {
    let records = service
        .position_assignments(id)
        .await
        .map_err(map_domain_error)?;
    let data = records
        .into_iter()
        .map(AdjudicacionCompletaDto::from)
        .collect();
    Ok(Json(ApiResponse::ok(data, MSG_LISTED)))
}

pub async fn get_adjudicacion(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
) -> ApiResult<AdjudicacionDto> {
    let assignment = service.get_assignment(id).await.map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(assignment.into(), MSG_FETCHED)))
}

pub async fn adjudicar(
    Extension(service): Extension<Arc<Service>>,
    Json(req): Json<AdjudicarRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AdjudicacionDto>>), ApiError> {
    let assignment = service
        .assign_automatic(req.postulante_id, req.plaza_id, req.observaciones.as_deref())
        .await
        .map_err(map_domain_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            assignment.into(),
            "Plaza adjudicada exitosamente",
        )),
    ))
}

pub async fn adjudicacion_masiva(
    Extension(service): Extension<Arc<Service>>,
    Json(req): Json<AdjudicacionMasivaRequest>,
) -> ApiResult<AdjudicacionMasivaDto> {
    let outcome = service
        .bulk_assign(req.grupo_ocupacional_id, req.cantidad)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(
        outcome.into(),
        "Adjudicación masiva completada",
    )))
}

pub async fn desistir(
    Extension(service): Extension<Arc<Service>>,
    Path(postulante_id): Path<i32>,
    Json(req): Json<ObservacionesRequest>,
) -> ApiResult<AdjudicacionDto> {
    let assignment = service
        .mark_withdrawn(postulante_id, req.observaciones.as_deref())
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(
        assignment.into(),
        "Desistimiento registrado",
    )))
}

pub async fn renuncia(
    Extension(service): Extension<Arc<Service>>,
    Path(postulante_id): Path<i32>,
    Json(req): Json<ObservacionesRequest>,
) -> ApiResult<AdjudicacionDto> {
    let assignment = service
        .mark_resigned(postulante_id, req.observaciones.as_deref())
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(
        assignment.into(),
        "Renuncia registrada",
    )))
}

pub async fn ausente(
    Extension(service): Extension<Arc<Service>>,
    Path(postulante_id): Path<i32>,
    Json(req): Json<ObservacionesRequest>,
) -> ApiResult<AdjudicacionDto> {
    let assignment = service
        .mark_absent(postulante_id, req.observaciones.as_deref())
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(
        assignment.into(),
        "Ausencia registrada",
    )))
}

pub async fn reasignar(
    Extension(service): Extension<Arc<Service>>,
    Path(postulante_id): Path<i32>,
    Json(req): Json<ObservacionesRequest>,
) -> ApiResult<AdjudicacionDto> {
    let assignment = service
        .reassign_to_pending(postulante_id, req.observaciones.as_deref())
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(
        assignment.into(),
        "Postulante reasignado a pendiente",
    )))
}

pub async fn revertir(
    Extension(service): Extension<Arc<Service>>,
    Path(adjudicacion_id): Path<i32>,
    Json(req): Json<ObservacionesRequest>,
) -> ApiResult<AdjudicacionDto> {
    let assignment = service
        .revert_assignment(adjudicacion_id, req.observaciones.as_deref())
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(
        assignment.into(),
        "Adjudicación revertida",
    )))
}

pub async fn actualizar_estado(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
    Json(req): Json<EstadoRequest>,
) -> ApiResult<AdjudicacionDto> {
    let assignment = service
        .update_state(id, &req.estado, req.observaciones.as_deref())
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(
        assignment.into(),
        "Estado actualizado exitosamente",
    )))
}

pub async fn delete_adjudicacion(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<i32>,
) -> ApiResult<AdjudicacionDto> {
    let assignment = service
        .delete_assignment(id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(assignment.into(), MSG_DELETED)))
}

// ===== Import Handlers =====

pub async fn importar(
    Extension(service): Extension<Arc<Service>>,
    Json(req): Json<ImportRequest>,
) -> ApiResult<ImportResumenDto> {
    let summary = service
        .import(&req.into())
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ApiResponse::ok(
        summary.into(),
        "Importación completada exitosamente",
    )))
}
