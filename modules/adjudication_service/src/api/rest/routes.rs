//! Route registration for the adjudication REST API

use super::handlers;
use crate::domain::Service;
use axum::{
    routing::{get, post, put},
    Extension, Router,
};
use std::sync::Arc;

/// Build the API router with all endpoints mounted.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        // Networks
        .route("/redes", get(handlers::list_redes).post(handlers::create_red))
        .route("/redes/count", get(handlers::count_redes))
        .route(
            "/redes/{id}",
            get(handlers::get_red)
                .put(handlers::update_red)
                .delete(handlers::delete_red),
        )
        .route("/redes/{id}/ipress", get(handlers::get_red_ipress))
        // Facilities
        .route(
            "/ipress",
            get(handlers::list_ipress).post(handlers::create_ipress),
        )
        .route(
            "/ipress/{id}",
            get(handlers::get_ipress)
                .put(handlers::update_ipress)
                .delete(handlers::delete_ipress),
        )
        // Occupational groups
        .route(
            "/grupos-ocupacionales",
            get(handlers::list_grupos).post(handlers::create_grupo),
        )
        .route("/grupos-ocupacionales/stats", get(handlers::grupos_stats))
        .route(
            "/grupos-ocupacionales/{id}",
            get(handlers::get_grupo)
                .put(handlers::update_grupo)
                .delete(handlers::delete_grupo),
        )
        // Positions
        .route(
            "/plazas",
            get(handlers::list_plazas).post(handlers::create_plaza),
        )
        .route("/plazas/disponibles", get(handlers::plazas_disponibles))
        .route("/plazas/stats", get(handlers::plazas_stats))
        .route("/plazas/stats/by-red", get(handlers::plazas_stats_por_red))
        .route(
            "/plazas/stats/by-grupo",
            get(handlers::plazas_stats_por_grupo),
        )
        .route(
            "/plazas/{id}",
            get(handlers::get_plaza)
                .put(handlers::update_plaza)
                .delete(handlers::delete_plaza),
        )
        .route(
            "/plazas/{id}/disponibilidad",
            get(handlers::plaza_disponibilidad),
        )
        .route(
            "/plazas/{id}/adjudicaciones",
            get(handlers::plaza_adjudicaciones),
        )
        // Candidates
        .route(
            "/postulantes",
            get(handlers::list_postulantes).post(handlers::create_postulante),
        )
        .route(
            "/postulantes/pendientes",
            get(handlers::postulantes_pendientes),
        )
        .route(
            "/postulantes/stats/by-grupo",
            get(handlers::postulantes_stats_por_grupo),
        )
        .route(
            "/postulantes/dni/{dni}",
            get(handlers::get_postulante_por_dni),
        )
        .route(
            "/postulantes/{id}",
            get(handlers::get_postulante)
                .put(handlers::update_postulante)
                .delete(handlers::delete_postulante),
        )
        // Assignments
        .route("/adjudicaciones", get(handlers::list_adjudicaciones))
        .route(
            "/adjudicaciones/completas",
            get(handlers::adjudicaciones_completas),
        )
        .route("/adjudicaciones/stats", get(handlers::adjudicaciones_stats))
        .route(
            "/adjudicaciones/stats/by-red",
            get(handlers::adjudicaciones_stats_por_red),
        )
        .route("/adjudicaciones/dashboard", get(handlers::dashboard))
        .route("/adjudicaciones/validar", get(handlers::validar))
        .route(
            "/adjudicaciones/by-postulante/{id}",
            get(handlers::get_adjudicacion_por_postulante),
        )
        .route(
            "/adjudicaciones/by-plaza/{id}",
            get(handlers::get_adjudicaciones_por_plaza),
        )
        .route("/adjudicaciones/adjudicar", post(handlers::adjudicar))
        .route(
            "/adjudicaciones/masiva",
            post(handlers::adjudicacion_masiva),
        )
        .route(
            "/adjudicaciones/desistir/{postulanteId}",
            post(handlers::desistir),
        )
        .route(
            "/adjudicaciones/renuncia/{postulanteId}",
            post(handlers::renuncia),
        )
        .route(
            "/adjudicaciones/ausente/{postulanteId}",
            post(handlers::ausente),
        )
        .route(
            "/adjudicaciones/reasignar/{postulanteId}",
            post(handlers::reasignar),
        )
        .route(
            "/adjudicaciones/revertir/{adjudicacionId}",
            post(handlers::revertir),
        )
        .route(
            "/adjudicaciones/{id}/estado",
            put(handlers::actualizar_estado),
        )
        .route(
            "/adjudicaciones/{id}",
            get(handlers::get_adjudicacion).delete(handlers::delete_adjudicacion),
        )
        // Import
        .route("/import", post(handlers::importar))
        .layer(Extension(service))
}
