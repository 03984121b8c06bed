//! Import dataset validation
//!
//! Row numbers in rejection messages start at 2, matching the spreadsheet
//! the dataset was extracted from (row 1 is the header).

use crate::contract::{AdjudicationError, ImportDataset};
use std::collections::HashSet;

const FIRST_DATA_ROW: usize = 2;

/// Check whether a DNI is eight ASCII digits.
pub fn is_valid_dni(dni: &str) -> bool {
    dni.len() == 8 && dni.bytes().all(|b| b.is_ascii_digit())
}

/// Validate an import dataset row by row. The first invalid row aborts
/// with a row-numbered message before anything is written.
pub fn validate_dataset(dataset: &ImportDataset) -> Result<(), AdjudicationError> {
    if dataset.postulantes.is_empty() && dataset.plazas.is_empty() {
        return Err(AdjudicationError::validation(
            "El archivo no contiene datos para importar",
        ));
    }

    let mut merit_seen: HashSet<(String, i32)> = HashSet::new();
    for (idx, row) in dataset.postulantes.iter().enumerate() {
        let fila = idx + FIRST_DATA_ROW;
        if row.apellidos_nombres.trim().is_empty() {
            return Err(AdjudicationError::import_rejected(
                fila,
                "apellidos y nombres es obligatorio",
            ));
        }
        if row.grupo_ocupacional.trim().is_empty() {
            return Err(AdjudicationError::import_rejected(
                fila,
                "grupo ocupacional es obligatorio",
            ));
        }
        if row.orden_merito <= 0 {
            return Err(AdjudicationError::import_rejected(
                fila,
                "el orden de mérito debe ser un número positivo",
            ));
        }
        if let Some(dni) = row.dni.as_deref() {
            if !is_valid_dni(dni) {
                return Err(AdjudicationError::import_rejected(
                    fila,
                    format!("DNI inválido: {dni}"),
                ));
            }
        }
        let key = (
            row.grupo_ocupacional.trim().to_lowercase(),
            row.orden_merito,
        );
        if !merit_seen.insert(key) {
            return Err(AdjudicationError::import_rejected(
                fila,
                format!(
                    "orden de mérito {} duplicado en el grupo {}",
                    row.orden_merito,
                    row.grupo_ocupacional.trim()
                ),
            ));
        }
    }

    for (idx, row) in dataset.plazas.iter().enumerate() {
        let fila = idx + FIRST_DATA_ROW;
        if row.red.trim().is_empty() {
            return Err(AdjudicationError::import_rejected(fila, "red es obligatoria"));
        }
        if row.ipress.trim().is_empty() {
            return Err(AdjudicationError::import_rejected(
                fila,
                "IPRESS es obligatoria",
            ));
        }
        if row.grupo_ocupacional.trim().is_empty() {
            return Err(AdjudicationError::import_rejected(
                fila,
                "grupo ocupacional es obligatorio",
            ));
        }
        if row.total <= 0 {
            return Err(AdjudicationError::import_rejected(
                fila,
                "el total de plazas debe ser un número positivo",
            ));
        }
    }

    Ok(())
}
