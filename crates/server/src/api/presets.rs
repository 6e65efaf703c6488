//! Preset catalog endpoints.

use axum::{extract::Path, Json};
use std::collections::BTreeMap;

use pedal_core::{Preset, PresetCatalog};

use super::error::ApiError;

/// GET /presets
pub async fn list_presets() -> Json<BTreeMap<&'static str, &'static Preset>> {
    Json(PresetCatalog::as_map())
}

/// GET /presets/{name}
pub async fn get_preset(Path(name): Path<String>) -> Result<Json<&'static Preset>, ApiError> {
    PresetCatalog::get(&name)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown preset: {}", name)))
}
