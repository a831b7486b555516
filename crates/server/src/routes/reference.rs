use axum::{Router, response::Json as ResponseJson, routing::get};
use services::services::reference::{ABBREVIATIONS, Abbreviation, GLOSSARY, GlossaryEntry};
use utils::response::ApiResponse;

use crate::AppState;

pub async fn get_glossary() -> ResponseJson<ApiResponse<&'static [GlossaryEntry]>> {
    ResponseJson(ApiResponse::success(GLOSSARY))
}

pub async fn get_abbreviations() -> ResponseJson<ApiResponse<&'static [Abbreviation]>> {
    ResponseJson(ApiResponse::success(ABBREVIATIONS))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reference/glossary", get(get_glossary))
        .route("/reference/abbreviations", get(get_abbreviations))
}
