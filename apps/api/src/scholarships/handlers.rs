use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::scholarships::{filter, ScholarshipQuery, ScholarshipRecord};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ScholarshipListResponse {
    pub scholarships: Vec<ScholarshipRecord>,
    pub count: usize,
}

/// GET /api/scholarships?citizenship=&country=&name=
pub async fn handle_list_scholarships(
    State(state): State<AppState>,
    Query(query): Query<ScholarshipQuery>,
) -> Result<Json<ScholarshipListResponse>, AppError> {
    if query.citizenship.trim().is_empty() {
        return Err(AppError::Validation(
            "citizenship cannot be empty".to_string(),
        ));
    }

    let records = state.scholarships.load_or_empty().await;
    let scholarships: Vec<ScholarshipRecord> =
        filter(&records, &query).into_iter().cloned().collect();

    Ok(Json(ScholarshipListResponse {
        count: scholarships.len(),
        scholarships,
    }))
}
