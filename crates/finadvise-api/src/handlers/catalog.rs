//! Static listings

use axum::Json;
use finadvise_source::catalog;
use finadvise_types::{Advisor, Campaign};

pub async fn list_campaigns() -> Json<Vec<Campaign>> {
    Json(catalog::campaigns())
}

pub async fn list_advisors() -> Json<Vec<Advisor>> {
    Json(catalog::advisors())
}
