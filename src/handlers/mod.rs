use actix_web::{HttpResponse, Responder, get};

pub mod pull_requests;
pub mod shared;
pub mod team;
pub mod users;

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}
