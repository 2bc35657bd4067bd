use actix_web::web;

use crate::handlers::{self, shared};

pub mod pull_requests;
pub mod team;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(shared::json_config())
        .app_data(shared::query_config())
        .service(handlers::health)
        .configure(team::configure)
        .configure(users::configure)
        .configure(pull_requests::configure);
}
