use std::sync::Arc;

use actix_web::web;
use sqlx::PgPool;

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use services::{
    PullRequestService, RandomSelector, ReassignmentService, ReviewerSelector, SeededSelector,
    TeamService, UserService,
};

/// Services shared by every worker, all backed by the same pool.
#[derive(Clone)]
pub struct AppState {
    pub team_service: web::Data<TeamService>,
    pub user_service: web::Data<UserService>,
    pub pull_request_service: web::Data<PullRequestService>,
    pub reassignment_service: web::Data<ReassignmentService>,
}

impl AppState {
    pub fn new(pool: PgPool, selector: Arc<dyn ReviewerSelector>) -> Self {
        let reassignment_service = ReassignmentService::new(pool.clone(), selector.clone());

        Self {
            team_service: web::Data::new(TeamService::new(pool.clone())),
            user_service: web::Data::new(UserService::new(
                pool.clone(),
                reassignment_service.clone(),
            )),
            pull_request_service: web::Data::new(PullRequestService::new(pool, selector)),
            reassignment_service: web::Data::new(reassignment_service),
        }
    }

    /// Registers the services and every route on an app or scope.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.team_service.clone())
            .app_data(self.user_service.clone())
            .app_data(self.pull_request_service.clone())
            .app_data(self.reassignment_service.clone())
            .configure(routes::configure);
    }
}
