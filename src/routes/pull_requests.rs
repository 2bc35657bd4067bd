use crate::handlers::pull_requests;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/pullRequest")
            .route("/create", web::post().to(pull_requests::create_pull_request))
            .route("/merge", web::post().to(pull_requests::merge_pull_request))
            .route("/reassign", web::post().to(pull_requests::reassign_reviewer)),
    );
}
