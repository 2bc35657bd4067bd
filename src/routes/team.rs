use crate::handlers::team;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/team")
            .route("/add", web::post().to(team::add_team))
            .route("/get", web::get().to(team::get_team)),
    );
}
