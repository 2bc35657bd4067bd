use crate::handlers::users;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/setIsActive", web::post().to(users::set_is_active))
            .route("/deactivate", web::post().to(users::deactivate_users))
            .route("/getReview", web::get().to(users::get_reviews))
            .route("/countReview", web::get().to(users::count_reviews)),
    );
}
