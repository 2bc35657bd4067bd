use actix_web::{HttpResponse, Result, web};
use serde_json::json;

use crate::database::models::{
    DeactivateUsersInput, SetIsActiveInput, UserQuery, UserReviewCount, UserReviews,
};
use crate::handlers::shared::ApiResponse;
use crate::middleware::AdminToken;
use crate::services::{PullRequestService, UserService};

/// Toggle a single user's active flag (admin only)
pub async fn set_is_active(
    _admin: AdminToken,
    user_service: web::Data<UserService>,
    input: web::Json<SetIsActiveInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();
    let user = user_service
        .set_is_active(&input.user_id, input.is_active)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(json!({ "user": user }))))
}

/// Deactivate users and reassign their open reviews (admin only)
pub async fn deactivate_users(
    _admin: AdminToken,
    user_service: web::Data<UserService>,
    input: web::Json<DeactivateUsersInput>,
) -> Result<HttpResponse> {
    let report = user_service.deactivate(input.into_inner().user_ids).await?;

    if report.has_failures() {
        return Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            Some(report),
            "some pull requests could not be reassigned",
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(report)))
}

/// Pull requests the user is assigned to review
pub async fn get_reviews(
    pull_request_service: web::Data<PullRequestService>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse> {
    let user_id = query.into_inner().user_id;
    let pull_requests = pull_request_service.get_reviews_for(&user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserReviews {
        user_id,
        pull_requests,
    })))
}

pub async fn count_reviews(
    pull_request_service: web::Data<PullRequestService>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse> {
    let user_id = query.into_inner().user_id;
    let reviews = pull_request_service.count_reviews_for(&user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserReviewCount { user_id, reviews })))
}
