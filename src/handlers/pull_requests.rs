use actix_web::{HttpResponse, Result, web};

use crate::database::models::{
    CreatePullRequestInput, MergePullRequestInput, PullRequestEnvelope, ReassignResult,
    ReassignReviewerInput,
};
use crate::handlers::shared::ApiResponse;
use crate::services::{PullRequestService, ReassignmentService};

/// Open a pull request and assign reviewers
pub async fn create_pull_request(
    pull_request_service: web::Data<PullRequestService>,
    input: web::Json<CreatePullRequestInput>,
) -> Result<HttpResponse> {
    let pr = pull_request_service.create(input.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(PullRequestEnvelope { pr })))
}

/// Merge a pull request (idempotent)
pub async fn merge_pull_request(
    pull_request_service: web::Data<PullRequestService>,
    input: web::Json<MergePullRequestInput>,
) -> Result<HttpResponse> {
    let pr = pull_request_service
        .merge(&input.into_inner().pull_request_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(PullRequestEnvelope { pr })))
}

/// Replace one reviewer on an open pull request
pub async fn reassign_reviewer(
    reassignment_service: web::Data<ReassignmentService>,
    input: web::Json<ReassignReviewerInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();
    let (pr, replaced_by) = reassignment_service
        .reassign(&input.pull_request_id, &input.old_user_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(ReassignResult { pr, replaced_by })))
}
