use actix_web::{HttpResponse, Result, web};

use crate::database::models::{CreateTeamInput, TeamQuery};
use crate::handlers::shared::ApiResponse;
use crate::services::TeamService;

/// Create a team together with its members
pub async fn add_team(
    team_service: web::Data<TeamService>,
    input: web::Json<CreateTeamInput>,
) -> Result<HttpResponse> {
    let team = team_service.create_team(input.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(team)))
}

pub async fn get_team(
    team_service: web::Data<TeamService>,
    query: web::Query<TeamQuery>,
) -> Result<HttpResponse> {
    let team = team_service.get_team(&query.team_name).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(team)))
}
