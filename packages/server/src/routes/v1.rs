use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/teams", team_routes())
        .nest("/voting-config", voting_config_routes())
        .nest("/profiles", profile_routes())
        .nest("/votes", vote_routes())
        .nest("/stats", stats_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
        .routes(routes!(handlers::auth::logout))
}

fn team_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::team::list_teams,
            handlers::team::create_team
        ))
        .routes(routes!(handlers::team::delete_team))
}

fn voting_config_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::voting_config::create_voting_config))
        .routes(routes!(handlers::voting_config::get_active_config))
        .routes(routes!(handlers::voting_config::close_voting_config))
}

fn profile_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::profile::get_profile))
}

fn vote_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::vote::cast_vote))
}

fn stats_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::admin::get_stats))
}
