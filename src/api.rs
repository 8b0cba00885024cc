//! HTTP API endpoints for league data.
//!
//! Read-only views used by the player app: the weekly schedule, game
//! details, news, events, the leaderboard and the signed-in profile.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{self, PokerGame, Weekday};
use crate::state::AppState;
use crate::ws;

/// All routes served by the application, without static files
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/api/games", get(list_games))
        .route("/api/games/{id}", get(game_detail))
        .route("/api/news", get(list_news))
        .route("/api/events", get(list_events))
        .route("/api/leaderboard", get(leaderboard))
        .route("/api/profile", get(profile))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct GamesQuery {
    pub day: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamesResponse {
    pub day: Weekday,
    pub today: Weekday,
    pub games: Vec<&'static PokerGame>,
}

/// Games on one weekday.
///
/// GET /api/games?day=Thu
///
/// Without `day`, lists today's games.
pub async fn list_games(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GamesQuery>,
) -> Response {
    let today = state.today();
    let day = match query.day.as_deref() {
        None => today,
        Some(raw) => match raw.parse::<Weekday>() {
            Ok(day) => day,
            Err(e) => return (StatusCode::BAD_REQUEST, e).into_response(),
        },
    };

    Json(GamesResponse {
        day,
        today,
        games: catalog::games_on(day),
    })
    .into_response()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetailResponse {
    #[serde(flatten)]
    pub game: &'static PokerGame,
    pub description: &'static str,
    /// Sign-in is only offered when this is true
    pub is_today: bool,
    pub directions_url: String,
}

/// One game with its venue details.
///
/// GET /api/games/{id}
pub async fn game_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(game) = catalog::find_game(&id) else {
        return (StatusCode::NOT_FOUND, format!("Game {} not found", id)).into_response();
    };

    let ios = headers
        .get(header::USER_AGENT)
        .and_then(|ua| ua.to_str().ok())
        .is_some_and(catalog::is_ios_user_agent);

    Json(GameDetailResponse {
        game,
        description: catalog::venue_description(game.venue_name),
        is_today: game.is_on(state.today()),
        directions_url: catalog::directions_url(game, ios),
    })
    .into_response()
}

/// GET /api/news
pub async fn list_news() -> Json<&'static [catalog::NewsItem]> {
    Json(catalog::NEWS)
}

/// GET /api/events
pub async fn list_events() -> Json<&'static [catalog::LeagueEvent]> {
    Json(catalog::EVENTS)
}

/// GET /api/leaderboard
pub async fn leaderboard() -> Json<&'static [catalog::LeaderboardPlayer]> {
    Json(catalog::LEADERBOARD)
}

/// GET /api/profile
pub async fn profile() -> Json<catalog::UserProfile> {
    Json(catalog::USER_PROFILE)
}
