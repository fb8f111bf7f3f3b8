use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the badminton scoreboard backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::event_stream,
        crate::routes::remote::ws_handler,
        crate::routes::score::get_match,
        crate::routes::score::score_point,
        crate::routes::score::remove_point,
        crate::routes::score::undo,
        crate::routes::score::reset,
        crate::routes::score::swap_serve,
        crate::routes::score::swap_ends,
        crate::routes::score::set_winning_points,
        crate::routes::score::configure_singles,
        crate::routes::score::configure_doubles,
        crate::routes::score::set_announcements,
        crate::routes::history::list_history,
        crate::routes::history::history_summary,
        crate::routes::history::delete_match,
        crate::routes::history::clear_history,
        crate::routes::stats::get_stats,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::remote::RemoteInboundMessage,
            crate::dto::remote::RemoteAck,
            crate::dto::sse::Handshake,
            crate::dto::sse::SystemStatus,
            crate::dto::sse::PointScoredEvent,
            crate::dto::sse::SpecialScoreEvent,
            crate::dto::sse::MatchWonEvent,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "match", description = "Live match commands and view"),
        (name = "history", description = "Finished matches"),
        (name = "stats", description = "Player and team statistics"),
        (name = "sse", description = "Server-sent events stream"),
        (name = "remote", description = "WebSocket remote control"),
    )
)]
pub struct ApiDoc;
