use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{self, auth, events, tickets, upload, users};
use crate::state::AppState;
use crate::storage::PUBLIC_PREFIX;

pub fn create_routes(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    let cors = create_cors_layer(&state.config);
    let uploads = ServeDir::new(state.uploads.dir());

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/auth", auth_routes())
        .nest("/api/events", event_routes())
        .nest("/api/tickets", ticket_routes())
        .nest("/api/users", user_routes())
        .nest("/api/upload", upload_routes())
        .nest_service(PUBLIC_PREFIX, uploads)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(cors)
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route("/byUser", get(events::list_events_by_user))
        .route(
            "/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
}

fn ticket_routes() -> Router<AppState> {
    Router::new()
        .route("/book", post(tickets::book_ticket))
        .route("/my", get(tickets::my_tickets))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile/:email",
            get(users::get_profile).put(users::update_profile),
        )
        .route("/profile/:email/picture", post(users::upload_profile_picture))
}

fn upload_routes() -> Router<AppState> {
    Router::new().route("/", post(upload::upload_image))
}
