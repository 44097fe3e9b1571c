use std::sync::Arc;

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handler::*,
    middleware::{handle_panic, method_not_allowed, route_not_found},
    AppState,
};

pub fn create_router(app_state: Arc<AppState>, cors_origins: Vec<HeaderValue>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(cors_origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([ACCEPT, CONTENT_TYPE]);

    Router::new()
        .route(
            "/",
            get(health_checker_handler).fallback(method_not_allowed),
        )
        .route(
            "/users",
            get(get_users).post(create_user).fallback(method_not_allowed),
        )
        .route(
            "/users/:id",
            get(get_user)
                .put(update_user)
                .delete(delete_user)
                .fallback(method_not_allowed),
        )
        .route(
            "/todos",
            get(get_todos).post(create_todo).fallback(method_not_allowed),
        )
        // GET takes a user ID here; PUT and DELETE take a todo ID.
        .route(
            "/todos/:id",
            get(get_todos_by_user)
                .put(update_todo)
                .delete(delete_todo)
                .fallback(method_not_allowed),
        )
        .fallback(route_not_found)
        .with_state(app_state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
