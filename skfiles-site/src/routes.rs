use std::time::Instant;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use log::info;

use crate::{calendar, pages, state::AppState};

async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    info!(
        "{method} {path} {} {}ms",
        response.status().as_u16(),
        start.elapsed().as_millis()
    );
    response
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/blog", get(pages::blog))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact).post(pages::send_contact))
        .route("/posts/:id", get(pages::post))
        .route("/category/:slug", get(pages::category))
        .route("/calendar/events", post(calendar::add_event))
        .route("/calendar/events/:id", post(calendar::update_event))
        .route("/calendar/events/:id/delete", post(calendar::delete_event))
        .route("/calendar.ics", get(calendar::export_ics))
        .route("/api/events", get(calendar::list_events))
        .fallback(pages::not_found)
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}
