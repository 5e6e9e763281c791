//! Handlers for the content pages.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use log::warn;

use crate::{
    calendar::CalendarQuery,
    contact::{ContactForm, FormStatus},
    error::SiteError,
    render,
    state::AppState,
};

/// Home page around an already rendered calendar widget.
pub fn home_page(state: &AppState, widget: &str) -> String {
    render::home(state.content.as_ref(), widget)
}

fn missing_page(state: &AppState) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(render::not_found(state.content.site())),
    )
        .into_response()
}

/// GET /
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Html<String>, SiteError> {
    let month = query.month(&state)?;

    let widget = state
        .view_calendar(month, |widget| {
            query.apply(widget)?;
            Ok::<_, SiteError>(render::calendar_widget(widget, None))
        })
        .await?;

    Ok(Html(home_page(&state, &widget)))
}

/// GET /blog
pub async fn blog(State(state): State<AppState>) -> Html<String> {
    let posts = state.content.posts().iter().collect::<Vec<_>>();
    Html(render::post_list(state.content.site(), "Blog", &posts))
}

/// GET /about
pub async fn about(State(state): State<AppState>) -> Html<String> {
    Html(render::about(state.content.site()))
}

/// GET /contact
pub async fn contact(State(state): State<AppState>) -> Html<String> {
    Html(render::contact(
        state.content.site(),
        &ContactForm::default(),
        FormStatus::Idle,
        None,
    ))
}

/// POST /contact
///
/// Relays the message once. On failure the form comes back filled in.
pub async fn send_contact(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Response {
    let site = state.content.site();

    let missing = form.missing_fields();
    if !missing.is_empty() {
        let notice = format!("Please fill in: {}", missing.join(", "));
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(render::contact(site, &form, FormStatus::Idle, Some(&notice))),
        )
            .into_response();
    }

    match state.relay.submit(&form).await {
        Ok(()) => Html(render::contact(
            site,
            &ContactForm::default(),
            FormStatus::Submitted,
            None,
        ))
        .into_response(),
        Err(err) => {
            warn!("Contact message from {} not delivered: {err}", form.email);
            (
                err.status(),
                Html(render::contact(site, &form, FormStatus::Error, None)),
            )
                .into_response()
        }
    }
}

/// GET /posts/:id
pub async fn post(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.content.post(&id) {
        Some(post) => Html(render::post(state.content.site(), post)).into_response(),
        None => missing_page(&state),
    }
}

/// GET /category/:slug
pub async fn category(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let Some(category) = state.content.category(&slug) else {
        return missing_page(&state);
    };

    let posts = state.content.posts_in(category);
    Html(render::post_list(state.content.site(), category, &posts)).into_response()
}

pub async fn not_found(State(state): State<AppState>) -> Response {
    missing_page(&state)
}
