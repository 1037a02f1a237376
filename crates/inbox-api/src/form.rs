use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::error;

use inbox_types::api::ContactRequest;

use crate::AppState;
use crate::contacts::store_submission;
use crate::error::ApiError;

/// POST target of the contact page's plain HTML form. Answers 303 to the
/// thank-you page so a browser refresh does not resubmit.
pub async fn submit_form(
    State(state): State<AppState>,
    form: Result<Form<ContactRequest>, FormRejection>,
) -> Response {
    let result = match form {
        Ok(Form(req)) => store_submission(&state, &req).await,
        Err(_) => Err(ApiError::MalformedBody),
    };

    match result {
        Ok(id) => Redirect::to(&format!("/good-bye.html?id={id}")).into_response(),
        Err(ApiError::Persistence(e)) => {
            error!("Database error: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Html("<h1>Internal error</h1>")).into_response()
        }
        Err(err) => (
            err.status(),
            Html(format!(
                "<html><body><h1>Error</h1><p>{}</p><a href=\"/contact.html\">Back</a></body></html>",
                escape_html(&err.to_string())
            )),
        )
            .into_response(),
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
