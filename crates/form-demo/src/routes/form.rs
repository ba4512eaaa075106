//! Form rendering and submission.

use axum::{Form, extract::State, response::Html};
use serde::Deserialize;

use crate::page;
use crate::state::AppState;

pub const REJECTED_MESSAGE: &str = "❌ Anti-robot check failed, please try again.";
pub const ACCEPTED_MESSAGE: &str = "✅ Your message has been submitted successfully.";

#[derive(Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    subject: String,
    #[serde(default)]
    message: String,
    /// Filled in by the widget
    #[serde(rename = "frc-captcha-response", default)]
    captcha_response: String,
}

/// The user is requesting the form
pub async fn show_form(State(state): State<AppState>) -> Html<String> {
    Html(page::render("", &state.sitekey, state.widget_endpoint.as_deref()))
}

/// The user is submitting the form
pub async fn submit_form(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Html<String> {
    let result = state.captcha.verify(&form.captcha_response).await;

    if !result.was_able_to_verify() {
        // Not verified, but possibly still accepted below: an outage should
        // not stop real users from submitting.
        let error = result
            .request_error()
            .map(|e| e.to_string())
            .unwrap_or_default();

        if result.is_client_error() {
            // Site is unprotected until the configuration is fixed.
            tracing::error!(error = %error, "CAPTCHA CONFIG ERROR, check your API key");
        } else {
            tracing::warn!(error = %error, "Failed to verify captcha response");
        }
    }

    let message = if result.should_accept() {
        // A real application would store the message here.
        tracing::info!(
            subject = %form.subject,
            length = form.message.len(),
            verified = result.was_able_to_verify(),
            "Form submission accepted"
        );
        ACCEPTED_MESSAGE
    } else {
        tracing::debug!(status = ?result.status(), "Form submission rejected");
        REJECTED_MESSAGE
    };

    Html(page::render(
        message,
        &state.sitekey,
        state.widget_endpoint.as_deref(),
    ))
}
