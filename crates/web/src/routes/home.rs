//! Return form page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use return_desk_core::ReturnReason;

use crate::config::ReturnFormConfig;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::CurrentUser;
use crate::services::return_form::FieldErrors;
use crate::services::{FormOutcome, ReturnFormInput};
use crate::state::AppState;

/// Flash-style message shown above the form.
#[derive(Debug, Clone)]
pub struct Notice {
    pub success: bool,
    pub text: &'static str,
}

/// Return form page template.
#[derive(Template, WebTemplate)]
#[template(path = "returns/form.html")]
pub struct ReturnFormTemplate {
    pub user: Option<CurrentUser>,
    pub form: ReturnFormConfig,
    pub reasons: &'static [ReturnReason],
    pub input: ReturnFormInput,
    pub errors: FieldErrors,
    pub notice: Option<Notice>,
}

impl ReturnFormTemplate {
    fn new(state: &AppState, user: Option<CurrentUser>, input: ReturnFormInput) -> Self {
        Self {
            user,
            form: state.form().config().clone(),
            reasons: &ReturnReason::ALL,
            input,
            errors: FieldErrors::default(),
            notice: None,
        }
    }

    fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self
    }

    fn with_notice(mut self, success: bool, text: &'static str) -> Self {
        self.notice = Some(Notice { success, text });
        self
    }
}

/// Display the return form.
#[instrument(skip(state, user))]
pub async fn show(State(state): State<AppState>, OptionalUser(user): OptionalUser) -> impl IntoResponse {
    ReturnFormTemplate::new(&state, user, ReturnFormInput::default())
}

/// Handle a return form post.
///
/// Quick reasons prefill the form for any visitor. An anonymous submission
/// is sent to the hosted sign-in page and nothing is submitted. Every other
/// outcome re-renders the form.
#[instrument(skip(state, user, input))]
pub async fn submit(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Form(input): Form<ReturnFormInput>,
) -> Response {
    let outcome = state.form().submit(user.as_ref(), input).await;

    match outcome {
        FormOutcome::SignInRequired => {
            let target = state.identity().sign_in_url(&state.absolute_url("/"));
            Redirect::to(target.as_str()).into_response()
        }
        FormOutcome::Prefilled { input } => {
            ReturnFormTemplate::new(&state, user, input).into_response()
        }
        FormOutcome::Invalid { errors, input } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ReturnFormTemplate::new(&state, user, input).with_errors(errors),
        )
            .into_response(),
        FormOutcome::Submitted { notice } => {
            ReturnFormTemplate::new(&state, user, ReturnFormInput::default())
                .with_notice(true, notice)
                .into_response()
        }
        FormOutcome::Failed { notice, input } => ReturnFormTemplate::new(&state, user, input)
            .with_notice(false, notice)
            .into_response(),
    }
}
