//! Chat page for the return assistant.
//!
//! The transcript lives in the visitor's session. Each post appends the
//! visitor's turn, asks the chat service for a reply, appends the reply (or
//! the fallback text) and redirects back to the page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::chat::FALLBACK_REPLY;
use crate::models::{ChatTurn, CurrentUser, Transcript, session_keys};
use crate::state::AppState;

/// Chat page template.
#[derive(Template, WebTemplate)]
#[template(path = "assistant/chat.html")]
pub struct ChatTemplate {
    pub user: Option<CurrentUser>,
    pub turns: Vec<ChatTurn>,
    pub configured: bool,
}

/// Chat message form data.
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

async fn load_transcript(session: &Session) -> Result<Transcript> {
    Ok(session
        .get::<Transcript>(session_keys::CHAT_TRANSCRIPT)
        .await?
        .unwrap_or_default())
}

async fn save_transcript(session: &Session, transcript: &Transcript) -> Result<()> {
    session
        .insert(session_keys::CHAT_TRANSCRIPT, transcript)
        .await?;
    Ok(())
}

/// Display the chat page.
#[instrument(skip(state, user, session))]
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    session: Session,
) -> Result<impl IntoResponse> {
    let transcript = load_transcript(&session).await?;

    Ok(ChatTemplate {
        user,
        turns: transcript.turns().to_vec(),
        configured: state.chat().is_configured(),
    })
}

/// Send a message from the chat page.
#[instrument(skip(state, session, form))]
pub async fn send(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ChatForm>,
) -> Result<Redirect> {
    let message = form.message.trim();
    if message.is_empty() {
        return Ok(Redirect::to("/ai"));
    }

    let mut transcript = load_transcript(&session).await?;
    transcript.push(ChatTurn::user(message));
    save_transcript(&session, &transcript).await?;

    let reply = match state.chat().reply(message).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "Chat reply failed, showing fallback");
            FALLBACK_REPLY.to_string()
        }
    };

    transcript.push(ChatTurn::assistant(reply));
    save_transcript(&session, &transcript).await?;

    Ok(Redirect::to("/ai"))
}

/// Clear the transcript back to the greeting.
#[instrument(skip(session))]
pub async fn reset(session: Session) -> Result<Redirect> {
    session
        .remove::<Transcript>(session_keys::CHAT_TRANSCRIPT)
        .await?;
    Ok(Redirect::to("/ai"))
}
