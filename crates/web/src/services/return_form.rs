//! Server-side return form flow.
//!
//! One submission moves through `Idle -> Validating -> Submitting` and ends
//! in `Succeeded` or `Failed`. Validation failures drop back to `Idle`
//! without contacting anything.

use serde::Deserialize;
use tracing::instrument;

use return_desk_core::ReturnReason;

use crate::config::{ReturnFormConfig, SubmissionTarget};
use crate::models::CurrentUser;

use super::returns::{CreateReturnRequest, ReturnService, SUBMITTED_MESSAGE};
use super::webhook::{TriggerClient, TriggerError, TriggerPayload};

pub const FEEDBACK_REQUIRED: &str = "Please enter feedback.";
pub const ORDER_ID_REQUIRED: &str = "Please enter your order ID.";
pub const REASON_REQUIRED: &str = "Please choose a reason.";

pub const FAILED_NOTICE: &str = "Failed to submit feedback.";
pub const NETWORK_NOTICE: &str = "Network error. Try again.";
pub const WEBHOOK_SUCCESS_NOTICE: &str = "Feedback submitted and email logged!";

/// Form flow states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// Fields as posted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReturnFormInput {
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub reason: String,
    /// Set when a quick reason button was pressed instead of submit.
    #[serde(default)]
    pub quick_reason: Option<String>,
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub feedback: Option<&'static str>,
    pub order_id: Option<&'static str>,
    pub reason: Option<&'static str>,
}

impl FieldErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.feedback.is_none() && self.order_id.is_none() && self.reason.is_none()
    }
}

/// Result of handling one form post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Anonymous visitor; nothing was submitted.
    SignInRequired,
    /// A quick reason was chosen; the form is shown again pre-filled.
    Prefilled { input: ReturnFormInput },
    /// Required fields are missing; nothing was submitted.
    Invalid {
        errors: FieldErrors,
        input: ReturnFormInput,
    },
    /// Accepted by the submission target; the form is cleared.
    Submitted { notice: &'static str },
    /// The submission target failed; the input is kept for another try.
    Failed {
        notice: &'static str,
        input: ReturnFormInput,
    },
}

impl FormOutcome {
    /// State the form is left in.
    #[must_use]
    pub const fn state(&self) -> FormState {
        match self {
            Self::SignInRequired | Self::Prefilled { .. } | Self::Invalid { .. } => FormState::Idle,
            Self::Submitted { .. } => FormState::Succeeded,
            Self::Failed { .. } => FormState::Failed,
        }
    }
}

/// Validated form contents.
struct ValidForm {
    feedback: String,
    order_id: Option<String>,
    reason: ReturnReason,
}

/// Drives return form submissions to the configured target.
#[derive(Clone)]
pub struct ReturnFormFlow {
    config: ReturnFormConfig,
    returns: ReturnService,
    trigger: TriggerClient,
}

impl ReturnFormFlow {
    #[must_use]
    pub const fn new(config: ReturnFormConfig, returns: ReturnService, trigger: TriggerClient) -> Self {
        Self {
            config,
            returns,
            trigger,
        }
    }

    /// Form layout.
    #[must_use]
    pub const fn config(&self) -> &ReturnFormConfig {
        &self.config
    }

    /// Handle one form post.
    #[instrument(skip(self, user, input), fields(signed_in = user.is_some()))]
    pub async fn submit(&self, user: Option<&CurrentUser>, mut input: ReturnFormInput) -> FormOutcome {
        if let Some(quick) = input.quick_reason.take() {
            let quick = quick.trim();
            if !quick.is_empty() {
                input.feedback = quick.to_string();
                return FormOutcome::Prefilled { input };
            }
        }

        let Some(user) = user else {
            tracing::debug!("Anonymous form post, sign-in required");
            return FormOutcome::SignInRequired;
        };

        transition(FormState::Idle, FormState::Validating);
        let valid = match self.validate(&input) {
            Ok(valid) => valid,
            Err(errors) => {
                transition(FormState::Validating, FormState::Idle);
                return FormOutcome::Invalid { errors, input };
            }
        };

        transition(FormState::Validating, FormState::Submitting);
        let outcome = match &self.config.target {
            SubmissionTarget::Local => self.submit_local(user, valid, input).await,
            SubmissionTarget::Webhook(url) => {
                let payload = TriggerPayload {
                    feedback: valid.feedback,
                    user_email: user.email.clone(),
                    order_id: valid.order_id,
                    reason: self
                        .config
                        .show_category
                        .then(|| valid.reason.as_str().to_string()),
                };
                match self.trigger.send(url, &payload).await {
                    Ok(()) => FormOutcome::Submitted {
                        notice: WEBHOOK_SUCCESS_NOTICE,
                    },
                    Err(TriggerError::Network(e)) => {
                        tracing::warn!(error = %e, "Trigger unreachable");
                        FormOutcome::Failed {
                            notice: NETWORK_NOTICE,
                            input,
                        }
                    }
                    Err(e @ TriggerError::Rejected { .. }) => {
                        tracing::warn!(error = %e, "Trigger rejected submission");
                        FormOutcome::Failed {
                            notice: FAILED_NOTICE,
                            input,
                        }
                    }
                }
            }
        };

        transition(FormState::Submitting, outcome.state());
        outcome
    }

    async fn submit_local(
        &self,
        user: &CurrentUser,
        valid: ValidForm,
        input: ReturnFormInput,
    ) -> FormOutcome {
        let identity = user.snapshot();
        let request = CreateReturnRequest {
            explanation: Some(valid.feedback),
            reason: Some(valid.reason.as_str().to_string()),
            order_id: valid.order_id,
            user_email: identity.user_email,
            user_name: identity.user_name,
            user_image: identity.user_image,
            user_id: identity.user_id,
        };

        match self.returns.submit(request).await {
            Ok(_) => FormOutcome::Submitted {
                notice: SUBMITTED_MESSAGE,
            },
            Err(e) => {
                tracing::error!(error = %e, "Return form submission failed");
                FormOutcome::Failed {
                    notice: FAILED_NOTICE,
                    input,
                }
            }
        }
    }

    fn validate(&self, input: &ReturnFormInput) -> Result<ValidForm, FieldErrors> {
        let mut errors = FieldErrors::default();

        let feedback = input.feedback.trim();
        if feedback.is_empty() {
            errors.feedback = Some(FEEDBACK_REQUIRED);
        }

        let order_id = input.order_id.trim();
        if self.config.show_order_id && order_id.is_empty() {
            errors.order_id = Some(ORDER_ID_REQUIRED);
        }

        let reason = if self.config.show_category {
            input.reason.parse::<ReturnReason>().ok()
        } else {
            Some(ReturnReason::Other)
        };
        if reason.is_none() {
            errors.reason = Some(REASON_REQUIRED);
        }

        match reason {
            Some(reason) if errors.is_empty() => Ok(ValidForm {
                feedback: feedback.to_string(),
                order_id: (self.config.show_order_id && !order_id.is_empty())
                    .then(|| order_id.to_string()),
                reason,
            }),
            _ => Err(errors),
        }
    }
}

fn transition(from: FormState, to: FormState) {
    tracing::trace!(?from, ?to, "Return form state change");
}
