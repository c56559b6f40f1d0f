//! Business logic services.
//!
//! # Services
//!
//! - `returns` - Validation and storage of return requests
//! - `return_form` - Server-rendered return form flow
//! - `chat` - Return assistant backed by a generative model
//! - `webhook` - External automation trigger

pub mod chat;
pub mod return_form;
pub mod returns;
pub mod webhook;

pub use chat::{ChatError, ChatModel, ChatModelError, ChatService};
pub use return_form::{FormOutcome, FormState, ReturnFormFlow, ReturnFormInput};
pub use returns::{CreateReturnRequest, ReturnError, ReturnService};
pub use webhook::{TriggerClient, TriggerError};
