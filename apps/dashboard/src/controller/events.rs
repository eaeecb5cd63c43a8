//! UI events emitted to the host, user prompts, and error modeling for the
//! dashboard controllers.

use std::sync::Arc;

use crossbeam_channel::Sender;
use shared::{
    domain::{Doctor, PatientProfile},
    error::ApiError,
};
use thiserror::Error;

pub const GENERIC_FAILURE: &str = "Unknown error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub doctor: Doctor,
    pub patient: PatientProfile,
}

/// Side effects a controller asks the host to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Blocking user-facing message.
    Alert(String),
    CloseModal,
    /// Full page reload; only used when no list controller is attached.
    Reload,
    Navigate(String),
    /// Hand-off to the booking overlay.
    BookingOverlay(BookingRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorKind {
    /// A privileged action was attempted without a session token.
    AuthRequired,
    /// An anonymous patient tried to book.
    LoginRequired,
    /// Network or backend failure.
    Service,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    LoadDoctors,
    FilterDoctors,
    DeleteDoctor,
    BookAppointment,
    SaveDoctor,
    LoadAppointments,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind:?} during {context:?}: {message}")]
pub struct UiError {
    kind: UiErrorKind,
    context: UiErrorContext,
    message: String,
    token_rejected: bool,
}

impl UiError {
    pub fn auth_required(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            kind: UiErrorKind::AuthRequired,
            context,
            message: message.into(),
            token_rejected: false,
        }
    }

    pub fn login_required(message: impl Into<String>) -> Self {
        Self {
            kind: UiErrorKind::LoginRequired,
            context: UiErrorContext::BookAppointment,
            message: message.into(),
            token_rejected: false,
        }
    }

    pub fn service(context: UiErrorContext, err: &anyhow::Error) -> Self {
        let token_rejected = err
            .chain()
            .filter_map(|cause| cause.downcast_ref::<ApiError>())
            .any(|api| api.code.is_auth());
        Self {
            kind: UiErrorKind::Service,
            context,
            message: format!("{err:#}"),
            token_rejected,
        }
    }

    pub fn kind(&self) -> UiErrorKind {
        self.kind
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// No token was present, or the backend answered 401/403 to the one sent.
    pub fn requires_reauth(&self) -> bool {
        self.kind == UiErrorKind::AuthRequired || self.token_rejected
    }
}

/// Synchronous yes/no question to the user.
pub trait Prompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

/// Answers every prompt the same way.
pub struct FixedAnswer(pub bool);

impl Prompt for FixedAnswer {
    fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}

/// Controller-side handle to the host: event queue plus prompt.
#[derive(Clone)]
pub struct UiSink {
    events: Sender<UiEvent>,
    prompt: Arc<dyn Prompt>,
}

impl UiSink {
    pub fn new(events: Sender<UiEvent>, prompt: Arc<dyn Prompt>) -> Self {
        Self { events, prompt }
    }

    pub fn emit(&self, event: UiEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("ui event receiver dropped; event discarded");
        }
    }

    pub fn alert(&self, message: impl Into<String>) {
        self.emit(UiEvent::Alert(message.into()));
    }

    pub fn confirm(&self, message: &str) -> bool {
        self.prompt.confirm(message)
    }
}
