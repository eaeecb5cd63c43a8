//! Activation of the buttons on a doctor card.

use std::sync::Arc;

use client_core::{DoctorService, PatientService, SessionContext};
use tracing::{error, info, warn};

use crate::controller::events::{
    BookingRequest, UiError, UiErrorContext, UiEvent, UiSink, GENERIC_FAILURE,
};
use crate::ui::{CardAction, Container, DoctorCard};

pub const LOGIN_PAGE: &str = "/";

const ADMIN_AUTH_REQUIRED: &str = "Admin authentication required";
const PATIENT_LOGIN_REQUIRED: &str = "Patient needs to login first.";
const BOOKING_LOGIN_REQUIRED: &str = "Please log in to book an appointment";
const DELETE_SUCCEEDED: &str = "Doctor deleted successfully";
const BOOKING_FAILED: &str = "Unable to load your patient profile. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The user declined the confirmation.
    Cancelled,
    Deleted,
    /// Backend answered but did not delete; the card stays mounted.
    DeleteRefused,
    BookingOpened,
    /// Card does not offer this action for the current role.
    NotOffered,
    Failed(UiError),
}

pub struct CardActionHandler {
    doctors: Arc<dyn DoctorService>,
    patients: Arc<dyn PatientService>,
    session: SessionContext,
    cards: Container<DoctorCard>,
    ui: UiSink,
}

impl CardActionHandler {
    pub fn new(
        doctors: Arc<dyn DoctorService>,
        patients: Arc<dyn PatientService>,
        session: SessionContext,
        cards: Container<DoctorCard>,
        ui: UiSink,
    ) -> Self {
        Self {
            doctors,
            patients,
            session,
            cards,
            ui,
        }
    }

    pub async fn activate(&self, card: &DoctorCard, action: CardAction) -> ActionOutcome {
        if !card.offers(action) {
            warn!(
                doctor_id = %card.doctor_id(),
                action = action.label(),
                "card does not offer this action"
            );
            return ActionOutcome::NotOffered;
        }
        match action {
            CardAction::Delete => self.delete(card).await,
            CardAction::LoginRequired => {
                self.ui.alert(PATIENT_LOGIN_REQUIRED);
                ActionOutcome::Failed(UiError::login_required(PATIENT_LOGIN_REQUIRED))
            }
            CardAction::Book => self.book(card).await,
        }
    }

    async fn delete(&self, card: &DoctorCard) -> ActionOutcome {
        let question = format!("Are you sure you want to delete Dr. {}?", card.name());
        if !self.ui.confirm(&question) {
            return ActionOutcome::Cancelled;
        }

        let Some(token) = self.session.token() else {
            self.ui.alert(ADMIN_AUTH_REQUIRED);
            return ActionOutcome::Failed(UiError::auth_required(
                UiErrorContext::DeleteDoctor,
                ADMIN_AUTH_REQUIRED,
            ));
        };

        let doctor_id = card.doctor_id();
        match self.doctors.delete_doctor(doctor_id, token).await {
            Ok(response) if response.success => {
                let removed = self.cards.remove_where(|mounted| mounted.doctor_id() == doctor_id);
                info!(%doctor_id, removed, "doctor deleted");
                self.ui.alert(DELETE_SUCCEEDED);
                ActionOutcome::Deleted
            }
            Ok(response) => {
                let reason = response.message.as_deref().unwrap_or(GENERIC_FAILURE);
                warn!(%doctor_id, reason, "backend refused doctor deletion");
                self.ui.alert(format!("Failed to delete doctor: {reason}"));
                ActionOutcome::DeleteRefused
            }
            Err(err) => {
                error!(%doctor_id, error = %format!("{err:#}"), "delete doctor request failed");
                self.ui
                    .alert(format!("Failed to delete doctor: {GENERIC_FAILURE}"));
                ActionOutcome::Failed(UiError::service(UiErrorContext::DeleteDoctor, &err))
            }
        }
    }

    async fn book(&self, card: &DoctorCard) -> ActionOutcome {
        let Some(token) = self.session.token() else {
            self.ui.alert(BOOKING_LOGIN_REQUIRED);
            self.ui.emit(UiEvent::Navigate(LOGIN_PAGE.to_string()));
            return ActionOutcome::Failed(UiError::auth_required(
                UiErrorContext::BookAppointment,
                BOOKING_LOGIN_REQUIRED,
            ));
        };

        match self.patients.get_patient_data(token).await {
            Ok(patient) => {
                self.ui.emit(UiEvent::BookingOverlay(BookingRequest {
                    doctor: card.doctor().clone(),
                    patient,
                }));
                ActionOutcome::BookingOpened
            }
            Err(err) => {
                error!(
                    doctor_id = %card.doctor_id(),
                    error = %format!("{err:#}"),
                    "failed to fetch patient profile for booking"
                );
                self.ui.alert(BOOKING_FAILED);
                ActionOutcome::Failed(UiError::service(UiErrorContext::BookAppointment, &err))
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/card_actions_tests.rs"]
mod tests;
