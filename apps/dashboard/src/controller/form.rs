//! Add-doctor modal form.

use std::sync::Arc;

use client_core::{DoctorService, SessionContext};
use shared::domain::NewDoctor;
use tracing::{error, info, warn};

use crate::controller::events::{UiError, UiErrorContext, UiEvent, UiSink};
use crate::controller::list::{ListController, ListOutcome};

const TOKEN_MISSING: &str = "Authentication token not found. Please log in again.";
const SAVE_SUCCEEDED: &str = "Doctor added successfully!";
const SAVE_REFUSED: &str = "Failed to add doctor. Please try again.";
const SAVE_FAILED: &str = "An error occurred while adding the doctor.";

/// One availability checkbox as presented in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilitySlot {
    pub label: String,
    pub checked: bool,
}

impl AvailabilitySlot {
    pub fn new(label: impl Into<String>, checked: bool) -> Self {
        Self {
            label: label.into(),
            checked,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub specialty: String,
    pub availability: Vec<AvailabilitySlot>,
}

impl DoctorForm {
    /// Checked slot labels in form order.
    pub fn checked_times(&self) -> Vec<String> {
        self.availability
            .iter()
            .filter(|slot| slot.checked)
            .map(|slot| slot.label.clone())
            .collect()
    }

    pub fn to_new_doctor(&self) -> NewDoctor {
        NewDoctor {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            password: self.password.trim().to_string(),
            specialty: self.specialty.trim().to_string(),
            available_times: self.checked_times(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Saved; the modal was closed and the list re-synchronised.
    Saved,
    /// Backend answered but did not save; the modal stays open.
    Refused,
    Failed(UiError),
}

pub struct FormController {
    doctors: Arc<dyn DoctorService>,
    session: SessionContext,
    ui: UiSink,
    list: Option<Arc<ListController>>,
}

impl FormController {
    pub fn new(doctors: Arc<dyn DoctorService>, session: SessionContext, ui: UiSink) -> Self {
        Self {
            doctors,
            session,
            ui,
            list: None,
        }
    }

    /// Refresh this list after a save instead of asking for a page reload.
    pub fn with_list(mut self, list: Arc<ListController>) -> Self {
        self.list = Some(list);
        self
    }

    pub async fn submit_new_doctor(&self, form: &DoctorForm) -> SubmitOutcome {
        let Some(token) = self.session.token() else {
            self.ui.alert(TOKEN_MISSING);
            return SubmitOutcome::Failed(UiError::auth_required(
                UiErrorContext::SaveDoctor,
                TOKEN_MISSING,
            ));
        };

        let doctor = form.to_new_doctor();
        match self.doctors.save_doctor(&doctor, token).await {
            Ok(true) => {
                info!(name = %doctor.name, "doctor added");
                self.ui.alert(SAVE_SUCCEEDED);
                self.ui.emit(UiEvent::CloseModal);
                self.resync().await;
                SubmitOutcome::Saved
            }
            Ok(false) => {
                warn!(name = %doctor.name, "doctor was not saved");
                self.ui.alert(SAVE_REFUSED);
                SubmitOutcome::Refused
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "error saving doctor");
                self.ui.alert(SAVE_FAILED);
                SubmitOutcome::Failed(UiError::service(UiErrorContext::SaveDoctor, &err))
            }
        }
    }

    async fn resync(&self) {
        let Some(list) = &self.list else {
            self.ui.emit(UiEvent::Reload);
            return;
        };
        if let ListOutcome::Failed(err) = list.refresh().await {
            warn!(error = %err, "list refresh after save failed");
        }
    }
}

#[cfg(test)]
#[path = "../tests/form_tests.rs"]
mod tests;
