//! Doctor dashboard: the day's appointments as patient rows.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Local, NaiveDate};
use client_core::{AppointmentService, SessionContext};
use shared::domain::normalize_input;
use tracing::{debug, error, warn};

use crate::controller::events::{UiError, UiErrorContext, UiEvent, UiSink};
use crate::controller::generation::Generation;
use crate::controller::list::ListOutcome;
use crate::ui::{render_patient_row, Container, Mounted, PatientRow};

pub const NO_APPOINTMENTS: &str = "No Appointments found for today.";
pub const APPOINTMENTS_FAILED: &str = "Error loading appointments. Try again later.";
const TOKEN_MISSING: &str = "no session token for appointment listing";

#[derive(Debug, Clone, PartialEq, Eq)]
struct AppointmentQuery {
    date: NaiveDate,
    patient_name: Option<String>,
}

pub struct AppointmentsController {
    appointments: Arc<dyn AppointmentService>,
    session: SessionContext,
    rows: Container<PatientRow>,
    ui: UiSink,
    generation: Generation,
    query: Mutex<AppointmentQuery>,
}

impl AppointmentsController {
    pub fn new(
        appointments: Arc<dyn AppointmentService>,
        session: SessionContext,
        rows: Container<PatientRow>,
        ui: UiSink,
        date: NaiveDate,
    ) -> Self {
        Self {
            appointments,
            session,
            rows,
            ui,
            generation: Generation::default(),
            query: Mutex::new(AppointmentQuery {
                date,
                patient_name: None,
            }),
        }
    }

    pub fn rows(&self) -> &Container<PatientRow> {
        &self.rows
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.query().date
    }

    pub fn patient_name(&self) -> Option<String> {
        self.query().patient_name
    }

    fn query(&self) -> AppointmentQuery {
        self.query
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update_query(&self, update: impl FnOnce(&mut AppointmentQuery)) {
        update(&mut self.query.lock().unwrap_or_else(PoisonError::into_inner));
    }

    /// Search box input; blank input lists every patient.
    pub async fn set_patient_name(&self, input: &str) -> ListOutcome {
        let name = normalize_input(Some(input));
        self.update_query(|query| query.patient_name = name);
        self.load().await
    }

    pub async fn select_date(&self, date: NaiveDate) -> ListOutcome {
        self.update_query(|query| query.date = date);
        self.load().await
    }

    /// Date picker and search box together, with a single reload.
    pub async fn select(&self, date: NaiveDate, patient_input: &str) -> ListOutcome {
        let name = normalize_input(Some(patient_input));
        self.update_query(|query| {
            query.date = date;
            query.patient_name = name;
        });
        self.load().await
    }

    pub async fn select_today(&self) -> ListOutcome {
        self.select_date(Local::now().date_naive()).await
    }

    pub async fn load(&self) -> ListOutcome {
        let query = self.query();
        let issued = self.generation.issue();

        let Some(token) = self.session.token() else {
            warn!("{TOKEN_MISSING}");
            self.show_placeholder(issued, APPOINTMENTS_FAILED);
            return ListOutcome::Failed(UiError::auth_required(
                UiErrorContext::LoadAppointments,
                TOKEN_MISSING,
            ));
        };

        let result = self
            .appointments
            .get_all_appointments(query.date, query.patient_name.as_deref(), token)
            .await;

        match result {
            Ok(records) if records.is_empty() => {
                if !self.show_placeholder(issued, NO_APPOINTMENTS) {
                    return ListOutcome::Stale;
                }
                ListOutcome::Empty
            }
            Ok(records) => {
                let count = records.len();
                let rows = records
                    .iter()
                    .map(|record| Mounted::Item(render_patient_row(record)))
                    .collect();
                if !self
                    .rows
                    .replace_if(|| self.generation.is_current(issued), rows)
                {
                    debug!(issued, "discarding superseded appointment list");
                    return ListOutcome::Stale;
                }
                ListOutcome::Rendered(count)
            }
            Err(err) => {
                error!(
                    error = %format!("{err:#}"),
                    date = %query.date,
                    "error loading appointments"
                );
                if !self.show_placeholder(issued, APPOINTMENTS_FAILED) {
                    return ListOutcome::Stale;
                }
                ListOutcome::Failed(UiError::service(UiErrorContext::LoadAppointments, &err))
            }
        }
    }

    fn show_placeholder(&self, issued: u64, text: &str) -> bool {
        let written = self.rows.replace_if(
            || self.generation.is_current(issued),
            vec![Mounted::Placeholder(text.to_string())],
        );
        if !written {
            debug!(issued, "discarding superseded appointment placeholder");
        }
        written
    }

    /// "Add Prescription" on a row.
    pub fn open_prescription(&self, row: &PatientRow) {
        self.ui.emit(UiEvent::Navigate(row.prescription_link()));
    }
}

#[cfg(test)]
#[path = "../tests/appointments_tests.rs"]
mod tests;
