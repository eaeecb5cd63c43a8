//! Command orchestration from host actions to the dashboard controllers.

use std::sync::Arc;

use chrono::NaiveDate;
use client_core::{AppointmentService, DoctorService, PatientService, SessionContext};
use shared::domain::DoctorId;

use crate::controller::appointments::AppointmentsController;
use crate::controller::card_actions::{ActionOutcome, CardActionHandler};
use crate::controller::events::{UiError, UiSink};
use crate::controller::form::{DoctorForm, FormController, SubmitOutcome};
use crate::controller::list::{ListController, ListOutcome};
use crate::ui::{CardAction, Container};

#[derive(Debug, Clone)]
pub enum DashboardCommand {
    LoadDoctors,
    FilterDoctors {
        name: Option<String>,
        time: Option<String>,
        specialty: Option<String>,
    },
    RefreshDoctors,
    ActivateCard {
        doctor_id: DoctorId,
        action: CardAction,
    },
    SubmitDoctor(DoctorForm),
    LoadAppointments {
        date: Option<NaiveDate>,
        patient_name: Option<String>,
    },
    /// Jump the appointment table back to the local date, keeping the search.
    TodayAppointments,
}

impl DashboardCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadDoctors => "load_doctors",
            Self::FilterDoctors { .. } => "filter_doctors",
            Self::RefreshDoctors => "refresh_doctors",
            Self::ActivateCard { .. } => "activate_card",
            Self::SubmitDoctor(_) => "submit_doctor",
            Self::LoadAppointments { .. } => "load_appointments",
            Self::TodayAppointments => "today_appointments",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReport {
    List(ListOutcome),
    Action(ActionOutcome),
    Submit(SubmitOutcome),
    /// The targeted card is not in the rendered set.
    CardNotMounted(DoctorId),
}

impl CommandReport {
    pub fn error(&self) -> Option<&UiError> {
        match self {
            Self::List(ListOutcome::Failed(err))
            | Self::Action(ActionOutcome::Failed(err))
            | Self::Submit(SubmitOutcome::Failed(err)) => Some(err),
            _ => None,
        }
    }
}

/// Every controller of one dashboard page, sharing one session snapshot and
/// one UI sink.
pub struct Dashboard {
    list: Arc<ListController>,
    form: FormController,
    actions: CardActionHandler,
    appointments: AppointmentsController,
}

#[derive(Debug, Clone, Copy)]
pub struct DashboardOptions {
    pub alert_on_load_failure: bool,
    pub appointments_date: NaiveDate,
}

impl Dashboard {
    pub fn new<S>(
        backend: Arc<S>,
        session: SessionContext,
        ui: UiSink,
        options: DashboardOptions,
    ) -> Self
    where
        S: DoctorService + PatientService + AppointmentService + 'static,
    {
        let cards = Container::new();
        let list = Arc::new(
            ListController::new(backend.clone(), session.clone(), cards.clone(), ui.clone())
                .with_load_failure_alert(options.alert_on_load_failure),
        );
        let form = FormController::new(backend.clone(), session.clone(), ui.clone())
            .with_list(Arc::clone(&list));
        let actions = CardActionHandler::new(
            backend.clone(),
            backend.clone(),
            session.clone(),
            cards,
            ui.clone(),
        );
        let appointments = AppointmentsController::new(
            backend,
            session,
            Container::new(),
            ui,
            options.appointments_date,
        );
        Self {
            list,
            form,
            actions,
            appointments,
        }
    }

    pub fn list(&self) -> &ListController {
        &self.list
    }

    pub fn appointments(&self) -> &AppointmentsController {
        &self.appointments
    }

    pub async fn dispatch(&self, cmd: DashboardCommand) -> CommandReport {
        tracing::debug!(command = cmd.name(), "dispatching dashboard command");
        match cmd {
            DashboardCommand::LoadDoctors => CommandReport::List(self.list.load_all().await),
            DashboardCommand::FilterDoctors {
                name,
                time,
                specialty,
            } => CommandReport::List(
                self.list
                    .apply_filter(name.as_deref(), time.as_deref(), specialty.as_deref())
                    .await,
            ),
            DashboardCommand::RefreshDoctors => CommandReport::List(self.list.refresh().await),
            DashboardCommand::ActivateCard { doctor_id, action } => {
                let card = self
                    .list
                    .cards()
                    .items()
                    .into_iter()
                    .find(|card| card.doctor_id() == doctor_id);
                match card {
                    Some(card) => CommandReport::Action(self.actions.activate(&card, action).await),
                    None => CommandReport::CardNotMounted(doctor_id),
                }
            }
            DashboardCommand::SubmitDoctor(form) => {
                CommandReport::Submit(self.form.submit_new_doctor(&form).await)
            }
            DashboardCommand::LoadAppointments { date, patient_name } => {
                let date = date.unwrap_or_else(|| self.appointments.selected_date());
                CommandReport::List(
                    self.appointments
                        .select(date, patient_name.as_deref().unwrap_or_default())
                        .await,
                )
            }
            DashboardCommand::TodayAppointments => {
                CommandReport::List(self.appointments.select_today().await)
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/orchestration_tests.rs"]
mod tests;
