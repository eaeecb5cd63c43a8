//! Doctor list: full loads and filtered subsets rendered into one container.

use std::sync::{Arc, Mutex, PoisonError};

use client_core::{DoctorService, SessionContext};
use shared::domain::{Doctor, FilterCriteria};
use tracing::{debug, error};

use crate::controller::events::{UiError, UiErrorContext, UiSink};
use crate::controller::generation::Generation;
use crate::ui::{render_card, Container, DoctorCard, Mounted};

pub const NO_MATCHES: &str = "No doctors found with the given filters.";
const FILTER_FAILED: &str = "An error occurred while filtering doctors.";
const LOAD_FAILED: &str = "An error occurred while loading doctors.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    Rendered(usize),
    /// Nothing matched; a placeholder was mounted.
    Empty,
    /// A newer request was issued before this one resolved; nothing rendered.
    Stale,
    Failed(UiError),
}

pub struct ListController {
    doctors: Arc<dyn DoctorService>,
    session: SessionContext,
    cards: Container<DoctorCard>,
    ui: UiSink,
    generation: Generation,
    last_filter: Mutex<Option<FilterCriteria>>,
    alert_on_load_failure: bool,
}

impl ListController {
    pub fn new(
        doctors: Arc<dyn DoctorService>,
        session: SessionContext,
        cards: Container<DoctorCard>,
        ui: UiSink,
    ) -> Self {
        Self {
            doctors,
            session,
            cards,
            ui,
            generation: Generation::default(),
            last_filter: Mutex::new(None),
            alert_on_load_failure: false,
        }
    }

    /// Also alert the user when the unfiltered load fails, not just log it.
    pub fn with_load_failure_alert(mut self, enabled: bool) -> Self {
        self.alert_on_load_failure = enabled;
        self
    }

    pub fn cards(&self) -> &Container<DoctorCard> {
        &self.cards
    }

    fn remember_filter(&self, filter: Option<FilterCriteria>) {
        *self
            .last_filter
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = filter;
    }

    fn render(&self, doctors: &[Doctor]) -> Vec<Mounted<DoctorCard>> {
        let role = self.session.role();
        doctors
            .iter()
            .map(|doctor| Mounted::Item(render_card(doctor, role)))
            .collect()
    }

    pub async fn load_all(&self) -> ListOutcome {
        self.remember_filter(None);
        let issued = self.generation.issue();

        match self.doctors.get_doctors().await {
            Ok(doctors) => {
                let count = doctors.len();
                let cards = self.render(&doctors);
                if !self
                    .cards
                    .replace_if(|| self.generation.is_current(issued), cards)
                {
                    debug!(issued, "discarding superseded doctor list");
                    return ListOutcome::Stale;
                }
                ListOutcome::Rendered(count)
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "error fetching doctors");
                if !self.generation.is_current(issued) {
                    debug!(issued, "ignoring failure of superseded doctor list");
                    return ListOutcome::Stale;
                }
                if self.alert_on_load_failure {
                    self.ui.alert(LOAD_FAILED);
                }
                ListOutcome::Failed(UiError::service(UiErrorContext::LoadDoctors, &err))
            }
        }
    }

    /// Filters by raw form inputs; blank values constrain nothing.
    pub async fn apply_filter(
        &self,
        name: Option<&str>,
        time: Option<&str>,
        specialty: Option<&str>,
    ) -> ListOutcome {
        self.apply_criteria(FilterCriteria::from_inputs(name, time, specialty))
            .await
    }

    pub async fn apply_criteria(&self, criteria: FilterCriteria) -> ListOutcome {
        self.remember_filter(Some(criteria.clone()));
        let issued = self.generation.issue();

        match self.doctors.filter_doctors(&criteria).await {
            Ok(doctors) if doctors.is_empty() => {
                let placeholder = vec![Mounted::Placeholder(NO_MATCHES.to_string())];
                if !self
                    .cards
                    .replace_if(|| self.generation.is_current(issued), placeholder)
                {
                    debug!(issued, "discarding superseded empty filter result");
                    return ListOutcome::Stale;
                }
                ListOutcome::Empty
            }
            Ok(doctors) => {
                let count = doctors.len();
                let cards = self.render(&doctors);
                if !self
                    .cards
                    .replace_if(|| self.generation.is_current(issued), cards)
                {
                    debug!(issued, "discarding superseded filter result");
                    return ListOutcome::Stale;
                }
                ListOutcome::Rendered(count)
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), ?criteria, "error filtering doctors");
                if !self
                    .cards
                    .replace_if(|| self.generation.is_current(issued), Vec::new())
                {
                    debug!(issued, "ignoring failure of superseded filter");
                    return ListOutcome::Stale;
                }
                self.ui.alert(FILTER_FAILED);
                ListOutcome::Failed(UiError::service(UiErrorContext::FilterDoctors, &err))
            }
        }
    }

    /// Re-runs whichever query last populated the list.
    pub async fn refresh(&self) -> ListOutcome {
        let last = self
            .last_filter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match last {
            Some(criteria) => self.apply_criteria(criteria).await,
            None => self.load_all().await,
        }
    }
}

#[cfg(test)]
#[path = "../tests/list_tests.rs"]
mod tests;
