//! Scripted backend and capture helpers shared by the controller tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use client_core::{AppointmentService, DoctorService, PatientService, SessionContext};
use crossbeam_channel::Receiver;
use shared::{
    domain::{
        AppointmentDoctor, AppointmentId, AppointmentPatient, AppointmentRecord, Doctor, DoctorId,
        FilterCriteria, NewDoctor, PatientId, PatientProfile, ViewerRole,
    },
    error::ApiError,
    protocol::DeleteDoctorResponse,
};
use tokio::sync::oneshot;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{layer::Context, Layer};

use crate::controller::events::{FixedAnswer, UiEvent, UiSink};

pub(crate) fn doctor(id: i64, name: &str, specialty: &str, times: &[&str]) -> Doctor {
    Doctor {
        id: DoctorId(id),
        name: name.to_string(),
        email: format!("{}@clinic.test", name.to_ascii_lowercase().replace(' ', ".")),
        phone: "5550100".to_string(),
        specialty: specialty.to_string(),
        available_times: times.iter().map(|t| t.to_string()).collect(),
    }
}

/// Doctors A, B and C; only B practises Cardiology.
pub(crate) fn catalog() -> Vec<Doctor> {
    vec![
        doctor(1, "Ada Lee", "Dermatology", &["09:00-10:00"]),
        doctor(2, "Bo Chan", "Cardiology", &["10:00-11:00", "14:00-15:00"]),
        doctor(3, "Cy Roe", "Pediatrics", &["15:00-16:00"]),
    ]
}

pub(crate) fn patient() -> PatientProfile {
    PatientProfile {
        id: PatientId(42),
        name: "Pat Doe".to_string(),
        email: "pat@clinic.test".to_string(),
        phone: "5550199".to_string(),
        address: None,
    }
}

pub(crate) fn appointment(id: i64, patient_name: &str) -> AppointmentRecord {
    AppointmentRecord {
        id: AppointmentId(id),
        patient: AppointmentPatient {
            id: PatientId(id + 100),
            name: patient_name.to_string(),
            phone: "555".to_string(),
            email: "p@x.test".to_string(),
        },
        doctor: AppointmentDoctor {
            id: DoctorId(2),
            name: "Bo Chan".to_string(),
        },
        appointment_time: None,
        status: 0,
    }
}

pub(crate) fn session(role: ViewerRole, token: Option<&str>) -> SessionContext {
    SessionContext::new(token.map(str::to_string), Some(role))
}

struct ScriptedFilter {
    gate: Option<oneshot::Receiver<()>>,
    reply: Result<Vec<Doctor>, String>,
}

type AppointmentCall = (NaiveDate, Option<String>, String);

/// In-memory stand-in for the clinic backend. Unscripted filter calls are
/// answered from the catalog.
pub(crate) struct FakeBackend {
    pub doctors: Mutex<Result<Vec<Doctor>, String>>,
    scripted_filters: Mutex<VecDeque<ScriptedFilter>>,
    pub filter_calls: Mutex<Vec<FilterCriteria>>,
    pub get_calls: AtomicUsize,
    pub save_reply: Mutex<Result<bool, String>>,
    pub save_calls: Mutex<Vec<(NewDoctor, String)>>,
    pub delete_reply: Mutex<Result<DeleteDoctorResponse, String>>,
    pub delete_calls: Mutex<Vec<(DoctorId, String)>>,
    pub patient_reply: Mutex<Result<PatientProfile, ApiError>>,
    pub patient_calls: AtomicUsize,
    pub appointments_reply: Mutex<Result<Vec<AppointmentRecord>, String>>,
    pub appointment_calls: Mutex<Vec<AppointmentCall>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            doctors: Mutex::new(Ok(catalog())),
            scripted_filters: Mutex::new(VecDeque::new()),
            filter_calls: Mutex::new(Vec::new()),
            get_calls: AtomicUsize::new(0),
            save_reply: Mutex::new(Ok(true)),
            save_calls: Mutex::new(Vec::new()),
            delete_reply: Mutex::new(Ok(DeleteDoctorResponse {
                success: true,
                message: None,
            })),
            delete_calls: Mutex::new(Vec::new()),
            patient_reply: Mutex::new(Ok(patient())),
            patient_calls: AtomicUsize::new(0),
            appointments_reply: Mutex::new(Ok(vec![
                appointment(10, "Ann"),
                appointment(11, "Ben"),
            ])),
            appointment_calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn script_filter(&self, reply: Result<Vec<Doctor>, String>) {
        self.scripted_filters
            .lock()
            .unwrap()
            .push_back(ScriptedFilter { gate: None, reply });
    }

    /// Queues a filter reply that is held back until the returned sender fires.
    pub(crate) fn script_gated_filter(
        &self,
        reply: Result<Vec<Doctor>, String>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.scripted_filters.lock().unwrap().push_back(ScriptedFilter {
            gate: Some(rx),
            reply,
        });
        tx
    }

    fn catalog_matches(&self, criteria: &FilterCriteria) -> Vec<Doctor> {
        catalog()
            .into_iter()
            .filter(|d| {
                criteria
                    .name
                    .as_ref()
                    .map_or(true, |n| d.name.to_lowercase().contains(&n.to_lowercase()))
            })
            .filter(|d| criteria.specialty.as_ref().map_or(true, |s| &d.specialty == s))
            .filter(|d| {
                criteria.time.as_ref().map_or(true, |t| {
                    d.available_times
                        .iter()
                        .any(|slot| slot.contains(t.as_str()))
                })
            })
            .collect()
    }
}

#[async_trait]
impl DoctorService for FakeBackend {
    async fn get_doctors(&self) -> Result<Vec<Doctor>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.doctors.lock().unwrap().clone().map_err(|e| anyhow!(e))
    }

    async fn filter_doctors(&self, criteria: &FilterCriteria) -> Result<Vec<Doctor>> {
        self.filter_calls.lock().unwrap().push(criteria.clone());
        let scripted = self.scripted_filters.lock().unwrap().pop_front();
        match scripted {
            Some(ScriptedFilter { gate, reply }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                reply.map_err(|e| anyhow!(e))
            }
            None => Ok(self.catalog_matches(criteria)),
        }
    }

    async fn save_doctor(&self, doctor: &NewDoctor, token: &str) -> Result<bool> {
        self.save_calls
            .lock()
            .unwrap()
            .push((doctor.clone(), token.to_string()));
        self.save_reply.lock().unwrap().clone().map_err(|e| anyhow!(e))
    }

    async fn delete_doctor(&self, id: DoctorId, token: &str) -> Result<DeleteDoctorResponse> {
        self.delete_calls.lock().unwrap().push((id, token.to_string()));
        self.delete_reply.lock().unwrap().clone().map_err(|e| anyhow!(e))
    }
}

#[async_trait]
impl PatientService for FakeBackend {
    async fn get_patient_data(&self, _token: &str) -> Result<PatientProfile> {
        self.patient_calls.fetch_add(1, Ordering::SeqCst);
        self.patient_reply.lock().unwrap().clone().map_err(anyhow::Error::from)
    }
}

#[async_trait]
impl AppointmentService for FakeBackend {
    async fn get_all_appointments(
        &self,
        date: NaiveDate,
        patient_name: Option<&str>,
        token: &str,
    ) -> Result<Vec<AppointmentRecord>> {
        self.appointment_calls.lock().unwrap().push((
            date,
            patient_name.map(str::to_string),
            token.to_string(),
        ));
        self.appointments_reply
            .lock()
            .unwrap()
            .clone()
            .map_err(|e| anyhow!(e))
    }
}

pub(crate) fn ui_sink(confirm: bool) -> (UiSink, Receiver<UiEvent>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (UiSink::new(tx, Arc::new(FixedAnswer(confirm))), rx)
}

pub(crate) fn drain(rx: &Receiver<UiEvent>) -> Vec<UiEvent> {
    rx.try_iter().collect()
}

pub(crate) fn alerts(events: &[UiEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|event| match event {
            UiEvent::Alert(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Counts ERROR-level events emitted while installed as the default subscriber.
#[derive(Clone, Default)]
pub(crate) struct ErrorCounter(Arc<AtomicUsize>);

impl ErrorCounter {
    pub(crate) fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    pub(crate) fn install(&self) -> tracing::subscriber::DefaultGuard {
        use tracing_subscriber::layer::SubscriberExt;
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}
