use super::*;
use crate::controller::UiErrorKind;
use crate::test_support::{appointment, drain, session, ui_sink, FakeBackend};
use shared::domain::{AppointmentId, ViewerRole};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 1).expect("date")
}

fn controller(
    backend: &Arc<FakeBackend>,
    token: Option<&str>,
) -> (AppointmentsController, crossbeam_channel::Receiver<UiEvent>) {
    let (ui, rx) = ui_sink(true);
    let controller = AppointmentsController::new(
        backend.clone(),
        session(ViewerRole::Doctor, token),
        Container::new(),
        ui,
        day(),
    );
    (controller, rx)
}

#[tokio::test]
async fn load_renders_one_row_per_appointment_unfiltered() {
    let backend = FakeBackend::new();
    let (controller, _rx) = controller(&backend, Some("doc-token"));

    assert_eq!(controller.load().await, ListOutcome::Rendered(2));

    let rows = controller.rows().items();
    assert_eq!(rows[0].appointment_id, AppointmentId(10));
    assert_eq!(rows[1].name, "Ben");
    assert_eq!(
        backend.appointment_calls.lock().unwrap().as_slice(),
        &[(day(), None, "doc-token".to_string())]
    );
}

#[tokio::test]
async fn search_input_is_trimmed_and_blank_means_everyone() {
    let backend = FakeBackend::new();
    let (controller, _rx) = controller(&backend, Some("doc-token"));

    controller.set_patient_name("  Ann ").await;
    assert_eq!(controller.patient_name().as_deref(), Some("Ann"));
    controller.set_patient_name("   ").await;
    assert_eq!(controller.patient_name(), None);

    let names: Vec<Option<String>> = backend
        .appointment_calls
        .lock()
        .unwrap()
        .iter()
        .map(|(_, name, _)| name.clone())
        .collect();
    assert_eq!(names, vec![Some("Ann".to_string()), None]);
}

#[tokio::test]
async fn selecting_a_date_reloads_for_that_date() {
    let backend = FakeBackend::new();
    let (controller, _rx) = controller(&backend, Some("doc-token"));
    let next_day = day().succ_opt().expect("next day");

    controller.select_date(next_day).await;

    assert_eq!(controller.selected_date(), next_day);
    assert_eq!(backend.appointment_calls.lock().unwrap()[0].0, next_day);
}

#[tokio::test]
async fn empty_day_shows_placeholder_row() {
    let backend = FakeBackend::new();
    *backend.appointments_reply.lock().unwrap() = Ok(Vec::new());
    let (controller, _rx) = controller(&backend, Some("doc-token"));

    assert_eq!(controller.load().await, ListOutcome::Empty);
    assert_eq!(controller.rows().placeholders(), vec![NO_APPOINTMENTS.to_string()]);
}

#[tokio::test]
async fn failed_listing_replaces_rows_with_error_row() {
    let backend = FakeBackend::new();
    let (controller, rx) = controller(&backend, Some("doc-token"));
    controller.load().await;
    *backend.appointments_reply.lock().unwrap() = Err("Invalid Token".to_string());

    let outcome = controller.load().await;

    assert!(matches!(outcome, ListOutcome::Failed(ref err) if err.kind() == UiErrorKind::Service));
    assert!(controller.rows().items().is_empty());
    assert_eq!(
        controller.rows().placeholders(),
        vec![APPOINTMENTS_FAILED.to_string()]
    );
    assert!(drain(&rx).is_empty());
}

#[tokio::test]
async fn missing_token_skips_the_request() {
    let backend = FakeBackend::new();
    let (controller, _rx) = controller(&backend, None);

    let outcome = controller.load().await;

    assert!(matches!(
        outcome,
        ListOutcome::Failed(ref err) if err.kind() == UiErrorKind::AuthRequired
    ));
    assert!(backend.appointment_calls.lock().unwrap().is_empty());
    assert_eq!(
        controller.rows().placeholders(),
        vec![APPOINTMENTS_FAILED.to_string()]
    );
}

#[tokio::test]
async fn prescription_action_navigates_with_row_details() {
    let backend = FakeBackend::new();
    let (controller, rx) = controller(&backend, Some("doc-token"));
    let row = render_patient_row(&appointment(10, "Ann"));

    controller.open_prescription(&row);

    assert_eq!(
        drain(&rx),
        vec![UiEvent::Navigate(
            "/pages/addPrescription.html?appointmentId=10&patientName=Ann".to_string()
        )]
    );
}
