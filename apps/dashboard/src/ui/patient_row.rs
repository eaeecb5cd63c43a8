use shared::domain::{AppointmentId, AppointmentRecord, DoctorId, PatientId};
use url::form_urlencoded;

const PRESCRIPTION_PAGE: &str = "/pages/addPrescription.html";

/// One row of the doctor's appointment table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRow {
    pub patient_id: PatientId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub appointment_id: AppointmentId,
    pub doctor_id: DoctorId,
}

impl PatientRow {
    /// Page the "Add Prescription" action opens for this row.
    pub fn prescription_link(&self) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("appointmentId", &self.appointment_id.to_string())
            .append_pair("patientName", &self.name)
            .finish();
        format!("{PRESCRIPTION_PAGE}?{query}")
    }
}

pub fn render_patient_row(record: &AppointmentRecord) -> PatientRow {
    PatientRow {
        patient_id: record.patient.id,
        name: record.patient.name.clone(),
        phone: record.patient.phone.clone(),
        email: record.patient.email.clone(),
        appointment_id: record.id,
        doctor_id: record.doctor.id,
    }
}
