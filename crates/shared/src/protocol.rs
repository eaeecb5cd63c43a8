use serde::{Deserialize, Serialize};

use crate::domain::{AppointmentRecord, Doctor, PatientProfile};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorListResponse {
    #[serde(default)]
    pub doctors: Vec<Doctor>,
}

/// The list endpoint has shipped both as `{"doctors": [...]}` and as a bare
/// array; accept either.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DoctorListBody {
    Wrapped(DoctorListResponse),
    Bare(Vec<Doctor>),
}

impl DoctorListBody {
    pub fn into_doctors(self) -> Vec<Doctor> {
        match self {
            Self::Wrapped(body) => body.doctors,
            Self::Bare(doctors) => doctors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteDoctorResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PatientProfileBody {
    Wrapped { patient: PatientProfile },
    Bare(PatientProfile),
}

impl PatientProfileBody {
    pub fn into_profile(self) -> PatientProfile {
        match self {
            Self::Wrapped { patient } => patient,
            Self::Bare(patient) => patient,
        }
    }
}

/// Appointment listing. The backend answers token failures with a 200 and an
/// `error` key, so callers must check it before trusting `appointments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentsResponse {
    #[serde(default)]
    pub appointments: Vec<AppointmentRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doctor_list_accepts_wrapped_and_bare_bodies() {
        let doctor = r#"{"id":1,"name":"A","email":"a@x","specialty":"ENT","availableTimes":[]}"#;
        let wrapped: DoctorListBody =
            serde_json::from_str(&format!(r#"{{"doctors":[{doctor}]}}"#)).expect("wrapped");
        let bare: DoctorListBody = serde_json::from_str(&format!("[{doctor}]")).expect("bare");
        assert_eq!(wrapped.into_doctors().len(), 1);
        assert_eq!(bare.into_doctors().len(), 1);
    }

    #[test]
    fn patient_profile_accepts_wrapped_body() {
        let body: PatientProfileBody =
            serde_json::from_str(r#"{"patient":{"id":3,"name":"Ann","email":"ann@x"}}"#)
                .expect("wrapped");
        assert_eq!(body.into_profile().name, "Ann");
    }

    #[test]
    fn appointments_response_surfaces_error_key() {
        let body: AppointmentsResponse =
            serde_json::from_str(r#"{"error":"Invalid Token"}"#).expect("json");
        assert!(body.appointments.is_empty());
        assert_eq!(body.error.as_deref(), Some("Invalid Token"));
    }
}
