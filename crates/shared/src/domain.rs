use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(DoctorId);
id_newtype!(PatientId);
id_newtype!(AppointmentId);

/// Permission class of whoever is looking at the dashboard.
///
/// Sourced from session state and trusted as-is; the backend re-checks every
/// privileged call against the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerRole {
    Admin,
    AnonymousPatient,
    AuthenticatedPatient,
    Doctor,
    Unrecognized(String),
}

impl ViewerRole {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "admin" => Self::Admin,
            "patient" => Self::AnonymousPatient,
            "loggedPatient" => Self::AuthenticatedPatient,
            "doctor" => Self::Doctor,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::AnonymousPatient => "patient",
            Self::AuthenticatedPatient => "loggedPatient",
            Self::Doctor => "doctor",
            Self::Unrecognized(tag) => tag,
        }
    }
}

impl fmt::Display for ViewerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub specialty: String,
    #[serde(default)]
    pub available_times: Vec<String>,
}

/// Body of a create-doctor request. The password only ever travels outbound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDoctor {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub specialty: String,
    pub available_times: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub id: PatientId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentPatient {
    pub id: PatientId,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDoctor {
    pub id: DoctorId,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRecord {
    pub id: AppointmentId,
    pub patient: AppointmentPatient,
    pub doctor: AppointmentDoctor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub status: i32,
}

/// Optional name/time/specialty constraints for a doctor search.
///
/// `None` in any dimension matches every doctor for that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub name: Option<String>,
    pub time: Option<String>,
    pub specialty: Option<String>,
}

impl FilterCriteria {
    /// Builds criteria from raw form input, treating blank or whitespace-only
    /// values as "no constraint" independently per dimension.
    pub fn from_inputs(name: Option<&str>, time: Option<&str>, specialty: Option<&str>) -> Self {
        Self {
            name: normalize_input(name),
            time: normalize_input(time),
            specialty: normalize_input(specialty),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.name.is_none() && self.time.is_none() && self.specialty.is_none()
    }
}

pub fn normalize_input(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
