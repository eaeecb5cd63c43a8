use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response};
use shared::{
    domain::{AppointmentRecord, Doctor, DoctorId, FilterCriteria, NewDoctor, PatientProfile},
    error::{ApiError, ApiMessage},
    protocol::{AppointmentsResponse, DeleteDoctorResponse, DoctorListBody, PatientProfileBody},
};
use tracing::{debug, warn};
use url::Url;

pub mod session;

pub use session::{
    FileSessionStore, MemorySessionStore, SessionContext, SessionError, SessionStore, ROLE_KEY,
    TOKEN_KEY,
};

/// Path segment the backend reads as "no constraint".
pub const WILDCARD_SEGMENT: &str = "null";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[async_trait]
pub trait DoctorService: Send + Sync {
    async fn get_doctors(&self) -> Result<Vec<Doctor>>;
    async fn filter_doctors(&self, criteria: &FilterCriteria) -> Result<Vec<Doctor>>;
    /// `Ok(false)` means the backend answered but refused the doctor.
    async fn save_doctor(&self, doctor: &NewDoctor, token: &str) -> Result<bool>;
    async fn delete_doctor(&self, id: DoctorId, token: &str) -> Result<DeleteDoctorResponse>;
}

#[async_trait]
pub trait PatientService: Send + Sync {
    async fn get_patient_data(&self, token: &str) -> Result<PatientProfile>;
}

#[async_trait]
pub trait AppointmentService: Send + Sync {
    async fn get_all_appointments(
        &self,
        date: NaiveDate,
        patient_name: Option<&str>,
        token: &str,
    ) -> Result<Vec<AppointmentRecord>>;
}

/// REST client for the clinic backend.
#[derive(Clone)]
pub struct HttpClinicClient {
    http: Client,
    base_url: Url,
}

impl HttpClinicClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("invalid api base url '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("api base url '{base_url}' cannot carry a path"));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self { http, base_url })
    }

    /// Appends percent-encoded path segments to the base url.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("api base url '{}' cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn segment_or_wildcard(value: Option<&str>) -> &str {
    value.unwrap_or(WILDCARD_SEGMENT)
}

async fn reject_with_body(response: Response) -> anyhow::Error {
    let status = response.status().as_u16();
    let body = response.json::<ApiMessage>().await.unwrap_or_default();
    let message = body.text().unwrap_or("request rejected").to_string();
    ApiError::new(status, message).into()
}

#[async_trait]
impl DoctorService for HttpClinicClient {
    async fn get_doctors(&self) -> Result<Vec<Doctor>> {
        let body: DoctorListBody = self
            .http
            .get(self.endpoint(&["doctor"])?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("failed to decode doctor list")?;
        Ok(body.into_doctors())
    }

    async fn filter_doctors(&self, criteria: &FilterCriteria) -> Result<Vec<Doctor>> {
        let url = self.endpoint(&[
            "doctor",
            "filter",
            segment_or_wildcard(criteria.name.as_deref()),
            segment_or_wildcard(criteria.time.as_deref()),
            segment_or_wildcard(criteria.specialty.as_deref()),
        ])?;
        debug!(%url, "filtering doctors");
        let body: DoctorListBody = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("failed to decode filtered doctor list")?;
        Ok(body.into_doctors())
    }

    async fn save_doctor(&self, doctor: &NewDoctor, token: &str) -> Result<bool> {
        let response = self
            .http
            .post(self.endpoint(&["doctor", token])?)
            .json(doctor)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        let body = response.json::<ApiMessage>().await.unwrap_or_default();
        warn!(
            status = status.as_u16(),
            reason = body.text().unwrap_or_default(),
            "backend refused new doctor"
        );
        Ok(false)
    }

    async fn delete_doctor(&self, id: DoctorId, token: &str) -> Result<DeleteDoctorResponse> {
        let id = id.to_string();
        let response = self
            .http
            .delete(self.endpoint(&["doctor", id.as_str(), token])?)
            .send()
            .await?;
        let success = response.status().is_success();
        let body = response.json::<ApiMessage>().await.unwrap_or_default();
        Ok(DeleteDoctorResponse {
            success,
            message: body.text().map(str::to_string),
        })
    }
}

#[async_trait]
impl PatientService for HttpClinicClient {
    async fn get_patient_data(&self, token: &str) -> Result<PatientProfile> {
        let response = self
            .http
            .get(self.endpoint(&["patient", token])?)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(reject_with_body(response).await);
        }
        let body: PatientProfileBody = response
            .json()
            .await
            .context("failed to decode patient profile")?;
        Ok(body.into_profile())
    }
}

#[async_trait]
impl AppointmentService for HttpClinicClient {
    async fn get_all_appointments(
        &self,
        date: NaiveDate,
        patient_name: Option<&str>,
        token: &str,
    ) -> Result<Vec<AppointmentRecord>> {
        let date = date.format("%Y-%m-%d").to_string();
        let response = self
            .http
            .get(self.endpoint(&[
                "appointments",
                date.as_str(),
                segment_or_wildcard(patient_name),
                token,
            ])?)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(reject_with_body(response).await);
        }
        let body: AppointmentsResponse = response
            .json()
            .await
            .context("failed to decode appointments")?;
        if let Some(error) = body.error {
            return Err(ApiError::new(401, error).into());
        }
        Ok(body.appointments)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
