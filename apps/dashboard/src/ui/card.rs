//! Doctor card rendering.

use shared::domain::{Doctor, DoctorId, ViewerRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardAction {
    /// Admin only: confirm, then remove the doctor.
    Delete,
    /// Anonymous patient: booking is refused until they sign in.
    LoginRequired,
    /// Signed-in patient: fetch the profile and open the booking overlay.
    Book,
}

impl CardAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Delete => "Delete",
            Self::LoginRequired | Self::Book => "Book Now",
        }
    }
}

/// Actions a card offers to the given viewer. Roles without an entry here get
/// an empty action area.
pub fn card_actions(role: Option<&ViewerRole>) -> Vec<CardAction> {
    match role {
        Some(ViewerRole::Admin) => vec![CardAction::Delete],
        Some(ViewerRole::AnonymousPatient) => vec![CardAction::LoginRequired],
        Some(ViewerRole::AuthenticatedPatient) => vec![CardAction::Book],
        Some(ViewerRole::Doctor) | Some(ViewerRole::Unrecognized(_)) | None => Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCard {
    doctor: Doctor,
    availability: String,
    actions: Vec<CardAction>,
}

impl DoctorCard {
    pub fn doctor(&self) -> &Doctor {
        &self.doctor
    }

    pub fn doctor_id(&self) -> DoctorId {
        self.doctor.id
    }

    pub fn name(&self) -> &str {
        &self.doctor.name
    }

    pub fn specialty(&self) -> &str {
        &self.doctor.specialty
    }

    pub fn email(&self) -> &str {
        &self.doctor.email
    }

    /// Available times joined with `", "` in the order the backend sent them.
    pub fn availability(&self) -> &str {
        &self.availability
    }

    pub fn actions(&self) -> &[CardAction] {
        &self.actions
    }

    pub fn offers(&self, action: CardAction) -> bool {
        self.actions.contains(&action)
    }

    /// Info block in display order: name, specialty, email, availability.
    pub fn info_lines(&self) -> [&str; 4] {
        [
            self.name(),
            self.specialty(),
            self.email(),
            self.availability(),
        ]
    }
}

pub fn render_card(doctor: &Doctor, role: Option<&ViewerRole>) -> DoctorCard {
    DoctorCard {
        doctor: doctor.clone(),
        availability: doctor.available_times.join(", "),
        actions: card_actions(role),
    }
}
