//! View objects: doctor cards, patient rows and the container they mount into.

pub mod card;
pub mod container;
pub mod patient_row;

pub use card::{card_actions, render_card, CardAction, DoctorCard};
pub use container::{Container, Mounted};
pub use patient_row::{render_patient_row, PatientRow};
