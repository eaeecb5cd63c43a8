//! Controller layer: UI events, list/form/appointment controllers, card
//! actions and command orchestration.

pub mod appointments;
pub mod card_actions;
pub mod events;
pub mod form;
pub mod generation;
pub mod list;
pub mod orchestration;

pub use events::{FixedAnswer, Prompt, UiError, UiErrorContext, UiErrorKind, UiEvent, UiSink};
pub use orchestration::{CommandReport, Dashboard, DashboardCommand, DashboardOptions};
