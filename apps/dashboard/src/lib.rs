//! Clinic dashboard presentation layer: doctor cards, list filtering, the
//! add-doctor form and the doctor's appointment rows, driven against the
//! clinic REST backend.

pub mod config;
pub mod controller;
pub mod ui;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
