//! Terminal front end for the converter.

pub mod convert;
pub mod currencies;
pub mod history;
pub mod setup;
pub mod ui;
