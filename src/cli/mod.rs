//! Terminal front end over the list store and conversion controller

pub mod convert;
pub mod list;
pub mod setup;
pub mod ui;
