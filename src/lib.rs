//! Interactive explorer for the mean age of suicide mortality by location,
//! sex and year (IHME GBD 2021).

pub mod app;
pub mod auth;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
