//! Terminal client for the attendance backend: periods, parent events, groups,
//! sessions, users and QR check-in, with a month calendar of sessions.

pub mod api;
pub mod app;
pub mod calendar;
pub mod components;
pub mod config;
pub mod error;
pub mod event;
pub mod keys;
pub mod logging;
pub mod session;
pub mod theme;
pub mod tui;
pub mod ui;
