//! SeeFlood Web – Leptos client for community flood reporting.
//!
//! Reports are stored by an external HTTP service (`GET /api/reports`,
//! `POST /api/report`); this crate covers the browser side: device location,
//! image capture/selection, report submission, and rendering every known
//! report as a risk-coloured marker on an interactive map.

pub mod api;
pub mod app;
pub mod components;
pub mod geo;
pub mod model;
