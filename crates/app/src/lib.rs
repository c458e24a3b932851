//! Client core for the employee attendance application.
//!
//! A host shell embeds this crate, implements the device traits
//! ([`capture::CameraDevice`], [`capture::PositionProvider`]) against real
//! hardware, and renders the view-state containers in [`view`]. Everything
//! here is frontend-agnostic: no toolkit, no chrome, no toasts.

pub mod capture;
pub mod config;
pub mod error;
pub mod flows;
pub mod logging;
pub mod services;
pub mod view;
