//! # Umwelt Core
//!
//! Core types shared by every Umwelt crate.
//!
//! An *umwelt* is the perceptual world of a creature: what it can sample,
//! how long it integrates, and where it attends. This crate defines the
//! vocabulary used to describe one:
//!
//! - **SpeciesProfile** - sampling rate, integration window, attention bias, color
//! - **HistorySample** - one discrete observation of the world
//! - **Rgba** - a structured color with an alpha channel
//! - **InsightState** - the request state machine for the commentary call
//!
//! ## Quick Start
//!
//! ```rust
//! use umwelt_core::prelude::*;
//!
//! let human = SpeciesProfile::preset("human").unwrap();
//! assert_eq!(human.integration_window, 30);
//!
//! let sped_up = human.with_overrides(&ProfileOverrides {
//!     sampling_rate_hz: Some(60.0),
//!     ..Default::default()
//! });
//! assert!(sped_up.is_ok());
//! ```

pub mod types;
pub mod color;
pub mod species;
pub mod prng;
pub mod insight;
pub mod error;
pub mod prelude;
