//! # pondwatch-types
//!
//! Core types for pond water-quality monitoring. This crate defines the
//! reading schema shared by the backend client and the monitoring pipeline,
//! together with the fixed parameter table and the pure threshold classifier.
//!
//! ## Design Goals
//!
//! - **One place for thresholds**: every status shown anywhere is computed by
//!   [`classify`], so cards, tables and notifications never disagree
//! - **Absent is not zero**: a missing measurement classifies as
//!   [`ParameterStatus::Unknown`]
//! - **Optional serialization**: enable the `serde` feature for the backend's
//!   JSON shape
//!
//! ## Features
//!
//! - `serde`: JSON (de)serialization of [`Reading`] and [`Locale`]
//!
//! ## Example
//!
//! ```rust
//! use pondwatch_types::{classify, Parameter, ParameterStatus, Range};
//!
//! let oxygen = Parameter::DissolvedOxygen.definition();
//! assert_eq!(classify(Some(3.5), &oxygen.range), ParameterStatus::Low);
//!
//! // Ammonia only has an upper bound
//! let ammonia = Range::at_most(0.5);
//! assert_eq!(classify(Some(0.6), &ammonia), ParameterStatus::High);
//! assert_eq!(classify(Some(0.0), &ammonia), ParameterStatus::Normal);
//! ```

mod format;
mod locale;
mod parameter;
mod reading;
mod threshold;

pub use format::*;
pub use locale::*;
pub use parameter::*;
pub use reading::*;
pub use threshold::*;
