//! # accel_designer
//!
//! Jerk-limited ("S-curve") velocity planning for a single axis under a
//! travel distance constraint.
//!
//! This library provides the following modules:
//! - `accel_curve` for one monotonic velocity change under bounded jerk and acceleration.
//! - `accel_designer` for stitching acceleration, cruise and deceleration into a move of exact length.
//! - `anomaly` for the non-fatal constraint anomalies reported while designing.
//! - `profile` for the common evaluator trait and fixed-step tabulation.
//! - `trajectory_executor` for playing queued moves back at a control period.
//! - `config` for loading limits and sampling settings from TOML.
//!
//! ```
//! use accel_designer::{AccelDesigner, MotionLimits};
//!
//! let limits = MotionLimits::new(240_000.0, 3_600.0);
//! let ad = AccelDesigner::new(limits, 720.0, 720.0, 0.0, 90.0);
//! assert!(ad.anomalies().is_empty());
//! assert!((ad.x(ad.t_end()) - 90.0).abs() < 0.1);
//! ```

pub mod accel_curve;
pub mod accel_designer;
pub mod anomaly;
mod buffer_fifo;
pub mod config;
pub mod motion_state;
pub mod profile;
pub mod trajectory_executor;

// Re-export main structs for convenience:
pub use accel_curve::*;
pub use accel_designer::*;
pub use anomaly::*;
pub use config::*;
pub use motion_state::*;
pub use profile::*;
pub use trajectory_executor::*;
