//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick = one frame, explicit Euler
//! - Seeded RNG only (shot spread, wind, hazard placement)
//! - No rendering or platform dependencies

pub mod collision;
pub mod course;
pub mod kinematics;
pub mod shot;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Contact, ResolveResult, resolve};
pub use course::{Course, CourseSource, authored_holes, generate_course};
pub use kinematics::{ForceModel, integrate, settle};
pub use shot::{ShotInput, launch_velocity};
pub use snapshot::{HoleSummary, Snapshot};
pub use state::{Ball, GameEvent, GamePhase, Hazard, HazardKind, HoleLayout, Sink};
pub use tick::Session;
