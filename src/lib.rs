//! # wordfall - falling text physics
//!
//! Words that break out of their layout, drop under gravity, pile up,
//! bounce and can be dragged around with the pointer.
//!
//! The crate is a synchronization engine between a block of measured word
//! tokens and a 2D rigid-body simulation: it turns each word's on-screen
//! rectangle into a physics body, steps the world at a fixed timestep, and
//! mirrors every body's position and rotation back onto its word each frame.
//! The physics itself is delegated to an engine behind a small trait; the
//! bundled binding runs on `rapier2d`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use wordfall::prelude::*;
//!
//! let mut falling = FallingText::new(
//!     Config::new("Gravity always wins in the end")
//!         .with_highlight_words(["Gravity"])
//!         .with_trigger(Trigger::Scroll)
//!         .with_gravity(0.8),
//! );
//!
//! // In your egui update loop:
//! egui::CentralPanel::default().show(ctx, |ui| {
//!     falling.show(ui);
//! });
//! ```
//!
//! The widget needs the `egui` feature. Everything below it is host
//! agnostic and works headless.
//!
//! ## Core Concepts
//!
//! ### Tokens
//!
//! [`tokenize`] splits the source text on whitespace into ordered
//! [`Token`]s and flags the ones matching the highlight list
//! (case-insensitively). One token becomes one physics body.
//!
//! ### Triggers
//!
//! A widget starts falling at most once per mount, decided by its
//! [`Trigger`]: immediately (`Auto`), when scrolled at least 10% into view
//! (`Scroll`), on the first click (`Click`) or on the first hover
//! (`Hover`). The [`ActivationController`] state machine owns that
//! decision.
//!
//! ### Sessions
//!
//! A [`Session`] is one live simulation: four static boundary boxes hugging
//! the container, one dynamic box per word anchored at its measured
//! rectangle, a pointer drag constraint, and a fixed-timestep frame loop
//! that writes transforms back through the [`Surface`] trait. Teardown is
//! idempotent and a torn-down session ignores late frames.
//!
//! ### The engine seam
//!
//! Sessions drive the [`PhysicsEngine`] trait, never a physics library
//! directly. [`RapierEngine`] is the bundled binding; tests use a recording
//! stub. Hosts that render somewhere other than egui implement [`Surface`]
//! (measure words, apply per-frame transforms) and reuse everything else.
//!
//! ## Diagnostics
//!
//! The crate logs through the `log` facade at `debug` level for session
//! lifecycle events and stays silent unless the host installs a logger.

mod activation;
pub mod clock;
mod config;
pub mod engine;
mod error;
pub mod geometry;
mod jitter;
mod session;
mod surface;
mod token;

#[cfg(feature = "egui")]
pub mod front;

pub use activation::{ActivationController, ActivationState, VISIBILITY_THRESHOLD};
pub use config::{Color, Config, Trigger};
pub use engine::rapier::RapierEngine;
pub use engine::{BodyId, ConstraintId, Material, PhysicsEngine, PointerState};
pub use error::{EngineError, SessionError};
pub use geometry::{Rect, Transform2};
pub use glam::Vec2;
pub use jitter::Jitter;
pub use session::Session;
pub use surface::Surface;
pub use token::{tokenize, Token};

#[cfg(feature = "egui")]
pub use front::FallingText;

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use wordfall::prelude::*;
/// ```
///
/// This imports the host configuration ([`Config`], [`Trigger`],
/// [`Color`]), the session machinery ([`Session`], [`Surface`],
/// [`PhysicsEngine`], [`RapierEngine`]), the token utilities and, with the
/// `egui` feature, the [`FallingText`] widget plus `egui` itself.
pub mod prelude {
    pub use crate::activation::{ActivationController, ActivationState};
    pub use crate::clock::{FrameClock, StepAccumulator};
    pub use crate::config::{Color, Config, Trigger};
    pub use crate::engine::rapier::RapierEngine;
    pub use crate::engine::{Material, PhysicsEngine, PointerState};
    pub use crate::error::{EngineError, SessionError};
    pub use crate::geometry::{Rect, Transform2};
    pub use crate::jitter::Jitter;
    pub use crate::session::Session;
    pub use crate::surface::Surface;
    pub use crate::token::{tokenize, Token};
    pub use crate::Vec2;
    #[cfg(feature = "egui")]
    pub use crate::front::FallingText;
    #[cfg(feature = "egui")]
    pub use egui;
}
