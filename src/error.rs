//! Error types for wordfall.
//!
//! This module provides error types for physics world construction and for
//! starting a simulation session from measured layout.

use std::fmt;

/// Errors that can occur inside a physics engine binding.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A body or boundary was requested with non-positive or non-finite size.
    InvalidGeometry { width: f32, height: f32 },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidGeometry { width, height } => write!(
                f,
                "Invalid body geometry {}x{}. Both dimensions must be finite and positive.",
                width, height
            ),
        }
    }
}

impl std::error::Error for EngineError {}

/// Errors that can occur when starting a simulation session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The container measured to a zero or non-finite size, so boundaries
    /// cannot be placed. Nothing was allocated.
    DegenerateLayout { width: f32, height: f32 },
    /// The physics engine rejected a body or boundary.
    Engine(EngineError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::DegenerateLayout { width, height } => write!(
                f,
                "Container measured {}x{}. It must have a finite positive size before a session can start.",
                width, height
            ),
            SessionError::Engine(e) => write!(f, "Physics engine error: {}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Engine(e) => Some(e),
            SessionError::DegenerateLayout { .. } => None,
        }
    }
}

impl From<EngineError> for SessionError {
    fn from(e: EngineError) -> Self {
        SessionError::Engine(e)
    }
}
