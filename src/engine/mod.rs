//! The capability seam between the session and a rigid-body engine.
//!
//! The session never talks to a physics library directly; it drives the small
//! [`PhysicsEngine`] trait below. The bundled [`rapier`] binding implements it
//! on top of `rapier2d`, and tests implement it with a recording stub. Any
//! 2D rigid-body engine that can make boxes, apply a drag force and report
//! transforms can sit behind this trait.
//!
//! Coordinates are container-local pixels, y growing downward. A positive
//! world gravity therefore pulls toward the container floor.

use glam::Vec2;

use crate::error::EngineError;
use crate::geometry::Transform2;

pub mod rapier;

/// Opaque handle to a body inside an engine world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(u64);

impl BodyId {
    /// Wrap an engine-chosen identifier. Only engine bindings mint these.
    pub fn from_raw(raw: u64) -> Self {
        BodyId(raw)
    }

    pub fn into_raw(self) -> u64 {
        self.0
    }
}

/// Opaque handle to a pointer constraint inside an engine world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintId(u64);

impl ConstraintId {
    /// Wrap an engine-chosen identifier. Only engine bindings mint these.
    pub fn from_raw(raw: u64) -> Self {
        ConstraintId(raw)
    }

    pub fn into_raw(self) -> u64 {
        self.0
    }
}

/// Collision material for a dynamic body.
///
/// The default is tuned for word tokens: bouncy enough to be playful,
/// slippery enough to pile loosely, with a little air drag so nothing slides
/// forever.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Bounciness in `0..=1`. Contacts take the larger of the two values.
    pub restitution: f32,
    /// Surface friction. Contacts take the smaller of the two values.
    pub friction: f32,
    /// Velocity proportional drag, applied to linear and angular motion.
    pub air_friction: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            restitution: 0.8,
            friction: 0.2,
            air_friction: 0.01,
        }
    }
}

/// The pointer as seen by the drag constraint, fed once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// Pointer position in container-local pixels, `None` when the pointer
    /// is outside the container.
    pub position: Option<Vec2>,
    /// Whether the primary button is held.
    pub pressed: bool,
}

impl PointerState {
    /// A pointer that is absent this frame.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn at(position: Vec2, pressed: bool) -> Self {
        Self {
            position: Some(position),
            pressed,
        }
    }
}

/// What the session requires from a rigid-body engine.
///
/// All geometry is axis-aligned boxes identified by center and full size;
/// rotation comes later from the simulation itself. Implementations must
/// reject non-finite or non-positive sizes with
/// [`EngineError::InvalidGeometry`] instead of constructing degenerate
/// bodies.
pub trait PhysicsEngine {
    /// Build an empty world. `gravity_y` is px/s², positive downward.
    fn create_world(gravity_y: f32) -> Self
    where
        Self: Sized;

    /// Add an immovable box (container boundary).
    fn create_static_box(&mut self, center: Vec2, size: Vec2) -> Result<BodyId, EngineError>;

    /// Add a dynamic box for one word.
    fn create_dynamic_box(
        &mut self,
        center: Vec2,
        size: Vec2,
        material: Material,
    ) -> Result<BodyId, EngineError>;

    /// Overwrite a body's linear velocity.
    fn set_velocity(&mut self, body: BodyId, velocity: Vec2);

    /// Overwrite a body's angular velocity, rad/s.
    fn set_angular_velocity(&mut self, body: BodyId, omega: f32);

    /// Create the drag constraint. `stiffness` is in `(0, 1]`; higher values
    /// track the pointer harder. One per world is enough.
    fn attach_pointer_constraint(&mut self, stiffness: f32) -> ConstraintId;

    /// Feed this frame's pointer to the drag constraint. A press over a body
    /// grabs it, release lets go, and while grabbed the body is pulled
    /// toward the pointer on every [`step`](PhysicsEngine::step).
    fn update_pointer(&mut self, constraint: ConstraintId, pointer: PointerState);

    /// Advance the world by `dt` seconds.
    fn step(&mut self, dt: f32);

    /// Read a body's current transform. Never blocks.
    fn transform(&self, body: BodyId) -> Transform2;

    /// Drop every body, collider and constraint. Safe to call repeatedly.
    fn clear(&mut self);
}
