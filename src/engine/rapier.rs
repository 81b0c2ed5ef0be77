//! Bundled [`PhysicsEngine`] binding on top of `rapier2d`.
//!
//! The world lives in container-local pixel coordinates, y growing downward.
//! Rapier thinks in meters, so the integration parameters carry a pixel
//! length unit; everything else is plain rapier: one `RigidBodySet` /
//! `ColliderSet` pair stepped by a `PhysicsPipeline`.
//!
//! The pointer constraint is not a rapier joint. A joint would pin the body
//! rigidly to the pointer, which reads as teleporting; instead the grabbed
//! body is pulled by a critically damped spring impulse each step, with the
//! per-step gains capped at the stable limit of the discrete update. That
//! keeps the soft rubber-band drag feel across the whole `(0, 1]` stiffness
//! range, even when the pointer jumps across the container in one frame.

use glam::Vec2;
use log::debug;
use rapier2d::prelude::*;

use crate::engine::{BodyId, ConstraintId, Material, PhysicsEngine, PointerState};
use crate::error::EngineError;
use crate::geometry::Transform2;

/// Length unit handed to rapier so its internal tolerances (penetration slop,
/// prediction distance) scale to pixel-sized bodies.
const PIXELS_PER_METER: f32 = 100.0;

/// Spring constant per unit of configured stiffness. At 1.0 the grabbed body
/// converges on the pointer within roughly one 60 Hz step.
const STIFFNESS_SCALE: f32 = 3600.0;

/// Converts the material's per-frame air friction factor into rapier's
/// per-second damping coefficient, referenced to 60 Hz.
const DAMPING_SCALE: f32 = 60.0;

struct TrackedBody {
    handle: RigidBodyHandle,
    half: Vec2,
    dynamic: bool,
}

struct DragState {
    id: u64,
    stiffness: f32,
    pointer: Option<Vec2>,
    pressed_last: bool,
    /// Grabbed body index plus the grab point in body-local coordinates.
    grab: Option<(usize, Point<Real>)>,
}

/// A rapier2d world implementing the engine capability trait.
pub struct RapierEngine {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    tracked: Vec<TrackedBody>,
    drag: Option<DragState>,
    next_constraint: u64,
}

impl RapierEngine {
    fn push_tracked(&mut self, handle: RigidBodyHandle, half: Vec2, dynamic: bool) -> BodyId {
        self.tracked.push(TrackedBody {
            handle,
            half,
            dynamic,
        });
        BodyId::from_raw(self.tracked.len() as u64 - 1)
    }

    fn body_mut(&mut self, body: BodyId) -> Option<&mut RigidBody> {
        let tracked = self.tracked.get(body.into_raw() as usize)?;
        self.bodies.get_mut(tracked.handle)
    }

    /// Topmost dynamic body containing `p`, with the grab point expressed in
    /// that body's local frame. Later bodies draw on top, so they pick first.
    fn body_under(&self, p: Vec2) -> Option<(usize, Point<Real>)> {
        let target = point![p.x, p.y];
        for (index, tracked) in self.tracked.iter().enumerate().rev() {
            if !tracked.dynamic {
                continue;
            }
            let Some(rb) = self.bodies.get(tracked.handle) else {
                continue;
            };
            let local = rb.position().inverse_transform_point(&target);
            if local.x.abs() <= tracked.half.x && local.y.abs() <= tracked.half.y {
                return Some((index, local));
            }
        }
        None
    }

    fn apply_drag(&mut self, dt: f32) {
        let (stiffness, grab, pointer) = match &self.drag {
            Some(d) => (d.stiffness, d.grab, d.pointer),
            None => return,
        };
        let (Some((index, local_anchor)), Some(target)) = (grab, pointer) else {
            return;
        };
        let Some(tracked) = self.tracked.get(index) else {
            return;
        };
        let Some(rb) = self.bodies.get_mut(tracked.handle) else {
            return;
        };

        let anchor = rb.position() * local_anchor;
        let delta = vector![target.x - anchor.x, target.y - anchor.y];
        let velocity = rb.velocity_at_point(&anchor);
        let mass = rb.mass();

        // Critically damped spring toward the pointer, applied at the grab
        // point so off-center grabs swing the word around. Both gains are
        // capped at the stable limit of the discrete update: one step may
        // close the whole remaining gap and cancel the whole velocity it
        // sees, never more.
        let k = (stiffness * STIFFNESS_SCALE).min(1.0 / (dt * dt));
        let damping = (2.0 * k.sqrt()).min(1.0 / dt);

        // An impulse at the grab point moves that point further than the
        // same impulse at the center, by up to the box's amplification
        // factor; scale down so the caps hold at the grab point too.
        let com = *rb.translation();
        let arm = vector![anchor.x - com.x, anchor.y - com.y];
        let half = tracked.half;
        let amplification =
            1.0 + 3.0 * arm.norm_squared() / (half.x * half.x + half.y * half.y);

        let accel = delta * k - velocity * damping;
        rb.apply_impulse_at_point(accel * (mass * dt / amplification), anchor, true);
    }
}

fn half_extents(size: Vec2) -> Result<Vec2, EngineError> {
    if size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0 {
        Ok(size * 0.5)
    } else {
        Err(EngineError::InvalidGeometry {
            width: size.x,
            height: size.y,
        })
    }
}

impl PhysicsEngine for RapierEngine {
    fn create_world(gravity_y: f32) -> Self {
        let params = IntegrationParameters {
            length_unit: PIXELS_PER_METER,
            ..Default::default()
        };
        debug!("rapier world created, gravity {} px/s^2", gravity_y);
        Self {
            gravity: vector![0.0, gravity_y],
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            tracked: Vec::new(),
            drag: None,
            next_constraint: 0,
        }
    }

    fn create_static_box(&mut self, center: Vec2, size: Vec2) -> Result<BodyId, EngineError> {
        let half = half_extents(size)?;
        let rb = RigidBodyBuilder::fixed()
            .translation(vector![center.x, center.y])
            .build();
        let handle = self.bodies.insert(rb);
        let collider = ColliderBuilder::cuboid(half.x, half.y).build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        Ok(self.push_tracked(handle, half, false))
    }

    fn create_dynamic_box(
        &mut self,
        center: Vec2,
        size: Vec2,
        material: Material,
    ) -> Result<BodyId, EngineError> {
        let half = half_extents(size)?;
        let rb = RigidBodyBuilder::dynamic()
            .translation(vector![center.x, center.y])
            .linear_damping(material.air_friction * DAMPING_SCALE)
            .angular_damping(material.air_friction * DAMPING_SCALE)
            .ccd_enabled(true)
            .build();
        let handle = self.bodies.insert(rb);
        // Contacts bounce like the bouncier side and rub like the slicker
        // side, so plain default-material boundaries behave as expected.
        let collider = ColliderBuilder::cuboid(half.x, half.y)
            .restitution(material.restitution)
            .friction(material.friction)
            .restitution_combine_rule(CoefficientCombineRule::Max)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        Ok(self.push_tracked(handle, half, true))
    }

    fn set_velocity(&mut self, body: BodyId, velocity: Vec2) {
        if let Some(rb) = self.body_mut(body) {
            rb.set_linvel(vector![velocity.x, velocity.y], true);
        }
    }

    fn set_angular_velocity(&mut self, body: BodyId, omega: f32) {
        if let Some(rb) = self.body_mut(body) {
            rb.set_angvel(omega, true);
        }
    }

    fn attach_pointer_constraint(&mut self, stiffness: f32) -> ConstraintId {
        let id = self.next_constraint;
        self.next_constraint += 1;
        self.drag = Some(DragState {
            id,
            stiffness: stiffness.clamp(0.01, 1.0),
            pointer: None,
            pressed_last: false,
            grab: None,
        });
        ConstraintId::from_raw(id)
    }

    fn update_pointer(&mut self, constraint: ConstraintId, pointer: PointerState) {
        let (id, was_pressed, grab) = match &self.drag {
            Some(d) => (d.id, d.pressed_last, d.grab),
            None => return,
        };
        if id != constraint.into_raw() {
            return;
        }
        // Grab only on the press edge over a body. Holding the button while
        // sweeping across words must not pick them up.
        let grab = if !pointer.pressed {
            None
        } else if grab.is_none() && !was_pressed {
            pointer.position.and_then(|p| self.body_under(p))
        } else {
            grab
        };
        if let Some(drag) = self.drag.as_mut() {
            drag.pressed_last = pointer.pressed;
            drag.pointer = pointer.position;
            drag.grab = grab;
        }
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.apply_drag(dt);
        self.params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
    }

    fn transform(&self, body: BodyId) -> Transform2 {
        let Some(tracked) = self.tracked.get(body.into_raw() as usize) else {
            return Transform2::default();
        };
        match self.bodies.get(tracked.handle) {
            Some(rb) => {
                let t = rb.translation();
                Transform2::new(t.x, t.y, rb.rotation().angle())
            }
            None => Transform2::default(),
        }
    }

    fn clear(&mut self) {
        let dropped = self.tracked.len();
        self.bodies = RigidBodySet::new();
        self.colliders = ColliderSet::new();
        self.impulse_joints = ImpulseJointSet::new();
        self.multibody_joints = MultibodyJointSet::new();
        self.islands = IslandManager::new();
        self.broad_phase = DefaultBroadPhase::new();
        self.narrow_phase = NarrowPhase::new();
        self.ccd = CCDSolver::new();
        self.tracked.clear();
        self.drag = None;
        if dropped > 0 {
            debug!("rapier world cleared, {} bodies dropped", dropped);
        }
    }
}
