//! The simulation session: measured words become falling bodies.
//!
//! A session is the live half of a falling-text widget. Starting one measures
//! every laid-out word through the [`Surface`], builds a physics world with
//! one dynamic box per word plus four container boundaries, and wires the
//! pointer drag constraint. From then on the host calls
//! [`frame`](Session::frame) once per animation frame; the session steps the
//! world on a fixed timestep and writes each body's transform back onto its
//! word.
//!
//! A session is either fully constructed or absent. Construction does all
//! fallible work (measurement, body creation) before the first surface
//! mutation, so a failed start leaves the static text untouched. Teardown
//! clears the world, restores the surface and flips the running flag;
//! [`frame`](Session::frame) checks that flag first, which lets one last
//! in-flight frame after teardown land harmlessly.

use glam::Vec2;
use log::debug;

use crate::clock::StepAccumulator;
use crate::config::Config;
use crate::engine::{BodyId, ConstraintId, Material, PhysicsEngine, PointerState};
use crate::error::SessionError;
use crate::geometry::Transform2;
use crate::jitter::Jitter;
use crate::surface::Surface;

/// Physics step size in seconds. Frame deltas are banked and paid out in
/// whole steps of this size.
const FIXED_DT: f32 = 1.0 / 60.0;

/// Pixel-space acceleration for one unit of configured gravity, px/s².
/// A gravity multiplier of `1.0` reads as earth-like for text-sized bodies.
const GRAVITY_SCALE: f32 = 980.0;

/// Thickness of the four static boundary boxes, px. Thick walls keep fast
/// bodies from tunnelling out of the container in one step.
const BOUNDARY_THICKNESS: f32 = 50.0;

/// Center and size of the four boundaries for a `w` by `h` container, in
/// container-local coordinates. Each box sits just outside the edge it
/// guards: the floor is centered half a thickness below the bottom edge, and
/// the other three sides mirror it.
fn boundary_boxes(w: f32, h: f32) -> [(Vec2, Vec2); 4] {
    let half = BOUNDARY_THICKNESS * 0.5;
    [
        (Vec2::new(w * 0.5, h + half), Vec2::new(w, BOUNDARY_THICKNESS)),
        (Vec2::new(w * 0.5, -half), Vec2::new(w, BOUNDARY_THICKNESS)),
        (Vec2::new(-half, h * 0.5), Vec2::new(BOUNDARY_THICKNESS, h)),
        (Vec2::new(w + half, h * 0.5), Vec2::new(BOUNDARY_THICKNESS, h)),
    ]
}

struct WordBody {
    body: BodyId,
    size: Vec2,
}

/// One live falling-text simulation.
///
/// Owns the physics world, the word and boundary bodies and the pointer
/// constraint. Exactly one session should be live per widget; the widget
/// holds it in an `Option` and replaces it wholesale when configuration or
/// content changes.
pub struct Session<E: PhysicsEngine> {
    engine: E,
    steps: StepAccumulator,
    words: Vec<WordBody>,
    boundaries: [(Vec2, Vec2); 4],
    pointer: ConstraintId,
    running: bool,
    frames: u64,
}

impl<E: PhysicsEngine> Session<E> {
    /// Measure the surface and build the world.
    ///
    /// Fails with [`SessionError::DegenerateLayout`] when the container has
    /// no usable size (hidden or collapsed host), and with
    /// [`SessionError::Engine`] when a word measures to a degenerate
    /// rectangle. On failure nothing is allocated and the surface is not
    /// touched; the words keep their static layout.
    pub fn start<S: Surface>(
        surface: &mut S,
        config: &Config,
        jitter: &mut Jitter,
    ) -> Result<Self, SessionError> {
        let container = surface.container_rect();
        let (w, h) = (container.w, container.h);
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(SessionError::DegenerateLayout {
                width: w,
                height: h,
            });
        }

        let mut engine = E::create_world(config.gravity * GRAVITY_SCALE);

        let boundaries = boundary_boxes(w, h);
        for (center, size) in boundaries {
            engine.create_static_box(center, size)?;
        }

        let count = surface.token_count();
        let mut words = Vec::with_capacity(count);
        for index in 0..count {
            let local = surface.token_rect(index).relative_to(&container);
            let body = engine.create_dynamic_box(local.center(), local.size(), Material::default())?;
            engine.set_velocity(body, Vec2::new(jitter.horizontal_velocity(), 0.0));
            engine.set_angular_velocity(body, jitter.spin());
            words.push(WordBody {
                body,
                size: local.size(),
            });
        }

        let pointer = engine.attach_pointer_constraint(config.pointer_stiffness);

        // All fallible work is done; the surface mutations below cannot be
        // interrupted, so a session observed from outside is always whole.
        // Anchoring at the body's own transform makes the first rendered
        // frame identical to the static layout.
        for (index, word) in words.iter().enumerate() {
            let spawn = engine.transform(word.body);
            surface.detach_token(index, spawn.position(), word.size);
        }

        debug!(
            "session started: {} word bodies in {:.0}x{:.0} container",
            words.len(),
            w,
            h
        );

        Ok(Self {
            engine,
            steps: StepAccumulator::new(FIXED_DT),
            words,
            boundaries,
            pointer,
            running: true,
            frames: 0,
        })
    }

    /// Advance one host frame: feed the pointer, run the due fixed steps,
    /// then write every body's transform back onto its word.
    ///
    /// Returns `false` without doing anything once the session has been torn
    /// down, so a frame already scheduled when teardown happened is a no-op.
    pub fn frame<S: Surface>(
        &mut self,
        surface: &mut S,
        delta: f32,
        pointer: PointerState,
    ) -> bool {
        if !self.running {
            return false;
        }
        self.engine.update_pointer(self.pointer, pointer);
        for _ in 0..self.steps.advance(delta) {
            self.engine.step(self.steps.fixed_dt());
        }
        for (index, word) in self.words.iter().enumerate() {
            surface.place_token(index, self.engine.transform(word.body));
        }
        self.frames += 1;
        true
    }

    /// Stop the session: clear the world and return the surface to static
    /// layout. Calling this again is a no-op.
    pub fn teardown<S: Surface>(&mut self, surface: &mut S) {
        if !self.running {
            return;
        }
        self.running = false;
        self.engine.clear();
        surface.restore();
        debug!(
            "session torn down: {} words after {} frames",
            self.words.len(),
            self.frames
        );
    }

    /// Whether [`frame`](Session::frame) still advances the simulation.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of word bodies in the world.
    #[inline]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Live transform and measured size of one word body, for debug
    /// overlays.
    pub fn word_outline(&self, index: usize) -> Option<(Transform2, Vec2)> {
        let word = self.words.get(index)?;
        Some((self.engine.transform(word.body), word.size))
    }

    /// Center and size of the four boundary boxes, in container-local
    /// coordinates. Boundaries never move, so these are the construction
    /// values.
    #[inline]
    pub fn boundary_outlines(&self) -> [(Vec2, Vec2); 4] {
        self.boundaries
    }

    /// The container rectangle implied by the boundary placement.
    pub fn container_size(&self) -> Vec2 {
        let (floor_center, floor_size) = self.boundaries[0];
        Vec2::new(floor_size.x, floor_center.y - BOUNDARY_THICKNESS * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BodyId, ConstraintId, Material, PhysicsEngine, PointerState};
    use crate::error::EngineError;
    use crate::geometry::Rect;
    use crate::token::tokenize;
    use std::cell::Cell;

    thread_local! {
        static WORLDS_BUILT: Cell<u32> = const { Cell::new(0) };
    }

    struct MockBox {
        center: Vec2,
        size: Vec2,
        dynamic: bool,
        velocity: Vec2,
        omega: f32,
    }

    /// Records every engine call; step() drops each dynamic body 1 px.
    #[derive(Default)]
    struct MockEngine {
        gravity: f32,
        boxes: Vec<MockBox>,
        constraints: Vec<f32>,
        pointer_feeds: Vec<PointerState>,
        steps: u32,
        clears: u32,
    }

    impl MockEngine {
        fn dynamic_count(&self) -> usize {
            self.boxes.iter().filter(|b| b.dynamic).count()
        }

        fn static_count(&self) -> usize {
            self.boxes.iter().filter(|b| !b.dynamic).count()
        }

        fn checked(center: Vec2, size: Vec2) -> Result<(Vec2, Vec2), EngineError> {
            if size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0 {
                Ok((center, size))
            } else {
                Err(EngineError::InvalidGeometry {
                    width: size.x,
                    height: size.y,
                })
            }
        }
    }

    impl PhysicsEngine for MockEngine {
        fn create_world(gravity_y: f32) -> Self {
            WORLDS_BUILT.with(|w| w.set(w.get() + 1));
            Self {
                gravity: gravity_y,
                ..Self::default()
            }
        }

        fn create_static_box(&mut self, center: Vec2, size: Vec2) -> Result<BodyId, EngineError> {
            let (center, size) = Self::checked(center, size)?;
            self.boxes.push(MockBox {
                center,
                size,
                dynamic: false,
                velocity: Vec2::ZERO,
                omega: 0.0,
            });
            Ok(BodyId::from_raw(self.boxes.len() as u64 - 1))
        }

        fn create_dynamic_box(
            &mut self,
            center: Vec2,
            size: Vec2,
            _material: Material,
        ) -> Result<BodyId, EngineError> {
            let (center, size) = Self::checked(center, size)?;
            self.boxes.push(MockBox {
                center,
                size,
                dynamic: true,
                velocity: Vec2::ZERO,
                omega: 0.0,
            });
            Ok(BodyId::from_raw(self.boxes.len() as u64 - 1))
        }

        fn set_velocity(&mut self, body: BodyId, velocity: Vec2) {
            self.boxes[body.into_raw() as usize].velocity = velocity;
        }

        fn set_angular_velocity(&mut self, body: BodyId, omega: f32) {
            self.boxes[body.into_raw() as usize].omega = omega;
        }

        fn attach_pointer_constraint(&mut self, stiffness: f32) -> ConstraintId {
            self.constraints.push(stiffness);
            ConstraintId::from_raw(self.constraints.len() as u64 - 1)
        }

        fn update_pointer(&mut self, _constraint: ConstraintId, pointer: PointerState) {
            self.pointer_feeds.push(pointer);
        }

        fn step(&mut self, _dt: f32) {
            self.steps += 1;
        }

        fn transform(&self, body: BodyId) -> Transform2 {
            match self.boxes.get(body.into_raw() as usize) {
                Some(b) if b.dynamic => {
                    Transform2::new(b.center.x, b.center.y + self.steps as f32, 0.0)
                }
                Some(b) => Transform2::new(b.center.x, b.center.y, 0.0),
                None => Transform2::default(),
            }
        }

        fn clear(&mut self) {
            self.boxes.clear();
            self.clears += 1;
        }
    }

    #[derive(Default)]
    struct MockSurface {
        container: Rect,
        tokens: Vec<Rect>,
        detached: Vec<(usize, Vec2, Vec2)>,
        placed: Vec<(usize, Transform2)>,
        restores: u32,
    }

    impl MockSurface {
        fn with_grid(container: Rect, count: usize) -> Self {
            // Words 40x20, laid out left to right inside the container.
            let tokens = (0..count)
                .map(|i| {
                    Rect::new(
                        container.x + 10.0 + i as f32 * 50.0,
                        container.y + 10.0,
                        40.0,
                        20.0,
                    )
                })
                .collect();
            Self {
                container,
                tokens,
                ..Self::default()
            }
        }
    }

    impl Surface for MockSurface {
        fn container_rect(&self) -> Rect {
            self.container
        }

        fn token_count(&self) -> usize {
            self.tokens.len()
        }

        fn token_rect(&self, index: usize) -> Rect {
            self.tokens[index]
        }

        fn detach_token(&mut self, index: usize, center: Vec2, size: Vec2) {
            self.detached.push((index, center, size));
        }

        fn place_token(&mut self, index: usize, transform: Transform2) {
            self.placed.push((index, transform));
        }

        fn restore(&mut self) {
            self.restores += 1;
        }
    }

    fn start(
        surface: &mut MockSurface,
        config: &Config,
    ) -> Result<Session<MockEngine>, SessionError> {
        Session::start(surface, config, &mut Jitter::seeded(42))
    }

    #[test]
    fn test_one_body_per_token_plus_four_boundaries() {
        let mut surface = MockSurface::with_grid(Rect::new(0.0, 0.0, 400.0, 300.0), 5);
        let session = start(&mut surface, &Config::new("five words of layout here")).unwrap();

        assert_eq!(session.word_count(), 5);
        assert_eq!(session.engine.dynamic_count(), 5);
        assert_eq!(session.engine.static_count(), 4);
        assert_eq!(session.engine.constraints.len(), 1);
        assert!(session.is_running());
    }

    #[test]
    fn test_boundaries_hug_the_container() {
        let mut surface = MockSurface::with_grid(Rect::new(0.0, 0.0, 400.0, 300.0), 0);
        let session = start(&mut surface, &Config::new("")).unwrap();

        let walls = session.boundary_outlines();
        // floor, ceiling, left, right
        assert_eq!(walls[0], (Vec2::new(200.0, 325.0), Vec2::new(400.0, 50.0)));
        assert_eq!(walls[1], (Vec2::new(200.0, -25.0), Vec2::new(400.0, 50.0)));
        assert_eq!(walls[2], (Vec2::new(-25.0, 150.0), Vec2::new(50.0, 300.0)));
        assert_eq!(walls[3], (Vec2::new(425.0, 150.0), Vec2::new(50.0, 300.0)));
        assert_eq!(session.container_size(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_bodies_anchor_at_measured_centers_in_container_space() {
        // Container offset from the viewport origin; body positions must be
        // container-local.
        let mut surface = MockSurface {
            container: Rect::new(100.0, 50.0, 400.0, 300.0),
            tokens: vec![Rect::new(130.0, 60.0, 40.0, 20.0)],
            ..MockSurface::default()
        };
        let session = start(&mut surface, &Config::new("word")).unwrap();

        let body = &session.engine.boxes[4];
        assert!(body.dynamic);
        assert_eq!(body.center, Vec2::new(50.0, 20.0));
        assert_eq!(body.size, Vec2::new(40.0, 20.0));

        // The word was detached exactly at that anchor before any step.
        assert_eq!(surface.detached, vec![(0, Vec2::new(50.0, 20.0), Vec2::new(40.0, 20.0))]);
    }

    #[test]
    fn test_spawn_jitter_is_horizontal_and_bounded() {
        let mut surface = MockSurface::with_grid(Rect::new(0.0, 0.0, 600.0, 300.0), 8);
        let session = start(&mut surface, &Config::new("a b c d e f g h")).unwrap();

        for body in session.engine.boxes.iter().filter(|b| b.dynamic) {
            assert!(body.velocity.x.abs() <= 2.5, "vx = {}", body.velocity.x);
            assert_eq!(body.velocity.y, 0.0);
            assert!(body.omega.abs() <= 0.025, "omega = {}", body.omega);
        }
    }

    #[test]
    fn test_gravity_multiplier_maps_to_pixel_acceleration() {
        let mut surface = MockSurface::with_grid(Rect::new(0.0, 0.0, 400.0, 300.0), 1);
        let session = start(&mut surface, &Config::new("w").with_gravity(1.0)).unwrap();
        assert_eq!(session.engine.gravity, 980.0);

        let mut surface = MockSurface::with_grid(Rect::new(0.0, 0.0, 400.0, 300.0), 1);
        let session = start(&mut surface, &Config::new("w").with_gravity(0.5)).unwrap();
        assert_eq!(session.engine.gravity, 490.0);
    }

    #[test]
    fn test_pointer_stiffness_reaches_the_constraint() {
        let mut surface = MockSurface::with_grid(Rect::new(0.0, 0.0, 400.0, 300.0), 1);
        let session =
            start(&mut surface, &Config::new("w").with_pointer_stiffness(0.7)).unwrap();
        assert_eq!(session.engine.constraints, vec![0.7]);
    }

    #[test]
    fn test_degenerate_layout_allocates_nothing() {
        WORLDS_BUILT.with(|w| w.set(0));
        let mut surface = MockSurface::with_grid(Rect::new(0.0, 0.0, 300.0, 0.0), 3);

        let err = start(&mut surface, &Config::new("a b c")).err().unwrap();
        assert!(matches!(
            err,
            SessionError::DegenerateLayout { width: _, height } if height == 0.0
        ));

        // No world, no bodies, no surface mutation of any kind.
        assert_eq!(WORLDS_BUILT.with(|w| w.get()), 0);
        assert!(surface.detached.is_empty());
        assert!(surface.placed.is_empty());
        assert_eq!(surface.restores, 0);
    }

    #[test]
    fn test_nan_container_is_degenerate() {
        let mut surface = MockSurface::with_grid(Rect::new(0.0, 0.0, f32::NAN, 200.0), 1);
        assert!(matches!(
            start(&mut surface, &Config::new("w")),
            Err(SessionError::DegenerateLayout { .. })
        ));
    }

    #[test]
    fn test_invalid_word_geometry_aborts_before_detaching() {
        // Second word measures zero-width; the engine rejects it and the
        // surface must still be fully static afterwards.
        let mut surface = MockSurface {
            container: Rect::new(0.0, 0.0, 400.0, 300.0),
            tokens: vec![
                Rect::new(10.0, 10.0, 40.0, 20.0),
                Rect::new(60.0, 10.0, 0.0, 20.0),
            ],
            ..MockSurface::default()
        };

        let err = start(&mut surface, &Config::new("ok broken")).err().unwrap();
        assert!(matches!(
            err,
            SessionError::Engine(EngineError::InvalidGeometry { .. })
        ));
        assert!(surface.detached.is_empty());
        assert!(surface.placed.is_empty());
    }

    #[test]
    fn test_first_frame_without_a_due_step_matches_spawn_anchor() {
        let mut surface = MockSurface::with_grid(Rect::new(0.0, 0.0, 400.0, 300.0), 2);
        let mut session = start(&mut surface, &Config::new("two words")).unwrap();

        // Delta shorter than one fixed step: no physics, transforms still
        // written, and they equal the measured anchors.
        assert!(session.frame(&mut surface, 0.001, PointerState::idle()));
        assert_eq!(session.engine.steps, 0);
        assert_eq!(surface.placed.len(), 2);
        for ((index, transform), (d_index, center, _)) in
            surface.placed.iter().zip(surface.detached.iter())
        {
            assert_eq!(index, d_index);
            assert_eq!(transform.position(), *center);
        }
    }

    #[test]
    fn test_frame_feeds_pointer_steps_and_places() {
        let mut surface = MockSurface::with_grid(Rect::new(0.0, 0.0, 400.0, 300.0), 3);
        let mut session = start(&mut surface, &Config::new("one two three")).unwrap();

        let pointer = PointerState::at(Vec2::new(30.0, 40.0), true);
        assert!(session.frame(&mut surface, FIXED_DT, pointer));

        assert_eq!(session.engine.pointer_feeds, vec![pointer]);
        assert_eq!(session.engine.steps, 1);
        assert_eq!(surface.placed.len(), 3);
        // One step dropped every mock body a pixel.
        for (i, (index, transform)) in surface.placed.iter().enumerate() {
            assert_eq!(*index, i);
            assert_eq!(transform.y, surface.detached[i].1.y + 1.0);
        }
    }

    #[test]
    fn test_frame_banks_fractional_deltas() {
        let mut surface = MockSurface::with_grid(Rect::new(0.0, 0.0, 400.0, 300.0), 1);
        let mut session = start(&mut surface, &Config::new("w")).unwrap();

        session.frame(&mut surface, 2.5 * FIXED_DT, PointerState::idle());
        assert_eq!(session.engine.steps, 2);
        session.frame(&mut surface, 0.6 * FIXED_DT, PointerState::idle());
        assert_eq!(session.engine.steps, 3);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut surface = MockSurface::with_grid(Rect::new(0.0, 0.0, 400.0, 300.0), 2);
        let mut session = start(&mut surface, &Config::new("two words")).unwrap();

        session.teardown(&mut surface);
        session.teardown(&mut surface);

        assert!(!session.is_running());
        assert_eq!(session.engine.clears, 1);
        assert_eq!(surface.restores, 1);
    }

    #[test]
    fn test_frame_after_teardown_is_inert() {
        let mut surface = MockSurface::with_grid(Rect::new(0.0, 0.0, 400.0, 300.0), 2);
        let mut session = start(&mut surface, &Config::new("two words")).unwrap();
        session.teardown(&mut surface);

        let placed_before = surface.placed.len();
        assert!(!session.frame(&mut surface, FIXED_DT, PointerState::idle()));
        assert_eq!(surface.placed.len(), placed_before);
        assert_eq!(session.engine.steps, 0);
    }

    #[test]
    fn test_rebuild_after_teardown_duplicates_nothing() {
        let mut surface = MockSurface::with_grid(Rect::new(0.0, 0.0, 400.0, 300.0), 3);
        let mut first = start(&mut surface, &Config::new("one two three")).unwrap();
        first.teardown(&mut surface);

        let second = start(&mut surface, &Config::new("one two three")).unwrap();
        assert_eq!(second.word_count(), 3);
        assert_eq!(second.engine.dynamic_count(), 3);
        assert_eq!(second.engine.static_count(), 4);
    }

    #[test]
    fn test_empty_text_builds_only_boundaries() {
        let mut surface = MockSurface::with_grid(Rect::new(0.0, 0.0, 400.0, 300.0), 0);
        let mut session = start(&mut surface, &Config::new("")).unwrap();

        assert_eq!(session.word_count(), 0);
        assert_eq!(session.engine.static_count(), 4);
        assert!(session.frame(&mut surface, FIXED_DT, PointerState::idle()));
        assert!(surface.placed.is_empty());
    }

    #[test]
    fn test_word_outline_tracks_the_live_transform() {
        let mut surface = MockSurface::with_grid(Rect::new(0.0, 0.0, 400.0, 300.0), 1);
        let mut session = start(&mut surface, &Config::new("w")).unwrap();

        let (before, size) = session.word_outline(0).unwrap();
        assert_eq!(size, Vec2::new(40.0, 20.0));
        session.frame(&mut surface, FIXED_DT, PointerState::idle());
        let (after, _) = session.word_outline(0).unwrap();
        assert_eq!(after.y, before.y + 1.0);

        assert!(session.word_outline(1).is_none());
    }

    #[test]
    fn test_worked_example_alpha_beta_gamma() {
        let tokens = tokenize("Alpha Beta Gamma", &["beta".to_string()]);
        assert_eq!(tokens.len(), 3);
        assert!(!tokens[0].emphasized());
        assert!(tokens[1].emphasized());
        assert!(!tokens[2].emphasized());

        let mut surface =
            MockSurface::with_grid(Rect::new(0.0, 0.0, 400.0, 300.0), tokens.len());
        let session = start(&mut surface, &Config::new("Alpha Beta Gamma")).unwrap();
        assert_eq!(session.engine.dynamic_count(), 3);
        assert_eq!(session.engine.static_count(), 4);
    }
}
