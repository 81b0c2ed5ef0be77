//! What the session needs from a rendering host.
//!
//! The session never draws. It measures word rectangles through this trait
//! when it starts, and writes body transforms back through it every frame.
//! The egui front implements it for on-screen widgets; tests implement it
//! with a recording stub.

use glam::Vec2;

use crate::geometry::{Rect, Transform2};

/// A rendering host holding one laid-out block of word tokens.
///
/// Measurement methods ([`container_rect`](Surface::container_rect),
/// [`token_rect`](Surface::token_rect)) report viewport coordinates; the
/// session converts to container-local space itself. Write-back methods
/// ([`detach_token`](Surface::detach_token),
/// [`place_token`](Surface::place_token)) receive container-local
/// coordinates, with token positions given at the token's center.
pub trait Surface {
    /// The container holding the words, in viewport coordinates.
    fn container_rect(&self) -> Rect;

    /// Number of laid-out word tokens. Token indices below this count are
    /// valid for every other method.
    fn token_count(&self) -> usize;

    /// The static layout rectangle of one token, in viewport coordinates.
    fn token_rect(&self, index: usize) -> Rect;

    /// Switch a token from static layout to simulated placement, anchored at
    /// `center` with its measured `size`. Called once per token before the
    /// first physics step, so the word must not move visually.
    fn detach_token(&mut self, index: usize, center: Vec2, size: Vec2);

    /// Move a detached token to `transform` (center position plus rotation).
    /// Called every frame while the session runs.
    fn place_token(&mut self, index: usize, transform: Transform2);

    /// Drop all detached placements and return to static layout. Must be
    /// safe to call repeatedly and when nothing was detached.
    fn restore(&mut self);
}
