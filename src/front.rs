//! egui widget host for falling text (feature `egui`).
//!
//! [`FallingText`] owns everything one on-screen block needs: the tokenized
//! words, the activation state machine, the live session and the layout
//! state the session measures and writes through. The widget lays the words
//! out as static wrapped text until the configured trigger fires, then runs
//! the simulation in place, re-painting every frame while it is live.
//!
//! # Quick Start
//!
//! ```ignore
//! use wordfall::{Config, FallingText, Trigger};
//!
//! let mut falling = FallingText::new(
//!     Config::new("Words that break their layout and fall")
//!         .with_highlight_words(["fall"])
//!         .with_trigger(Trigger::Click),
//! );
//!
//! // In your egui update:
//! falling.show(ui);
//! ```
//!
//! Replacing the configuration with [`set_config`](FallingText::set_config)
//! compares the old and new values; any simulation-affecting change tears
//! the session down and starts over from fresh static layout.

use std::sync::Arc;

use egui::epaint::TextShape;
use egui::{Color32, FontId, Galley, Sense, Shape, Stroke};
use glam::Vec2;
use log::warn;

use crate::activation::ActivationController;
use crate::clock::FrameClock;
use crate::config::{Color, Config, Trigger};
use crate::engine::rapier::RapierEngine;
use crate::engine::PointerState;
use crate::geometry::{Rect, Transform2};
use crate::jitter::Jitter;
use crate::session::Session;
use crate::surface::Surface;
use crate::token::{tokenize, Token};

/// Widget height when the host does not choose one.
const DEFAULT_HEIGHT: f32 = 320.0;

/// Inset from the container edges to the wrapped text, px.
const TEXT_PADDING: f32 = 10.0;

/// Vertical advance between text lines, as a multiple of the row height.
/// The extra air keeps freshly spawned bodies from starting in contact.
const LINE_SPACING: f32 = 1.4;

/// One laid-out word: its shaped glyphs, its static slot in the wrapped
/// text, and its live placement while a session runs.
struct WordSlot {
    galley: Arc<Galley>,
    local: Rect,
    placed: Option<Transform2>,
}

/// The widget's layout state, which doubles as the session's [`Surface`].
#[derive(Default)]
struct WidgetSurface {
    /// Allocated widget rectangle in screen coordinates, refreshed every
    /// frame so scrolling moves the whole simulation with the widget.
    container: Rect,
    words: Vec<WordSlot>,
}

impl Surface for WidgetSurface {
    fn container_rect(&self) -> Rect {
        self.container
    }

    fn token_count(&self) -> usize {
        self.words.len()
    }

    fn token_rect(&self, index: usize) -> Rect {
        let local = self.words[index].local;
        Rect::new(
            self.container.x + local.x,
            self.container.y + local.y,
            local.w,
            local.h,
        )
    }

    fn detach_token(&mut self, index: usize, center: Vec2, _size: Vec2) {
        self.words[index].placed = Some(Transform2::new(center.x, center.y, 0.0));
    }

    fn place_token(&mut self, index: usize, transform: Transform2) {
        self.words[index].placed = Some(transform);
    }

    fn restore(&mut self) {
        for word in &mut self.words {
            word.placed = None;
        }
    }
}

/// Greedy word wrap: place `widths`-sized words left to right, break before
/// any word that would cross `max_width`, never break before the first word
/// of a line. Returns container-local rects.
fn flow_words(widths: &[f32], row_height: f32, space: f32, max_width: f32) -> Vec<Rect> {
    let advance = row_height * LINE_SPACING;
    let mut x = TEXT_PADDING;
    let mut y = TEXT_PADDING;
    let mut rects = Vec::with_capacity(widths.len());
    for &w in widths {
        if x > TEXT_PADDING && x + w > max_width - TEXT_PADDING {
            x = TEXT_PADDING;
            y += advance;
        }
        rects.push(Rect::new(x, y, w, row_height));
        x += w + space;
    }
    rects
}

/// A block of text whose words fall, collide and drag once triggered.
///
/// Create it once, keep it in your app state, and call
/// [`show`](FallingText::show) every frame.
pub struct FallingText {
    config: Config,
    tokens: Vec<Token>,
    activation: ActivationController,
    session: Option<Session<RapierEngine>>,
    surface: WidgetSurface,
    clock: FrameClock,
    jitter: Jitter,
    height: f32,
    accent: Color32,
    text_color: Option<Color32>,
    flow_width: f32,
    layout_dirty: bool,
    start_failed: bool,
    hover_was: bool,
}

impl FallingText {
    pub fn new(config: Config) -> Self {
        let tokens = tokenize(&config.text, &config.highlight_words);
        let activation = ActivationController::new(config.trigger);
        Self {
            tokens,
            activation,
            config,
            session: None,
            surface: WidgetSurface::default(),
            clock: FrameClock::new(),
            jitter: Jitter::new(),
            height: DEFAULT_HEIGHT,
            accent: Color32::from_rgb(0x4f, 0xa2, 0xf5),
            text_color: None,
            flow_width: 0.0,
            layout_dirty: true,
            start_failed: false,
            hover_was: false,
        }
    }

    /// Fixed widget height in points. Words need room to fall; the default
    /// is 320.
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height.max(1.0);
        self
    }

    /// Color for emphasized words.
    pub fn with_accent(mut self, accent: Color32) -> Self {
        self.accent = accent;
        self
    }

    /// Color for plain words. Defaults to the egui theme's text color.
    pub fn with_text_color(mut self, color: Color32) -> Self {
        self.text_color = Some(color);
        self
    }

    /// Replace the spawn jitter source, e.g. with a seeded one for
    /// reproducible captures.
    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = jitter;
        self
    }

    /// The current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The tokenized words in reading order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Whether a simulation session is currently live.
    pub fn is_falling(&self) -> bool {
        self.session.is_some()
    }

    /// Swap in a new configuration.
    ///
    /// A change to the text, the highlight set or any simulation parameter
    /// tears the session down and re-arms the trigger, exactly as if the
    /// widget had been remounted; a pure styling change applies in place.
    pub fn set_config(&mut self, config: Config) {
        if self.config.requires_rebuild(&config) {
            self.remount(config);
        } else {
            self.config = config;
        }
    }

    /// Tear everything down and start from static text with a fresh
    /// trigger, as if the widget were unmounted and mounted again.
    pub fn reset(&mut self) {
        let config = self.config.clone();
        self.remount(config);
    }

    fn remount(&mut self, config: Config) {
        if let Some(mut session) = self.session.take() {
            session.teardown(&mut self.surface);
        }
        self.tokens = tokenize(&config.text, &config.highlight_words);
        self.activation = ActivationController::new(config.trigger);
        self.config = config;
        self.layout_dirty = true;
        self.start_failed = false;
        self.hover_was = false;
    }

    /// Lay the widget out and drive the simulation for one frame.
    pub fn show(&mut self, ui: &mut egui::Ui) -> egui::Response {
        let width = ui.available_width().max(1.0);
        if self.session.is_none() && (self.layout_dirty || (width - self.flow_width).abs() > 0.5) {
            self.relayout(ui, width);
        }

        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(width, self.height), Sense::click_and_drag());
        self.surface.container = from_egui(rect);

        self.observe(ui, rect, &response);

        if self.activation.is_active() && self.session.is_none() && !self.start_failed {
            match Session::start(&mut self.surface, &self.config, &mut self.jitter) {
                Ok(session) => {
                    self.session = Some(session);
                    self.clock = FrameClock::new();
                }
                Err(err) => {
                    warn!("falling text stayed static: {}", err);
                    self.start_failed = true;
                }
            }
        }

        if let Some(session) = &mut self.session {
            let pressed = ui.input(|i| i.pointer.primary_down());
            let pointer = match ui.ctx().pointer_latest_pos() {
                Some(pos) => {
                    PointerState::at(Vec2::new(pos.x - rect.min.x, pos.y - rect.min.y), pressed)
                }
                None => PointerState::idle(),
            };
            let delta = self.clock.tick();
            if session.frame(&mut self.surface, delta, pointer) {
                ui.ctx().request_repaint();
            }
        }

        if ui.is_rect_visible(rect) {
            self.paint(ui, rect);
        }

        if self.session.is_some() {
            response.on_hover_cursor(egui::CursorIcon::Grab)
        } else {
            response
        }
    }

    /// Rebuild galleys and the wrapped static layout for `width`.
    fn relayout(&mut self, ui: &egui::Ui, width: f32) {
        let font = FontId::proportional(self.config.font_size);
        let (galleys, row_height, space) = ui.fonts(|fonts| {
            let galleys: Vec<_> = self
                .tokens
                .iter()
                .map(|t| {
                    fonts.layout_no_wrap(t.text().to_string(), font.clone(), Color32::PLACEHOLDER)
                })
                .collect();
            (galleys, fonts.row_height(&font), fonts.glyph_width(&font, ' '))
        });
        let widths: Vec<f32> = galleys.iter().map(|g| g.size().x).collect();
        let rects = flow_words(&widths, row_height, space, width);

        self.surface.words = galleys
            .into_iter()
            .zip(rects)
            .map(|(galley, local)| WordSlot {
                galley,
                local,
                placed: None,
            })
            .collect();
        self.flow_width = width;
        self.layout_dirty = false;
    }

    /// Feed this frame's trigger observations to the activation machine.
    fn observe(&mut self, ui: &egui::Ui, rect: egui::Rect, response: &egui::Response) {
        self.activation.arm();
        let hover_edge = response.hovered() && !self.hover_was;
        self.hover_was = response.hovered();

        match self.config.trigger {
            Trigger::Auto => {}
            Trigger::Scroll => {
                let fraction = from_egui(rect).visible_fraction(&from_egui(ui.clip_rect()));
                self.activation.observe_visibility(fraction);
            }
            Trigger::Click => {
                if response.clicked() && !self.activation.observe_click() {
                    // Already active: a fresh click retries a failed start.
                    self.start_failed = false;
                }
            }
            Trigger::Hover => {
                if hover_edge && !self.activation.observe_hover() {
                    self.start_failed = false;
                }
            }
        }
    }

    fn paint(&self, ui: &egui::Ui, rect: egui::Rect) {
        let painter = ui.painter().with_clip_rect(rect);
        if !self.config.background.is_transparent() {
            painter.rect_filled(rect, 0.0, to_color32(self.config.background));
        }

        let plain = self.text_color.unwrap_or_else(|| ui.visuals().text_color());
        for (token, slot) in self.tokens.iter().zip(&self.surface.words) {
            let color = if token.emphasized() { self.accent } else { plain };
            match slot.placed {
                Some(transform) => {
                    // TextShape rotates about its anchor, so anchor the
                    // galley's top-left wherever it keeps the center put.
                    let half = Vec2::new(slot.galley.size().x, slot.galley.size().y) * 0.5;
                    let spun = transform.rotate(half);
                    let pos = at(rect.min, transform.position() - spun);
                    painter.add(
                        TextShape::new(pos, slot.galley.clone(), color)
                            .with_angle(transform.angle),
                    );
                }
                None => {
                    let pos = at(rect.min, Vec2::new(slot.local.x, slot.local.y));
                    painter.galley(pos, slot.galley.clone(), color);
                }
            }
        }

        if self.config.wireframes {
            if let Some(session) = &self.session {
                let stroke = Stroke::new(1.0, Color32::from_gray(0x80));
                for index in 0..session.word_count() {
                    if let Some((transform, size)) = session.word_outline(index) {
                        painter.add(outline(rect.min, transform, size, stroke));
                    }
                }
                for (center, size) in session.boundary_outlines() {
                    let transform = Transform2::new(center.x, center.y, 0.0);
                    painter.add(outline(rect.min, transform, size, stroke));
                }
            }
        }
    }
}

impl egui::Widget for &mut FallingText {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        self.show(ui)
    }
}

fn outline(origin: egui::Pos2, transform: Transform2, size: Vec2, stroke: Stroke) -> Shape {
    let points = transform
        .box_corners(size)
        .iter()
        .map(|corner| at(origin, *corner))
        .collect();
    Shape::closed_line(points, stroke)
}

fn from_egui(rect: egui::Rect) -> Rect {
    Rect::new(rect.min.x, rect.min.y, rect.width(), rect.height())
}

fn at(origin: egui::Pos2, local: Vec2) -> egui::Pos2 {
    egui::pos2(origin.x + local.x, origin.y + local.y)
}

fn to_color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}
