//! Host-facing configuration for a falling-text widget.
//!
//! Configuration is a plain value object built with chained `with_*` calls.
//! It is immutable once a simulation session starts: the widget compares the
//! old and new values with [`Config::requires_rebuild`] and tears the session
//! down and rebuilds it when a simulation-affecting field changed. Live
//! parameter patching of a running world is deliberately not supported.
//!
//! # Usage
//!
//! ```
//! use wordfall::{Config, Trigger, Color};
//!
//! let config = Config::new("Break things, drop words")
//!     .with_highlight_words(["drop"])
//!     .with_trigger(Trigger::Click)
//!     .with_background(Color::from_hex("#1a1a2e").unwrap_or(Color::TRANSPARENT))
//!     .with_gravity(0.6);
//! ```

/// What causes the words to start falling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trigger {
    /// Fall as soon as the widget is shown (default).
    #[default]
    Auto,

    /// Fall when at least 10% of the widget scrolls into view.
    Scroll,

    /// Fall on the first click anywhere in the widget.
    Click,

    /// Fall when the pointer first hovers the widget.
    Hover,
}

/// An 8-bit RGBA color.
///
/// `Color::TRANSPARENT` (the default background) means "paint nothing" rather
/// than "paint clear pixels"; the host skips the background fill entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    ///
    /// Returns `None` for anything else.
    ///
    /// ```
    /// use wordfall::Color;
    ///
    /// assert_eq!(Color::from_hex("#ff8000"), Some(Color::rgb(255, 128, 0)));
    /// assert_eq!(Color::from_hex("fff"), Some(Color::rgb(255, 255, 255)));
    /// assert_eq!(Color::from_hex("#not-a-color"), None);
    /// ```
    pub fn from_hex(s: &str) -> Option<Color> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let nibble = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 => Some(Color {
                r: nibble(0)? * 17,
                g: nibble(1)? * 17,
                b: nibble(2)? * 17,
                a: 255,
            }),
            6 => Some(Color {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: 255,
            }),
            8 => Some(Color {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => None,
        }
    }

    /// True when fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

/// Everything the host chooses about one falling-text block.
///
/// Built with chained `with_*` calls from [`Config::new`]. All fields have
/// working defaults; only the text is required.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The text whose words will fall.
    pub text: String,
    /// Words to emphasize, matched case-insensitively against whole words.
    pub highlight_words: Vec<String>,
    /// Styling tag applied to emphasized words in markup output.
    pub highlight_class: String,
    /// What starts the fall.
    pub trigger: Trigger,
    /// Container background. Transparent paints nothing.
    pub background: Color,
    /// Draw body and boundary outlines on top of the text.
    pub wireframes: bool,
    /// Gravity multiplier. `1.0` is earth-like at pixel scale.
    pub gravity: f32,
    /// Pointer drag stiffness in `(0, 1]`. Higher tracks the pointer harder.
    pub pointer_stiffness: f32,
    /// Font size in points used to lay out the words.
    pub font_size: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            text: String::new(),
            highlight_words: Vec::new(),
            highlight_class: "highlighted".to_string(),
            trigger: Trigger::Auto,
            background: Color::TRANSPARENT,
            wireframes: false,
            gravity: 1.0,
            pointer_stiffness: 0.2,
            font_size: 16.0,
        }
    }
}

impl Config {
    /// Create a config for `text` with all other fields at their defaults.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the words to emphasize. Matching is case-insensitive.
    pub fn with_highlight_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.highlight_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Set the styling tag used for emphasized words in markup output.
    pub fn with_highlight_class(mut self, class: impl Into<String>) -> Self {
        self.highlight_class = class.into();
        self
    }

    /// Set what starts the fall.
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Set the container background color.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Draw collision outlines over the words. Off by default.
    pub fn with_wireframes(mut self, on: bool) -> Self {
        self.wireframes = on;
        self
    }

    /// Set the gravity multiplier. `1.0` is earth-like; `0.0` floats.
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the pointer drag stiffness. Values outside `(0, 1]` are clamped.
    pub fn with_pointer_stiffness(mut self, stiffness: f32) -> Self {
        self.pointer_stiffness = stiffness.clamp(0.01, 1.0);
        self
    }

    /// Set the layout font size in points.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Whether switching from `self` to `other` invalidates a live session.
    ///
    /// Any change to the text, the highlight set or a simulation parameter
    /// requires a full teardown and rebuild; only the styling tag can change
    /// in place.
    pub fn requires_rebuild(&self, other: &Config) -> bool {
        self.text != other.text
            || self.highlight_words != other.highlight_words
            || self.trigger != other.trigger
            || self.background != other.background
            || self.wireframes != other.wireframes
            || self.gravity != other.gravity
            || self.pointer_stiffness != other.pointer_stiffness
            || self.font_size != other.font_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = Config::new("hello");
        assert_eq!(c.trigger, Trigger::Auto);
        assert_eq!(c.background, Color::TRANSPARENT);
        assert!(!c.wireframes);
        assert_eq!(c.gravity, 1.0);
        assert_eq!(c.pointer_stiffness, 0.2);
        assert_eq!(c.font_size, 16.0);
        assert_eq!(c.highlight_class, "highlighted");
    }

    #[test]
    fn test_builder_chaining() {
        let c = Config::new("a b c")
            .with_highlight_words(["b"])
            .with_trigger(Trigger::Hover)
            .with_wireframes(true)
            .with_gravity(0.5)
            .with_font_size(24.0);
        assert_eq!(c.highlight_words, vec!["b".to_string()]);
        assert_eq!(c.trigger, Trigger::Hover);
        assert!(c.wireframes);
        assert_eq!(c.gravity, 0.5);
        assert_eq!(c.font_size, 24.0);
    }

    #[test]
    fn test_stiffness_is_clamped() {
        assert_eq!(Config::new("x").with_pointer_stiffness(0.0).pointer_stiffness, 0.01);
        assert_eq!(Config::new("x").with_pointer_stiffness(-3.0).pointer_stiffness, 0.01);
        assert_eq!(Config::new("x").with_pointer_stiffness(7.0).pointer_stiffness, 1.0);
        assert_eq!(Config::new("x").with_pointer_stiffness(0.4).pointer_stiffness, 0.4);
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#000000"), Some(Color::rgb(0, 0, 0)));
        assert_eq!(Color::from_hex("1a2b3c"), Some(Color::rgb(0x1a, 0x2b, 0x3c)));
        assert_eq!(Color::from_hex("#abc"), Some(Color::rgb(0xaa, 0xbb, 0xcc)));
        assert_eq!(
            Color::from_hex("#11223344"),
            Some(Color::rgba(0x11, 0x22, 0x33, 0x44))
        );
        assert_eq!(Color::from_hex(""), None);
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("zzzzzz"), None);
    }

    #[test]
    fn test_rebuild_predicate() {
        let base = Config::new("a b").with_highlight_words(["a"]);

        // Identical config never rebuilds
        assert!(!base.requires_rebuild(&base.clone()));

        // Styling tag changes in place
        let styled = base.clone().with_highlight_class("accent");
        assert!(!base.requires_rebuild(&styled));

        // Everything simulation-affecting rebuilds
        assert!(base.requires_rebuild(&base.clone().with_gravity(2.0)));
        assert!(base.requires_rebuild(&base.clone().with_wireframes(true)));
        assert!(base.requires_rebuild(&base.clone().with_pointer_stiffness(0.9)));
        assert!(base.requires_rebuild(&base.clone().with_trigger(Trigger::Scroll)));
        assert!(base.requires_rebuild(&base.clone().with_background(Color::rgb(1, 2, 3))));
        assert!(base.requires_rebuild(&base.clone().with_font_size(30.0)));
        assert!(base.requires_rebuild(&Config::new("different words")));
        assert!(base.requires_rebuild(&base.clone().with_highlight_words(["b"])));
    }
}
