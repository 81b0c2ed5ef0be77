//! Splitting source text into word tokens.
//!
//! A token is one whitespace-delimited word. Tokens keep their order from the
//! source text and carry an emphasis flag so the host can style chosen words
//! differently. Emphasis matching is case-insensitive but punctuation is not
//! stripped, so a highlight entry must match the full word.
//!
//! Token indices are stable for the life of a given text: the session, the
//! surface and the physics engine all refer to the same word by the same
//! index.

/// One word of the source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    text: String,
    emphasized: bool,
}

impl Token {
    /// The word itself, exactly as it appeared in the source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when the word matched the highlight list.
    pub fn emphasized(&self) -> bool {
        self.emphasized
    }

    /// Render this token as a markup fragment.
    ///
    /// Emphasized tokens become `<span class="{class}">word</span>`, plain
    /// tokens stay bare. The word text is escaped either way. This is the
    /// static fallback for hosts that render to markup instead of driving a
    /// simulation.
    pub fn markup(&self, class: &str) -> String {
        let escaped = escape(&self.text);
        if self.emphasized {
            format!("<span class=\"{}\">{}</span>", class, escaped)
        } else {
            escaped
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Split `text` on whitespace runs and mark words found in `highlights`.
///
/// Matching is case-insensitive: `highlights` containing `"beta"` marks
/// `Beta`, `BETA` and `beta` alike. Empty or all-whitespace text yields an
/// empty vector. Consecutive whitespace never produces empty tokens.
pub fn tokenize(text: &str, highlights: &[String]) -> Vec<Token> {
    let lowered: Vec<String> = highlights.iter().map(|h| h.to_lowercase()).collect();
    text.split_whitespace()
        .map(|word| {
            let lc = word.to_lowercase();
            Token {
                text: word.to_string(),
                emphasized: lowered.iter().any(|h| *h == lc),
            }
        })
        .collect()
}
