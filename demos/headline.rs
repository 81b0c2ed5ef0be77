//! # Falling Headline
//!
//! The auto trigger: the headline drops the moment the window opens.
//! Drag fallen words around, or replay the drop with the button.
//!
//! Run with: `cargo run --example headline --features egui`

use eframe::egui;
use wordfall::{Color, Config, FallingText};

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([860.0, 560.0])
            .with_title("wordfall - headline"),
        ..Default::default()
    };
    eframe::run_native(
        "wordfall headline",
        options,
        Box::new(|_cc| Ok(Box::new(Headline::new()))),
    )
}

struct Headline {
    text: FallingText,
}

impl Headline {
    fn new() -> Self {
        let config = Config::new(
            "Every word up here is one misplaced semicolon away from the floor",
        )
        .with_highlight_words(["word", "floor"])
        .with_gravity(0.9)
        .with_font_size(30.0)
        .with_background(Color::from_hex("#10141c").unwrap_or(Color::TRANSPARENT));

        Self {
            text: FallingText::new(config).with_height(440.0),
        }
    }
}

impl eframe::App for Headline {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            self.text.show(ui);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Drop again").clicked() {
                    self.text.reset();
                }
                ui.label("Drag a fallen word to throw it around.");
            });
        });
    }
}
