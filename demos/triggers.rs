//! # Trigger Tour
//!
//! All four activation triggers on one scrolling page: auto fires on the
//! first frame, scroll fires once its block is 10% visible, click and
//! hover wait for the pointer. Each trigger fires at most once; scroll
//! back up and the fallen words stay fallen.
//!
//! Run with: `cargo run --example triggers --features egui`

use eframe::egui;
use wordfall::{Color, Config, FallingText, Trigger};

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 640.0])
            .with_title("wordfall - triggers"),
        ..Default::default()
    };
    eframe::run_native(
        "wordfall triggers",
        options,
        Box::new(|_cc| Ok(Box::new(TriggerTour::new()))),
    )
}

struct TriggerTour {
    blocks: Vec<(&'static str, FallingText)>,
}

impl TriggerTour {
    fn new() -> Self {
        let block = |text: &str, trigger: Trigger| {
            let config = Config::new(text)
                .with_highlight_words(["falls", "fall", "drop"])
                .with_trigger(trigger)
                .with_gravity(0.8)
                .with_font_size(22.0)
                .with_background(Color::from_hex("#141821").unwrap_or(Color::TRANSPARENT));
            FallingText::new(config).with_height(240.0)
        };

        Self {
            blocks: vec![
                (
                    "auto - falls immediately",
                    block("This block does not wait for anyone, it just falls", Trigger::Auto),
                ),
                (
                    "scroll - falls when it comes into view",
                    block("Scroll down far enough and these words drop on cue", Trigger::Scroll),
                ),
                (
                    "click - falls on the first click",
                    block("Click anywhere in this block to make the words fall", Trigger::Click),
                ),
                (
                    "hover - falls when the pointer enters",
                    block("Hover over this block and watch everything fall apart", Trigger::Hover),
                ),
            ],
        }
    }
}

impl eframe::App for TriggerTour {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(12.0);
                for (label, falling) in &mut self.blocks {
                    ui.heading(*label);
                    ui.add_space(4.0);
                    falling.show(ui);
                    // Enough space that the next block starts off screen,
                    // so the scroll trigger has something to do.
                    ui.add_space(220.0);
                }
            });
        });
    }
}
