//! # Config Playground
//!
//! Live sliders for gravity, drag stiffness, font size, wireframes and
//! background. Simulation parameters are baked into the world when a
//! session starts, so every change tears the session down and rebuilds it:
//! the words snap back to their static layout and fall again.
//!
//! Run with: `cargo run --example playground --features egui`

use eframe::egui;
use wordfall::{Color, Config, FallingText};

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([980.0, 620.0])
            .with_title("wordfall - playground"),
        ..Default::default()
    };
    eframe::run_native(
        "wordfall playground",
        options,
        Box::new(|_cc| Ok(Box::new(Playground::new()))),
    )
}

struct Playground {
    falling: FallingText,
    text: String,
    gravity: f32,
    stiffness: f32,
    font_size: f32,
    wireframes: bool,
    background: egui::Color32,
}

impl Playground {
    fn new() -> Self {
        let text = "Tune the world and watch the same words fall differently".to_string();
        let gravity = 0.8;
        let stiffness = 0.2;
        let font_size = 26.0;
        let wireframes = false;
        let background = egui::Color32::from_rgb(0x12, 0x16, 0x1f);

        let falling = FallingText::new(Self::config(
            &text, gravity, stiffness, font_size, wireframes, background,
        ))
        .with_height(460.0);

        Self {
            falling,
            text,
            gravity,
            stiffness,
            font_size,
            wireframes,
            background,
        }
    }

    fn config(
        text: &str,
        gravity: f32,
        stiffness: f32,
        font_size: f32,
        wireframes: bool,
        background: egui::Color32,
    ) -> Config {
        Config::new(text)
            .with_highlight_words(["fall", "world"])
            .with_gravity(gravity)
            .with_pointer_stiffness(stiffness)
            .with_font_size(font_size)
            .with_wireframes(wireframes)
            .with_background(Color::rgba(
                background.r(),
                background.g(),
                background.b(),
                background.a(),
            ))
    }
}

impl eframe::App for Playground {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("controls")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.heading("Playground");
                ui.separator();

                ui.add(egui::Slider::new(&mut self.gravity, 0.0..=3.0).text("gravity"));
                ui.add(egui::Slider::new(&mut self.stiffness, 0.01..=1.0).text("drag stiffness"));
                ui.add(egui::Slider::new(&mut self.font_size, 12.0..=48.0).text("font size"));
                ui.checkbox(&mut self.wireframes, "wireframes");
                ui.horizontal(|ui| {
                    ui.label("background");
                    ui.color_edit_button_srgba(&mut self.background);
                });

                ui.add_space(8.0);
                ui.label("text");
                ui.add(egui::TextEdit::multiline(&mut self.text).desired_rows(3));

                ui.add_space(8.0);
                if ui.button("Replay").clicked() {
                    self.falling.reset();
                }

                ui.separator();
                ui.small(
                    "Every control except the replay button changes the \
                     configuration, which rebuilds the session from scratch.",
                );
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.falling.set_config(Self::config(
                &self.text,
                self.gravity,
                self.stiffness,
                self.font_size,
                self.wireframes,
                self.background,
            ));
            self.falling.show(ui);
        });
    }
}
