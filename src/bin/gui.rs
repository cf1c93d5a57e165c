// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use eframe::egui::{IconData, ViewportBuilder};
use image::{Rgba, RgbaImage};
use ra_scrape::{gui, log};

/// Round crown-gold badge, drawn at startup.
fn app_icon() -> IconData {
    const N: u32 = 64;
    let c = (N as f32 - 1.0) / 2.0;
    let img = RgbaImage::from_fn(N, N, |x, y| {
        let (dx, dy) = (x as f32 - c, y as f32 - c);
        let d = (dx * dx + dy * dy).sqrt();
        if d > c {
            Rgba([0, 0, 0, 0])
        } else if d > c - 5.0 {
            Rgba([40, 70, 160, 255])
        } else {
            let shade = (200.0 - d * 2.0) as u8;
            Rgba([240, shade, 40, 255])
        }
    });
    let (w, h) = img.dimensions();
    IconData { rgba: img.into_raw(), width: w, height: h }
}

fn main() {
    let _log = match log::init() {
        Ok(g) => Some(g),
        Err(e) => {
            eprintln!("Logging disabled: {e}");
            None
        }
    };

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_icon(app_icon()),
        ..Default::default()
    };

    if let Err(e) = gui::run(options) {
        eprintln!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
