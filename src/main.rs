//! Viewer: renders a scene every frame and presents the framebuffer
//!
//! Usage: `softraster [scene.ron]`. Without a scene file a built-in demo is
//! shown. Keys 0-4 pick the shading mode (none, wire, flat, Gouraud, Phong),
//! P writes a PNG screenshot.

use std::path::{Path, PathBuf};

use macroquad::prelude::*;
use softraster::rasterizer::{Renderer, ShadingMode};
use softraster::scene::{load_scene, RenderConfig, RenderContext, SceneDescription};
use softraster::VERSION;
use tracing_subscriber::EnvFilter;

const MODE_KEYS: [KeyCode; 5] = [
    KeyCode::Key0,
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
];

fn window_conf() -> Conf {
    Conf {
        window_title: format!("softraster v{}", VERSION),
        window_width: 1000,
        window_height: 750,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Load the scene named on the command line, falling back to the demo
fn load_context() -> (RenderContext, usize, usize) {
    let demo = || {
        let scene = SceneDescription::demo();
        let ctx = scene
            .build(Path::new("."))
            .unwrap_or_else(|e| unreachable!("demo scene uses no files: {e}"));
        (ctx, scene.config.width, scene.config.height)
    };

    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        tracing::info!("no scene file given, showing demo");
        return demo();
    };

    let base_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
    let built = load_scene(&path).and_then(|scene| {
        let ctx = scene.build(&base_dir)?;
        Ok((ctx, scene.config.width, scene.config.height))
    });

    match built {
        Ok(loaded) => {
            tracing::info!(path = %path.display(), "loaded scene");
            loaded
        }
        Err(e) => {
            tracing::error!(path = %path.display(), "failed to load scene: {}", e);
            demo()
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (mut ctx, width, height) = load_context();
    // Texture2D sizes are u16
    let width = width.clamp(1, RenderConfig::MAX_DIMENSION);
    let height = height.clamp(1, RenderConfig::MAX_DIMENSION);
    let mut renderer = Renderer::new(width, height);
    let mut screenshots = 0;

    tracing::info!(width, height, mode = ctx.mode.label(), "=== softraster ===");

    loop {
        for (i, key) in MODE_KEYS.iter().enumerate() {
            if is_key_pressed(*key) {
                if let Some(mode) = ShadingMode::from_index(i) {
                    ctx.set_mode(mode);
                    tracing::info!(mode = mode.label(), "shading mode");
                }
            }
        }

        let stats = renderer.render(&ctx);
        let fb = renderer.framebuffer();

        if is_key_pressed(KeyCode::P) {
            screenshots += 1;
            let path = format!("frame-{:03}.png", screenshots);
            match fb.save_png(&path) {
                Ok(()) => tracing::info!(%path, "saved screenshot"),
                Err(e) => tracing::warn!(%path, "screenshot failed: {}", e),
            }
        }

        clear_background(Color::from_rgba(20, 20, 24, 255));

        // Letterbox the framebuffer into the window
        let scale = (screen_width() / fb.width as f32).min(screen_height() / fb.height as f32);
        let draw_w = fb.width as f32 * scale;
        let draw_h = fb.height as f32 * scale;
        let draw_x = (screen_width() - draw_w) / 2.0;
        let draw_y = (screen_height() - draw_h) / 2.0;

        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
        texture.set_filter(FilterMode::Nearest);
        draw_texture_ex(
            &texture,
            draw_x,
            draw_y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(draw_w, draw_h)),
                ..Default::default()
            },
        );

        draw_text(
            &format!(
                "{} | {} tris ({} culled) | {} px | {:.0} fps",
                ctx.mode.label(),
                stats.triangles,
                stats.triangles_rejected,
                stats.pixels_written,
                get_fps()
            ),
            8.0,
            20.0,
            18.0,
            WHITE,
        );

        next_frame().await;
    }
}
