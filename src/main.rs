use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use raylib::core::audio::RaylibAudio;
use raylib::prelude::*;
use tracing::{info, warn};

mod assistant;
mod background;
mod constants;
mod content;
mod deck;
mod deck_data;
mod nav;
mod presenter;
mod render;
mod texture_loader;

use crate::assistant::audio::Narrator;
use crate::assistant::client::GeminiClient;
use crate::assistant::panel::Panel;
use crate::assistant::worker::Worker;
use crate::background::Background;
use crate::constants::*;
use crate::deck::Deck;
use crate::nav::{NavChange, Navigator};
use crate::presenter::Presenter;
use crate::texture_loader::{MediaStore, mime_for_path};

#[derive(Parser)]
#[command(name = "podium", about = "Slide presenter with an embedded AI narrator")]
struct Cli {
    /// Directory holding the deck's media files
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Generative-AI API key. Without it the presentation runs with the
    /// assistant controls disabled.
    #[arg(long, env = "GEMINI_API_KEY")]
    api_key: Option<String>,

    /// Slide to open on (1-based)
    #[arg(long, default_value_t = 1)]
    start: usize,

    /// Advance automatically every N seconds, like an unattended kiosk
    #[arg(long, value_name = "SECONDS")]
    autoplay: Option<f32>,
}

// Everything an input event can ask the application to do this frame.
enum UiAction {
    Prev,
    Next,
    ToggleSpeak,
    AnalyzeFigure,
    TogglePanel,
    Fullscreen,
}

struct HudRects {
    prev: Rectangle,
    next: Rectangle,
    speak: Rectangle,
    vision: Rectangle,
    chat: Rectangle,
}

fn hud_rects() -> HudRects {
    let h = RENDER_HEIGHT as f32;
    let w = RENDER_WIDTH as f32;
    HudRects {
        prev: Rectangle::new(48.0, h - 96.0, 56.0, 56.0),
        next: Rectangle::new(232.0, h - 96.0, 56.0, 56.0),
        speak: Rectangle::new(w - 468.0, h - 96.0, 132.0, 56.0),
        vision: Rectangle::new(w - 320.0, h - 96.0, 148.0, 56.0),
        chat: Rectangle::new(w - 156.0, h - 96.0, 108.0, 56.0),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // --- Deck: validated before any window opens ---
    let deck = deck_data::hydrogen_deck().context("the built-in deck failed validation")?;
    info!(slides = deck.len(), "deck validated");

    // --- Assistant plumbing (optional, never blocks the presentation) ---
    let mut worker = match &cli.api_key {
        Some(key) => Some(Worker::spawn(
            GeminiClient::new(key.clone()).context("building the assistant HTTP client")?,
        )),
        None => {
            warn!("no API key configured; assistant controls are disabled");
            None
        }
    };

    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH / 2, RENDER_HEIGHT / 2)
        .title("Podium - Hydrogen Production")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);
    // Q quits; Escape stays free for closing the panel
    rl.set_exit_key(Some(KeyboardKey::KEY_Q));

    // Audio is best-effort: a machine without a device still presents
    let audio = match RaylibAudio::init_audio_device() {
        Ok(audio) => Some(audio),
        Err(e) => {
            warn!("audio device unavailable, narration disabled: {e}");
            None
        }
    };
    let mut narrator = audio.as_ref().map(Narrator::new);

    let media = MediaStore::load(&mut rl, &thread, &deck, &cli.assets);
    let mut framebuffer = rl
        .load_render_texture(&thread, RENDER_WIDTH as u32, RENDER_HEIGHT as u32)
        .map_err(|e| anyhow::anyhow!("creating the render texture: {e}"))?;

    // --- Presentation state ---
    let mut nav = Navigator::new(&deck);
    if cli.start > 1 {
        nav.jump_to_slide(cli.start - 1);
    }
    let mut presenter = Presenter::new(nav.position().slide);
    let mut background = Background::new();
    let mut panel = Panel::new();
    // Step each slide was last shown at, so an exiting pane keeps its reveal
    let mut shown_steps = vec![0u32; deck.len()];

    let rects = hud_rects();
    let mut autoplay_timer = 0.0_f32;

    // --- Main loop ---
    while !rl.window_should_close() {
        let dt = rl.get_frame_time();
        let typing = panel.captures_keyboard();

        // 1. Gather input
        let mut actions: Vec<UiAction> = Vec::new();

        // Timer-driven trigger feeds the same intent stream as keys and clicks
        if let Some(period) = cli.autoplay {
            autoplay_timer += dt;
            if autoplay_timer >= period {
                autoplay_timer = 0.0;
                actions.push(UiAction::Next);
            }
        }

        if typing {
            while let Some(c) = rl.get_char_pressed() {
                panel.push_char(c);
            }
            if rl.is_key_pressed(KeyboardKey::KEY_BACKSPACE) {
                panel.backspace();
            }
            if rl.is_key_pressed(KeyboardKey::KEY_ENTER) {
                if let Some(w) = worker.as_mut() {
                    panel.submit_chat(w);
                }
            }
            if rl.is_key_pressed(KeyboardKey::KEY_ESCAPE) {
                actions.push(UiAction::TogglePanel);
            }
        } else {
            if rl.is_key_pressed(KeyboardKey::KEY_SPACE)
                || rl.is_key_pressed(KeyboardKey::KEY_ENTER)
            {
                actions.push(UiAction::Next);
            }
            if rl.is_key_pressed(KeyboardKey::KEY_F) {
                actions.push(UiAction::Fullscreen);
            }
            if rl.is_key_pressed(KeyboardKey::KEY_S) {
                actions.push(UiAction::ToggleSpeak);
            }
            if rl.is_key_pressed(KeyboardKey::KEY_V) {
                actions.push(UiAction::AnalyzeFigure);
            }
        }
        // Arrow keys navigate even while the panel is open
        if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) {
            actions.push(UiAction::Next);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
            actions.push(UiAction::Prev);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_TAB) {
            actions.push(UiAction::TogglePanel);
        }

        // Mouse, mapped from window to framebuffer coordinates
        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            let mouse = rl.get_mouse_position();
            let design = Vector2::new(
                mouse.x * RENDER_WIDTH as f32 / rl.get_screen_width() as f32,
                mouse.y * RENDER_HEIGHT as f32 / rl.get_screen_height() as f32,
            );
            if rects.prev.check_collision_point_rec(design) {
                actions.push(UiAction::Prev);
            } else if rects.next.check_collision_point_rec(design) {
                actions.push(UiAction::Next);
            } else if rects.speak.check_collision_point_rec(design) {
                actions.push(UiAction::ToggleSpeak);
            } else if rects.vision.check_collision_point_rec(design) {
                actions.push(UiAction::AnalyzeFigure);
            } else if rects.chat.check_collision_point_rec(design) {
                actions.push(UiAction::TogglePanel);
            }
        }

        // 2. Apply actions
        for action in actions {
            match action {
                UiAction::Next => {
                    autoplay_timer = 0.0;
                    if let Some(NavChange::Slide(direction)) = nav.advance() {
                        presenter.show(nav.position().slide, direction);
                    }
                }
                UiAction::Prev => {
                    autoplay_timer = 0.0;
                    if let Some(NavChange::Slide(direction)) = nav.retreat() {
                        presenter.show(nav.position().slide, direction);
                    }
                }
                UiAction::Fullscreen => rl.toggle_fullscreen(),
                UiAction::TogglePanel => panel.toggle(),
                UiAction::ToggleSpeak => {
                    let Some(w) = worker.as_mut() else { continue };
                    let Some(n) = narrator.as_mut() else { continue };
                    if n.is_playing() {
                        n.stop();
                    } else {
                        let slide = deck.slide(nav.position().slide);
                        panel.request_speech(w, slide.narration.clone());
                    }
                }
                UiAction::AnalyzeFigure => {
                    let Some(w) = worker.as_mut() else { continue };
                    let slide = deck.slide(nav.position().slide);
                    match &slide.figure {
                        Some(figure) => {
                            let path = cli.assets.join(figure);
                            match fs::read(&path) {
                                Ok(bytes) => {
                                    let mime = mime_for_path(&path).to_string();
                                    panel.request_vision(w, bytes, mime);
                                }
                                Err(e) => {
                                    warn!("figure {} unreadable: {e}", path.display());
                                    panel.set_status("This slide's figure file is missing.");
                                }
                            }
                        }
                        None => panel.set_status("This slide has no figure to analyze."),
                    }
                }
            }
        }

        // 3. Drain assistant outcomes (never blocks)
        if let Some(w) = worker.as_mut() {
            while let Some(outcome) = w.poll() {
                if let Some(clip) = panel.handle_outcome(outcome) {
                    if let Some(n) = narrator.as_mut() {
                        n.play(&clip);
                    }
                }
            }
        }

        // 4. Advance animations
        shown_steps[nav.position().slide] = nav.position().step;
        background.update(dt);
        presenter.update(dt);

        // 5. Render the design framebuffer
        let speaking = narrator.as_ref().is_some_and(|n| n.is_playing());
        let assistant_enabled = worker.is_some();
        rl.draw_texture_mode(&thread, &mut framebuffer, |mut tmd| {
            let mut d = tmd.begin_drawing(&thread);
            d.clear_background(BG_COLOR);
            background.draw(&mut d, nav.progress_fraction());

            for pane in presenter.panes() {
                let slide = deck.slide(pane.slide);
                render::draw_slide(&mut d, slide, shown_steps[pane.slide], &pane, &media);
            }

            draw_hud(&mut d, &nav, &deck, &rects, speaking, assistant_enabled, &panel);
            panel.draw(&mut d);
        });

        // 6. Blit to the window, letterbox-free stretch like a projector feed
        let mut d = rl.begin_drawing(&thread);
        let sw = d.get_screen_width() as f32;
        let sh = d.get_screen_height() as f32;
        d.draw_texture_pro(
            &framebuffer,
            Rectangle::new(
                0.0,
                0.0,
                framebuffer.width() as f32,
                -(framebuffer.height() as f32),
            ),
            Rectangle::new(0.0, 0.0, sw, sh),
            Vector2::zero(),
            0.0,
            Color::WHITE,
        );
    }

    Ok(())
}

fn draw_hud(
    d: &mut RaylibDrawHandle,
    nav: &Navigator,
    deck: &Deck,
    rects: &HudRects,
    speaking: bool,
    assistant_enabled: bool,
    panel: &Panel,
) {
    let h = RENDER_HEIGHT as f32;

    // Prev / counter / next, disabled states derived from the navigator
    draw_button(d, rects.prev, "<", nav.can_retreat());
    let counter = format!("{} / {}", nav.position().slide + 1, deck.len());
    let cw = measure_text(&counter, 28);
    d.draw_text(
        &counter,
        (168 - cw / 2) as i32,
        (h - 82.0) as i32,
        28,
        MUTED_COLOR,
    );
    draw_button(d, rects.next, ">", nav.can_advance());

    // Assistant controls
    let speak_label = if speaking { "Stop" } else { "Speak" };
    draw_button(d, rects.speak, speak_label, assistant_enabled);
    draw_button(d, rects.vision, "Analyze", assistant_enabled);
    draw_button(d, rects.chat, "Chat", assistant_enabled);
    if panel.is_synthesizing() {
        d.draw_text(
            "synthesizing...",
            rects.speak.x as i32,
            (rects.speak.y - 28.0) as i32,
            22,
            MUTED_COLOR,
        );
    }
    if let Some(status) = panel.status() {
        let w = measure_text(status, 22);
        d.draw_text(
            status,
            (RENDER_WIDTH - 48 - w) as i32,
            (rects.speak.y - 28.0) as i32,
            22,
            Color::new(248, 113, 113, 255),
        );
    }
    if !assistant_enabled {
        d.draw_text(
            "set GEMINI_API_KEY to enable the assistant",
            rects.speak.x as i32,
            (rects.speak.y - 28.0) as i32,
            22,
            render::apply_alpha(MUTED_COLOR, 0.7),
        );
    }

    // Branding
    let brand = "H2 FUTURE";
    let bw = measure_text(brand, 30);
    d.draw_text(
        brand,
        RENDER_WIDTH - 48 - bw,
        44,
        30,
        render::apply_alpha(ACCENT_EMERALD, 0.5),
    );

    // Progress bar along the bottom edge
    d.draw_rectangle(
        0,
        RENDER_HEIGHT - PROGRESS_BAR_HEIGHT,
        RENDER_WIDTH,
        PROGRESS_BAR_HEIGHT,
        Color::new(17, 24, 39, 255),
    );
    let filled = (nav.progress_fraction() * RENDER_WIDTH as f32) as i32;
    if filled > 0 {
        d.draw_rectangle_gradient_h(
            0,
            RENDER_HEIGHT - PROGRESS_BAR_HEIGHT,
            filled,
            PROGRESS_BAR_HEIGHT,
            ACCENT_CYAN,
            ACCENT_EMERALD,
        );
    }
}

fn draw_button(d: &mut RaylibDrawHandle, rect: Rectangle, label: &str, enabled: bool) {
    let alpha = if enabled { 1.0 } else { 0.35 };
    d.draw_rectangle_rounded(rect, 0.4, 8, render::apply_alpha(PANEL_COLOR, alpha));
    d.draw_rectangle_lines_ex(rect, 1.0, render::apply_alpha(PANEL_BORDER, alpha));
    let tw = measure_text(label, 26);
    d.draw_text(
        label,
        (rect.x + (rect.width - tw as f32) / 2.0) as i32,
        (rect.y + (rect.height - 26.0) / 2.0) as i32,
        26,
        render::apply_alpha(TEXT_COLOR, alpha),
    );
}
