use raylib::prelude::*;

use crate::constants::*;
use crate::content::Block;
use crate::deck::{Layout, Slide};
use crate::presenter::Pane;
use crate::texture_loader::MediaStore;

const HEADING_SIZE: i32 = 72;
const SUBHEADING_SIZE: i32 = 40;
const BODY_SIZE: i32 = 30;
const DETAIL_SIZE: i32 = 24;
const STAT_SIZE: i32 = 64;
const LINE_GAP: f32 = 10.0;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

pub fn apply_alpha(c: Color, alpha: f32) -> Color {
    Color::new(c.r, c.g, c.b, (c.a as f32 * alpha.clamp(0.0, 1.0)) as u8)
}

/// Greedy word wrap against a width-measuring function. The measurer is
/// injected so layout stays testable away from the font system.
pub fn wrap_text(text: &str, max_width: i32, measure: &dyn Fn(&str) -> i32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line = word.to_string();
            continue;
        }
        let candidate = format!("{line} {word}");
        if measure(&candidate) <= max_width {
            line = candidate;
        } else {
            lines.push(line);
            line = word.to_string();
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Draw one pane of a slide into the design framebuffer. The pane's offset
/// shifts the whole composition horizontally; its alpha fades every element.
pub fn draw_slide(
    d: &mut RaylibDrawHandle,
    slide: &Slide,
    step: u32,
    pane: &Pane,
    media: &MediaStore,
) {
    let dx = pane.offset * RENDER_WIDTH as f32;
    let alpha = pane.alpha;
    let blocks = slide.content.render(step);

    match slide.layout {
        Layout::Cover => {
            if let Some(tex) = media.backdrop(slide.id) {
                draw_texture_cover(d, tex, dx, apply_alpha(Color::WHITE, alpha * 0.4));
                d.draw_rectangle_gradient_v(
                    dx as i32,
                    RENDER_HEIGHT / 2,
                    RENDER_WIDTH,
                    RENDER_HEIGHT / 2,
                    apply_alpha(Color::new(2, 6, 23, 0), alpha),
                    apply_alpha(BG_COLOR, alpha),
                );
            }
            let region = full_region(dx);
            draw_blocks_centered_v(d, &blocks, region, Align::Center, alpha);
        }
        Layout::Center => {
            let region = full_region(dx);
            draw_blocks_centered_v(d, &blocks, region, Align::Center, alpha);
        }
        Layout::Default | Layout::TwoCols => {
            let region = full_region(dx);
            draw_blocks(d, &blocks, region, Align::Left, alpha);
        }
        Layout::ImageRight => {
            let (content, figure) = split_region(dx);
            if let Some(tex) = media.figure(slide.id) {
                draw_texture_fit(d, tex, figure, apply_alpha(Color::WHITE, alpha * 0.85));
            }
            draw_blocks_centered_v(d, &blocks, content, Align::Left, alpha);
        }
        Layout::ImageLeft => {
            let (content, figure) = split_region(dx);
            // Mirror: figure pane on the left, content on the right
            let figure = Rectangle::new(content.x, figure.y, figure.width, figure.height);
            let content = Rectangle::new(
                figure.x + figure.width + SLIDE_MARGIN,
                content.y,
                content.width,
                content.height,
            );
            if let Some(tex) = media.figure(slide.id) {
                draw_texture_fit(d, tex, figure, apply_alpha(Color::WHITE, alpha * 0.85));
            }
            draw_blocks_centered_v(d, &blocks, content, Align::Left, alpha);
        }
    }
}

fn full_region(dx: f32) -> Rectangle {
    Rectangle::new(
        dx + SLIDE_MARGIN,
        SLIDE_MARGIN,
        RENDER_WIDTH as f32 - 2.0 * SLIDE_MARGIN,
        RENDER_HEIGHT as f32 - 2.0 * SLIDE_MARGIN,
    )
}

fn split_region(dx: f32) -> (Rectangle, Rectangle) {
    let half = RENDER_WIDTH as f32 / 2.0;
    let content = Rectangle::new(
        dx + SLIDE_MARGIN,
        SLIDE_MARGIN,
        half - 1.5 * SLIDE_MARGIN,
        RENDER_HEIGHT as f32 - 2.0 * SLIDE_MARGIN,
    );
    let figure = Rectangle::new(
        dx + half + SLIDE_MARGIN * 0.5,
        SLIDE_MARGIN,
        half - 1.5 * SLIDE_MARGIN,
        RENDER_HEIGHT as f32 - 2.0 * SLIDE_MARGIN,
    );
    (content, figure)
}

fn block_height(block: &Block, width: f32) -> f32 {
    let measure = |s: &str, size: i32| measure_text(s, size);
    match block {
        Block::Heading(text) => {
            wrap_text(text, width as i32, &|s| measure(s, HEADING_SIZE)).len() as f32
                * (HEADING_SIZE as f32 + LINE_GAP)
                + 24.0
        }
        Block::Subheading(text) => {
            wrap_text(text, width as i32, &|s| measure(s, SUBHEADING_SIZE)).len() as f32
                * (SUBHEADING_SIZE as f32 + LINE_GAP)
                + 16.0
        }
        Block::Paragraph(text) => {
            wrap_text(text, width as i32, &|s| measure(s, BODY_SIZE)).len() as f32
                * (BODY_SIZE as f32 + LINE_GAP)
                + 12.0
        }
        Block::Bullet { text, detail } => {
            let mut h = wrap_text(text, width as i32 - 48, &|s| measure(s, BODY_SIZE)).len() as f32
                * (BODY_SIZE as f32 + LINE_GAP);
            if let Some(detail) = detail {
                h += wrap_text(detail, width as i32 - 48, &|s| measure(s, DETAIL_SIZE)).len()
                    as f32
                    * (DETAIL_SIZE as f32 + LINE_GAP);
            }
            h + 14.0
        }
        Block::Stat { .. } => STAT_SIZE as f32 + DETAIL_SIZE as f32 + LINE_GAP + 24.0,
        Block::Formula(_) => SUBHEADING_SIZE as f32 + 40.0,
        Block::Callout(text) => {
            wrap_text(text, width as i32 - 64, &|s| measure(s, BODY_SIZE)).len() as f32
                * (BODY_SIZE as f32 + LINE_GAP)
                + 48.0
        }
        Block::Columns(cols) => cols
            .iter()
            .map(|col| {
                let col_width = width / cols.len() as f32 - SLIDE_MARGIN * 0.5;
                col.iter().map(|b| block_height(b, col_width)).sum()
            })
            .fold(0.0_f32, f32::max),
        Block::Spacer(h) => *h,
    }
}

fn draw_blocks_centered_v(
    d: &mut RaylibDrawHandle,
    blocks: &[Block],
    region: Rectangle,
    align: Align,
    alpha: f32,
) {
    let total: f32 = blocks.iter().map(|b| block_height(b, region.width)).sum();
    let y = region.y + ((region.height - total) / 2.0).max(0.0);
    let region = Rectangle::new(region.x, y, region.width, region.height);
    draw_blocks(d, blocks, region, align, alpha);
}

fn draw_blocks(
    d: &mut RaylibDrawHandle,
    blocks: &[Block],
    region: Rectangle,
    align: Align,
    alpha: f32,
) {
    let mut y = region.y;
    for block in blocks {
        draw_block(d, block, region, &mut y, align, alpha);
    }
}

fn draw_lines(
    d: &mut RaylibDrawHandle,
    lines: &[String],
    region: Rectangle,
    y: &mut f32,
    size: i32,
    color: Color,
    align: Align,
) {
    for line in lines {
        let x = match align {
            Align::Left => region.x,
            Align::Center => region.x + (region.width - measure_text(line, size) as f32) / 2.0,
        };
        d.draw_text(line, x as i32, *y as i32, size, color);
        *y += size as f32 + LINE_GAP;
    }
}

fn draw_block(
    d: &mut RaylibDrawHandle,
    block: &Block,
    region: Rectangle,
    y: &mut f32,
    align: Align,
    alpha: f32,
) {
    match block {
        Block::Heading(text) => {
            let lines = wrap_text(text, region.width as i32, &|s| measure_text(s, HEADING_SIZE));
            draw_lines(d, &lines, region, y, HEADING_SIZE, apply_alpha(TEXT_COLOR, alpha), align);
            *y += 24.0;
        }
        Block::Subheading(text) => {
            let lines =
                wrap_text(text, region.width as i32, &|s| measure_text(s, SUBHEADING_SIZE));
            draw_lines(
                d,
                &lines,
                region,
                y,
                SUBHEADING_SIZE,
                apply_alpha(ACCENT_CYAN, alpha),
                align,
            );
            *y += 16.0;
        }
        Block::Paragraph(text) => {
            let lines = wrap_text(text, region.width as i32, &|s| measure_text(s, BODY_SIZE));
            draw_lines(d, &lines, region, y, BODY_SIZE, apply_alpha(MUTED_COLOR, alpha), align);
            *y += 12.0;
        }
        Block::Bullet { text, detail } => {
            let marker_y = *y + BODY_SIZE as f32 / 2.0;
            d.draw_circle_v(
                Vector2::new(region.x + 10.0, marker_y),
                5.0,
                apply_alpha(ACCENT_CYAN, alpha),
            );
            let indented = Rectangle::new(
                region.x + 48.0,
                region.y,
                region.width - 48.0,
                region.height,
            );
            let lines =
                wrap_text(text, indented.width as i32, &|s| measure_text(s, BODY_SIZE));
            draw_lines(d, &lines, indented, y, BODY_SIZE, apply_alpha(TEXT_COLOR, alpha), Align::Left);
            if let Some(detail) = detail {
                let lines =
                    wrap_text(detail, indented.width as i32, &|s| measure_text(s, DETAIL_SIZE));
                draw_lines(
                    d,
                    &lines,
                    indented,
                    y,
                    DETAIL_SIZE,
                    apply_alpha(MUTED_COLOR, alpha),
                    Align::Left,
                );
            }
            *y += 14.0;
        }
        Block::Stat { value, label } => {
            let x = match align {
                Align::Left => region.x,
                Align::Center => {
                    region.x + (region.width - measure_text(value, STAT_SIZE) as f32) / 2.0
                }
            };
            d.draw_text(value, x as i32, *y as i32, STAT_SIZE, apply_alpha(ACCENT_EMERALD, alpha));
            *y += STAT_SIZE as f32 + LINE_GAP;
            let x = match align {
                Align::Left => region.x,
                Align::Center => {
                    region.x + (region.width - measure_text(label, DETAIL_SIZE) as f32) / 2.0
                }
            };
            d.draw_text(label, x as i32, *y as i32, DETAIL_SIZE, apply_alpha(MUTED_COLOR, alpha));
            *y += DETAIL_SIZE as f32 + 24.0;
        }
        Block::Formula(text) => {
            let width = measure_text(text, SUBHEADING_SIZE) as f32 + 48.0;
            let x = match align {
                Align::Left => region.x,
                Align::Center => region.x + (region.width - width) / 2.0,
            };
            let rect = Rectangle::new(x, *y, width, SUBHEADING_SIZE as f32 + 24.0);
            d.draw_rectangle_rec(rect, apply_alpha(PANEL_COLOR, alpha * 0.6));
            d.draw_rectangle_lines_ex(rect, 1.0, apply_alpha(ACCENT_EMERALD, alpha * 0.6));
            d.draw_text(
                text,
                (x + 24.0) as i32,
                (*y + 12.0) as i32,
                SUBHEADING_SIZE,
                apply_alpha(ACCENT_EMERALD, alpha),
            );
            *y += SUBHEADING_SIZE as f32 + 40.0;
        }
        Block::Callout(text) => {
            let lines =
                wrap_text(text, region.width as i32 - 64, &|s| measure_text(s, BODY_SIZE));
            let height = lines.len() as f32 * (BODY_SIZE as f32 + LINE_GAP) + 32.0;
            let rect = Rectangle::new(region.x, *y, region.width, height);
            d.draw_rectangle_rec(rect, apply_alpha(PANEL_COLOR, alpha * 0.8));
            d.draw_rectangle_rec(
                Rectangle::new(region.x, *y, 4.0, height),
                apply_alpha(ACCENT_CYAN, alpha),
            );
            let inner = Rectangle::new(region.x + 32.0, region.y, region.width - 64.0, region.height);
            let mut inner_y = *y + 16.0;
            draw_lines(
                d,
                &lines,
                inner,
                &mut inner_y,
                BODY_SIZE,
                apply_alpha(TEXT_COLOR, alpha),
                Align::Left,
            );
            *y += height + 16.0;
        }
        Block::Columns(cols) => {
            let count = cols.len().max(1) as f32;
            let col_width = (region.width - SLIDE_MARGIN * 0.5 * (count - 1.0)) / count;
            let mut max_y = *y;
            for (i, col) in cols.iter().enumerate() {
                let col_region = Rectangle::new(
                    region.x + i as f32 * (col_width + SLIDE_MARGIN * 0.5),
                    region.y,
                    col_width,
                    region.height,
                );
                let mut col_y = *y;
                for block in col {
                    draw_block(d, block, col_region, &mut col_y, Align::Left, alpha);
                }
                max_y = max_y.max(col_y);
            }
            *y = max_y;
        }
        Block::Spacer(h) => {
            *y += h;
        }
    }
}

fn draw_texture_fit(d: &mut RaylibDrawHandle, tex: &Texture2D, region: Rectangle, tint: Color) {
    let tex_w = tex.width() as f32;
    let tex_h = tex.height() as f32;
    let scale = (region.width / tex_w).min(region.height / tex_h);
    let w = tex_w * scale;
    let h = tex_h * scale;
    let dest = Rectangle::new(
        region.x + (region.width - w) / 2.0,
        region.y + (region.height - h) / 2.0,
        w,
        h,
    );
    d.draw_texture_pro(
        tex,
        Rectangle::new(0.0, 0.0, tex_w, tex_h),
        dest,
        Vector2::zero(),
        0.0,
        tint,
    );
}

fn draw_texture_cover(d: &mut RaylibDrawHandle, tex: &Texture2D, dx: f32, tint: Color) {
    let tex_w = tex.width() as f32;
    let tex_h = tex.height() as f32;
    let scale = (RENDER_WIDTH as f32 / tex_w).max(RENDER_HEIGHT as f32 / tex_h);
    let w = tex_w * scale;
    let h = tex_h * scale;
    let dest = Rectangle::new(
        dx + (RENDER_WIDTH as f32 - w) / 2.0,
        (RENDER_HEIGHT as f32 - h) / 2.0,
        w,
        h,
    );
    d.draw_texture_pro(
        tex,
        Rectangle::new(0.0, 0.0, tex_w, tex_h),
        dest,
        Vector2::zero(),
        0.0,
        tint,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    // Width model: 10 px per character, like a monospace face.
    fn measure(s: &str) -> i32 {
        s.chars().count() as i32 * 10
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let lines = wrap_text("hello world", 200, &measure);
        assert_eq!(lines, vec!["hello world"]);
    }

    #[test]
    fn long_text_wraps_at_word_boundaries() {
        let lines = wrap_text("alpha beta gamma delta", 100, &measure);
        assert_eq!(lines, vec!["alpha beta", "gamma", "delta"]);
    }

    #[test]
    fn overlong_words_get_their_own_line() {
        let lines = wrap_text("hi incomprehensibilities hi", 100, &measure);
        assert_eq!(lines, vec!["hi", "incomprehensibilities", "hi"]);
    }

    #[test]
    fn empty_text_produces_no_lines() {
        assert!(wrap_text("", 100, &measure).is_empty());
        assert!(wrap_text("   ", 100, &measure).is_empty());
    }

    #[test]
    fn alpha_scales_the_alpha_channel_only() {
        let c = apply_alpha(Color::new(10, 20, 30, 200), 0.5);
        assert_eq!((c.r, c.g, c.b, c.a), (10, 20, 30, 100));
        let clamped = apply_alpha(Color::WHITE, 2.0);
        assert_eq!(clamped.a, 255);
    }
}
