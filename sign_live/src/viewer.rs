//! Software-rendered viewer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────┬─────────────────────┐
//! │                              │  SIGN LIVE          │
//! │   landmark skeleton          │  ┌───────────────┐  │
//! │   (green bones, red joints)  │  │      D        │  │
//! │                              │  └───────────────┘  │
//! │                              │  signature 01000    │
//! │                              │  caption            │
//! │                              │  supported gestures │
//! ├──────────────────────────────┴─────────────────────┤
//! │ status bar / keys                                  │
//! └────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;
use std::time::Duration;

use anyhow::Context;
use hand_frame::{Landmark, HAND_CONNECTIONS};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::app::AppState;
use crate::source::SimKey;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:     usize = 900;
pub const WIN_H:     usize = 560;
const STATUS_H:      usize = 24;
const HAND_W:        usize = 520;
const HAND_H:        usize = WIN_H - STATUS_H;
const PANEL_X:       usize = HAND_W + 20;
const PANEL_W:       usize = WIN_W - PANEL_X - 20;
const SYMBOL_Y:      usize = 48;
const SYMBOL_H:      usize = 190;
const LINE_H:        usize = 20;

const BG_COLOR:      u32 = 0xFF111827;
const HAND_BG:       u32 = 0xFF1F2937;
const PANEL_TEXT:    u32 = 0xFFE5E7EB;
const DIM_TEXT:      u32 = 0xFF9CA3AF;
const BONE_COLOR:    u32 = 0xFF00FF00;
const JOINT_COLOR:   u32 = 0xFFFF0000;
const HIT_BG:        u32 = 0xFF10B981;  // emerald
const MISS_BG:       u32 = 0xFF374151;
const ACCENT:        u32 = 0xFFFBBF24;
const STATUS_BG:     u32 = 0xFF0B1220;

const JOINT_RADIUS:  isize = 3;

const KEY_HELP: &str = "1-5 toggle  A B D L W 0 shape  N hand  M malformed  Q quit";

// ════════════════════════════════════════════════════════════════════════════
// Viewer
// ════════════════════════════════════════════════════════════════════════════

pub struct Viewer {
    window: Window,
    buf:    Vec<u32>,
    sim_tx: Option<Sender<SimKey>>,
    mirror: bool,
}

impl Viewer {
    /// `sim_tx` is present only when the keyboard drives a simulated hand.
    pub fn new(sim_tx: Option<Sender<SimKey>>, mirror: bool) -> anyhow::Result<Self> {
        let mut window = Window::new(
            "Sign Live - hand sign recognition",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).context("failed to open viewer window")?;

        window.limit_update_rate(Some(Duration::from_millis(16)));

        Ok(Viewer { window, buf: vec![BG_COLOR; WIN_W * WIN_H], sim_tx, mirror })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Forward key presses to the simulator. Returns false on quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        for key in self.window.get_keys_pressed(KeyRepeat::No) {
            if key == Key::Escape { return false; }
            let Some(sim_key) = key_char(key).and_then(SimKey::from_char) else { continue };
            if let Some(tx) = &self.sim_tx {
                let _ = tx.send(sim_key);
            }
            if sim_key == SimKey::Quit { return false; }
        }
        true
    }

    pub fn render(&mut self, app: &AppState) -> anyhow::Result<()> {
        self.buf.fill(BG_COLOR);

        // ── Hand panel ───────────────────────────────────────────────────
        self.fill_rect(0, 0, HAND_W, HAND_H, HAND_BG);
        if let Some(points) = app.latest().and_then(|c| c.landmarks.as_deref()) {
            self.draw_skeleton(points);
        } else {
            let msg = app.caption();
            let x = HAND_W.saturating_sub(text_width(msg, 2)) / 2;
            self.draw_text(msg, x, HAND_H / 2, 2, DIM_TEXT);
        }

        // ── Symbol box ───────────────────────────────────────────────────
        self.draw_text("SIGN LIVE", PANEL_X, 16, 2, ACCENT);
        let hit = app.is_recognized();
        self.fill_rect(PANEL_X, SYMBOL_Y, PANEL_W, SYMBOL_H, if hit { HIT_BG } else { MISS_BG });

        let symbol = app.shown().as_str();
        let scale = symbol_scale(symbol, PANEL_W - 40, SYMBOL_H - 40);
        let sx = PANEL_X + PANEL_W.saturating_sub(text_width(symbol, scale)) / 2;
        let sy = SYMBOL_Y + SYMBOL_H.saturating_sub(GLYPH_H * scale) / 2;
        self.draw_text(symbol, sx, sy, scale, PANEL_TEXT);

        // ── Signature and caption ────────────────────────────────────────
        let mut y = SYMBOL_Y + SYMBOL_H + 14;
        let signature = app.latest()
            .and_then(|c| c.signature)
            .map_or_else(|| "-----".to_string(), |s| s.to_string());
        self.draw_text(&format!("signature {signature}"), PANEL_X, y, 2, PANEL_TEXT);
        y += LINE_H + 4;
        self.draw_text(app.caption(), PANEL_X, y, 2, if hit { HIT_BG } else { DIM_TEXT });
        y += LINE_H + 16;

        // ── Legend ───────────────────────────────────────────────────────
        self.draw_text("supported gestures", PANEL_X, y, 2, ACCENT);
        y += LINE_H + 2;
        let shown_sig = app.latest().and_then(|c| c.signature);
        for rule in app.table().rules() {
            if y + LINE_H > HAND_H { break; }
            let color = if Some(rule.signature) == shown_sig { HIT_BG } else { PANEL_TEXT };
            let line = format!("{} {:<2} {}", rule.signature, rule.symbol, rule.description.as_deref().unwrap_or(""));
            self.draw_text(&line, PANEL_X, y, 2, color);
            y += LINE_H;
        }

        // ── Status bar ───────────────────────────────────────────────────
        self.fill_rect(0, HAND_H, WIN_W, STATUS_H, STATUS_BG);
        let mut status = app.status();
        if self.sim_tx.is_some() {
            status = format!("{status}   {KEY_HELP}");
        }
        self.draw_text(&status, 8, HAND_H + 8, 1, DIM_TEXT);

        self.window
            .update_with_buffer(&self.buf, WIN_W, WIN_H)
            .context("failed to present frame")
    }

    // ── Skeleton ──────────────────────────────────────────────────────────

    fn to_screen(&self, p: &Landmark) -> Option<(isize, isize)> {
        if !(p.x.is_finite() && p.y.is_finite()) { return None; }
        let x = if self.mirror { 1.0 - p.x } else { p.x };
        // Far off-screen points still clip cleanly at this range.
        let px = (x * HAND_W as f32).clamp(-(WIN_W as f32), 2.0 * WIN_W as f32);
        let py = (p.y * HAND_H as f32).clamp(-(WIN_H as f32), 2.0 * WIN_H as f32);
        Some((px as isize, py as isize))
    }

    /// Draws whatever points arrived; bones need both ends present.
    fn draw_skeleton(&mut self, points: &[Landmark]) {
        for &(a, b) in HAND_CONNECTIONS.iter() {
            let (Some(pa), Some(pb)) = (points.get(a), points.get(b)) else { continue };
            if let (Some(a), Some(b)) = (self.to_screen(pa), self.to_screen(pb)) {
                self.draw_line(a, b, BONE_COLOR);
                self.draw_line((a.0 + 1, a.1), (b.0 + 1, b.1), BONE_COLOR);
            }
        }
        for p in points {
            if let Some(c) = self.to_screen(p) {
                self.fill_disc(c, JOINT_RADIUS, JOINT_COLOR);
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    /// Plot inside the hand panel only.
    fn put(&mut self, x: isize, y: isize, color: u32) {
        if (0..HAND_W as isize).contains(&x) && (0..HAND_H as isize).contains(&y) {
            self.buf[y as usize * WIN_W + x as usize] = color;
        }
    }

    /// Bresenham.
    fn draw_line(&mut self, (x0, y0): (isize, isize), (x1, y1): (isize, isize), color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.put(x, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    fn fill_disc(&mut self, (cx, cy): (isize, isize), r: isize, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            if cx + GLYPH_W * scale > WIN_W { break; }
            for (row, bits) in glyph(ch).iter().enumerate() {
                for col in 0..GLYPH_W {
                    if bits & (1 << (GLYPH_W - 1 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += (GLYPH_W + 1) * scale;
        }
    }
}

fn key_char(key: Key) -> Option<char> {
    Some(match key {
        Key::Key0 => '0', Key::Key1 => '1', Key::Key2 => '2',
        Key::Key3 => '3', Key::Key4 => '4', Key::Key5 => '5',
        Key::A => 'a', Key::B => 'b', Key::D => 'd', Key::L => 'l', Key::W => 'w',
        Key::N => 'n', Key::M => 'm', Key::Q => 'q',
        _ => return None,
    })
}

fn text_width(text: &str, scale: usize) -> usize {
    let n = text.chars().count();
    (n * (GLYPH_W + 1)).saturating_sub(1) * scale
}

/// Largest integer scale that fits `text` in the box, at least 1.
fn symbol_scale(text: &str, max_w: usize, max_h: usize) -> usize {
    let unit_w = text_width(text, 1).max(1);
    (max_w / unit_w).min(max_h / GLYPH_H).max(1)
}

// ────────────────────────────────────────────────────────────────────────────
// 5×7 bitmap font, one byte per row, high bit on the left
// ────────────────────────────────────────────────────────────────────────────

const GLYPH_W: usize = 5;
const GLYPH_H: usize = 7;

fn glyph(c: char) -> [u8; GLYPH_H] {
    match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
        ':' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        '/' => [0b00001, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '=' => [0b00000, 0b00000, 0b11111, 0b00000, 0b11111, 0b00000, 0b00000],
        '\'' => [0b00100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000],
        ' ' => [0; GLYPH_H],
        _   => [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{CAPTION_IDLE, CAPTION_RECOGNIZED};
    use sign_table::GestureRuleTable;

    const MISSING: [u8; GLYPH_H] = [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111];

    #[test]
    fn ui_text_has_glyphs() {
        let table = GestureRuleTable::baseline();
        let mut text = format!("{CAPTION_IDLE}{CAPTION_RECOGNIZED}{KEY_HELP}SIGN LIVE signature supported gestures");
        for rule in table.rules() {
            text.push_str(&format!("{} {} {}", rule.signature, rule.symbol, rule.description.as_deref().unwrap_or("")));
        }
        for c in text.chars() {
            assert_ne!(glyph(c), MISSING, "no glyph for {c:?}");
        }
    }

    #[test]
    fn glyph_rows_fit_width() {
        for c in ('A'..='Z').chain('0'..='9') {
            assert!(glyph(c).iter().all(|row| *row < 1 << GLYPH_W), "{c}");
        }
    }

    #[test]
    fn single_letter_gets_a_big_scale() {
        let s = symbol_scale("D", PANEL_W - 40, SYMBOL_H - 40);
        assert!(s >= 10);
        assert!(text_width("D", s) <= PANEL_W - 40);
        assert!(GLYPH_H * s <= SYMBOL_H - 40);
    }

    #[test]
    fn long_symbols_shrink() {
        let short = symbol_scale("A", 300, 150);
        let long = symbol_scale("HELLO", 300, 150);
        assert!(long < short);
        assert!(text_width("HELLO", long) <= 300);
        assert_eq!(symbol_scale(&"X".repeat(200), 300, 150), 1);
    }

    #[test]
    fn keys_reach_the_simulator() {
        assert_eq!(key_char(Key::Key3).and_then(SimKey::from_char), SimKey::from_char('3'));
        assert_eq!(key_char(Key::Key0).and_then(SimKey::from_char), SimKey::from_char('0'));
        assert_eq!(key_char(Key::Q).and_then(SimKey::from_char), Some(SimKey::Quit));
        assert_eq!(key_char(Key::Z), None);
    }
}
