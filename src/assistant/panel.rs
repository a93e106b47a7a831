use raylib::prelude::*;
use tracing::debug;

use crate::assistant::audio::SpeechClip;
use crate::assistant::client::{ChatMessage, Role};
use crate::assistant::worker::{Job, Outcome, Reply, Worker};
use crate::constants::*;
use crate::render::{apply_alpha, wrap_text};

const PANEL_WIDTH: f32 = 560.0;
const PANEL_HEIGHT: f32 = 720.0;
const FONT: i32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Chat,
    Vision,
}

/// Assistant side panel: transcript, input line, and the pending-request
/// bookkeeping. Service failures land here as inline messages; navigation
/// state is never touched from this module.
pub struct Panel {
    pub open: bool,
    mode: Mode,
    messages: Vec<ChatMessage>,
    input: String,
    chat_pending: Option<u64>,
    vision_pending: Option<u64>,
    speech_pending: Option<u64>,
    status: Option<String>,
}

impl Panel {
    pub fn new() -> Self {
        Self {
            open: false,
            mode: Mode::Chat,
            messages: Vec::new(),
            input: String::new(),
            chat_pending: None,
            vision_pending: None,
            speech_pending: None,
            status: None,
        }
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
        if self.open {
            self.mode = Mode::Chat;
        }
    }

    /// While the panel is open, printable keys belong to the input line.
    pub fn captures_keyboard(&self) -> bool {
        self.open
    }

    pub fn is_waiting(&self) -> bool {
        self.chat_pending.is_some() || self.vision_pending.is_some()
    }

    pub fn is_synthesizing(&self) -> bool {
        self.speech_pending.is_some()
    }

    pub fn push_char(&mut self, c: char) {
        if !c.is_control() && self.input.chars().count() < 400 {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn submit_chat(&mut self, worker: &mut Worker) {
        let message = self.input.trim().to_string();
        if message.is_empty() || self.chat_pending.is_some() {
            return;
        }
        self.mode = Mode::Chat;
        let history = self.messages.clone();
        self.messages.push(ChatMessage { role: Role::User, text: message.clone() });
        self.input.clear();
        self.chat_pending = Some(worker.submit(Job::Chat { history, message }));
    }

    /// Analyze the current slide's figure. Supersedes any analysis already in
    /// flight: its reply will arrive with a stale sequence and be dropped.
    pub fn request_vision(&mut self, worker: &mut Worker, image: Vec<u8>, mime: String) {
        self.open = true;
        self.mode = Mode::Vision;
        self.messages.push(ChatMessage {
            role: Role::User,
            text: "[submitted the current figure for analysis]".into(),
        });
        self.vision_pending = Some(worker.submit(Job::Vision { image, mime }));
    }

    pub fn request_speech(&mut self, worker: &mut Worker, text: String) {
        if self.speech_pending.is_some() {
            return; // one synthesis at a time; the narrator handles playback
        }
        self.status = None;
        self.speech_pending = Some(worker.submit(Job::Speech { text }));
    }

    /// Route a worker outcome into panel state. Returns a clip when a current
    /// speech request completed and should start playing.
    pub fn handle_outcome(&mut self, outcome: Outcome) -> Option<SpeechClip> {
        match outcome.reply {
            Reply::Chat(result) => {
                if self.chat_pending != Some(outcome.seq) {
                    debug!(seq = outcome.seq, "dropping superseded chat reply");
                    return None;
                }
                self.chat_pending = None;
                let text = result.unwrap_or_else(|e| format!("Sorry, I hit an error: {e}"));
                self.messages.push(ChatMessage { role: Role::Model, text });
            }
            Reply::Vision(result) => {
                if self.vision_pending != Some(outcome.seq) {
                    debug!(seq = outcome.seq, "dropping superseded analysis reply");
                    return None;
                }
                self.vision_pending = None;
                let text = result.unwrap_or_else(|e| format!("Could not analyze the figure: {e}"));
                self.messages.push(ChatMessage { role: Role::Model, text });
            }
            Reply::Speech(result) => {
                if self.speech_pending != Some(outcome.seq) {
                    debug!(seq = outcome.seq, "dropping superseded narration");
                    return None;
                }
                self.speech_pending = None;
                match result {
                    Ok(clip) => return Some(clip),
                    Err(e) => self.status = Some(format!("Narration failed: {e}")),
                }
            }
        }
        None
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, text: &str) {
        self.status = Some(text.to_string());
    }

    pub fn draw(&self, d: &mut RaylibDrawHandle) {
        if !self.open {
            return;
        }
        let x = RENDER_WIDTH as f32 - PANEL_WIDTH - 48.0;
        let y = RENDER_HEIGHT as f32 - PANEL_HEIGHT - 120.0;
        let panel = Rectangle::new(x, y, PANEL_WIDTH, PANEL_HEIGHT);
        d.draw_rectangle_rec(panel, PANEL_COLOR);
        d.draw_rectangle_lines_ex(panel, 1.0, PANEL_BORDER);

        // Header with the mode label
        d.draw_rectangle(x as i32, y as i32, PANEL_WIDTH as i32, 56, Color::new(30, 41, 59, 255));
        let label = match self.mode {
            Mode::Chat => "Assistant / Chat",
            Mode::Vision => "Assistant / Figure analysis",
        };
        d.draw_text(label, (x + 20.0) as i32, (y + 16.0) as i32, FONT, ACCENT_CYAN);

        // Transcript, newest at the bottom
        let inner_w = PANEL_WIDTH - 40.0;
        let input_h = 64.0;
        let transcript_bottom = y + PANEL_HEIGHT - input_h - 16.0;
        let mut cursor = transcript_bottom;
        let mut rows: Vec<(Role, Vec<String>)> = Vec::new();
        for msg in self.messages.iter().rev() {
            let lines = wrap_text(&msg.text, inner_w as i32 - 24, &|s| measure_text(s, FONT));
            rows.push((msg.role, lines));
        }
        if self.is_waiting() {
            rows.insert(0, (Role::Model, vec!["...".to_string()]));
        }
        for (role, lines) in rows {
            let bubble_h = lines.len() as f32 * (FONT as f32 + 6.0) + 16.0;
            cursor -= bubble_h + 10.0;
            if cursor < y + 64.0 {
                break; // older messages scroll out of the panel
            }
            let (bubble_color, text_color) = match role {
                Role::User => (Color::new(8, 51, 68, 255), TEXT_COLOR),
                Role::Model => (Color::new(30, 41, 59, 255), MUTED_COLOR),
            };
            d.draw_rectangle_rec(
                Rectangle::new(x + 20.0, cursor, inner_w, bubble_h),
                bubble_color,
            );
            for (i, line) in lines.iter().enumerate() {
                d.draw_text(
                    line,
                    (x + 32.0) as i32,
                    (cursor + 8.0 + i as f32 * (FONT as f32 + 6.0)) as i32,
                    FONT,
                    text_color,
                );
            }
        }

        // Input line
        let input_y = y + PANEL_HEIGHT - input_h;
        d.draw_rectangle_rec(
            Rectangle::new(x + 20.0, input_y, inner_w, input_h - 16.0),
            Color::new(2, 6, 23, 255),
        );
        let prompt = if self.input.is_empty() {
            "Ask about hydrogen..."
        } else {
            self.input.as_str()
        };
        let color = if self.input.is_empty() {
            apply_alpha(MUTED_COLOR, 0.6)
        } else {
            TEXT_COLOR
        };
        d.draw_text(prompt, (x + 32.0) as i32, (input_y + 12.0) as i32, FONT, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::client::ClientError;

    fn chat_outcome(seq: u64, text: &str) -> Outcome {
        Outcome { seq, reply: Reply::Chat(Ok(text.to_string())) }
    }

    #[test]
    fn stale_replies_are_dropped_by_sequence() {
        let mut panel = Panel::new();
        panel.chat_pending = Some(2);

        assert!(panel.handle_outcome(chat_outcome(1, "old")).is_none());
        assert!(panel.messages.is_empty(), "superseded reply must not land");
        assert!(panel.chat_pending.is_some());

        panel.handle_outcome(chat_outcome(2, "current"));
        assert_eq!(panel.messages.len(), 1);
        assert_eq!(panel.messages[0].text, "current");
        assert!(panel.chat_pending.is_none());
    }

    #[test]
    fn chat_errors_become_inline_messages() {
        let mut panel = Panel::new();
        panel.chat_pending = Some(1);
        panel.handle_outcome(Outcome {
            seq: 1,
            reply: Reply::Chat(Err(ClientError::EmptyResponse)),
        });
        assert_eq!(panel.messages.len(), 1);
        assert_eq!(panel.messages[0].role, Role::Model);
        assert!(panel.messages[0].text.contains("error"));
    }

    #[test]
    fn current_speech_reply_hands_back_the_clip() {
        let mut panel = Panel::new();
        panel.speech_pending = Some(4);
        let clip = SpeechClip { sample_rate: 24_000, samples: vec![1, 2, 3] };
        let out = panel.handle_outcome(Outcome {
            seq: 4,
            reply: Reply::Speech(Ok(clip.clone())),
        });
        assert_eq!(out, Some(clip));
        assert!(!panel.is_synthesizing());
    }

    #[test]
    fn stale_speech_reply_is_ignored() {
        let mut panel = Panel::new();
        panel.speech_pending = Some(5);
        let clip = SpeechClip { sample_rate: 24_000, samples: vec![0] };
        let out = panel.handle_outcome(Outcome { seq: 3, reply: Reply::Speech(Ok(clip)) });
        assert!(out.is_none());
        assert!(panel.is_synthesizing(), "the current request is still pending");
    }

    #[test]
    fn speech_failure_sets_a_status_line() {
        let mut panel = Panel::new();
        panel.speech_pending = Some(1);
        panel.handle_outcome(Outcome {
            seq: 1,
            reply: Reply::Speech(Err(ClientError::EmptyResponse)),
        });
        assert!(panel.status().unwrap().contains("Narration failed"));
    }

    #[test]
    fn input_editing_ignores_control_characters() {
        let mut panel = Panel::new();
        panel.push_char('h');
        panel.push_char('\u{8}');
        panel.push_char('i');
        assert_eq!(panel.input, "hi");
        panel.backspace();
        assert_eq!(panel.input, "h");
        panel.backspace();
        panel.backspace();
        assert_eq!(panel.input, "");
    }
}
