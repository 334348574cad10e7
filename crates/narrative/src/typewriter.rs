use crate::command::{CommandOutbox, PresentationCommand};
use crate::scheduler::{Scheduler, TaskHandle};

pub const DEFAULT_CHAR_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypewriterTick {
    pub revealed: usize,
    pub completed: bool,
}

/// Reveals text one character per interval on an internal repeating
/// task. Completion is reported exactly once per `start`, whether it
/// happens naturally or through `skip`.
#[derive(Debug)]
pub struct Typewriter {
    text: String,
    revealed_bytes: usize,
    scheduler: Scheduler<()>,
    reveal_task: Option<TaskHandle>,
    completion_reported: bool,
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Typewriter {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            revealed_bytes: 0,
            scheduler: Scheduler::new(),
            reveal_task: None,
            completion_reported: true,
        }
    }

    pub fn start(&mut self, text: impl Into<String>, char_interval_ms: u64) {
        self.cancel_reveal_task();
        self.text = text.into();
        self.revealed_bytes = 0;
        self.completion_reported = false;
        if !self.text.is_empty() {
            self.reveal_task = Some(self.scheduler.every(char_interval_ms, ()));
        }
    }

    /// Drives the reveal task. Emits the updated visible text when any
    /// characters were revealed this tick.
    pub fn tick(&mut self, dt_ms: u64, outbox: &mut CommandOutbox) -> TypewriterTick {
        let mut revealed = 0;
        for () in self.scheduler.advance(dt_ms) {
            if self.is_fully_revealed() {
                break;
            }
            self.reveal_next_char();
            revealed += 1;
        }
        if revealed > 0 {
            outbox.push(PresentationCommand::SetDialogueText(
                self.visible_text().to_string(),
            ));
        }
        if self.is_fully_revealed() {
            self.cancel_reveal_task();
        }

        TypewriterTick {
            revealed,
            completed: self.report_completion(),
        }
    }

    /// Reveals everything at once. Returns true only when completion
    /// was newly reported; repeated skips are no-ops.
    pub fn skip(&mut self, outbox: &mut CommandOutbox) -> bool {
        if self.completion_reported {
            return false;
        }
        self.revealed_bytes = self.text.len();
        self.cancel_reveal_task();
        outbox.push(PresentationCommand::SetDialogueText(self.text.clone()));
        self.report_completion()
    }

    /// Cancels the reveal task without reporting completion.
    pub fn reset(&mut self) {
        self.cancel_reveal_task();
        self.text.clear();
        self.revealed_bytes = 0;
        self.completion_reported = true;
    }

    pub fn visible_text(&self) -> &str {
        &self.text[..self.revealed_bytes]
    }

    pub fn is_complete(&self) -> bool {
        self.completion_reported
    }

    fn is_fully_revealed(&self) -> bool {
        self.revealed_bytes == self.text.len()
    }

    fn reveal_next_char(&mut self) {
        if let Some(next) = self.text[self.revealed_bytes..].chars().next() {
            self.revealed_bytes += next.len_utf8();
        }
    }

    fn report_completion(&mut self) -> bool {
        if self.completion_reported || !self.is_fully_revealed() {
            return false;
        }
        self.completion_reported = true;
        true
    }

    fn cancel_reveal_task(&mut self) {
        if let Some(handle) = self.reveal_task.take() {
            self.scheduler.cancel(handle);
        }
    }
}
