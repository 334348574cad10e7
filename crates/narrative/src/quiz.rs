use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::choice::CursorMove;
use crate::command::{CommandOutbox, PresentationCommand};
use crate::scheduler::Scheduler;

pub const QUIZ_SUCCESS_DELAY_MS: u64 = 1000;
pub const QUIZ_WRONG_CLEAR_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub label: String,
    #[serde(default)]
    pub correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("a quiz question must mark exactly one option correct, got {actual}")]
    CorrectCountMismatch { actual: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    prompt: String,
    options: Vec<QuizOption>,
    correct_index: usize,
}

impl QuizQuestion {
    /// Validated at construction; a malformed question is a data
    /// error and must halt level load.
    pub fn new(prompt: impl Into<String>, options: Vec<QuizOption>) -> Result<Self, QuizError> {
        let correct_indices: Vec<usize> = options
            .iter()
            .enumerate()
            .filter(|(_, option)| option.correct)
            .map(|(index, _)| index)
            .collect();
        if correct_indices.len() != 1 {
            return Err(QuizError::CorrectCountMismatch {
                actual: correct_indices.len(),
            });
        }
        Ok(Self {
            prompt: prompt.into(),
            options,
            correct_index: correct_indices[0],
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn labels(&self) -> Vec<String> {
        self.options
            .iter()
            .map(|option| option.label.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Closed,
    Answering,
    WrongFeedback,
    SuccessFeedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizEvent {
    Passed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuizTimer {
    FireSuccess,
    ClearWrong,
}

/// A wrong answer is never an error: feedback clears after a short
/// delay and resubmission is allowed, without limit.
#[derive(Debug)]
pub struct QuizController {
    question: QuizQuestion,
    cursor: usize,
    phase: QuizPhase,
    scheduler: Scheduler<QuizTimer>,
}

impl QuizController {
    pub fn new(question: QuizQuestion) -> Self {
        Self {
            question,
            cursor: 0,
            phase: QuizPhase::Closed,
            scheduler: Scheduler::new(),
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != QuizPhase::Closed
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn question(&self) -> &QuizQuestion {
        &self.question
    }

    pub fn open(&mut self, outbox: &mut CommandOutbox) {
        self.scheduler.cancel_all();
        self.cursor = 0;
        self.phase = QuizPhase::Answering;
        outbox.push(PresentationCommand::ShowQuizPanel {
            prompt: self.question.prompt().to_string(),
            options: self.question.labels(),
        });
        outbox.push(PresentationCommand::SetQuizHighlight(self.cursor));
        info!("quiz_opened");
    }

    pub fn handle_cursor(&mut self, direction: CursorMove, outbox: &mut CommandOutbox) {
        if self.phase != QuizPhase::Answering {
            return;
        }
        let len = self.question.options().len();
        let delta = match direction {
            CursorMove::Up => len - 1,
            CursorMove::Down => 1,
        };
        self.cursor = (self.cursor + delta) % len;
        outbox.push(PresentationCommand::SetQuizHighlight(self.cursor));
    }

    /// Explicit submit, distinct from cursor movement. Ignored while
    /// feedback from a previous submission is still pending.
    pub fn submit(&mut self, outbox: &mut CommandOutbox) {
        if self.phase != QuizPhase::Answering {
            return;
        }
        let correct = self.cursor == self.question.correct_index();
        outbox.push(PresentationCommand::SetQuizFeedback {
            option_index: self.cursor,
            correct,
        });
        if correct {
            self.phase = QuizPhase::SuccessFeedback;
            self.scheduler
                .after(QUIZ_SUCCESS_DELAY_MS, QuizTimer::FireSuccess);
            info!(option_index = self.cursor, "quiz_answered_correctly");
        } else {
            self.phase = QuizPhase::WrongFeedback;
            self.scheduler
                .after(QUIZ_WRONG_CLEAR_DELAY_MS, QuizTimer::ClearWrong);
            debug!(option_index = self.cursor, "quiz_answered_wrong");
        }
    }

    pub fn tick(&mut self, dt_ms: u64, outbox: &mut CommandOutbox) -> Option<QuizEvent> {
        let mut event = None;
        for timer in self.scheduler.advance(dt_ms) {
            match timer {
                QuizTimer::ClearWrong => {
                    outbox.push(PresentationCommand::ClearQuizFeedback);
                    self.phase = QuizPhase::Answering;
                }
                QuizTimer::FireSuccess => {
                    outbox.push(PresentationCommand::HideQuizPanel);
                    self.phase = QuizPhase::Closed;
                    event = Some(QuizEvent::Passed);
                }
            }
        }
        event
    }

    /// Cancels any pending feedback timers; a stale timer must never
    /// fire after the quiz is closed.
    pub fn close(&mut self, outbox: &mut CommandOutbox) {
        if self.phase == QuizPhase::Closed {
            return;
        }
        self.scheduler.cancel_all();
        outbox.push(PresentationCommand::HideQuizPanel);
        self.phase = QuizPhase::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> QuizQuestion {
        QuizQuestion::new(
            "Which proverb fits?",
            vec![
                QuizOption {
                    label: "A".to_string(),
                    correct: false,
                },
                QuizOption {
                    label: "B".to_string(),
                    correct: true,
                },
            ],
        )
        .expect("question")
    }

    fn open_controller() -> (QuizController, CommandOutbox) {
        let mut controller = QuizController::new(question());
        let mut outbox = CommandOutbox::default();
        controller.open(&mut outbox);
        (controller, outbox)
    }

    #[test]
    fn construction_rejects_zero_or_multiple_correct_options() {
        let none = QuizQuestion::new(
            "?",
            vec![QuizOption {
                label: "A".to_string(),
                correct: false,
            }],
        );
        assert_eq!(none.err(), Some(QuizError::CorrectCountMismatch { actual: 0 }));

        let both = QuizQuestion::new(
            "?",
            vec![
                QuizOption {
                    label: "A".to_string(),
                    correct: true,
                },
                QuizOption {
                    label: "B".to_string(),
                    correct: true,
                },
            ],
        );
        assert_eq!(both.err(), Some(QuizError::CorrectCountMismatch { actual: 2 }));
    }

    #[test]
    fn down_then_submit_passes_after_the_success_delay() {
        let (mut controller, mut outbox) = open_controller();
        controller.handle_cursor(CursorMove::Down, &mut outbox);
        controller.submit(&mut outbox);
        assert_eq!(controller.phase(), QuizPhase::SuccessFeedback);
        assert!(outbox.presentation().contains(&PresentationCommand::SetQuizFeedback {
            option_index: 1,
            correct: true,
        }));

        assert_eq!(controller.tick(QUIZ_SUCCESS_DELAY_MS - 1, &mut outbox), None);
        assert_eq!(controller.tick(1, &mut outbox), Some(QuizEvent::Passed));
        assert_eq!(controller.phase(), QuizPhase::Closed);
    }

    #[test]
    fn wrong_submit_shows_transient_feedback_then_allows_retry() {
        let (mut controller, mut outbox) = open_controller();
        controller.submit(&mut outbox); // cursor 0 is wrong
        assert_eq!(controller.phase(), QuizPhase::WrongFeedback);

        // Ignored while the feedback is still up.
        controller.submit(&mut outbox);
        controller.handle_cursor(CursorMove::Down, &mut outbox);
        assert_eq!(controller.cursor(), 0);

        assert_eq!(controller.tick(QUIZ_WRONG_CLEAR_DELAY_MS, &mut outbox), None);
        assert_eq!(controller.phase(), QuizPhase::Answering);
        assert!(outbox
            .presentation()
            .contains(&PresentationCommand::ClearQuizFeedback));

        // Unlimited resubmission: this time pick the right answer.
        controller.handle_cursor(CursorMove::Down, &mut outbox);
        controller.submit(&mut outbox);
        assert_eq!(
            controller.tick(QUIZ_SUCCESS_DELAY_MS, &mut outbox),
            Some(QuizEvent::Passed)
        );
    }

    #[test]
    fn cursor_wraps_cyclically() {
        let (mut controller, mut outbox) = open_controller();
        controller.handle_cursor(CursorMove::Up, &mut outbox);
        assert_eq!(controller.cursor(), 1);
        controller.handle_cursor(CursorMove::Down, &mut outbox);
        assert_eq!(controller.cursor(), 0);
    }

    #[test]
    fn close_cancels_a_pending_success_timer() {
        let (mut controller, mut outbox) = open_controller();
        controller.handle_cursor(CursorMove::Down, &mut outbox);
        controller.submit(&mut outbox);

        controller.close(&mut outbox);
        assert_eq!(controller.tick(QUIZ_SUCCESS_DELAY_MS * 2, &mut outbox), None);
        assert_eq!(controller.phase(), QuizPhase::Closed);
    }

    #[test]
    fn reopen_resets_cursor_and_phase() {
        let (mut controller, mut outbox) = open_controller();
        controller.handle_cursor(CursorMove::Down, &mut outbox);
        controller.close(&mut outbox);

        controller.open(&mut outbox);
        assert_eq!(controller.cursor(), 0);
        assert_eq!(controller.phase(), QuizPhase::Answering);
    }
}
