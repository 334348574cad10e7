use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::choice::{Choice, ChoiceCursor, CursorMove};
use crate::command::{CommandOutbox, PresentationCommand};
use crate::typewriter::Typewriter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Choice values that suppress auto-advance when confirmed. A held
    /// resolution keeps the sequencer in the choosing state so the
    /// caller can let the player re-choose, or cancel the sequence.
    #[serde(default)]
    pub hold_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    lines: Vec<Line>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("a dialogue sequence must contain at least one line")]
    Empty,
}

impl Sequence {
    pub fn new(lines: Vec<Line>) -> Result<Self, SequenceError> {
        if lines.is_empty() {
            return Err(SequenceError::Empty);
        }
        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    Typing,
    Waiting,
    Choosing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SequencerEvent {
    ChoiceResolved {
        line_index: usize,
        choice_index: usize,
        value: String,
        held: bool,
    },
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequencerError {
    #[error("a dialogue sequence is already active")]
    AlreadyActive,
}

/// Steps a line sequence through typing, waiting and choosing. All
/// branching side effects belong to the caller, which reacts to the
/// returned events; the sequencer itself never touches game flags.
#[derive(Debug)]
pub struct DialogueSequencer {
    state: SequencerState,
    lines: Vec<Line>,
    line_index: usize,
    typewriter: Typewriter,
    cursor: Option<ChoiceCursor>,
    char_interval_ms: u64,
}

impl DialogueSequencer {
    pub fn new(char_interval_ms: u64) -> Self {
        Self {
            state: SequencerState::Idle,
            lines: Vec::new(),
            line_index: 0,
            typewriter: Typewriter::new(),
            cursor: None,
            char_interval_ms,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != SequencerState::Idle
    }

    pub fn current_line_index(&self) -> Option<usize> {
        self.is_active().then_some(self.line_index)
    }

    pub fn start(
        &mut self,
        sequence: Sequence,
        outbox: &mut CommandOutbox,
    ) -> Result<(), SequencerError> {
        if self.is_active() {
            return Err(SequencerError::AlreadyActive);
        }
        self.lines = sequence.lines;
        self.line_index = 0;
        outbox.push(PresentationCommand::ShowDialoguePanel);
        self.begin_line(outbox);
        Ok(())
    }

    /// Drives the typewriter. Natural completion of a line moves to
    /// waiting, or to choosing when the line offers choices.
    pub fn tick(&mut self, dt_ms: u64, outbox: &mut CommandOutbox) {
        if self.state != SequencerState::Typing {
            return;
        }
        if self.typewriter.tick(dt_ms, outbox).completed {
            self.finish_typing(outbox);
        }
    }

    pub fn handle_primary(&mut self, outbox: &mut CommandOutbox) -> Vec<SequencerEvent> {
        match self.state {
            SequencerState::Idle => Vec::new(),
            SequencerState::Typing => {
                if self.typewriter.skip(outbox) {
                    self.finish_typing(outbox);
                }
                Vec::new()
            }
            SequencerState::Waiting => self.advance(outbox),
            SequencerState::Choosing => self.confirm_choice(outbox),
        }
    }

    /// No-op outside the choosing state.
    pub fn handle_cursor(&mut self, direction: CursorMove, outbox: &mut CommandOutbox) {
        if self.state != SequencerState::Choosing {
            return;
        }
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.move_cursor(direction);
            outbox.push(PresentationCommand::SetChoiceHighlight(cursor.cursor()));
        }
    }

    /// Aborts without emitting `Completed`.
    pub fn cancel(&mut self, outbox: &mut CommandOutbox) {
        if !self.is_active() {
            return;
        }
        self.typewriter.reset();
        if self.cursor.take().is_some() {
            outbox.push(PresentationCommand::HideChoices);
        }
        outbox.push(PresentationCommand::HideDialoguePanel);
        self.lines.clear();
        self.state = SequencerState::Idle;
        debug!("dialogue_cancelled");
    }

    fn begin_line(&mut self, outbox: &mut CommandOutbox) {
        let line = &self.lines[self.line_index];
        outbox.push(PresentationCommand::SetSpeaker(line.speaker.clone()));
        outbox.push(PresentationCommand::SetDialogueText(String::new()));
        self.typewriter.start(line.text.clone(), self.char_interval_ms);
        self.state = SequencerState::Typing;
        debug!(line_index = self.line_index, "dialogue_line_started");
    }

    fn finish_typing(&mut self, outbox: &mut CommandOutbox) {
        let line = &self.lines[self.line_index];
        // A line without choices is a plain line, so the empty-list
        // rejection doubles as the branch condition here.
        match ChoiceCursor::present(line.choices.clone()) {
            Ok(cursor) => {
                outbox.push(PresentationCommand::ShowChoices(cursor.labels()));
                outbox.push(PresentationCommand::SetChoiceHighlight(cursor.cursor()));
                self.cursor = Some(cursor);
                self.state = SequencerState::Choosing;
            }
            Err(_) => {
                self.state = SequencerState::Waiting;
            }
        }
    }

    fn confirm_choice(&mut self, outbox: &mut CommandOutbox) -> Vec<SequencerEvent> {
        let Some(cursor) = self.cursor.as_ref() else {
            return Vec::new();
        };
        let (choice_index, choice) = cursor.confirm();
        let value = choice.value.clone();
        let line = &self.lines[self.line_index];
        let held = line.hold_values.contains(&value);

        let mut events = vec![SequencerEvent::ChoiceResolved {
            line_index: self.line_index,
            choice_index,
            value,
            held,
        }];
        if !held {
            self.cursor = None;
            outbox.push(PresentationCommand::HideChoices);
            events.extend(self.advance(outbox));
        }
        events
    }

    fn advance(&mut self, outbox: &mut CommandOutbox) -> Vec<SequencerEvent> {
        self.line_index += 1;
        if self.line_index < self.lines.len() {
            self.begin_line(outbox);
            Vec::new()
        } else {
            outbox.push(PresentationCommand::HideDialoguePanel);
            self.lines.clear();
            self.state = SequencerState::Idle;
            debug!("dialogue_completed");
            vec![SequencerEvent::Completed]
        }
    }
}
