use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChoiceError {
    #[error("cannot present an empty choice list")]
    EmptyChoiceList,
}

/// Cursor over a presented choice list. Movement wraps cyclically in
/// both directions; confirming never mutates the cursor.
#[derive(Debug, Clone)]
pub struct ChoiceCursor {
    choices: Vec<Choice>,
    cursor: usize,
}

impl ChoiceCursor {
    pub fn present(choices: Vec<Choice>) -> Result<Self, ChoiceError> {
        if choices.is_empty() {
            return Err(ChoiceError::EmptyChoiceList);
        }
        Ok(Self { choices, cursor: 0 })
    }

    pub fn move_cursor(&mut self, direction: CursorMove) {
        let len = self.choices.len();
        let delta = match direction {
            CursorMove::Up => len - 1,
            CursorMove::Down => 1,
        };
        self.cursor = (self.cursor + delta) % len;
    }

    pub fn confirm(&self) -> (usize, &Choice) {
        (self.cursor, &self.choices[self.cursor])
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.choices
            .iter()
            .map(|choice| choice.label.clone())
            .collect()
    }
}
