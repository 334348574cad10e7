pub mod choice;
pub mod command;
pub mod dialogue;
pub mod input;
pub mod mode;
pub mod quiz;
pub mod scheduler;
pub mod typewriter;

pub use choice::{Choice, ChoiceCursor, ChoiceError, CursorMove};
pub use command::{CommandOutbox, ControlCommand, PresentationCommand};
pub use dialogue::{
    DialogueSequencer, Line, Sequence, SequenceError, SequencerError, SequencerEvent,
    SequencerState,
};
pub use input::{InputAction, InputSnapshot};
pub use mode::{ModeMachine, SceneMode};
pub use quiz::{
    QuizController, QuizError, QuizEvent, QuizOption, QuizPhase, QuizQuestion,
    QUIZ_SUCCESS_DELAY_MS, QUIZ_WRONG_CLEAR_DELAY_MS,
};
pub use scheduler::{Scheduler, TaskHandle};
pub use typewriter::{Typewriter, TypewriterTick, DEFAULT_CHAR_INTERVAL_MS};
