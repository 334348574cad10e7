use narrative::{
    CommandOutbox, ControlCommand, CursorMove, DialogueSequencer, InputAction, InputSnapshot,
    ModeMachine, PresentationCommand, QuizController, QuizEvent, Scheduler, SceneMode,
    SequencerEvent,
};
use tracing::{info, warn};

use crate::app::script::{
    EndingScript, GameScripts, Level1Script, Level2Script, Level3Script, BUSH_COUNT,
};

const CHAR_INTERVAL_MS: u64 = 50;
const PLAYER_SPEED_UNITS_PER_SECOND: f32 = 300.0;
const BIRDS_TO_CLEAR: usize = 2;
const BUSH_RECHECK_COOLDOWN_MS: u64 = 2_000;

include!("types.rs");
include!("machine.rs");
include!("level1.rs");
include!("level2.rs");
include!("level3.rs");
include!("ending.rs");
include!("util.rs");

pub(crate) fn build_level_machine(scripts: GameScripts) -> LevelMachine {
    LevelMachine::new(
        Box::new(Level1::new(scripts.level1)),
        Box::new(Level2::new(scripts.level2)),
        Box::new(Level3::new(scripts.level3)),
        Box::new(Ending::new(scripts.ending)),
    )
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
