use tracing::debug;

use crate::command::{CommandOutbox, ControlCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneMode {
    Playing,
    Dialogue,
    Quiz,
    Cutscene,
    DoorOpen,
    GameOver,
}

impl SceneMode {
    /// World simulation and free movement run only in these modes.
    pub fn simulation_runs(self) -> bool {
        matches!(self, SceneMode::Playing | SceneMode::DoorOpen)
    }

    pub fn movement_allowed(self) -> bool {
        self.simulation_runs()
    }
}

/// One per level instance. Transitions are synchronous; crossing the
/// freeze boundary emits pause/resume exactly once per crossing, so
/// Dialogue -> Quiz emits nothing.
#[derive(Debug)]
pub struct ModeMachine {
    mode: SceneMode,
}

impl ModeMachine {
    pub fn new(initial: SceneMode) -> Self {
        Self { mode: initial }
    }

    pub fn mode(&self) -> SceneMode {
        self.mode
    }

    pub fn transition(&mut self, next: SceneMode, outbox: &mut CommandOutbox) -> bool {
        if next == self.mode {
            return false;
        }
        let was_running = self.mode.simulation_runs();
        let will_run = next.simulation_runs();
        if was_running && !will_run {
            outbox.push_control(ControlCommand::PauseWorld);
        }
        if !was_running && will_run {
            outbox.push_control(ControlCommand::ResumeWorld);
        }
        debug!(from = ?self.mode, to = ?next, "mode_transition");
        self.mode = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entering_a_frozen_mode_pauses_the_world() {
        let mut machine = ModeMachine::new(SceneMode::Playing);
        let mut outbox = CommandOutbox::default();

        assert!(machine.transition(SceneMode::Dialogue, &mut outbox));
        assert_eq!(outbox.control(), &[ControlCommand::PauseWorld]);
    }

    #[test]
    fn returning_to_a_running_mode_resumes_the_world() {
        let mut machine = ModeMachine::new(SceneMode::Dialogue);
        let mut outbox = CommandOutbox::default();

        machine.transition(SceneMode::Playing, &mut outbox);
        assert_eq!(outbox.control(), &[ControlCommand::ResumeWorld]);
    }

    #[test]
    fn frozen_to_frozen_emits_nothing() {
        let mut machine = ModeMachine::new(SceneMode::Dialogue);
        let mut outbox = CommandOutbox::default();

        assert!(machine.transition(SceneMode::Quiz, &mut outbox));
        assert!(outbox.control().is_empty());
    }

    #[test]
    fn playing_to_door_open_emits_nothing() {
        let mut machine = ModeMachine::new(SceneMode::Playing);
        let mut outbox = CommandOutbox::default();

        machine.transition(SceneMode::DoorOpen, &mut outbox);
        assert!(outbox.control().is_empty());
        assert!(machine.mode().movement_allowed());
    }

    #[test]
    fn same_mode_transition_is_a_noop() {
        let mut machine = ModeMachine::new(SceneMode::Playing);
        let mut outbox = CommandOutbox::default();

        assert!(!machine.transition(SceneMode::Playing, &mut outbox));
        assert!(outbox.control().is_empty());
    }
}
