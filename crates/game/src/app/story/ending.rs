/// Epilogue screen. Plays the congratulations dialogue, then a primary
/// press loops the story back to the first level.
pub(crate) struct Ending {
    script: EndingScript,
    modes: ModeMachine,
    sequencer: DialogueSequencer,
}

impl Ending {
    pub(crate) fn new(script: EndingScript) -> Self {
        Self {
            script,
            modes: ModeMachine::new(SceneMode::Playing),
            sequencer: DialogueSequencer::new(CHAR_INTERVAL_MS),
        }
    }
}

impl Level for Ending {
    fn load(&mut self, outbox: &mut CommandOutbox) {
        self.modes = ModeMachine::new(SceneMode::Playing);
        self.sequencer = DialogueSequencer::new(CHAR_INTERVAL_MS);

        self.modes.transition(SceneMode::Dialogue, outbox);
        if let Err(err) = self.sequencer.start(self.script.congrats.clone(), outbox) {
            warn!(error = %err, "ending_congrats_start_failed");
        }
        info!(level = "ending", "level_loaded");
    }

    fn update(
        &mut self,
        dt_ms: u64,
        input: &InputSnapshot,
        _events: &[WorldEvent],
        outbox: &mut CommandOutbox,
    ) -> LevelCommand {
        freeze_player(outbox);
        match self.modes.mode() {
            SceneMode::Dialogue => {
                if input.primary_pressed() {
                    for event in self.sequencer.handle_primary(outbox) {
                        if event == SequencerEvent::Completed {
                            self.modes.transition(SceneMode::Playing, outbox);
                        }
                    }
                }
                self.sequencer.tick(dt_ms, outbox);
                LevelCommand::None
            }
            _ => {
                if input.primary_pressed() {
                    return LevelCommand::SwitchTo(LevelKey::Level1);
                }
                LevelCommand::None
            }
        }
    }

    fn unload(&mut self, outbox: &mut CommandOutbox) {
        self.sequencer.cancel(outbox);
        info!(level = "ending", "level_unloaded");
    }

    fn mode(&self) -> SceneMode {
        self.modes.mode()
    }
}
