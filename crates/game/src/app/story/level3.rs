#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level3Dialogue {
    Intro,
    RockCleared,
    Gate,
}

/// Final level: a charging bull, a rock that stops it, and a gate that
/// asks the proverb as an in-dialogue choice instead of a quiz panel.
/// Touching the bull ends the run.
pub(crate) struct Level3 {
    script: Level3Script,
    modes: ModeMachine,
    sequencer: DialogueSequencer,
    active_dialogue: Option<Level3Dialogue>,
    rock_destroyed: bool,
    gate_cleared: bool,
}

impl Level3 {
    pub(crate) fn new(script: Level3Script) -> Self {
        Self {
            script,
            modes: ModeMachine::new(SceneMode::Playing),
            sequencer: DialogueSequencer::new(CHAR_INTERVAL_MS),
            active_dialogue: None,
            rock_destroyed: false,
            gate_cleared: false,
        }
    }

    fn start_dialogue(
        &mut self,
        which: Level3Dialogue,
        sequence: narrative::Sequence,
        outbox: &mut CommandOutbox,
    ) {
        self.modes.transition(SceneMode::Dialogue, outbox);
        match self.sequencer.start(sequence, outbox) {
            Ok(()) => self.active_dialogue = Some(which),
            Err(err) => warn!(error = %err, dialogue = ?which, "level3_dialogue_start_failed"),
        }
    }

    fn handle_sequencer_event(
        &mut self,
        event: SequencerEvent,
        outbox: &mut CommandOutbox,
    ) -> LevelCommand {
        match event {
            SequencerEvent::ChoiceResolved { value, held, .. } => {
                if self.active_dialogue == Some(Level3Dialogue::Gate) {
                    if value == self.script.gate_correct_value {
                        self.gate_cleared = true;
                        outbox.push(PresentationCommand::PlayCue("gate_open"));
                    } else if held {
                        outbox.push(PresentationCommand::ShakeView);
                        outbox.push(PresentationCommand::Toast(self.script.wrong_toast.clone()));
                    }
                }
                LevelCommand::None
            }
            SequencerEvent::Completed => {
                let finished = self.active_dialogue.take();
                if finished == Some(Level3Dialogue::RockCleared) {
                    outbox.push(PresentationCommand::PlayCue("door_open"));
                }
                self.modes.transition(SceneMode::Playing, outbox);
                if finished == Some(Level3Dialogue::Gate) && self.gate_cleared {
                    return LevelCommand::SwitchTo(LevelKey::Ending);
                }
                LevelCommand::None
            }
        }
    }

    fn trigger_game_over(&mut self, outbox: &mut CommandOutbox) {
        outbox.push(PresentationCommand::ShakeView);
        outbox.push(PresentationCommand::PlayCue("player_down"));
        outbox.push(PresentationCommand::Toast(
            self.script.game_over_toast.clone(),
        ));
        self.modes.transition(SceneMode::GameOver, outbox);
    }
}

impl Level for Level3 {
    fn load(&mut self, outbox: &mut CommandOutbox) {
        self.modes = ModeMachine::new(SceneMode::Playing);
        self.sequencer = DialogueSequencer::new(CHAR_INTERVAL_MS);
        self.active_dialogue = None;
        self.rock_destroyed = false;
        self.gate_cleared = false;

        self.start_dialogue(Level3Dialogue::Intro, self.script.intro.clone(), outbox);
        info!(level = "level3", "level_loaded");
    }

    fn update(
        &mut self,
        dt_ms: u64,
        input: &InputSnapshot,
        events: &[WorldEvent],
        outbox: &mut CommandOutbox,
    ) -> LevelCommand {
        match self.modes.mode() {
            SceneMode::Dialogue => {
                freeze_player(outbox);
                if input.menu_up_pressed() {
                    self.sequencer.handle_cursor(CursorMove::Up, outbox);
                }
                if input.menu_down_pressed() {
                    self.sequencer.handle_cursor(CursorMove::Down, outbox);
                }
                let mut command = LevelCommand::None;
                if input.primary_pressed() {
                    for event in self.sequencer.handle_primary(outbox) {
                        let next = self.handle_sequencer_event(event, outbox);
                        if next != LevelCommand::None {
                            command = next;
                        }
                    }
                }
                self.sequencer.tick(dt_ms, outbox);
                command
            }
            SceneMode::Playing | SceneMode::DoorOpen => {
                emit_movement(input, outbox);

                if overlapped(events, EntityTag::Player, EntityTag::Bull) {
                    self.trigger_game_over(outbox);
                    return LevelCommand::None;
                }

                if !self.rock_destroyed && overlapped(events, EntityTag::Bull, EntityTag::Rock) {
                    self.rock_destroyed = true;
                    outbox.push(PresentationCommand::PlayCue("rock_smash"));
                    outbox.push(PresentationCommand::ShakeView);
                    outbox.push(PresentationCommand::PlayCue("bull_defeated"));
                    self.start_dialogue(
                        Level3Dialogue::RockCleared,
                        self.script.rock_cleared.clone(),
                        outbox,
                    );
                    return LevelCommand::None;
                }

                if overlapped(events, EntityTag::Player, EntityTag::Door) {
                    if self.rock_destroyed {
                        self.start_dialogue(
                            Level3Dialogue::Gate,
                            self.script.gate.clone(),
                            outbox,
                        );
                    } else {
                        outbox.push(PresentationCommand::Toast(
                            self.script.blocked_door_toast.clone(),
                        ));
                    }
                }
                LevelCommand::None
            }
            SceneMode::GameOver => {
                freeze_player(outbox);
                if input.restart_pressed() {
                    return LevelCommand::Restart;
                }
                LevelCommand::None
            }
            SceneMode::Quiz | SceneMode::Cutscene => {
                freeze_player(outbox);
                LevelCommand::None
            }
        }
    }

    fn unload(&mut self, outbox: &mut CommandOutbox) {
        self.sequencer.cancel(outbox);
        info!(level = "level3", "level_unloaded");
    }

    fn mode(&self) -> SceneMode {
        self.modes.mode()
    }
}
