/// First level: one stone, two magpies. Clearing both in a single
/// throw opens the gate, and the gate asks the matching proverb.
pub(crate) struct Level1 {
    script: Level1Script,
    modes: ModeMachine,
    sequencer: DialogueSequencer,
    quiz: QuizController,
    stone_ready: bool,
    birds_cleared: bool,
}

impl Level1 {
    pub(crate) fn new(script: Level1Script) -> Self {
        let quiz = QuizController::new(script.quiz.clone());
        Self {
            script,
            modes: ModeMachine::new(SceneMode::Playing),
            sequencer: DialogueSequencer::new(CHAR_INTERVAL_MS),
            quiz,
            stone_ready: true,
            birds_cleared: false,
        }
    }

    fn route_dialogue_input(&mut self, input: &InputSnapshot, outbox: &mut CommandOutbox) {
        if input.menu_up_pressed() {
            self.sequencer.handle_cursor(CursorMove::Up, outbox);
        }
        if input.menu_down_pressed() {
            self.sequencer.handle_cursor(CursorMove::Down, outbox);
        }
        if input.primary_pressed() {
            for event in self.sequencer.handle_primary(outbox) {
                if event == SequencerEvent::Completed {
                    self.modes.transition(SceneMode::Playing, outbox);
                }
            }
        }
    }
}

impl Level for Level1 {
    fn load(&mut self, outbox: &mut CommandOutbox) {
        self.modes = ModeMachine::new(SceneMode::Playing);
        self.sequencer = DialogueSequencer::new(CHAR_INTERVAL_MS);
        self.quiz = QuizController::new(self.script.quiz.clone());
        self.stone_ready = true;
        self.birds_cleared = false;

        self.modes.transition(SceneMode::Dialogue, outbox);
        if let Err(err) = self.sequencer.start(self.script.intro.clone(), outbox) {
            warn!(error = %err, "level1_intro_start_failed");
        }
        info!(level = "level1", "level_loaded");
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
                self.route_dialogue_input(input, outbox);
                self.sequencer.tick(dt_ms, outbox);
                LevelCommand::None
            }
            SceneMode::Quiz => {
                freeze_player(outbox);
                if input.menu_up_pressed() {
                    self.quiz.handle_cursor(CursorMove::Up, outbox);
                }
                if input.menu_down_pressed() {
                    self.quiz.handle_cursor(CursorMove::Down, outbox);
                }
                if input.primary_pressed() {
                    self.quiz.submit(outbox);
                }
                if self.quiz.tick(dt_ms, outbox) == Some(QuizEvent::Passed) {
                    outbox.push(PresentationCommand::Toast(self.script.success_toast.clone()));
                    self.modes.transition(SceneMode::Playing, outbox);
                    return LevelCommand::SwitchTo(LevelKey::Level2);
                }
                LevelCommand::None
            }
            SceneMode::Playing | SceneMode::DoorOpen => {
                emit_movement(input, outbox);

                if input.primary_pressed() && self.stone_ready && !self.birds_cleared {
                    self.stone_ready = false;
                    outbox.push(PresentationCommand::PlayCue("stone_throw"));
                }

                if !self.birds_cleared {
                    let hits = birds_hit_by_stone(events);
                    if hits >= BIRDS_TO_CLEAR {
                        self.birds_cleared = true;
                        outbox.push(PresentationCommand::PlayCue("birds_cleared"));
                        outbox.push(PresentationCommand::PlayCue("door_open"));
                        outbox.push(PresentationCommand::Toast(
                            self.script.door_hint_toast.clone(),
                        ));
                        self.modes.transition(SceneMode::DoorOpen, outbox);
                    } else if hits > 0 {
                        outbox.push(PresentationCommand::ShakeView);
                        outbox.push(PresentationCommand::Toast(self.script.miss_toast.clone()));
                        self.stone_ready = true;
                    }
                    if events.contains(&WorldEvent::ProjectileLost) {
                        self.stone_ready = true;
                    }
                }

                if self.modes.mode() == SceneMode::DoorOpen
                    && overlapped(events, EntityTag::Player, EntityTag::Door)
                {
                    self.modes.transition(SceneMode::Quiz, outbox);
                    self.quiz.open(outbox);
                }
                LevelCommand::None
            }
            SceneMode::Cutscene | SceneMode::GameOver => {
                freeze_player(outbox);
                LevelCommand::None
            }
        }
    }

    fn unload(&mut self, outbox: &mut CommandOutbox) {
        self.sequencer.cancel(outbox);
        self.quiz.close(outbox);
        info!(level = "level1", "level_unloaded");
    }

    fn mode(&self) -> SceneMode {
        self.modes.mode()
    }
}
