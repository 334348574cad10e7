#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level2Dialogue {
    Intro,
    SnakeConfront,
    SnakeResolve,
    SnakeApology,
    BushFound,
    BushEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level2Timer {
    CutsceneStep(usize),
    BushReady(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CutsceneEffect {
    Cue(&'static str),
    Shake,
    ConfrontDialogue,
}

struct CutsceneStep {
    delay_ms: u64,
    effect: CutsceneEffect,
}

/// The orchard cutscene as a step table: the crow bolts, the pear
/// drops on the snake, and the snake turns on the nearest bystander.
/// The confrontation dialogue is the final step.
const LEVEL2_CUTSCENE: &[CutsceneStep] = &[
    CutsceneStep {
        delay_ms: 0,
        effect: CutsceneEffect::Cue("crow_take_off"),
    },
    CutsceneStep {
        delay_ms: 800,
        effect: CutsceneEffect::Cue("feather_drift"),
    },
    CutsceneStep {
        delay_ms: 1_300,
        effect: CutsceneEffect::Cue("pear_fall"),
    },
    CutsceneStep {
        delay_ms: 1_800,
        effect: CutsceneEffect::Cue("pear_hit_snake"),
    },
    CutsceneStep {
        delay_ms: 1_800,
        effect: CutsceneEffect::Shake,
    },
    CutsceneStep {
        delay_ms: 2_800,
        effect: CutsceneEffect::ConfrontDialogue,
    },
];

pub(crate) struct Level2 {
    script: Level2Script,
    modes: ModeMachine,
    sequencer: DialogueSequencer,
    quiz: QuizController,
    timers: Scheduler<Level2Timer>,
    active_dialogue: Option<Level2Dialogue>,
    bush_on_cooldown: [bool; BUSH_COUNT as usize],
    cutscene_played: bool,
    has_feather: bool,
    snake_resolved: bool,
    level_cleared: bool,
}

impl Level2 {
    pub(crate) fn new(script: Level2Script) -> Self {
        let quiz = QuizController::new(script.quiz.clone());
        Self {
            script,
            modes: ModeMachine::new(SceneMode::Playing),
            sequencer: DialogueSequencer::new(CHAR_INTERVAL_MS),
            quiz,
            timers: Scheduler::new(),
            active_dialogue: None,
            bush_on_cooldown: [false; BUSH_COUNT as usize],
            cutscene_played: false,
            has_feather: false,
            snake_resolved: false,
            level_cleared: false,
        }
    }

    fn start_dialogue(
        &mut self,
        which: Level2Dialogue,
        sequence: narrative::Sequence,
        outbox: &mut CommandOutbox,
    ) {
        self.modes.transition(SceneMode::Dialogue, outbox);
        match self.sequencer.start(sequence, outbox) {
            Ok(()) => self.active_dialogue = Some(which),
            Err(err) => warn!(error = %err, dialogue = ?which, "level2_dialogue_start_failed"),
        }
    }

    fn begin_cutscene(&mut self, outbox: &mut CommandOutbox) {
        self.modes.transition(SceneMode::Cutscene, outbox);
        for (index, step) in LEVEL2_CUTSCENE.iter().enumerate() {
            self.timers
                .after(step.delay_ms, Level2Timer::CutsceneStep(index));
        }
    }

    fn apply_timer(&mut self, timer: Level2Timer, outbox: &mut CommandOutbox) {
        match timer {
            Level2Timer::CutsceneStep(index) => match LEVEL2_CUTSCENE[index].effect {
                CutsceneEffect::Cue(cue) => outbox.push(PresentationCommand::PlayCue(cue)),
                CutsceneEffect::Shake => outbox.push(PresentationCommand::ShakeView),
                CutsceneEffect::ConfrontDialogue => {
                    self.start_dialogue(
                        Level2Dialogue::SnakeConfront,
                        self.script.snake_confront.clone(),
                        outbox,
                    );
                }
            },
            Level2Timer::BushReady(index) => {
                self.bush_on_cooldown[index as usize] = false;
            }
        }
    }

    fn handle_bush_contact(&mut self, events: &[WorldEvent], outbox: &mut CommandOutbox) {
        for index in 0..BUSH_COUNT {
            if !overlapped(events, EntityTag::Player, EntityTag::Bush(index)) {
                continue;
            }
            if self.bush_on_cooldown[index as usize] {
                continue;
            }
            self.bush_on_cooldown[index as usize] = true;
            self.timers
                .after(BUSH_RECHECK_COOLDOWN_MS, Level2Timer::BushReady(index));
            if index == self.script.feather_bush && !self.has_feather {
                self.has_feather = true;
                outbox.push(PresentationCommand::PlayCue("feather_found"));
                self.start_dialogue(
                    Level2Dialogue::BushFound,
                    self.script.bush_found.clone(),
                    outbox,
                );
            } else {
                self.start_dialogue(
                    Level2Dialogue::BushEmpty,
                    self.script.bush_empty.clone(),
                    outbox,
                );
            }
            return;
        }
    }

    fn handle_snake_contact(&mut self, outbox: &mut CommandOutbox) {
        if self.snake_resolved {
            self.start_dialogue(
                Level2Dialogue::SnakeApology,
                self.script.snake_apology.clone(),
                outbox,
            );
        } else if self.has_feather {
            self.start_dialogue(
                Level2Dialogue::SnakeResolve,
                self.script.snake_resolve.clone(),
                outbox,
            );
        } else {
            outbox.push(PresentationCommand::Toast(
                self.script.snake_warning_toast.clone(),
            ));
            outbox.push(PresentationCommand::ShakeView);
            outbox.push(PresentationCommand::PlayCue("snake_hiss"));
        }
    }

    fn finish_dialogue(&mut self, outbox: &mut CommandOutbox) {
        if self.active_dialogue.take() == Some(Level2Dialogue::SnakeResolve) {
            self.snake_resolved = true;
            outbox.push(PresentationCommand::PlayCue("passage_open"));
            outbox.push(PresentationCommand::Toast(self.script.resolved_toast.clone()));
        }
        self.modes.transition(SceneMode::Playing, outbox);
    }
}

impl Level for Level2 {
    fn load(&mut self, outbox: &mut CommandOutbox) {
        self.modes = ModeMachine::new(SceneMode::Playing);
        self.sequencer = DialogueSequencer::new(CHAR_INTERVAL_MS);
        self.quiz = QuizController::new(self.script.quiz.clone());
        self.timers = Scheduler::new();
        self.active_dialogue = None;
        self.bush_on_cooldown = [false; BUSH_COUNT as usize];
        self.cutscene_played = false;
        self.has_feather = false;
        self.snake_resolved = false;
        self.level_cleared = false;

        self.start_dialogue(Level2Dialogue::Intro, self.script.intro.clone(), outbox);
        info!(level = "level2", "level_loaded");
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
                if input.primary_pressed() {
                    for event in self.sequencer.handle_primary(outbox) {
                        if event == SequencerEvent::Completed {
                            self.finish_dialogue(outbox);
                        }
                    }
                }
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
                    self.level_cleared = true;
                    outbox.push(PresentationCommand::PlayCue("door_open"));
                    outbox.push(PresentationCommand::Toast(self.script.cleared_toast.clone()));
                    self.modes.transition(SceneMode::Playing, outbox);
                }
                LevelCommand::None
            }
            SceneMode::Cutscene => {
                freeze_player(outbox);
                for timer in self.timers.advance(dt_ms) {
                    self.apply_timer(timer, outbox);
                }
                LevelCommand::None
            }
            SceneMode::Playing | SceneMode::DoorOpen => {
                emit_movement(input, outbox);
                for timer in self.timers.advance(dt_ms) {
                    self.apply_timer(timer, outbox);
                }

                if !self.cutscene_played
                    && overlapped(events, EntityTag::Player, EntityTag::TriggerZone)
                {
                    self.cutscene_played = true;
                    self.begin_cutscene(outbox);
                    return LevelCommand::None;
                }

                self.handle_bush_contact(events, outbox);
                if self.modes.mode() != SceneMode::Playing {
                    return LevelCommand::None;
                }

                if overlapped(events, EntityTag::Player, EntityTag::Snake) {
                    self.handle_snake_contact(outbox);
                }
                if self.modes.mode() != SceneMode::Playing {
                    return LevelCommand::None;
                }

                if overlapped(events, EntityTag::Player, EntityTag::Door) {
                    if self.level_cleared {
                        return LevelCommand::SwitchTo(LevelKey::Level3);
                    }
                    if self.snake_resolved {
                        self.modes.transition(SceneMode::Quiz, outbox);
                        self.quiz.open(outbox);
                    } else {
                        outbox.push(PresentationCommand::Toast(
                            self.script.locked_door_toast.clone(),
                        ));
                    }
                }
                LevelCommand::None
            }
            SceneMode::GameOver => {
                freeze_player(outbox);
                LevelCommand::None
            }
        }
    }

    fn unload(&mut self, outbox: &mut CommandOutbox) {
        self.sequencer.cancel(outbox);
        self.quiz.close(outbox);
        self.timers.cancel_all();
        info!(level = "level2", "level_unloaded");
    }

    fn mode(&self) -> SceneMode {
        self.modes.mode()
    }
}
