struct LevelRuntime {
    level: Box<dyn Level>,
    is_loaded: bool,
}

/// Owns the four levels and routes ticks to the active one. Switching
/// always loads the target fresh; a level left behind is unloaded, so
/// its timers and open panels cannot leak into the next level.
pub(crate) struct LevelMachine {
    level1: LevelRuntime,
    level2: LevelRuntime,
    level3: LevelRuntime,
    ending: LevelRuntime,
    active: LevelKey,
}

impl LevelMachine {
    pub(crate) fn new(
        level1: Box<dyn Level>,
        level2: Box<dyn Level>,
        level3: Box<dyn Level>,
        ending: Box<dyn Level>,
    ) -> Self {
        Self {
            level1: LevelRuntime {
                level: level1,
                is_loaded: false,
            },
            level2: LevelRuntime {
                level: level2,
                is_loaded: false,
            },
            level3: LevelRuntime {
                level: level3,
                is_loaded: false,
            },
            ending: LevelRuntime {
                level: ending,
                is_loaded: false,
            },
            active: LevelKey::Level1,
        }
    }

    pub(crate) fn active_key(&self) -> LevelKey {
        self.active
    }

    pub(crate) fn active_mode(&self) -> SceneMode {
        self.runtime_ref(self.active).level.mode()
    }

    pub(crate) fn load_active(&mut self, outbox: &mut CommandOutbox) {
        let runtime = self.runtime_mut(self.active);
        if runtime.is_loaded {
            return;
        }
        runtime.level.load(outbox);
        runtime.is_loaded = true;
    }

    pub(crate) fn update_active(
        &mut self,
        dt_ms: u64,
        input: &InputSnapshot,
        events: &[WorldEvent],
        outbox: &mut CommandOutbox,
    ) -> LevelCommand {
        let runtime = self.runtime_mut(self.active);
        runtime.level.update(dt_ms, input, events, outbox)
    }

    pub(crate) fn apply_command(&mut self, command: LevelCommand, outbox: &mut CommandOutbox) {
        match command {
            LevelCommand::None => {}
            LevelCommand::SwitchTo(key) => self.switch_to(key, outbox),
            LevelCommand::Restart => self.restart_active(outbox),
        }
    }

    pub(crate) fn switch_to(&mut self, key: LevelKey, outbox: &mut CommandOutbox) {
        if key == self.active {
            return;
        }
        {
            let runtime = self.runtime_mut(self.active);
            if runtime.is_loaded {
                runtime.level.unload(outbox);
                runtime.is_loaded = false;
            }
        }
        {
            let runtime = self.runtime_mut(key);
            if runtime.is_loaded {
                runtime.level.unload(outbox);
            }
            runtime.level.load(outbox);
            runtime.is_loaded = true;
        }
        self.active = key;
        info!(level = ?key, "level_switched");
    }

    pub(crate) fn restart_active(&mut self, outbox: &mut CommandOutbox) {
        let key = self.active;
        let runtime = self.runtime_mut(key);
        if runtime.is_loaded {
            runtime.level.unload(outbox);
        }
        runtime.level.load(outbox);
        runtime.is_loaded = true;
        info!(level = ?key, "level_restarted");
    }

    pub(crate) fn shutdown_all(&mut self, outbox: &mut CommandOutbox) {
        for key in [
            LevelKey::Level1,
            LevelKey::Level2,
            LevelKey::Level3,
            LevelKey::Ending,
        ] {
            let runtime = self.runtime_mut(key);
            if runtime.is_loaded {
                runtime.level.unload(outbox);
                runtime.is_loaded = false;
            }
        }
    }

    fn runtime_mut(&mut self, key: LevelKey) -> &mut LevelRuntime {
        match key {
            LevelKey::Level1 => &mut self.level1,
            LevelKey::Level2 => &mut self.level2,
            LevelKey::Level3 => &mut self.level3,
            LevelKey::Ending => &mut self.ending,
        }
    }

    fn runtime_ref(&self, key: LevelKey) -> &LevelRuntime {
        match key {
            LevelKey::Level1 => &self.level1,
            LevelKey::Level2 => &self.level2,
            LevelKey::Level3 => &self.level3,
            LevelKey::Ending => &self.ending,
        }
    }
}
