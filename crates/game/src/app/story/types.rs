#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum LevelKey {
    Level1,
    Level2,
    Level3,
    Ending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LevelCommand {
    None,
    SwitchTo(LevelKey),
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntityTag {
    Player,
    Door,
    Stone,
    Bird(u8),
    TriggerZone,
    Bush(u8),
    Snake,
    Bull,
    Rock,
}

/// World contact reported by the embedding simulation. The levels
/// never see positions, only which named things touched this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WorldEvent {
    Overlap { first: EntityTag, second: EntityTag },
    ProjectileLost,
}

pub(crate) trait Level {
    fn load(&mut self, outbox: &mut CommandOutbox);
    fn update(
        &mut self,
        dt_ms: u64,
        input: &InputSnapshot,
        events: &[WorldEvent],
        outbox: &mut CommandOutbox,
    ) -> LevelCommand;
    fn unload(&mut self, outbox: &mut CommandOutbox);
    fn mode(&self) -> SceneMode;
}
