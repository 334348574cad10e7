#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
}

const ACTION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
        }
    }
}

/// Immutable per-tick input. Movement actions are held states; the
/// `*_pressed` flags are edge-triggered and true for one tick only.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    actions: ActionStates,
    primary_pressed: bool,
    menu_up_pressed: bool,
    menu_down_pressed: bool,
    restart_pressed: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_primary_pressed(mut self, primary_pressed: bool) -> Self {
        self.primary_pressed = primary_pressed;
        self
    }

    pub fn with_menu_up_pressed(mut self, menu_up_pressed: bool) -> Self {
        self.menu_up_pressed = menu_up_pressed;
        self
    }

    pub fn with_menu_down_pressed(mut self, menu_down_pressed: bool) -> Self {
        self.menu_down_pressed = menu_down_pressed;
        self
    }

    pub fn with_restart_pressed(mut self, restart_pressed: bool) -> Self {
        self.restart_pressed = restart_pressed;
        self
    }

    pub fn primary_pressed(&self) -> bool {
        self.primary_pressed
    }

    pub fn menu_up_pressed(&self) -> bool {
        self.menu_up_pressed
    }

    pub fn menu_down_pressed(&self) -> bool {
        self.menu_down_pressed
    }

    pub fn restart_pressed(&self) -> bool {
        self.restart_pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_has_nothing_down_or_pressed() {
        let snapshot = InputSnapshot::empty();
        assert!(!snapshot.is_down(InputAction::MoveUp));
        assert!(!snapshot.primary_pressed());
        assert!(!snapshot.restart_pressed());
    }

    #[test]
    fn builders_set_independent_fields() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::MoveLeft, true)
            .with_primary_pressed(true)
            .with_menu_down_pressed(true);

        assert!(snapshot.is_down(InputAction::MoveLeft));
        assert!(!snapshot.is_down(InputAction::MoveRight));
        assert!(snapshot.primary_pressed());
        assert!(snapshot.menu_down_pressed());
        assert!(!snapshot.menu_up_pressed());
    }
}
