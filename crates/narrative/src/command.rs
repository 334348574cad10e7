/// Fire-and-forget commands toward whatever presentation layer is
/// embedding the core. The core never waits on them and never reads
/// presentation state back.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationCommand {
    ShowDialoguePanel,
    HideDialoguePanel,
    SetSpeaker(String),
    SetDialogueText(String),
    ShowChoices(Vec<String>),
    SetChoiceHighlight(usize),
    HideChoices,
    ShowQuizPanel {
        prompt: String,
        options: Vec<String>,
    },
    SetQuizHighlight(usize),
    SetQuizFeedback {
        option_index: usize,
        correct: bool,
    },
    ClearQuizFeedback,
    HideQuizPanel,
    PlayCue(&'static str),
    StopCue(&'static str),
    ShakeView,
    Toast(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlCommand {
    PauseWorld,
    ResumeWorld,
    SetPlayerVelocity { x: f32, y: f32 },
}

/// Per-tick command buffer. The embedder drains it after every update;
/// draining order is emission order.
#[derive(Debug, Default)]
pub struct CommandOutbox {
    presentation: Vec<PresentationCommand>,
    control: Vec<ControlCommand>,
}

impl CommandOutbox {
    pub fn push(&mut self, command: PresentationCommand) {
        self.presentation.push(command);
    }

    pub fn push_control(&mut self, command: ControlCommand) {
        self.control.push(command);
    }

    pub fn presentation(&self) -> &[PresentationCommand] {
        &self.presentation
    }

    pub fn control(&self) -> &[ControlCommand] {
        &self.control
    }

    pub fn drain_presentation(&mut self) -> Vec<PresentationCommand> {
        std::mem::take(&mut self.presentation)
    }

    pub fn drain_control(&mut self) -> Vec<ControlCommand> {
        std::mem::take(&mut self.control)
    }

    pub fn clear(&mut self) {
        self.presentation.clear();
        self.control.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_emission_order_and_empties_the_buffer() {
        let mut outbox = CommandOutbox::default();
        outbox.push(PresentationCommand::ShowDialoguePanel);
        outbox.push(PresentationCommand::SetSpeaker("Owl".to_string()));
        outbox.push_control(ControlCommand::PauseWorld);

        let presentation = outbox.drain_presentation();
        assert_eq!(presentation[0], PresentationCommand::ShowDialoguePanel);
        assert_eq!(
            presentation[1],
            PresentationCommand::SetSpeaker("Owl".to_string())
        );
        assert!(outbox.presentation().is_empty());
        assert_eq!(outbox.drain_control(), vec![ControlCommand::PauseWorld]);
    }
}
