mod app;

use narrative::{CommandOutbox, ControlCommand, InputSnapshot, PresentationCommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::app::script::load_script_database;
use crate::app::story::build_level_machine;

const PREVIEW_TICKS_ENV_VAR: &str = "PROVERB_PREVIEW_TICKS";
const DEFAULT_PREVIEW_TICKS: u64 = 400;
const PREVIEW_DT_MS: u64 = 16;
const PREVIEW_PRESS_PERIOD: u64 = 40;

fn main() {
    init_tracing();
    info!("=== Proverb Woods Startup ===");

    let scripts = match load_script_database() {
        Ok(scripts) => scripts,
        Err(message) => {
            error!(error = %message, "script_load_failed");
            std::process::exit(1);
        }
    };

    let mut machine = build_level_machine(scripts);
    let mut outbox = CommandOutbox::default();
    machine.load_active(&mut outbox);
    log_outbox(&mut outbox);

    // Headless preview: ticks the story with a periodic primary press,
    // which walks through the opening dialogue and logs every command
    // the core would hand to a presentation layer.
    let ticks = parse_preview_ticks_from_env();
    for tick in 0..ticks {
        let input = if tick % PREVIEW_PRESS_PERIOD == 0 {
            InputSnapshot::empty().with_primary_pressed(true)
        } else {
            InputSnapshot::empty()
        };
        let command = machine.update_active(PREVIEW_DT_MS, &input, &[], &mut outbox);
        machine.apply_command(command, &mut outbox);
        log_outbox(&mut outbox);
    }

    machine.shutdown_all(&mut outbox);
    log_outbox(&mut outbox);
    info!(ticks, level = ?machine.active_key(), "preview_finished");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn parse_preview_ticks_from_env() -> u64 {
    std::env::var(PREVIEW_TICKS_ENV_VAR)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(DEFAULT_PREVIEW_TICKS)
}

fn log_outbox(outbox: &mut CommandOutbox) {
    for command in outbox.drain_presentation() {
        match command {
            // Per-character text updates are too chatty for the log.
            PresentationCommand::SetDialogueText(_) => {}
            other => info!(command = ?other, "presentation"),
        }
    }
    for command in outbox.drain_control() {
        match command {
            ControlCommand::SetPlayerVelocity { .. } => {}
            other => info!(command = ?other, "control"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_ticks_default_applies_without_the_env_var() {
        std::env::remove_var(PREVIEW_TICKS_ENV_VAR);
        assert_eq!(parse_preview_ticks_from_env(), DEFAULT_PREVIEW_TICKS);
    }

    #[test]
    fn log_outbox_drains_both_buffers() {
        let mut outbox = CommandOutbox::default();
        outbox.push(PresentationCommand::ShowDialoguePanel);
        outbox.push_control(ControlCommand::PauseWorld);
        log_outbox(&mut outbox);
        assert!(outbox.presentation().is_empty());
        assert!(outbox.control().is_empty());
    }
}
