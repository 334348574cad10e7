fn movement_velocity(input: &InputSnapshot, speed: f32) -> (f32, f32) {
    let mut x = 0.0f32;
    let mut y = 0.0f32;

    if input.is_down(InputAction::MoveRight) {
        x += 1.0;
    }
    if input.is_down(InputAction::MoveLeft) {
        x -= 1.0;
    }
    if input.is_down(InputAction::MoveDown) {
        y += 1.0;
    }
    if input.is_down(InputAction::MoveUp) {
        y -= 1.0;
    }

    let len_sq = x * x + y * y;
    if len_sq > 0.0 {
        let inv_len = len_sq.sqrt().recip();
        x *= inv_len;
        y *= inv_len;
    }

    (x * speed, y * speed)
}

fn walk_cue(x: f32, y: f32) -> Option<&'static str> {
    if x < 0.0 {
        Some("walk_left")
    } else if x > 0.0 {
        Some("walk_right")
    } else if y < 0.0 {
        Some("walk_up")
    } else if y > 0.0 {
        Some("walk_down")
    } else {
        None
    }
}

fn emit_movement(input: &InputSnapshot, outbox: &mut CommandOutbox) {
    let (x, y) = movement_velocity(input, PLAYER_SPEED_UNITS_PER_SECOND);
    outbox.push_control(ControlCommand::SetPlayerVelocity { x, y });
    match walk_cue(x, y) {
        Some(cue) => outbox.push(PresentationCommand::PlayCue(cue)),
        None => outbox.push(PresentationCommand::StopCue("walk")),
    }
}

/// Frozen modes still emit a velocity command every tick, always zero.
fn freeze_player(outbox: &mut CommandOutbox) {
    outbox.push_control(ControlCommand::SetPlayerVelocity { x: 0.0, y: 0.0 });
}

fn overlapped(events: &[WorldEvent], a: EntityTag, b: EntityTag) -> bool {
    events.iter().any(|event| match event {
        WorldEvent::Overlap { first, second } => {
            (*first == a && *second == b) || (*first == b && *second == a)
        }
        WorldEvent::ProjectileLost => false,
    })
}

fn birds_hit_by_stone(events: &[WorldEvent]) -> usize {
    let mut hit = [false; u8::MAX as usize + 1];
    for event in events {
        if let WorldEvent::Overlap { first, second } = event {
            let bird = match (first, second) {
                (EntityTag::Stone, EntityTag::Bird(index))
                | (EntityTag::Bird(index), EntityTag::Stone) => Some(*index),
                _ => None,
            };
            if let Some(index) = bird {
                hit[index as usize] = true;
            }
        }
    }
    hit.iter().filter(|was_hit| **was_hit).count()
}
