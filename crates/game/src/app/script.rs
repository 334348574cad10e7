use narrative::{Line, QuizOption, QuizQuestion, Sequence};
use serde::Deserialize;
use tracing::info;

pub const BUSH_COUNT: u8 = 4;

const SCRIPTS_JSON: &str = include_str!("../../data/scripts.json");

#[derive(Debug, Deserialize)]
struct RawScripts {
    level1: RawLevel1,
    level2: RawLevel2,
    level3: RawLevel3,
    ending: RawEnding,
}

#[derive(Debug, Deserialize)]
struct RawQuiz {
    prompt: String,
    options: Vec<QuizOption>,
}

#[derive(Debug, Deserialize)]
struct RawLevel1 {
    intro: Vec<Line>,
    quiz: RawQuiz,
    miss_toast: String,
    door_hint_toast: String,
    success_toast: String,
}

#[derive(Debug, Deserialize)]
struct RawLevel2 {
    intro: Vec<Line>,
    snake_confront: Vec<Line>,
    snake_resolve: Vec<Line>,
    snake_apology: Vec<Line>,
    bush_found: Vec<Line>,
    bush_empty: Vec<Line>,
    quiz: RawQuiz,
    feather_bush: u8,
    snake_warning_toast: String,
    locked_door_toast: String,
    resolved_toast: String,
    cleared_toast: String,
}

#[derive(Debug, Deserialize)]
struct RawLevel3 {
    intro: Vec<Line>,
    rock_cleared: Vec<Line>,
    gate: Vec<Line>,
    gate_correct_value: String,
    wrong_toast: String,
    blocked_door_toast: String,
    game_over_toast: String,
}

#[derive(Debug, Deserialize)]
struct RawEnding {
    congrats: Vec<Line>,
}

#[derive(Debug, Clone)]
pub struct Level1Script {
    pub intro: Sequence,
    pub quiz: QuizQuestion,
    pub miss_toast: String,
    pub door_hint_toast: String,
    pub success_toast: String,
}

#[derive(Debug, Clone)]
pub struct Level2Script {
    pub intro: Sequence,
    pub snake_confront: Sequence,
    pub snake_resolve: Sequence,
    pub snake_apology: Sequence,
    pub bush_found: Sequence,
    pub bush_empty: Sequence,
    pub quiz: QuizQuestion,
    pub feather_bush: u8,
    pub snake_warning_toast: String,
    pub locked_door_toast: String,
    pub resolved_toast: String,
    pub cleared_toast: String,
}

#[derive(Debug, Clone)]
pub struct Level3Script {
    pub intro: Sequence,
    pub rock_cleared: Sequence,
    pub gate: Sequence,
    pub gate_correct_value: String,
    pub wrong_toast: String,
    pub blocked_door_toast: String,
    pub game_over_toast: String,
}

#[derive(Debug, Clone)]
pub struct EndingScript {
    pub congrats: Sequence,
}

#[derive(Debug, Clone)]
pub struct GameScripts {
    pub level1: Level1Script,
    pub level2: Level2Script,
    pub level3: Level3Script,
    pub ending: EndingScript,
}

/// Loads and validates the embedded script asset. A malformed script
/// is fatal; callers log the message and halt startup.
pub fn load_script_database() -> Result<GameScripts, String> {
    let scripts = parse_scripts(SCRIPTS_JSON)?;
    info!(
        level1_lines = scripts.level1.intro.len(),
        feather_bush = scripts.level2.feather_bush,
        "scripts_loaded"
    );
    Ok(scripts)
}

pub(crate) fn parse_scripts(json: &str) -> Result<GameScripts, String> {
    let deserializer = &mut serde_json::Deserializer::from_str(json);
    let raw: RawScripts = serde_path_to_error::deserialize(deserializer)
        .map_err(|err| format!("scripts.{}: {}", err.path(), err.inner()))?;

    let level1 = Level1Script {
        intro: sequence("level1.intro", raw.level1.intro)?,
        quiz: quiz_question("level1.quiz", raw.level1.quiz)?,
        miss_toast: raw.level1.miss_toast,
        door_hint_toast: raw.level1.door_hint_toast,
        success_toast: raw.level1.success_toast,
    };

    if raw.level2.feather_bush >= BUSH_COUNT {
        return Err(expected_actual(
            "level2.feather_bush",
            &format!("index below {BUSH_COUNT}"),
            &raw.level2.feather_bush.to_string(),
        ));
    }
    let level2 = Level2Script {
        intro: sequence("level2.intro", raw.level2.intro)?,
        snake_confront: sequence("level2.snake_confront", raw.level2.snake_confront)?,
        snake_resolve: sequence("level2.snake_resolve", raw.level2.snake_resolve)?,
        snake_apology: sequence("level2.snake_apology", raw.level2.snake_apology)?,
        bush_found: sequence("level2.bush_found", raw.level2.bush_found)?,
        bush_empty: sequence("level2.bush_empty", raw.level2.bush_empty)?,
        quiz: quiz_question("level2.quiz", raw.level2.quiz)?,
        feather_bush: raw.level2.feather_bush,
        snake_warning_toast: raw.level2.snake_warning_toast,
        locked_door_toast: raw.level2.locked_door_toast,
        resolved_toast: raw.level2.resolved_toast,
        cleared_toast: raw.level2.cleared_toast,
    };

    let gate = sequence("level3.gate", raw.level3.gate)?;
    let gate_has_correct_value = gate.lines().iter().any(|line| {
        line.choices
            .iter()
            .any(|choice| choice.value == raw.level3.gate_correct_value)
    });
    if !gate_has_correct_value {
        return Err(validation_err(
            "level3.gate",
            &format!(
                "no choice carries the gate_correct_value {:?}",
                raw.level3.gate_correct_value
            ),
        ));
    }
    let level3 = Level3Script {
        intro: sequence("level3.intro", raw.level3.intro)?,
        rock_cleared: sequence("level3.rock_cleared", raw.level3.rock_cleared)?,
        gate,
        gate_correct_value: raw.level3.gate_correct_value,
        wrong_toast: raw.level3.wrong_toast,
        blocked_door_toast: raw.level3.blocked_door_toast,
        game_over_toast: raw.level3.game_over_toast,
    };

    let ending = EndingScript {
        congrats: sequence("ending.congrats", raw.ending.congrats)?,
    };

    Ok(GameScripts {
        level1,
        level2,
        level3,
        ending,
    })
}

fn sequence(path: &str, lines: Vec<Line>) -> Result<Sequence, String> {
    for (index, line) in lines.iter().enumerate() {
        for hold_value in &line.hold_values {
            let known = line.choices.iter().any(|choice| &choice.value == hold_value);
            if !known {
                return Err(validation_err(
                    path,
                    &format!("line {index} holds on unknown choice value {hold_value:?}"),
                ));
            }
        }
    }
    Sequence::new(lines).map_err(|err| validation_err(path, &err.to_string()))
}

fn quiz_question(path: &str, raw: RawQuiz) -> Result<QuizQuestion, String> {
    QuizQuestion::new(raw.prompt, raw.options).map_err(|err| validation_err(path, &err.to_string()))
}

fn validation_err(path: &str, message: &str) -> String {
    format!("{path}: {message}")
}

fn expected_actual(path: &str, expected: &str, actual: &str) -> String {
    validation_err(path, &format!("expected {expected}, got {actual}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_scripts_parse_and_validate() {
        let scripts = load_script_database().expect("bundled scripts");
        assert!(scripts.level1.intro.len() >= 2);
        assert_eq!(scripts.level1.quiz.options().len(), 4);
        assert!(scripts.level2.feather_bush < BUSH_COUNT);
        assert!(scripts
            .level3
            .gate
            .lines()
            .iter()
            .any(|line| !line.choices.is_empty()));
    }

    #[test]
    fn parse_error_reports_the_json_path() {
        let error = parse_scripts(r#"{"level1": {"intro": "not a list"}}"#)
            .expect_err("should fail");
        assert!(error.contains("level1.intro"), "message was: {error}");
    }

    #[test]
    fn quiz_with_two_correct_options_is_rejected() {
        let mut json: serde_json::Value = serde_json::from_str(SCRIPTS_JSON).expect("json");
        json["level1"]["quiz"]["options"][0]["correct"] = serde_json::Value::Bool(true);
        let error = parse_scripts(&json.to_string()).expect_err("should fail");
        assert!(error.contains("level1.quiz"), "message was: {error}");
        assert!(error.contains("exactly one"), "message was: {error}");
    }

    #[test]
    fn feather_bush_out_of_range_is_rejected() {
        let mut json: serde_json::Value = serde_json::from_str(SCRIPTS_JSON).expect("json");
        json["level2"]["feather_bush"] = serde_json::Value::from(BUSH_COUNT);
        let error = parse_scripts(&json.to_string()).expect_err("should fail");
        assert!(error.contains("feather_bush"), "message was: {error}");
    }

    #[test]
    fn hold_value_must_name_an_actual_choice() {
        let mut json: serde_json::Value = serde_json::from_str(SCRIPTS_JSON).expect("json");
        json["level3"]["gate"][1]["hold_values"] = serde_json::json!(["missing"]);
        let error = parse_scripts(&json.to_string()).expect_err("should fail");
        assert!(error.contains("unknown choice value"), "message was: {error}");
    }

    #[test]
    fn empty_sequence_is_rejected_with_its_path() {
        let mut json: serde_json::Value = serde_json::from_str(SCRIPTS_JSON).expect("json");
        json["ending"]["congrats"] = serde_json::json!([]);
        let error = parse_scripts(&json.to_string()).expect_err("should fail");
        assert!(error.contains("ending.congrats"), "message was: {error}");
    }
}
