use std::time::Duration;

use chimpvine::prelude::*;
use serde::Serialize;

// ---------------------------------------------------------------------------
// A tiny scripted "game"
// ---------------------------------------------------------------------------

/// One level of a counting game: each correct answer is worth
/// `points_per_answer`, and the level passes at `pass_mark` points.
struct CountingLevel {
    number: i32,
    answers: Vec<bool>,
    points_per_answer: i32,
    pass_mark: i32,
}

/// What the game stores in `LevelData`.
#[derive(Serialize)]
struct LevelSummary {
    level: i32,
    correct: usize,
    attempted: usize,
}

impl CountingLevel {
    fn new(number: i32) -> Self {
        Self {
            number,
            answers: vec![true, true, false, true, true],
            points_per_answer: 10,
            pass_mark: 30,
        }
    }

    fn total_points(&self) -> i32 {
        self.points_per_answer * self.answers.len() as i32
    }

    fn points_earned(&self) -> i32 {
        self.points_per_answer * self.correct() as i32
    }

    fn correct(&self) -> usize {
        self.answers.iter().filter(|a| **a).count()
    }

    fn passed(&self) -> bool {
        self.points_earned() >= self.pass_mark
    }

    fn summary(&self) -> String {
        let summary = LevelSummary {
            level: self.number,
            correct: self.correct(),
            attempted: self.answers.len(),
        };
        serde_json::to_string(&summary).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

/// Usage: `level-runner [config.json]`
///
/// Without a config file the game id comes from `CHIMPVINE_GAME_ID`.
/// The origin always comes from `CHIMPVINE_ORIGIN` unless the config
/// turns on testing mode.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    chimpvine::logging::init();

    let builder = match std::env::args().nth(1) {
        Some(path) => SessionBuilder::from_config_file(path)?,
        None => {
            let game_id = std::env::var("CHIMPVINE_GAME_ID")
                .ok()
                .and_then(|id| id.parse().ok())
                .unwrap_or(1);
            SessionBuilder::new().game_id(game_id)
        }
    };

    let mut client = builder.build(&EnvOrigin::default());
    let mut ready = client.subscribe();

    eprintln!("starting session for game {}", client.config().game_id);

    // Errors are already logged by the client; the ready signal tells us
    // whether it's worth continuing.
    let _ = client.start().await;
    let progress = match ready.wait().await {
        Ok(progress) => progress,
        Err(e) => {
            eprintln!("session did not become ready: {e}");
            return Err(e.into());
        }
    };

    let level = CountingLevel::new(progress.level.max(1));
    tracing::info!(level = level.number, "playing level");

    client
        .report_start(level.number, progress.sound_on, progress.music_on)
        .await?;

    // "Play" the level.
    tokio::time::sleep(Duration::from_millis(250)).await;

    {
        let progress = client.progress_mut();
        progress.points_earned = level.points_earned();
        progress.total_points = level.total_points();
        progress.is_level_completed = level.passed();
        progress.level_data = level.summary();
    }
    let instance = client.report_end_from_progress().await?;

    println!(
        "level {} {}: {}/{} points (user instance {})",
        level.number,
        if level.passed() { "passed" } else { "failed" },
        level.points_earned(),
        level.total_points(),
        instance
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_level_scoring() {
        let level = CountingLevel::new(2);
        assert_eq!(level.total_points(), 50);
        assert_eq!(level.points_earned(), 40);
        assert!(level.passed());
    }

    #[test]
    fn test_counting_level_summary_is_json() {
        let summary = CountingLevel::new(3).summary();
        let value: serde_json::Value =
            serde_json::from_str(&summary).expect("summary is JSON");
        assert_eq!(value["level"], 3);
        assert_eq!(value["correct"], 4);
    }
}
