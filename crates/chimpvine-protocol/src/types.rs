//! Core protocol types for the game-result API.
//!
//! Field names on the wire are fixed by the backend and mix conventions
//! (`GameID`, `PointsEarned`, `islevelend`, `userinstance`), so every
//! field carries an explicit `#[serde(rename)]` instead of a blanket
//! `rename_all`.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The backend's identifier for a game.
///
/// Fixed at configuration time and sent on the progress query and the
/// start report. `#[serde(transparent)]` keeps it a bare integer in JSON.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GameId(pub i32);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-issued correlation key for one played level.
///
/// Returned by both report endpoints. The end report must carry the value
/// from the most recent successful report; `UserInstance(0)` means no
/// report has succeeded yet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserInstance(pub i32);

impl UserInstance {
    /// Returns `true` if no report has assigned an instance yet.
    pub fn is_unset(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for UserInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Booleans travel as `0`/`1` integers.
fn flag(on: bool) -> u8 {
    u8::from(on)
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Body of `admin-ajax.php?action=get_rest_nonce`.
///
/// On failure WordPress answers `{"success":false}` with no `data`, so
/// `data` defaults to an empty string instead of failing to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceResponse {
    pub success: bool,
    #[serde(default)]
    pub data: String,
}

/// Body of `get-game-result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressResponse {
    #[serde(rename = "Level")]
    pub level: i32,
}

/// Body returned by both report endpoints.
///
/// `status` is informational and not always present; `userinstance` is
/// the only field the client relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResponse {
    #[serde(default)]
    pub status: String,
    pub userinstance: UserInstance,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of `submit-game-result`, sent when a level starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartReport {
    #[serde(rename = "GameID")]
    pub game_id: GameId,
    #[serde(rename = "Level")]
    pub level: i32,
    #[serde(rename = "GameStartLocalDateTime")]
    pub started_at: String,
    #[serde(rename = "SoundOnOff")]
    pub sound_on_off: u8,
    #[serde(rename = "MusicOnOff")]
    pub music_on_off: u8,
    #[serde(rename = "LevelPassed")]
    pub level_passed: u8,
    #[serde(rename = "islevelend")]
    pub is_level_end: u8,
}

impl StartReport {
    /// Builds a start report. A level that is just starting has neither
    /// passed nor ended, so both of those flags are always `0`.
    pub fn new(
        game_id: GameId,
        level: i32,
        started_at: impl Into<String>,
        sound_on: bool,
        music_on: bool,
    ) -> Self {
        Self {
            game_id,
            level,
            started_at: started_at.into(),
            sound_on_off: flag(sound_on),
            music_on_off: flag(music_on),
            level_passed: 0,
            is_level_end: 0,
        }
    }
}

/// Body of `update-game-result`, sent when a level ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndReport {
    #[serde(rename = "userinstance")]
    pub user_instance: UserInstance,
    #[serde(rename = "PointsEarned")]
    pub points_earned: i32,
    #[serde(rename = "TotalPoints")]
    pub total_points: i32,
    #[serde(rename = "GameEndLocalDateTime")]
    pub ended_at: String,
    #[serde(rename = "LevelPassed")]
    pub level_passed: u8,
    #[serde(rename = "islevelend")]
    pub is_level_end: u8,
    #[serde(rename = "LevelData")]
    pub level_data: String,
}

impl EndReport {
    /// Builds an end report. `islevelend` is always `1`.
    pub fn new(
        user_instance: UserInstance,
        points_earned: i32,
        total_points: i32,
        ended_at: impl Into<String>,
        level_passed: bool,
        level_data: impl Into<String>,
    ) -> Self {
        Self {
            user_instance,
            points_earned,
            total_points,
            ended_at: ended_at.into(),
            level_passed: flag(level_passed),
            is_level_end: 1,
            level_data: level_data.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn to_value<T: Serialize>(v: &T) -> Value {
        serde_json::to_value(v).expect("should serialize")
    }

    #[test]
    fn test_game_id_serializes_as_bare_integer() {
        assert_eq!(to_value(&GameId(5)), json!(5));
        assert_eq!(GameId(5).to_string(), "5");
    }

    #[test]
    fn test_user_instance_default_is_unset() {
        assert!(UserInstance::default().is_unset());
        assert!(!UserInstance(42).is_unset());
    }

    #[test]
    fn test_start_report_wire_shape() {
        let report =
            StartReport::new(GameId(5), 3, "2024-05-01 10:00:00", true, false);

        assert_eq!(
            to_value(&report),
            json!({
                "GameID": 5,
                "Level": 3,
                "GameStartLocalDateTime": "2024-05-01 10:00:00",
                "SoundOnOff": 1,
                "MusicOnOff": 0,
                "LevelPassed": 0,
                "islevelend": 0,
            })
        );
    }

    #[test]
    fn test_end_report_wire_shape() {
        let report = EndReport::new(
            UserInstance(42),
            10,
            120,
            "2024-05-01 10:05:00",
            true,
            "{\"stars\":3}",
        );

        assert_eq!(
            to_value(&report),
            json!({
                "userinstance": 42,
                "PointsEarned": 10,
                "TotalPoints": 120,
                "GameEndLocalDateTime": "2024-05-01 10:05:00",
                "LevelPassed": 1,
                "islevelend": 1,
                "LevelData": "{\"stars\":3}",
            })
        );
    }

    #[test]
    fn test_end_report_failed_level_sets_level_passed_zero() {
        let report =
            EndReport::new(UserInstance(1), 0, 0, "t", false, String::new());
        assert_eq!(report.level_passed, 0);
        assert_eq!(report.is_level_end, 1);
    }

    #[test]
    fn test_nonce_failure_without_data_decodes() {
        let resp: NonceResponse =
            serde_json::from_str(r#"{"success":false}"#).expect("should decode");
        assert!(!resp.success);
        assert!(resp.data.is_empty());
    }

    #[test]
    fn test_progress_response_uses_capitalized_level() {
        let resp: ProgressResponse =
            serde_json::from_str(r#"{"Level":7}"#).expect("should decode");
        assert_eq!(resp.level, 7);

        let lower: Result<ProgressResponse, _> =
            serde_json::from_str(r#"{"level":7}"#);
        assert!(lower.is_err(), "field name is case-sensitive");
    }

    #[test]
    fn test_report_response_without_status_decodes() {
        let resp: ReportResponse =
            serde_json::from_str(r#"{"userinstance":99}"#).expect("should decode");
        assert_eq!(resp.userinstance, UserInstance(99));
        assert!(resp.status.is_empty());
    }

    #[test]
    fn test_report_response_requires_userinstance() {
        let resp: Result<ReportResponse, _> =
            serde_json::from_str(r#"{"status":"ok"}"#);
        assert!(resp.is_err());
    }
}
