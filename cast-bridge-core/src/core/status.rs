use derive_more::Display;

use crate::core::media::{IdleReason, MediaStatus, PlayerState};

/// The stable player status codes reported to the host.
#[repr(i32)]
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatusCode {
    #[display("BUFFERING")]
    Buffering = 0,
    #[display("PLAYING")]
    Playing = 1,
    #[display("IDLE_FINISHED")]
    IdleFinished = 2,
    #[display("PAUSED")]
    Paused = 3,
    #[display("UNKNOWN")]
    Unknown = 4,
}

impl PlayerStatusCode {
    /// Returns the integer code of the status.
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

/// The player status pushed to the host on a receiver notification.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    /// The normalized state of the receiver player.
    #[display("{}", _0)]
    State(PlayerStatusCode),
    /// A media error with the detailed error code of the receiver.
    #[display("media error {}", _0)]
    MediaError(i32),
}

impl PlayerStatus {
    /// Returns the integer code which is reported to the host.
    pub fn code(&self) -> i32 {
        match self {
            PlayerStatus::State(state) => state.code(),
            PlayerStatus::MediaError(code) => *code,
        }
    }
}

/// Normalize the native player state and idle reason into a stable status code.
pub fn normalize(state: PlayerState, idle_reason: Option<IdleReason>) -> PlayerStatusCode {
    match (state, idle_reason) {
        (PlayerState::Buffering, _) => PlayerStatusCode::Buffering,
        (PlayerState::Playing, _) => PlayerStatusCode::Playing,
        (PlayerState::Paused, _) => PlayerStatusCode::Paused,
        (PlayerState::Idle, Some(IdleReason::Finished)) => PlayerStatusCode::IdleFinished,
        _ => PlayerStatusCode::Unknown,
    }
}

/// Normalize the given media status, an absent status is reported as unknown.
pub fn normalize_status(status: Option<&MediaStatus>) -> PlayerStatusCode {
    status
        .map(|e| normalize(e.player_state, e.idle_reason))
        .unwrap_or(PlayerStatusCode::Unknown)
}

/// Normalize a receiver media error into the reported status.
///
/// The detailed error code of the receiver is forwarded as-is, or the fallback when absent.
pub fn normalize_error(detailed_error_code: Option<i32>, fallback: i32) -> PlayerStatus {
    PlayerStatus::MediaError(detailed_error_code.unwrap_or(fallback))
}
