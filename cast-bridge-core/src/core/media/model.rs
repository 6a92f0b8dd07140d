use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// The metadata type of generic movie media.
pub const METADATA_TYPE_MOVIE: i16 = 1;

/// The stream type of media on the receiver.
#[derive(Debug, Display, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StreamType {
    /// No stream type.
    #[display("NONE")]
    None,
    /// Buffered stream type.
    #[default]
    #[display("BUFFERED")]
    Buffered,
    /// Live stream type.
    #[display("LIVE")]
    Live,
}

/// The native player state as reported by the receiver.
#[derive(Debug, Display, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlayerState {
    #[default]
    #[display("UNKNOWN")]
    Unknown,
    #[display("IDLE")]
    Idle,
    #[display("PLAYING")]
    Playing,
    #[display("PAUSED")]
    Paused,
    #[display("BUFFERING")]
    Buffering,
    #[display("LOADING")]
    Loading,
}

/// The reason why the receiver player became idle.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IdleReason {
    #[display("CANCELLED")]
    Cancelled,
    #[display("INTERRUPTED")]
    Interrupted,
    #[display("FINISHED")]
    Finished,
    #[display("ERROR")]
    Error,
}

/// The type of media track.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrackType {
    #[display("TEXT")]
    Text,
    #[display("AUDIO")]
    Audio,
    #[display("VIDEO")]
    Video,
}

/// The subtype of a text track.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TextTrackSubtype {
    #[display("SUBTITLES")]
    Subtitles,
    #[display("CAPTIONS")]
    Captions,
    #[display("DESCRIPTIONS")]
    Descriptions,
    #[display("CHAPTERS")]
    Chapters,
    #[display("METADATA")]
    Metadata,
}

/// A track of the media loaded on the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaTrack {
    /// The unique identifier of the track within the media.
    #[serde(rename = "trackId")]
    pub id: i64,
    /// The type of the track.
    #[serde(rename = "type")]
    pub track_type: TrackType,
    /// The subtype of text tracks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<TextTrackSubtype>,
    /// The RFC 5646 language code of the track.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// The human readable name of the track.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// An image associated with media content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebImage {
    /// The absolute url of the image.
    pub url: Url,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// The descriptive metadata of media content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    pub metadata_type: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Images associated with the media if present, else an empty array.
    #[serde(default)]
    pub images: Vec<WebImage>,
}

/// The media information as known by the receiver.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    pub content_id: Option<String>,
    pub content_url: Option<String>,
    /// The MIME type of the media content.
    pub content_type: Option<String>,
    pub stream_type: StreamType,
    /// The duration of the media content in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MediaMetadata>,
    #[serde(default)]
    pub tracks: Vec<MediaTrack>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Value>,
}

/// The request to load new media on the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadRequest {
    /// The media content to load.
    pub media: MediaInfo,
    /// Indicates whether the playback should start automatically once loaded.
    pub autoplay: bool,
    /// The start position of the playback in seconds.
    pub current_time: f64,
    /// The IDs of the tracks which should be active once loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_track_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Value>,
}

/// The last known media status of the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaStatus {
    pub player_state: PlayerState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_reason: Option<IdleReason>,
    #[serde(default)]
    pub active_track_ids: Vec<i64>,
    /// The stream position of the playback in seconds.
    pub current_time: f64,
    pub playback_rate: f64,
    /// The stream volume of the receiver within the range `0.0..=1.0`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaInfo>,
}

impl Default for MediaStatus {
    fn default() -> Self {
        Self {
            player_state: PlayerState::default(),
            idle_reason: None,
            active_track_ids: vec![],
            current_time: 0.0,
            playback_rate: 1.0,
            volume: None,
            media: None,
        }
    }
}

/// The host representation of media, exchanged as a key/value mapping.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDescriptor {
    pub id: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    /// The absolute url of the media artwork.
    pub image: Option<String>,
    /// The MIME type of the media, empty when unknown.
    pub content_type: String,
    pub stream_type: StreamType,
    pub custom_data: Option<Value>,
    /// The languages of the audio tracks in track order.
    #[serde(default)]
    pub audio_tracks: Vec<String>,
    /// The distinct languages of the subtitle tracks in track order.
    #[serde(default)]
    pub subtitle_tracks: Vec<String>,
}
