use serde_json::{Map, Value};

use crate::core::media::{MediaDescriptor, StreamType};

/// The typed argument accessor of a host command.
///
/// Missing or wrong-typed arguments are reported as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Arguments<'a> {
    values: Option<&'a Map<String, Value>>,
}

impl<'a> Arguments<'a> {
    pub fn new(arguments: Option<&'a Value>) -> Self {
        Self {
            values: arguments.and_then(|e| e.as_object()),
        }
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.get(key)
            .and_then(|e| e.as_str())
            .map(|e| e.to_string())
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|e| e.as_bool())
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|e| e.as_f64())
    }

    /// Returns the key/value mapping argument of the given key.
    pub fn mapping(&self, key: &str) -> Option<Value> {
        self.get(key).filter(|e| e.is_object()).cloned()
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.values.and_then(|e| e.get(key))
    }
}

/// The commands which can be dispatched by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Load the media on the receiver, ignored when the descriptor has no url.
    LoadMedia(MediaDescriptor),
    Play,
    Pause,
    Stop,
    /// Seek to the interval in seconds, relative to the current stream position if requested.
    Seek { relative: bool, interval: f64 },
    SetVolume(f64),
    GetVolume,
    SetPlaybackRate(Option<f64>),
    GetPlaybackRate,
    SetAudioTrack(Option<String>),
    GetAudioTrack,
    SetSubtitleTrack(Option<String>),
    GetSubtitleTrack,
    IsPlaying,
    IsConnected,
    Position,
    Duration,
    GetMediaInfo,
    EndSession,
    AddSessionListener,
    RemoveSessionListener,
    PerformClick,
    Wait,
}

impl Command {
    /// Parse the given command name and its arguments.
    /// It returns `None` when the command name is unknown.
    pub fn parse(name: &str, arguments: Option<&Value>) -> Option<Self> {
        let args = Arguments::new(arguments);

        Some(match name {
            "loadMedia" => Command::LoadMedia(MediaDescriptor {
                url: args.string("url").filter(|e| !e.is_empty()),
                title: args.string("title"),
                subtitle: args.string("subtitle"),
                image: args.string("image"),
                content_type: args.string("contentType").unwrap_or_default(),
                stream_type: if args.bool("live").unwrap_or(false) {
                    StreamType::Live
                } else {
                    StreamType::Buffered
                },
                custom_data: args.mapping("customData"),
                ..Default::default()
            }),
            "play" => Command::Play,
            "pause" => Command::Pause,
            "stop" => Command::Stop,
            "seek" => Command::Seek {
                relative: args.bool("relative").unwrap_or(false),
                interval: args.number("interval").unwrap_or(0.0),
            },
            "setVolume" => {
                Command::SetVolume(args.number("volume").unwrap_or(0.0).clamp(0.0, 1.0))
            }
            "getVolume" => Command::GetVolume,
            "setPlaybackRate" => Command::SetPlaybackRate(args.number("rate")),
            "getPlaybackRate" => Command::GetPlaybackRate,
            "setAudioTrack" => Command::SetAudioTrack(args.string("lang")),
            "getAudioTrack" => Command::GetAudioTrack,
            "setSubtitleTrack" => Command::SetSubtitleTrack(args.string("lang")),
            "getSubtitleTrack" => Command::GetSubtitleTrack,
            "isPlaying" => Command::IsPlaying,
            "isConnected" => Command::IsConnected,
            "position" => Command::Position,
            "duration" => Command::Duration,
            "getMediaInfo" => Command::GetMediaInfo,
            "endSession" => Command::EndSession,
            "addSessionListener" => Command::AddSessionListener,
            "removeSessionListener" => Command::RemoveSessionListener,
            "performClick" => Command::PerformClick,
            "wait" => Command::Wait,
            _ => return None,
        })
    }

    /// Returns the host name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            Command::LoadMedia(_) => "loadMedia",
            Command::Play => "play",
            Command::Pause => "pause",
            Command::Stop => "stop",
            Command::Seek { .. } => "seek",
            Command::SetVolume(_) => "setVolume",
            Command::GetVolume => "getVolume",
            Command::SetPlaybackRate(_) => "setPlaybackRate",
            Command::GetPlaybackRate => "getPlaybackRate",
            Command::SetAudioTrack(_) => "setAudioTrack",
            Command::GetAudioTrack => "getAudioTrack",
            Command::SetSubtitleTrack(_) => "setSubtitleTrack",
            Command::GetSubtitleTrack => "getSubtitleTrack",
            Command::IsPlaying => "isPlaying",
            Command::IsConnected => "isConnected",
            Command::Position => "position",
            Command::Duration => "duration",
            Command::GetMediaInfo => "getMediaInfo",
            Command::EndSession => "endSession",
            Command::AddSessionListener => "addSessionListener",
            Command::RemoveSessionListener => "removeSessionListener",
            Command::PerformClick => "performClick",
            Command::Wait => "wait",
        }
    }
}
