use std::sync::Arc;

use fx_callback::{Callback, Subscriber, Subscription};
use log::{debug, error, trace, warn};
use serde_json::{json, Value};

use crate::core::channel::CastButton;
use crate::core::commands::Command;
use crate::core::config::BridgeProperties;
use crate::core::events::{BridgeEvent, EventEmitter};
use crate::core::media::{
    resolve_seek_position, seconds_to_millis, MediaCodec, MediaDescriptor, MediaStatus,
    PlayerState,
};
use crate::core::session::{
    PendingRequest, RemoteMediaClient, RemoteSession, SessionProvider,
};
use crate::core::tracks::{active_language, select_track, TrackCategory};

/// The dispatcher of host commands towards the remote session.
///
/// Every command is acknowledged immediately, request commands report their outcome
/// afterward through a [BridgeEvent].
#[derive(Debug)]
pub struct CommandDispatcher {
    provider: Arc<dyn SessionProvider>,
    cast_button: Option<Arc<dyn CastButton>>,
    codec: MediaCodec,
    emitter: EventEmitter,
    method_prefix: String,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the sessions of the given provider.
    pub fn new(provider: Arc<dyn SessionProvider>, properties: &BridgeProperties) -> Self {
        Self {
            provider,
            cast_button: None,
            codec: MediaCodec::new(properties),
            emitter: EventEmitter::new(properties.media_error_code),
            method_prefix: properties.method_prefix.clone(),
        }
    }

    /// Set the cast button to which clicks are delegated.
    pub fn with_cast_button(mut self, cast_button: Arc<dyn CastButton>) -> Self {
        self.cast_button = Some(cast_button);
        self
    }

    /// Returns the prefix of the method names exchanged with the host.
    pub fn method_prefix(&self) -> &str {
        self.method_prefix.as_str()
    }

    /// Returns the event emitter of the dispatcher.
    pub fn emitter(&self) -> &EventEmitter {
        &self.emitter
    }

    /// Dispatch the host command with the given name and arguments.
    ///
    /// The method prefix is stripped from the name when present. Unknown commands are
    /// ignored and acknowledged with `null`.
    pub async fn dispatch(&self, name: &str, arguments: Option<&Value>) -> Value {
        let name = name.strip_prefix(self.method_prefix()).unwrap_or(name);

        match Command::parse(name, arguments) {
            Some(command) => self.execute(command).await,
            None => {
                warn!("Received unknown command {}, ignoring it", name);
                Value::Null
            }
        }
    }

    /// Execute the given command and return its acknowledgement value.
    pub async fn execute(&self, command: Command) -> Value {
        let name = command.name();
        trace!("Executing command {} with {:?}", name, command);
        match command {
            Command::LoadMedia(descriptor) => self.load_media(descriptor),
            Command::Play => self.issue(name, |client| Some(client.play())),
            Command::Pause => self.issue(name, |client| Some(client.pause())),
            Command::Stop => self.issue(name, |client| Some(client.stop())),
            Command::Seek { relative, interval } => self.issue(name, |client| {
                let position = resolve_seek_position(
                    client.approximate_stream_position(),
                    interval,
                    relative,
                );
                debug!("Seeking receiver playback to {}ms", position.as_millis());
                Some(client.seek(position))
            }),
            Command::SetVolume(volume) => {
                self.issue(name, |client| Some(client.set_stream_volume(volume)))
            }
            Command::SetPlaybackRate(rate) => match rate {
                Some(rate) => {
                    self.issue(name, |client| Some(client.set_playback_rate(rate)))
                }
                None => {
                    debug!("Playback rate argument is missing, ignoring {}", name);
                    Value::Null
                }
            },
            Command::SetAudioTrack(language) => self.select_track(TrackCategory::Audio, language),
            Command::SetSubtitleTrack(language) => {
                self.select_track(TrackCategory::Subtitle, language)
            }
            Command::GetVolume => json!(self.session().map(|e| e.volume()).unwrap_or(0.0)),
            Command::GetPlaybackRate => self
                .media_status()
                .map(|e| json!(e.playback_rate))
                .unwrap_or(Value::Null),
            Command::GetAudioTrack => json!(self.active_language(TrackCategory::Audio)),
            Command::GetSubtitleTrack => json!(self.active_language(TrackCategory::Subtitle)),
            Command::IsPlaying => json!(self
                .media_status()
                .map(|e| e.player_state == PlayerState::Playing)
                .unwrap_or(false)),
            Command::IsConnected => {
                json!(self.session().map(|e| e.is_connected()).unwrap_or(false))
            }
            Command::Position => json!(self
                .media_client()
                .map(|e| e.approximate_stream_position().as_millis() as i64)
                .unwrap_or(0)),
            Command::Duration => json!(self
                .media_status()
                .and_then(|e| e.media)
                .and_then(|e| e.duration)
                .map(seconds_to_millis)
                .unwrap_or(0)),
            Command::GetMediaInfo => self.media_info(),
            Command::EndSession => {
                debug!("Ending the current remote session");
                self.provider.end_current_session(true);
                Value::Null
            }
            Command::AddSessionListener => {
                self.emitter
                    .add_session_listener(self.provider.clone())
                    .await;
                Value::Null
            }
            Command::RemoveSessionListener => {
                self.emitter.remove_session_listener().await;
                Value::Null
            }
            Command::PerformClick => {
                match self.cast_button.as_ref() {
                    Some(button) => button.perform_click(),
                    None => debug!("No cast button available, ignoring performClick"),
                }
                Value::Null
            }
            Command::Wait => Value::Null,
        }
    }

    fn load_media(&self, descriptor: MediaDescriptor) -> Value {
        if descriptor.url.as_deref().map(str::is_empty).unwrap_or(true) {
            debug!("Media url is missing, ignoring loadMedia");
            return Value::Null;
        }

        self.issue("loadMedia", |client| {
            Some(client.load(self.codec.encode(&descriptor)))
        })
    }

    fn select_track(&self, category: TrackCategory, language: Option<String>) -> Value {
        let language = match language {
            Some(language) => language,
            None => {
                debug!("Language argument is missing, ignoring {} track selection", category);
                return Value::Null;
            }
        };

        self.issue("setActiveTrackIds", |client| {
            let status = client.media_status()?;
            let tracks = status
                .media
                .as_ref()
                .map(|e| e.tracks.as_slice())
                .unwrap_or_default();

            select_track(category, language.as_str(), tracks, &status.active_track_ids)
                .map(|track_ids| client.set_active_track_ids(track_ids))
        })
    }

    fn active_language(&self, category: TrackCategory) -> String {
        self.media_status()
            .map(|status| {
                let tracks = status
                    .media
                    .as_ref()
                    .map(|e| e.tracks.as_slice())
                    .unwrap_or_default();
                active_language(category, tracks, &status.active_track_ids)
            })
            .unwrap_or_default()
    }

    fn media_info(&self) -> Value {
        match self.media_status().and_then(|e| e.media) {
            Some(info) => serde_json::to_value(self.codec.decode(&info)).unwrap_or_else(|e| {
                warn!("Failed to serialize media info, {}", e);
                Value::Null
            }),
            None => Value::Null,
        }
    }

    /// Issue a request on the remote media client and observe its completion.
    /// The request is silently ignored when no media client is available.
    fn issue<F>(&self, name: &str, operation: F) -> Value
    where
        F: FnOnce(&dyn RemoteMediaClient) -> Option<PendingRequest>,
    {
        match self.media_client() {
            Some(client) => match operation(&*client) {
                Some(request) => self.observe(name, request),
                None => debug!("Request {} has been skipped", name),
            },
            None => debug!("No remote media client available, ignoring {}", name),
        }

        Value::Null
    }

    fn observe(&self, name: &str, request: PendingRequest) {
        let name = name.to_string();
        let emitter = self.emitter.clone();
        tokio::spawn(async move {
            match request.await {
                Ok(_) => {
                    debug!("Request {} has been completed", name);
                    emitter.emit(BridgeEvent::RequestCompleted);
                }
                Err(e) => {
                    error!("Request {} failed, {}", name, e);
                    emitter.emit(BridgeEvent::RequestFailed(e.to_string()));
                }
            }
        });
    }

    fn session(&self) -> Option<Arc<dyn RemoteSession>> {
        self.provider.current_session()
    }

    fn media_client(&self) -> Option<Arc<dyn RemoteMediaClient>> {
        self.session().and_then(|e| e.remote_media_client())
    }

    fn media_status(&self) -> Option<MediaStatus> {
        self.media_client().and_then(|e| e.media_status())
    }
}

impl Callback<BridgeEvent> for CommandDispatcher {
    fn subscribe(&self) -> Subscription<BridgeEvent> {
        self.emitter.subscribe()
    }

    fn subscribe_with(&self, subscriber: Subscriber<BridgeEvent>) {
        self.emitter.subscribe_with(subscriber)
    }
}

impl Drop for CommandDispatcher {
    fn drop(&mut self) {
        self.emitter.close();
    }
}
