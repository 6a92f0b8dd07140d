use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use derive_more::Display;
use futures::future::BoxFuture;
use fx_callback::Callback;
#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use crate::core::media::{LoadRequest, MediaStatus};
use crate::core::session::Result;

/// A request which has been issued on the receiver and resolves once the receiver
/// acknowledged or rejected it.
///
/// A pending request might never resolve, in which case no outcome is ever reported.
pub type PendingRequest = BoxFuture<'static, Result<()>>;

/// The lifecycle events of the remote session provider.
#[derive(Debug, Clone, Display)]
pub enum SessionEvent {
    /// Invoked when a remote session has been started or resumed.
    #[display("session started")]
    Started(Arc<dyn RemoteSession>),
    /// Invoked when the remote session has been ended.
    #[display("session ended")]
    Ended,
}

/// The push notifications of the remote media client.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum MediaClientEvent {
    /// Invoked when the receiver reported a new media status.
    #[display("status updated")]
    StatusUpdated,
    /// Invoked when the receiver reported a media error with the optional detailed error code.
    #[display("media error {:?}", _0)]
    MediaError(Option<i32>),
}

/// The provider of the current remote session.
///
/// The provider is implemented by the transport layer and owns the session lifecycle,
/// the bridge only reads the current session from it.
pub trait SessionProvider: Callback<SessionEvent> + Debug + Send + Sync {
    /// Returns the current remote session, if any.
    fn current_session(&self) -> Option<Arc<dyn RemoteSession>>;

    /// End the current remote session.
    ///
    /// # Arguments
    ///
    /// * `stop_casting` - Stop the media playback on the receiver.
    fn end_current_session(&self, stop_casting: bool);
}

/// A remote session with a cast receiver.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait RemoteSession: Debug + Send + Sync {
    /// Verify if the session is currently connected with the receiver.
    fn is_connected(&self) -> bool;

    /// Returns the stream volume of the receiver within the range `0.0..=1.0`.
    fn volume(&self) -> f64;

    /// Returns the media client of the session, if the session has one.
    fn remote_media_client(&self) -> Option<Arc<dyn RemoteMediaClient>>;
}

/// The media client of a remote session which issues playback requests on the receiver.
pub trait RemoteMediaClient: Callback<MediaClientEvent> + Debug + Send + Sync {
    /// Returns the last known media status of the receiver.
    fn media_status(&self) -> Option<MediaStatus>;

    /// Returns the approximate current stream position of the playback.
    fn approximate_stream_position(&self) -> Duration;

    fn load(&self, request: LoadRequest) -> PendingRequest;

    fn play(&self) -> PendingRequest;

    fn pause(&self) -> PendingRequest;

    fn stop(&self) -> PendingRequest;

    /// Seek the playback to the given absolute position.
    fn seek(&self, position: Duration) -> PendingRequest;

    fn set_stream_volume(&self, volume: f64) -> PendingRequest;

    fn set_playback_rate(&self, rate: f64) -> PendingRequest;

    /// Replace the active track ids of the loaded media.
    fn set_active_track_ids(&self, track_ids: Vec<i64>) -> PendingRequest;
}
