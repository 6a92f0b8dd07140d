use std::sync::Arc;

use derive_more::Display;
use fx_callback::{Callback, MultiThreadedCallback, Subscriber, Subscription};
use log::{debug, trace, warn};
use serde_json::{json, Value};
use tokio::select;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::core::session::{
    MediaClientEvent, RemoteMediaClient, RemoteSession, SessionEvent, SessionProvider,
};
use crate::core::status::{normalize_error, normalize_status, PlayerStatus};

/// The asynchronous outcomes and state changes reported to the host.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum BridgeEvent {
    /// Invoked when a remote session has been started.
    #[display("session started")]
    SessionStarted,
    /// Invoked when the remote session has been ended.
    #[display("session ended")]
    SessionEnded,
    /// Invoked when the receiver pushed a new player status.
    #[display("player status updated to {}", _0)]
    PlayerStatusUpdated(PlayerStatus),
    /// Invoked when a receiver request completed successfully.
    #[display("request completed")]
    RequestCompleted,
    /// Invoked when a receiver request failed with the given error description.
    #[display("request failed, {}", _0)]
    RequestFailed(String),
}

impl BridgeEvent {
    /// Returns the method name under which the event is delivered to the host.
    pub fn method_name(&self) -> &'static str {
        match self {
            BridgeEvent::SessionStarted => "didStartSession",
            BridgeEvent::SessionEnded => "didEndSession",
            BridgeEvent::PlayerStatusUpdated(_) => "didPlayerStatusUpdated",
            BridgeEvent::RequestCompleted => "requestDidComplete",
            BridgeEvent::RequestFailed(_) => "requestDidFail",
        }
    }

    /// Returns the payload which is delivered to the host.
    pub fn arguments(&self) -> Value {
        match self {
            BridgeEvent::PlayerStatusUpdated(status) => json!(status.code()),
            BridgeEvent::RequestFailed(error) => json!({ "error": error }),
            _ => Value::Null,
        }
    }
}

/// The fan-out of bridge events towards the host.
///
/// The session and media listeners are only active between an explicit
/// [EventEmitter::add_session_listener] and [EventEmitter::remove_session_listener].
#[derive(Debug, Clone)]
pub struct EventEmitter {
    inner: Arc<InnerEventEmitter>,
}

impl EventEmitter {
    /// Create a new event emitter.
    ///
    /// # Arguments
    ///
    /// * `media_error_code` - The code reported for media errors without a detailed error code.
    pub fn new(media_error_code: i32) -> Self {
        Self {
            inner: Arc::new(InnerEventEmitter {
                callbacks: MultiThreadedCallback::new(),
                listener: Default::default(),
                media_error_code,
                cancellation_token: Default::default(),
            }),
        }
    }

    /// Emit the given event to all subscribers.
    pub fn emit(&self, event: BridgeEvent) {
        self.inner.emit(event)
    }

    /// Start listening to the session lifecycle of the given provider.
    ///
    /// When the provider already has a connected session, the session started event is
    /// emitted immediately. A registration while another one is active is ignored.
    pub async fn add_session_listener(&self, provider: Arc<dyn SessionProvider>) {
        let mut listener = self.inner.listener.lock().await;
        if listener.is_some() {
            warn!("Session listener is already registered, ignoring registration");
            return;
        }

        let token = self.inner.cancellation_token.child_token();
        let receiver = provider.subscribe();
        let mut media_token = None;

        if let Some(session) = provider.current_session().filter(|e| e.is_connected()) {
            debug!("Remote session is already connected, synthesizing session start");
            media_token = self.inner.start_media_listener(&session, &token);
            self.inner.emit(BridgeEvent::SessionStarted);
        }

        *listener = Some(token.clone());
        let inner = self.inner.clone();
        tokio::spawn(async move {
            inner
                .start_session_listener(receiver, media_token, token)
                .await;
        });
        debug!("Session listener has been registered");
    }

    /// Stop listening to the session lifecycle and media status of the receiver.
    pub async fn remove_session_listener(&self) {
        if let Some(token) = self.inner.listener.lock().await.take() {
            token.cancel();
            debug!("Session listener has been removed");
        }
    }

    /// Verify if a session listener is currently registered.
    pub async fn is_listening(&self) -> bool {
        self.inner.listener.lock().await.is_some()
    }

    /// Stop all active listeners of the emitter.
    pub fn close(&self) {
        self.inner.cancellation_token.cancel();
    }
}

impl Callback<BridgeEvent> for EventEmitter {
    fn subscribe(&self) -> Subscription<BridgeEvent> {
        self.inner.callbacks.subscribe()
    }

    fn subscribe_with(&self, subscriber: Subscriber<BridgeEvent>) {
        self.inner.callbacks.subscribe_with(subscriber)
    }
}

#[derive(Debug)]
struct InnerEventEmitter {
    callbacks: MultiThreadedCallback<BridgeEvent>,
    listener: Mutex<Option<CancellationToken>>,
    media_error_code: i32,
    cancellation_token: CancellationToken,
}

impl InnerEventEmitter {
    fn emit(&self, event: BridgeEvent) {
        trace!("Emitting bridge event {:?}", event);
        self.callbacks.invoke(event);
    }

    async fn start_session_listener(
        self: Arc<Self>,
        mut receiver: Subscription<SessionEvent>,
        mut media_token: Option<CancellationToken>,
        token: CancellationToken,
    ) {
        loop {
            select! {
                biased;
                _ = token.cancelled() => break,
                Some(event) = receiver.recv() => {
                    if let Some(media_token) = media_token.take() {
                        media_token.cancel();
                    }

                    match &*event {
                        SessionEvent::Started(session) => {
                            media_token = self.start_media_listener(session, &token);
                            self.emit(BridgeEvent::SessionStarted);
                        }
                        SessionEvent::Ended => self.emit(BridgeEvent::SessionEnded),
                    }
                },
                else => break,
            }
        }

        if let Some(media_token) = media_token.take() {
            media_token.cancel();
        }

        // a closed provider subscription ends the registration as well
        token.cancel();
        let mut listener = self.listener.lock().await;
        if listener.as_ref().map(|e| e.is_cancelled()).unwrap_or(false) {
            *listener = None;
        }
        debug!("Session listener main loop ended");
    }

    /// Start listening to the media notifications of the session's media client.
    /// It returns the cancellation token of the media listener, if one has been started.
    fn start_media_listener(
        self: &Arc<Self>,
        session: &Arc<dyn RemoteSession>,
        token: &CancellationToken,
    ) -> Option<CancellationToken> {
        let client = match session.remote_media_client() {
            Some(client) => client,
            None => {
                debug!("Remote session has no media client, media listener not started");
                return None;
            }
        };

        let media_token = token.child_token();
        let mut receiver = client.subscribe();
        let inner = self.clone();
        let loop_token = media_token.clone();
        tokio::spawn(async move {
            loop {
                select! {
                    biased;
                    _ = loop_token.cancelled() => break,
                    Some(event) = receiver.recv() => {
                        let status = inner.media_status_of(&*client, &event);
                        trace!("Received media event {}, resolved status {}", event, status);
                        inner.emit(BridgeEvent::PlayerStatusUpdated(status));
                    },
                    else => break,
                }
            }
            debug!("Media listener main loop ended");
        });

        Some(media_token)
    }

    fn media_status_of(&self, client: &dyn RemoteMediaClient, event: &MediaClientEvent) -> PlayerStatus {
        match event {
            MediaClientEvent::StatusUpdated => {
                PlayerStatus::State(normalize_status(client.media_status().as_ref()))
            }
            MediaClientEvent::MediaError(code) => normalize_error(*code, self.media_error_code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::media::{MediaStatus, PlayerState};
    use crate::core::status::PlayerStatusCode;
    use crate::testing::{MockRemoteMediaClient, MockSessionProvider};
    use crate::core::session::MockRemoteSession;
    use crate::{init_logger, recv_timeout};
    use std::time::Duration;
    use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

    /// Create a provider with a connected session which is playing media.
    fn connected_provider() -> (
        MockSessionProvider,
        UnboundedSender<Arc<SessionEvent>>,
        UnboundedSender<Arc<MediaClientEvent>>,
    ) {
        let (session_tx, session_rx) = unbounded_channel();
        let (media_tx, media_rx) = unbounded_channel();
        let mut client = MockRemoteMediaClient::new();
        client.expect_subscribe().times(1).return_once(move || media_rx);
        client.expect_media_status().returning(|| {
            Some(MediaStatus {
                player_state: PlayerState::Playing,
                ..Default::default()
            })
        });
        let client = Arc::new(client);
        let mut session = MockRemoteSession::new();
        session.expect_is_connected().return_const(true);
        session
            .expect_remote_media_client()
            .returning(move || Some(client.clone() as Arc<dyn RemoteMediaClient>));
        let session = Arc::new(session);
        let mut provider = MockSessionProvider::new();
        provider.expect_subscribe().times(1).return_once(move || session_rx);
        provider
            .expect_current_session()
            .returning(move || Some(session.clone() as Arc<dyn RemoteSession>));

        (provider, session_tx, media_tx)
    }

    #[test]
    fn test_event_method_name() {
        assert_eq!("didStartSession", BridgeEvent::SessionStarted.method_name());
        assert_eq!("didEndSession", BridgeEvent::SessionEnded.method_name());
        assert_eq!(
            "didPlayerStatusUpdated",
            BridgeEvent::PlayerStatusUpdated(PlayerStatus::MediaError(100)).method_name()
        );
        assert_eq!("requestDidComplete", BridgeEvent::RequestCompleted.method_name());
        assert_eq!(
            "requestDidFail",
            BridgeEvent::RequestFailed("lorem".to_string()).method_name()
        );
    }

    #[test]
    fn test_event_arguments() {
        assert_eq!(
            json!(1),
            BridgeEvent::PlayerStatusUpdated(PlayerStatus::State(PlayerStatusCode::Playing))
                .arguments()
        );
        assert_eq!(
            json!({"error": "receiver is unavailable"}),
            BridgeEvent::RequestFailed("receiver is unavailable".to_string()).arguments()
        );
        assert_eq!(Value::Null, BridgeEvent::RequestCompleted.arguments());
    }

    #[tokio::test]
    async fn test_emit() {
        init_logger!();
        let emitter = EventEmitter::new(100);
        let mut receiver = emitter.subscribe();

        emitter.emit(BridgeEvent::RequestCompleted);

        let result = recv_timeout!(&mut receiver, Duration::from_millis(200));
        assert_eq!(BridgeEvent::RequestCompleted, *result);
    }

    #[tokio::test]
    async fn test_add_session_listener_connected_session() {
        init_logger!();
        let (provider, _session_tx, media_tx) = connected_provider();
        let emitter = EventEmitter::new(100);
        let mut receiver = emitter.subscribe();

        emitter.add_session_listener(Arc::new(provider)).await;
        let result = recv_timeout!(&mut receiver, Duration::from_millis(200));
        assert_eq!(BridgeEvent::SessionStarted, *result);

        media_tx
            .send(Arc::new(MediaClientEvent::StatusUpdated))
            .unwrap();
        let result = recv_timeout!(&mut receiver, Duration::from_millis(200));
        assert_eq!(
            BridgeEvent::PlayerStatusUpdated(PlayerStatus::State(PlayerStatusCode::Playing)),
            *result
        );

        media_tx
            .send(Arc::new(MediaClientEvent::MediaError(None)))
            .unwrap();
        let result = recv_timeout!(&mut receiver, Duration::from_millis(200));
        assert_eq!(
            BridgeEvent::PlayerStatusUpdated(PlayerStatus::MediaError(100)),
            *result
        );
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        init_logger!();
        let (session_tx, session_rx) = unbounded_channel();
        let mut session = MockRemoteSession::new();
        session.expect_remote_media_client().returning(|| None);
        let session = Arc::new(session) as Arc<dyn RemoteSession>;
        let mut provider = MockSessionProvider::new();
        provider.expect_subscribe().times(1).return_once(move || session_rx);
        provider.expect_current_session().returning(|| None);
        let emitter = EventEmitter::new(100);
        let mut receiver = emitter.subscribe();

        emitter.add_session_listener(Arc::new(provider)).await;
        assert!(emitter.is_listening().await, "expected a listener to be registered");

        session_tx
            .send(Arc::new(SessionEvent::Started(session)))
            .unwrap();
        let result = recv_timeout!(&mut receiver, Duration::from_millis(200));
        assert_eq!(BridgeEvent::SessionStarted, *result);

        session_tx.send(Arc::new(SessionEvent::Ended)).unwrap();
        let result = recv_timeout!(&mut receiver, Duration::from_millis(200));
        assert_eq!(BridgeEvent::SessionEnded, *result);
    }

    #[tokio::test]
    async fn test_add_session_listener_twice() {
        init_logger!();
        let (_session_tx, session_rx) = unbounded_channel();
        let mut provider = MockSessionProvider::new();
        provider.expect_subscribe().times(1).return_once(move || session_rx);
        provider.expect_current_session().times(1).returning(|| None);
        let provider = Arc::new(provider);
        let emitter = EventEmitter::new(100);

        emitter.add_session_listener(provider.clone()).await;
        emitter.add_session_listener(provider).await;

        assert!(emitter.is_listening().await, "expected a listener to be registered");
    }

    #[tokio::test]
    async fn test_remove_session_listener() {
        init_logger!();
        let (session_tx, session_rx) = unbounded_channel();
        let mut provider = MockSessionProvider::new();
        provider.expect_subscribe().times(1).return_once(move || session_rx);
        provider.expect_current_session().returning(|| None);
        let emitter = EventEmitter::new(100);
        let mut receiver = emitter.subscribe();

        emitter.add_session_listener(Arc::new(provider)).await;
        emitter.remove_session_listener().await;
        emitter.remove_session_listener().await;
        assert!(!emitter.is_listening().await, "expected the listener to be removed");

        tokio::time::sleep(Duration::from_millis(50)).await;
        let _ = session_tx.send(Arc::new(SessionEvent::Ended));
        select! {
            _ = tokio::time::sleep(Duration::from_millis(200)) => {},
            event = receiver.recv() => panic!("expected no event, but got {:?}", event),
        }
    }

    #[tokio::test]
    async fn test_remove_session_listener_stops_media_listener() {
        init_logger!();
        let (provider, _session_tx, media_tx) = connected_provider();
        let emitter = EventEmitter::new(100);
        let mut receiver = emitter.subscribe();

        emitter.add_session_listener(Arc::new(provider)).await;
        let result = recv_timeout!(&mut receiver, Duration::from_millis(200));
        assert_eq!(BridgeEvent::SessionStarted, *result);

        emitter.remove_session_listener().await;
        let _ = media_tx.send(Arc::new(MediaClientEvent::StatusUpdated));
        select! {
            _ = tokio::time::sleep(Duration::from_millis(200)) => {},
            event = receiver.recv() => panic!("expected no event, but got {:?}", event),
        }
    }

    #[tokio::test]
    async fn test_session_ended_stops_media_listener() {
        init_logger!();
        let (provider, session_tx, media_tx) = connected_provider();
        let emitter = EventEmitter::new(100);
        let mut receiver = emitter.subscribe();

        emitter.add_session_listener(Arc::new(provider)).await;
        let result = recv_timeout!(&mut receiver, Duration::from_millis(200));
        assert_eq!(BridgeEvent::SessionStarted, *result);

        session_tx.send(Arc::new(SessionEvent::Ended)).unwrap();
        let result = recv_timeout!(&mut receiver, Duration::from_millis(200));
        assert_eq!(BridgeEvent::SessionEnded, *result);

        let _ = media_tx.send(Arc::new(MediaClientEvent::StatusUpdated));
        select! {
            _ = tokio::time::sleep(Duration::from_millis(200)) => {},
            event = receiver.recv() => panic!("expected no event, but got {:?}", event),
        }
        assert!(emitter.is_listening().await, "expected the listener to remain registered");
    }

    #[tokio::test]
    async fn test_provider_subscription_closed() {
        init_logger!();
        let (_session_tx, live_rx) = unbounded_channel::<Arc<SessionEvent>>();
        let (_, closed_rx) = unbounded_channel::<Arc<SessionEvent>>();
        let mut receivers = vec![live_rx, closed_rx];
        let mut provider = MockSessionProvider::new();
        provider
            .expect_subscribe()
            .times(2)
            .returning(move || receivers.pop().unwrap());
        provider.expect_current_session().returning(|| None);
        let provider = Arc::new(provider);
        let emitter = EventEmitter::new(100);

        emitter.add_session_listener(provider.clone()).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!emitter.is_listening().await, "expected the listener to be released");

        emitter.add_session_listener(provider).await;
        assert!(emitter.is_listening().await, "expected a listener to be registered");
    }
}
