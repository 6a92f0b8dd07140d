/// The current version of the cast bridge.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod core;

#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use crate::core::media::{LoadRequest, MediaStatus};
    use crate::core::session::{
        MediaClientEvent, PendingRequest, RemoteMediaClient, RemoteSession, RequestError,
        SessionEvent, SessionProvider,
    };

    use fx_callback::{Callback, Subscriber, Subscription};
    use log::LevelFilter;
    use log4rs::append::console::ConsoleAppender;
    use log4rs::config::{Appender, Logger, Root};
    use log4rs::encode::pattern::PatternEncoder;
    use log4rs::Config;
    use mockall::mock;
    use std::sync::{Arc, Once};
    use std::time::Duration;
    use tokio::select;
    use tokio::sync::mpsc::UnboundedReceiver;

    static INIT: Once = Once::new();

    /// Initializes the test logger with the specified log level.
    #[macro_export]
    macro_rules! init_logger {
        ($level:expr) => {
            $crate::testing::init_logger_level($level)
        };
        () => {
            $crate::testing::init_logger_level(log::LevelFilter::Trace)
        };
    }

    /// Initializes the test logger with the specified log level.
    pub fn init_logger_level(level: LevelFilter) {
        INIT.call_once(|| {
            log4rs::init_config(Config::builder()
                .appender(Appender::builder().build("stdout", Box::new(ConsoleAppender::builder()
                    .encoder(Box::new(PatternEncoder::new("\x1B[37m{d(%Y-%m-%d %H:%M:%S%.3f)}\x1B[0m {h({l:>5.5})} \x1B[35m{I:>6.6}\x1B[0m \x1B[37m---\x1B[0m \x1B[37m[{T:>15.15}]\x1B[0m \x1B[36m{t:<60.60}\x1B[0m \x1B[37m:\x1B[0m {m}{n}")))
                    .build())))
                .logger(Logger::builder().build("fx_callback", LevelFilter::Info))
                .logger(Logger::builder().build("mio", LevelFilter::Info))
                .logger(Logger::builder().build("tracing", LevelFilter::Info))
                .build(Root::builder().appender("stdout").build(level))
                .unwrap())
                .unwrap();
        })
    }

    /// Receive a message from the given receiver, or panic if the timeout is reached.
    #[macro_export]
    macro_rules! recv_timeout {
        ($receiver:expr, $timeout:expr) => {
            $crate::testing::recv_timeout($receiver, $timeout, "expected to receive an instance")
                .await
        };
        ($receiver:expr, $timeout:expr, $message:expr) => {
            $crate::testing::recv_timeout($receiver, $timeout, $message).await
        };
    }

    /// Receive a message from the given receiver, or panic if the timeout is reached.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiver to receive the message from.
    /// * `timeout` - The timeout to wait for the message.
    /// * `message` - The message to print if the timeout is reached.
    pub async fn recv_timeout<T>(
        receiver: &mut UnboundedReceiver<T>,
        timeout: Duration,
        message: &str,
    ) -> T {
        select! {
            _ = tokio::time::sleep(timeout) => panic!("receiver timed-out after {}ms, {}", timeout.as_millis(), message),
            result = receiver.recv() => result.expect(message)
        }
    }

    /// Returns a pending request which resolves successfully.
    pub fn completed_request() -> PendingRequest {
        Box::pin(futures::future::ready(Ok(())))
    }

    /// Returns a pending request which resolves with the given receiver failure.
    pub fn failed_request(message: &str) -> PendingRequest {
        let message = message.to_string();
        Box::pin(async move { Err(RequestError::Failed(message)) })
    }

    /// Returns a pending request which never resolves.
    pub fn unresolved_request() -> PendingRequest {
        Box::pin(futures::future::pending())
    }

    mock! {
        #[derive(Debug)]
        pub SessionProvider {}

        impl SessionProvider for SessionProvider {
            fn current_session(&self) -> Option<Arc<dyn RemoteSession>>;
            fn end_current_session(&self, stop_casting: bool);
        }

        impl Callback<SessionEvent> for SessionProvider {
            fn subscribe(&self) -> Subscription<SessionEvent>;
            fn subscribe_with(&self, subscriber: Subscriber<SessionEvent>);
        }
    }

    mock! {
        #[derive(Debug)]
        pub RemoteMediaClient {}

        impl RemoteMediaClient for RemoteMediaClient {
            fn media_status(&self) -> Option<MediaStatus>;
            fn approximate_stream_position(&self) -> Duration;
            fn load(&self, request: LoadRequest) -> PendingRequest;
            fn play(&self) -> PendingRequest;
            fn pause(&self) -> PendingRequest;
            fn stop(&self) -> PendingRequest;
            fn seek(&self, position: Duration) -> PendingRequest;
            fn set_stream_volume(&self, volume: f64) -> PendingRequest;
            fn set_playback_rate(&self, rate: f64) -> PendingRequest;
            fn set_active_track_ids(&self, track_ids: Vec<i64>) -> PendingRequest;
        }

        impl Callback<MediaClientEvent> for RemoteMediaClient {
            fn subscribe(&self) -> Subscription<MediaClientEvent>;
            fn subscribe_with(&self, subscriber: Subscriber<MediaClientEvent>);
        }
    }
}
