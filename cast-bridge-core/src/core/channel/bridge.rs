use std::sync::Arc;

use fx_callback::{Callback, Subscription};
use log::{debug, trace, warn};
use tokio::select;
use tokio_util::sync::CancellationToken;

use crate::core::channel::{MethodCall, MethodChannel};
use crate::core::commands::CommandDispatcher;
use crate::core::events::BridgeEvent;

/// The bridge which wires a host method channel to the command dispatcher.
///
/// Every method call is replied with the acknowledgement of the dispatcher and every emitted
/// event is invoked on the host. The bridge stops when the channel is closed or the bridge is
/// dropped.
#[derive(Debug)]
pub struct ChannelBridge {
    cancellation_token: CancellationToken,
}

impl ChannelBridge {
    /// Start bridging the given channel with the dispatcher.
    pub fn start(dispatcher: Arc<CommandDispatcher>, channel: Arc<dyn MethodChannel>) -> Self {
        let cancellation_token = CancellationToken::new();
        let events = dispatcher.subscribe();
        let token = cancellation_token.clone();

        tokio::spawn(async move {
            let _guard = token.clone().drop_guard();
            Self::run(dispatcher, channel, events, token).await;
        });

        Self { cancellation_token }
    }

    /// Stop the bridge, no further method calls or events are processed.
    pub fn stop(&self) {
        self.cancellation_token.cancel();
    }

    /// Verify if the bridge is still running.
    /// The bridge stops running once its main loop ended for any reason.
    pub fn is_running(&self) -> bool {
        !self.cancellation_token.is_cancelled()
    }

    async fn run(
        dispatcher: Arc<CommandDispatcher>,
        channel: Arc<dyn MethodChannel>,
        mut events: Subscription<BridgeEvent>,
        token: CancellationToken,
    ) {
        loop {
            select! {
                _ = token.cancelled() => break,
                call = channel.recv() => match call {
                    Some(call) => Self::handle_call(&dispatcher, &channel, call).await,
                    None => {
                        debug!("Host channel has been closed");
                        break;
                    }
                },
                Some(event) = events.recv() => {
                    Self::handle_event(&dispatcher, &channel, &event).await
                },
            }
        }

        debug!("Channel bridge main loop ended");
    }

    async fn handle_call(
        dispatcher: &CommandDispatcher,
        channel: &Arc<dyn MethodChannel>,
        call: MethodCall,
    ) {
        trace!("Received host method call {:?}", call);
        let value = dispatcher
            .dispatch(call.method.as_str(), call.arguments.as_ref())
            .await;

        if let Err(e) = channel.reply(call.id, value).await {
            warn!("Failed to reply to method call {}, {}", call.id, e);
        }
    }

    async fn handle_event(
        dispatcher: &CommandDispatcher,
        channel: &Arc<dyn MethodChannel>,
        event: &BridgeEvent,
    ) {
        let method = format!("{}{}", dispatcher.method_prefix(), event.method_name());
        trace!("Invoking host method {} for {}", method, event);

        if let Err(e) = channel.invoke(method.as_str(), event.arguments()).await {
            warn!("Failed to invoke host method {}, {}", method, e);
        }
    }
}

impl Drop for ChannelBridge {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}
