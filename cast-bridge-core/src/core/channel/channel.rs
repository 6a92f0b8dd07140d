use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::channel::Result;

/// A method call received from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    /// The unique id of the call, used to reply to the call.
    pub id: u64,
    /// The name of the invoked method, including the method prefix.
    pub method: String,
    pub arguments: Option<Value>,
}

/// The bidirectional method channel between the bridge and the host.
#[async_trait]
pub trait MethodChannel: Debug + Send + Sync {
    /// Receive the next method call from the host.
    /// It returns `None` when the channel has been closed.
    ///
    /// This future must be cancellation safe.
    async fn recv(&self) -> Option<MethodCall>;

    /// Reply to the method call with the given id.
    async fn reply(&self, id: u64, value: Value) -> Result<()>;

    /// Invoke the given method on the host.
    async fn invoke(&self, method: &str, arguments: Value) -> Result<()>;
}
