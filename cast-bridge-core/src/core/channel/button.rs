use std::fmt::Debug;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

/// The cast button control rendered by the host.
///
/// The bridge never renders the button, it only delegates clicks to it.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait CastButton: Debug + Send + Sync {
    /// Perform a click on the cast button, opening the receiver selection of the host.
    fn perform_click(&self);
}
