use tokio::sync::mpsc;

use crate::domain::{Navigator, Route};

// Forwards redirect requests to whatever drives the UI router.
#[derive(Clone)]
pub struct ChannelNavigator {
    route_tx: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (route_tx, route_rx) = mpsc::unbounded_channel();
        (Self { route_tx }, route_rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        // A closed router means the UI is gone; nothing left to redirect.
        if self.route_tx.send(route).is_err() {
            tracing::debug!(%route, "router closed; redirect dropped");
        }
    }
}
