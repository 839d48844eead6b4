//! WebSocket channel client for the push-update protocol.
//!
//! One `ViewChannel` per mounted view: it opens the websocket for the view's
//! topic, classifies every inbound envelope against the binding table, and
//! recovers from unclean closures with a fixed-delay reconnect that delivers
//! the fresh snapshot to the same, still-live view. The run view's log
//! stream uses the separate, envelope-free `LogChannel`.
//!
//! All websocket logic is gated behind `#[cfg(feature = "hydrate")]` since it
//! requires a browser environment; the binding and reconnect submodules are
//! pure and test natively.
//!
//! ERROR HANDLING
//! ==============
//! Decode failures and protocol-order violations are logged and the message
//! is discarded whole; the view keeps its last-known-good state. Transport
//! failures feed the reconnect cycle instead of surfacing as errors.

#[path = "channel_binding.rs"]
mod channel_binding;
#[path = "channel_reconnect.rs"]
mod channel_reconnect;

pub use channel_binding::{BindingTable, Dispatch};
pub use channel_reconnect::{Phase, RECONNECT_DELAY_MS, Reconnector, TimerId};

#[cfg(test)]
#[path = "channel_test.rs"]
mod channel_test;

#[cfg(feature = "hydrate")]
use std::cell::{Cell, RefCell};
#[cfg(feature = "hydrate")]
use std::rc::Rc;

#[cfg(feature = "hydrate")]
use leptos::prelude::{RwSignal, Update};
#[cfg(feature = "hydrate")]
use uuid::Uuid;

#[cfg(feature = "hydrate")]
use crate::net::topic::{self, Topic};
#[cfg(feature = "hydrate")]
use crate::state::session::SessionState;

#[cfg(feature = "hydrate")]
thread_local! {
    static BINDINGS: RefCell<BindingTable> = RefCell::new(BindingTable::new());
}

/// Callback a page supplies to fold dispatched envelopes into its view state.
#[cfg(feature = "hydrate")]
pub type ApplyFn = Rc<dyn Fn(Dispatch, &events::Envelope)>;

/// Cloneable sending half of a view channel, safe to hold in a signal.
///
/// The default value is disconnected: every send returns `false` until a
/// live channel's sender replaces it.
#[derive(Clone, Default)]
pub struct ChannelSender {
    #[cfg(feature = "hydrate")]
    tx: Option<futures::channel::mpsc::UnboundedSender<String>>,
}

impl ChannelSender {
    /// Send a text request to the server via the owning channel.
    ///
    /// Returns `false` if no connection is live.
    pub fn send(&self, text: String) -> bool {
        #[cfg(feature = "hydrate")]
        {
            self.tx
                .as_ref()
                .is_some_and(|tx| tx.unbounded_send(text).is_ok())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = text;
            false
        }
    }
}

#[cfg(feature = "hydrate")]
struct ChannelShared {
    closed: Cell<bool>,
    reconnect: RefCell<Reconnector>,
}

/// Handle to one live state channel, owned by the page that opened it.
///
/// Dropping the handle does not close the channel; navigation teardown must
/// call [`ViewChannel::close`] so the binding slot and any pending reconnect
/// timer are cleared before the next view's setup begins.
#[cfg(feature = "hydrate")]
pub struct ViewChannel {
    topic: Topic,
    tx: futures::channel::mpsc::UnboundedSender<String>,
    shared: Rc<ChannelShared>,
}

#[cfg(feature = "hydrate")]
impl ViewChannel {
    /// Open a channel for a topic and attach the calling view to its slot.
    ///
    /// The first snapshot to arrive binds the connection to this view;
    /// `apply` then receives every dispatched envelope in server-send order.
    pub fn open(topic: Topic, session: RwSignal<SessionState>, apply: ApplyFn) -> Self {
        let view_id = Uuid::new_v4();
        BINDINGS.with(|table| table.borrow_mut().attach_view(topic.clone(), view_id));

        let (tx, rx) = futures::channel::mpsc::unbounded::<String>();
        let shared = Rc::new(ChannelShared {
            closed: Cell::new(false),
            reconnect: RefCell::new(Reconnector::new()),
        });

        leptos::task::spawn_local(channel_loop(topic.clone(), session, apply, shared.clone(), rx));

        Self { topic, tx, shared }
    }

    /// Send a text request (the job view's sort spec) to the server.
    ///
    /// Returns `false` if the channel is closed (no active connection).
    pub fn send(&self, text: String) -> bool {
        self.tx.unbounded_send(text).is_ok()
    }

    /// A cloneable sender for this channel, for storage in a signal.
    #[must_use]
    pub fn sender(&self) -> ChannelSender {
        ChannelSender { tx: Some(self.tx.clone()) }
    }

    /// Clean teardown from navigation. Synchronously cancels any pending
    /// reconnect timer and clears the binding slot, then lets the socket
    /// wind down; no recovery is attempted for a clean closure.
    pub fn close(&self) {
        self.shared.closed.set(true);
        self.shared.reconnect.borrow_mut().cancel();
        self.tx.close_channel();
        BINDINGS.with(|table| table.borrow_mut().detach_view(&self.topic));
    }
}

/// Main connection loop with fixed-delay reconnect.
#[cfg(feature = "hydrate")]
async fn channel_loop(
    topic: Topic,
    session: RwSignal<SessionState>,
    apply: ApplyFn,
    shared: Rc<ChannelShared>,
    rx: futures::channel::mpsc::UnboundedReceiver<String>,
) {
    let rx = Rc::new(RefCell::new(rx));

    loop {
        if shared.closed.get() {
            break;
        }

        let url = topic::ws_url_from_location(&topic);
        let connection_id = Uuid::new_v4();
        if let Err(e) = connect_and_run(&url, &topic, connection_id, session, &apply, &shared, &rx).await {
            leptos::logging::warn!("channel {topic}: {e}");
        }

        if shared.closed.get() {
            break;
        }

        // Unclean closure: drop the connection half of the slot so the
        // reconnect's snapshot re-binds the same view, flag the session as
        // disconnected, and arm the (single) recovery timer.
        BINDINGS.with(|table| table.borrow_mut().detach_connection(&topic));
        session.update(|s| s.connected = false);

        let Some(timer) = shared.reconnect.borrow_mut().unclean_close() else {
            break;
        };
        gloo_timers::future::sleep(std::time::Duration::from_millis(RECONNECT_DELAY_MS)).await;
        if shared.closed.get() || !shared.reconnect.borrow_mut().timer_fired(timer) {
            break;
        }
    }
}

/// Connect to the websocket and process messages until disconnect.
#[cfg(feature = "hydrate")]
async fn connect_and_run(
    url: &str,
    topic: &Topic,
    connection_id: Uuid,
    session: RwSignal<SessionState>,
    apply: &ApplyFn,
    shared: &Rc<ChannelShared>,
    rx: &Rc<RefCell<futures::channel::mpsc::UnboundedReceiver<String>>>,
) -> Result<(), String> {
    use futures::StreamExt;
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;

    let ws = WebSocket::open(url).map_err(|e| e.to_string())?;
    let (mut ws_write, mut ws_read) = ws.split();

    // Forward outgoing requests from the page's sender to the socket.
    let mut rx_borrow = rx.borrow_mut();
    let send_task = async {
        use futures::SinkExt;
        while let Some(text) = rx_borrow.next().await {
            if ws_write.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    };

    let recv_task = async {
        while let Some(msg) = ws_read.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if shared.closed.get() {
                        break;
                    }
                    handle_message(topic, connection_id, session, apply, shared, &text);
                }
                Ok(Message::Bytes(_)) => {}
                Err(e) => {
                    leptos::logging::warn!("channel {topic} recv error: {e}");
                    break;
                }
            }
        }
    };

    // When either side finishes, the connection is done.
    futures::future::select(Box::pin(send_task), Box::pin(recv_task)).await;

    Ok(())
}

/// Decode, classify, and dispatch one inbound text frame.
#[cfg(feature = "hydrate")]
fn handle_message(
    topic: &Topic,
    connection_id: Uuid,
    session: RwSignal<SessionState>,
    apply: &ApplyFn,
    shared: &Rc<ChannelShared>,
    text: &str,
) {
    let envelope = match events::decode_envelope(text) {
        Ok(envelope) => envelope,
        Err(err) => {
            leptos::logging::error!("channel {topic}: discarding malformed message: {err}");
            return;
        }
    };

    let dispatch = BINDINGS.with(|table| table.borrow().classify(topic, &envelope.kind));
    match dispatch {
        Dispatch::FirstSnapshot => {
            let bound =
                BINDINGS.with(|table| table.borrow_mut().bind_connection(topic, connection_id));
            if !bound {
                leptos::logging::error!("channel {topic}: snapshot arrived with no attached view");
                return;
            }
            shared.reconnect.borrow_mut().connected();
            session.update(|s| {
                s.apply_snapshot_meta(envelope.time, envelope.title.clone(), crate::util::local_now());
            });
            apply(Dispatch::FirstSnapshot, &envelope);
        }
        Dispatch::Update => apply(Dispatch::Update, &envelope),
        Dispatch::ProtocolError => {
            leptos::logging::error!(
                "channel {topic}: {} event with no bound view",
                envelope.kind
            );
        }
    }
}

/// Handle to one live log channel (run view).
///
/// Carries raw appended text, never JSON envelopes, and has no reconnect:
/// navigation re-opens it, and the paired state channel's recovery covers
/// transport failures.
#[cfg(feature = "hydrate")]
pub struct LogChannel {
    closed: Rc<Cell<bool>>,
}

#[cfg(feature = "hydrate")]
impl LogChannel {
    /// Open the log stream for a run topic. `apply` receives each text
    /// fragment in emission order; the caller resets its buffer before
    /// opening, so accumulation starts empty exactly at (re)open.
    pub fn open(topic: Topic, apply: Rc<dyn Fn(&str)>) -> Self {
        let closed = Rc::new(Cell::new(false));
        let closed_flag = closed.clone();
        leptos::task::spawn_local(async move {
            use futures::StreamExt;
            use gloo_net::websocket::Message;
            use gloo_net::websocket::futures::WebSocket;

            let url = topic::ws_url_from_location(&topic);
            let Ok(mut ws) = WebSocket::open(&url) else {
                leptos::logging::warn!("log channel {topic}: failed to open");
                return;
            };
            while let Some(msg) = ws.next().await {
                if closed_flag.get() {
                    break;
                }
                match msg {
                    Ok(Message::Text(chunk)) => apply(&chunk),
                    Ok(Message::Bytes(_)) => {}
                    Err(e) => {
                        leptos::logging::warn!("log channel {topic} recv error: {e}");
                        break;
                    }
                }
            }
        });
        Self { closed }
    }

    /// Clean teardown from navigation.
    pub fn close(&self) {
        self.closed.set(true);
    }
}
