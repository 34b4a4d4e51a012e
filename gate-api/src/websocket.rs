//! Real-time boarding updates over WebSocket.
//!
//! Every frame is a JSON object `{ "event": ..., "data": ... }`.
//!
//! **Server → Client:**
//! - `boarding_update` `{ queue, passengers }` on connect and after every change
//! - `passenger_status` `{ passengerId, status, queuePosition }` for joined passengers
//! - `joined` / `left` `{ passengerId }` acknowledgements, `error` `{ message }`
//!
//! **Client → Server:**
//! - `join_queue` / `leave_queue` `{ passengerId }` (`join_passenger_room` is accepted for `join_queue`)

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use gate_shared::{BoardingUpdateEvent, PassengerId, PassengerStatusEvent};
use gate_store::Subscriptions;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::AppState;

type Sender = SplitSink<WebSocket, Message>;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    BoardingUpdate(BoardingUpdateEvent),
    PassengerStatus(PassengerStatusEvent),
    Joined(PassengerRef),
    Left(PassengerRef),
    Error { message: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    #[serde(alias = "join_passenger_room")]
    JoinQueue(PassengerRef),
    LeaveQueue(PassengerRef),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerRef {
    #[serde(alias = "passenger_id")]
    pub passenger_id: PassengerId,
}

/// GET /api/ws
pub async fn boarding_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4();
    info!(%connection_id, "Boarding observer connected");

    let (mut sender, mut receiver) = socket.split();

    // Subscribe before taking the initial state so nothing published in between is missed
    let mut updates = BroadcastStream::new(state.notifier.subscribe_updates());
    let mut notices = BroadcastStream::new(state.notifier.subscribe_notices());
    let mut subscriptions = Subscriptions::new();

    let initial = ServerMessage::BoardingUpdate(state.scheduler.board_state().await);
    if send(&mut sender, &initial).await.is_err() {
        return;
    }

    loop {
        let outgoing = tokio::select! {
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    handle_client_message(&state, &mut subscriptions, text.as_str()).await
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => Vec::new(),
                Some(Err(e)) => {
                    debug!(%connection_id, error = %e, "WebSocket receive failed");
                    break;
                }
            },
            update = updates.next() => match update {
                Some(Ok(event)) => vec![ServerMessage::BoardingUpdate(event)],
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    warn!(%connection_id, skipped, "Observer lagged, resending full state");
                    vec![ServerMessage::BoardingUpdate(state.scheduler.board_state().await)]
                }
                None => break,
            },
            notice = notices.next() => match notice {
                Some(Ok(notice)) if subscriptions.wants(&notice) => {
                    vec![ServerMessage::PassengerStatus(notice)]
                }
                Some(Ok(_)) => Vec::new(),
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    warn!(%connection_id, skipped, "Observer lagged on passenger notices");
                    let state_now = state.scheduler.board_state().await;
                    joined_notices(&state_now, &subscriptions)
                }
                None => break,
            },
        };

        for message in &outgoing {
            if send(&mut sender, message).await.is_err() {
                info!(%connection_id, "Boarding observer went away");
                return;
            }
        }
    }

    info!(%connection_id, "Boarding observer disconnected");
}

async fn handle_client_message(
    state: &AppState,
    subscriptions: &mut Subscriptions,
    text: &str,
) -> Vec<ServerMessage> {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            debug!(error = %e, "Unrecognized client message");
            return vec![ServerMessage::Error {
                message: format!("Unrecognized message: {}", e),
            }];
        }
    };

    match message {
        ClientMessage::JoinQueue(target) => {
            if subscriptions.join(target.passenger_id) {
                debug!(passenger_id = target.passenger_id, "Joined passenger scope");
            }
            let mut replies = vec![ServerMessage::Joined(target)];
            if let Ok(view) = state.scheduler.boarding_status(target.passenger_id).await {
                replies.push(ServerMessage::PassengerStatus(PassengerStatusEvent {
                    passenger_id: target.passenger_id,
                    status: view.boarding_status,
                    queue_position: view.queue_position,
                }));
            }
            replies
        }
        ClientMessage::LeaveQueue(target) => {
            if subscriptions.leave(target.passenger_id) {
                debug!(passenger_id = target.passenger_id, "Left passenger scope");
            }
            vec![ServerMessage::Left(target)]
        }
    }
}

fn joined_notices(state: &BoardingUpdateEvent, subscriptions: &Subscriptions) -> Vec<ServerMessage> {
    state
        .passengers
        .keys()
        .filter(|id| subscriptions.is_joined(**id))
        .filter_map(|id| state.notice_for(*id))
        .map(ServerMessage::PassengerStatus)
        .collect()
}

async fn send(sender: &mut Sender, message: &ServerMessage) -> Result<(), axum::Error> {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "Failed to serialize WebSocket message");
            return Ok(());
        }
    };
    sender.send(Message::Text(json.into())).await
}
