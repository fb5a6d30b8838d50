//! WebSocket server and connection handling.

use crate::protocol::{ClientMessage, ErrorKind, GameView, ServerMessage};
use crate::service::GameService;
use crate::store::InMemoryStore;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use mancala_core::Player;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState {
    /// Game lifecycle over the in-process store
    pub service: GameService<InMemoryStore>,
    /// Mapping from connection ID to its message sender
    pub connections: DashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
    /// Stones per pit when a create request doesn't say
    pub initial_stones: u32,
}

impl ServerState {
    pub fn new(initial_stones: u32) -> Self {
        Self {
            service: GameService::new(InMemoryStore::new()),
            connections: DashMap::new(),
            initial_stones,
        }
    }

    /// Send a message to a specific connection.
    pub fn send_to_connection(&self, connection_id: Uuid, msg: ServerMessage) {
        if let Some(sender) = self.connections.get(&connection_id) {
            let _ = sender.send(msg);
        }
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Mancala server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let connection_id = Uuid::new_v4();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.connections.insert(connection_id, tx);

    let welcome = ServerMessage::Welcome { connection_id };
    let msg_text = serde_json::to_string(&welcome)?;
    ws_sender.send(Message::Text(msg_text)).await?;

    // Forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => match dispatch(client_msg, &state).await {
                    Ok(replies) => {
                        for reply in replies {
                            state.send_to_connection(connection_id, reply);
                        }
                    }
                    Err(e) => error!("Handler failed for {}: {}", connection_id, e),
                },
                Err(e) => {
                    warn!("Invalid message from {}: {}", connection_id, text);
                    state.send_to_connection(
                        connection_id,
                        ServerMessage::error(ErrorKind::InvalidMessage, e.to_string()),
                    );
                }
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", connection_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                state.send_to_connection(connection_id, ServerMessage::Pong);
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", connection_id, e);
                break;
            }
            _ => {}
        }
    }

    state.connections.remove(&connection_id);
    send_task.abort();

    info!("Connection closed for {}", connection_id);
    Ok(())
}

/// Run `handle_message` off the async workers, since moves hold a
/// blocking per-game lock.
async fn dispatch(
    msg: ClientMessage,
    state: &Arc<ServerState>,
) -> anyhow::Result<Vec<ServerMessage>> {
    let state = Arc::clone(state);
    let replies = tokio::task::spawn_blocking(move || handle_message(msg, &state)).await?;
    Ok(replies)
}

/// Handle a client message, returning the replies in order.
fn handle_message(msg: ClientMessage, state: &ServerState) -> Vec<ServerMessage> {
    match msg {
        ClientMessage::CreateGame { initial_stones } => {
            let stones = initial_stones.unwrap_or(state.initial_stones);
            match state.service.create(stones) {
                Ok(game) => {
                    debug!(games = state.service.store().len(), "Games in memory");
                    vec![ServerMessage::GameCreated {
                        game: GameView::from(&game),
                    }]
                }
                Err(e) => vec![e.into()],
            }
        }

        ClientMessage::Move { game_id, pit } => match state.service.move_pit(game_id, pit) {
            Ok((game, events)) => {
                let mut replies = vec![ServerMessage::MoveApplied {
                    game: GameView::from(&game),
                    events,
                }];

                // Check for game over
                if game.state.is_finished() {
                    replies.push(ServerMessage::GameOver {
                        game_id,
                        phase: game.state.phase,
                        store_a: game.state.store(Player::A),
                        store_b: game.state.store(Player::B),
                    });
                }
                replies
            }
            Err(e) => vec![e.into()],
        },

        ClientMessage::GameStatus { game_id } => match state.service.status(game_id) {
            Ok(game) => vec![ServerMessage::GameStatus {
                game: GameView::from(&game),
            }],
            Err(e) => vec![e.into()],
        },

        ClientMessage::Ping => vec![ServerMessage::Pong],
    }
}
