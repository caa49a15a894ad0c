//! Live ticket views over WebSocket.
//!
//! `GET /api/v1/tickets/stream?token=...` upgrades after the token has been
//! checked. The server then sends one text frame per ticket snapshot, each
//! holding the caller's complete derived view as `{ "data": [...] }`:
//! admins get the dashboard view (same filter and sort parameters as
//! `GET /tickets`), employees get their own tickets.
//!
//! The session is re-checked before every frame. Once it has been revoked
//! or has expired the server sends a policy-violation close frame and drops
//! the connection.

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use helpdesk_core::query::{SortConfig, TicketFilters};
use helpdesk_db::repositories::{SessionRepo, TicketRepo};
use helpdesk_db::{Document, Subscription};
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::tickets::{admin_view, employee_view, TicketListQuery};
use crate::middleware::auth::{authenticate_token, AuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub token: String,
    #[serde(flatten)]
    pub view: TicketListQuery,
}

/// Which derived view a connection receives.
enum StreamView {
    Admin {
        filters: TicketFilters,
        sort: SortConfig,
    },
    Employee {
        ps_number: String,
    },
}

impl StreamView {
    fn for_user(user: &AuthUser, query: &TicketListQuery) -> AppResult<Self> {
        if user.is_admin() {
            Ok(StreamView::Admin {
                filters: query.filters()?,
                sort: query.sort(),
            })
        } else {
            Ok(StreamView::Employee {
                ps_number: user.subject.clone(),
            })
        }
    }

    fn render(&self, feed: &[Document]) -> Result<String, serde_json::Error> {
        let tickets = TicketRepo::decode_snapshot(feed);
        let data = match self {
            StreamView::Admin { filters, sort } => admin_view(&tickets, filters, *sort),
            StreamView::Employee { ps_number } => employee_view(&tickets, ps_number),
        };
        serde_json::to_string(&DataResponse { data })
    }
}

/// GET /api/v1/tickets/stream
pub async fn ticket_stream(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> AppResult<Response> {
    let user = authenticate_token(&state, &query.token).await?;
    let view = StreamView::for_user(&user, &query.view)?;
    let feed = state.ticket_feed.resubscribe();

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user, view, feed)))
}

/// WebSocket close code for "policy violation" (RFC 6455 section 7.4.1).
const CLOSE_POLICY: u16 = 1008;

/// Push a fresh view on every snapshot until either side goes away or the
/// session ends.
async fn handle_socket(
    socket: WebSocket,
    state: AppState,
    user: AuthUser,
    view: StreamView,
    mut feed: Subscription,
) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(
        conn_id = %conn_id,
        subject = %user.subject,
        role = %user.role,
        "Ticket stream connected"
    );

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            snapshot = feed.next() => {
                let Some(snapshot) = snapshot else {
                    tracing::debug!(conn_id = %conn_id, "Ticket feed closed");
                    break;
                };

                let active =
                    SessionRepo::is_active(state.store.as_ref(), &user.session_id, Utc::now())
                        .await;
                match active {
                    Ok(true) => {}
                    Ok(false) => {
                        tracing::info!(
                            conn_id = %conn_id,
                            subject = %user.subject,
                            "Session ended, closing ticket stream"
                        );
                        let close = CloseFrame {
                            code: CLOSE_POLICY,
                            reason: "Session has ended".into(),
                        };
                        let _ = sink.send(Message::Close(Some(close))).await;
                        break;
                    }
                    Err(e) => {
                        tracing::error!(conn_id = %conn_id, error = %e, "Session lookup failed");
                        break;
                    }
                }

                let payload = match view.render(&snapshot) {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::error!(
                            conn_id = %conn_id,
                            error = %e,
                            "Failed to serialize ticket view"
                        );
                        break;
                    }
                };
                if sink.send(Message::Text(payload.into())).await.is_err() {
                    tracing::debug!(conn_id = %conn_id, "WebSocket sink closed");
                    break;
                }
            }
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                        break;
                    }
                }
            }
        }
    }

    tracing::info!(conn_id = %conn_id, "Ticket stream disconnected");
}
