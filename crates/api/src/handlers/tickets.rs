//! Handlers for the `/tickets` resource.
//!
//! Reads are served from the live ticket snapshot held in [`AppState`];
//! writes go to the store and are visible in that snapshot before the
//! handler returns.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use helpdesk_core::error::CoreError;
use helpdesk_core::query::{query_tickets, SortConfig, SortDirection, SortKey, TicketFilters};
use helpdesk_core::ticket::{
    build_ticket, NewTicketForm, Priority, Ticket, TicketStatus, DEPARTMENTS,
};
use helpdesk_core::types::now_millis;
use helpdesk_core::update::TicketUpdate;
use helpdesk_db::repositories::TicketRepo;
use helpdesk_db::StoreError;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireEmployee};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for the admin list and the admin stream.
#[derive(Debug, Default, Deserialize)]
pub struct TicketListQuery {
    pub search: Option<String>,
    pub priority: Option<String>,
    /// `YYYY-MM-DD`; empty disables the date filter.
    pub date: Option<String>,
    /// `key-direction`, e.g. `priority-desc`.
    pub sort: Option<String>,
}

impl TicketListQuery {
    pub fn filters(&self) -> Result<TicketFilters, CoreError> {
        TicketFilters::from_raw(
            self.search.as_deref(),
            self.priority.as_deref(),
            self.date.as_deref(),
        )
    }

    pub fn sort(&self) -> SortConfig {
        self.sort.as_deref().map(SortConfig::parse).unwrap_or_default()
    }
}

/// Request body for `PUT /tickets/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateTicketRequest {
    pub status: TicketStatus,
    /// Admin reply; blank text adds no comment.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Option lists for ticket forms and filters.
#[derive(Debug, Serialize)]
pub struct TicketMeta {
    pub priorities: [Priority; 4],
    pub statuses: [TicketStatus; 3],
    pub departments: &'static [&'static str],
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// The admin dashboard view of `tickets`.
pub fn admin_view(tickets: &[Ticket], filters: &TicketFilters, sort: SortConfig) -> Vec<Ticket> {
    query_tickets(tickets, None, filters, sort)
        .into_iter()
        .cloned()
        .collect()
}

/// An employee's own tickets, newest first.
pub fn employee_view(tickets: &[Ticket], ps_number: &str) -> Vec<Ticket> {
    let newest_first = SortConfig::new(SortKey::Date, SortDirection::Desc);
    query_tickets(tickets, Some(ps_number), &TicketFilters::default(), newest_first)
        .into_iter()
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/tickets
///
/// Admin list with search, priority and date filters and a sort selector.
pub async fn list_tickets(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<TicketListQuery>,
) -> AppResult<Json<DataResponse<Vec<Ticket>>>> {
    let filters = params.filters()?;
    let tickets = admin_view(&state.ticket_snapshot(), &filters, params.sort());
    Ok(Json(DataResponse { data: tickets }))
}

/// POST /api/v1/tickets
///
/// File a ticket under the caller's PS number. Returns 201 with the stored ticket.
pub async fn create_ticket(
    RequireEmployee(user): RequireEmployee,
    State(state): State<AppState>,
    Json(form): Json<NewTicketForm>,
) -> AppResult<(StatusCode, Json<DataResponse<Ticket>>)> {
    let input = build_ticket(&user.subject, &form, now_millis())?;
    let ticket = TicketRepo::create(state.store.as_ref(), input).await?;

    tracing::info!(
        ticket_id = %ticket.id,
        ps_number = %ticket.ps_number,
        priority = ?ticket.priority,
        "Ticket created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: ticket })))
}

/// GET /api/v1/tickets/mine
pub async fn my_tickets(
    RequireEmployee(user): RequireEmployee,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Ticket>>>> {
    let tickets = employee_view(&state.ticket_snapshot(), &user.subject);
    Ok(Json(DataResponse { data: tickets }))
}

/// GET /api/v1/tickets/meta
pub async fn ticket_meta() -> Json<DataResponse<TicketMeta>> {
    Json(DataResponse {
        data: TicketMeta {
            priorities: Priority::KNOWN,
            statuses: TicketStatus::ALL,
            departments: DEPARTMENTS,
        },
    })
}

/// GET /api/v1/tickets/{id}
///
/// Admins may read any ticket; employees only their own. Another employee's
/// ticket reads as not found.
pub async fn get_ticket(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let ticket = TicketRepo::find_by_id(state.store.as_ref(), &id)
        .await?
        .filter(|t| user.is_admin() || t.ps_number == user.subject)
        .ok_or_else(|| ticket_not_found(&id))?;
    Ok(Json(DataResponse { data: ticket }))
}

/// PUT /api/v1/tickets/{id}
///
/// Overwrite the status and append the admin's reply, if any.
pub async fn update_ticket(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTicketRequest>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let update =
        TicketUpdate::from_admin_reply(input.status, input.comment.as_deref(), now_millis());

    let ticket = TicketRepo::apply_update(state.store.as_ref(), &id, &update)
        .await
        .map_err(|e| match e {
            StoreError::NotFound { .. } => ticket_not_found(&id),
            other => AppError::Store(other),
        })?;

    tracing::info!(
        ticket_id = %ticket.id,
        status = ?update.status,
        commented = update.comment.is_some(),
        admin = %admin.subject,
        "Ticket updated"
    );

    Ok(Json(DataResponse { data: ticket }))
}

fn ticket_not_found(id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Ticket",
        id: id.to_string(),
    })
}
