//! Portal view state machine.
//!
//! The portal has four screens. Moving between them is only possible through
//! the listed events, and the admin dashboard is unreachable unless the admin
//! slot of the session is authenticated.

use serde::Serialize;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PortalView {
    #[default]
    UserNewTicket,
    UserTicketStatus,
    AdminLogin,
    AdminDashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    ShowNewTicket,
    ShowTicketStatus,
    /// A ticket was accepted by the store; the submitter is shown its status.
    TicketSubmitted,
    RequestAdminAccess,
    AdminAuthenticated,
    CancelAdminLogin,
    AdminLogout,
}

impl PortalView {
    pub fn is_admin(self) -> bool {
        matches!(self, PortalView::AdminLogin | PortalView::AdminDashboard)
    }

    /// Next view for `event`, given whether the admin slot is authenticated.
    pub fn transition(
        self,
        event: ViewEvent,
        admin_authenticated: bool,
    ) -> Result<Self, CoreError> {
        use PortalView::*;
        use ViewEvent::*;

        let next = match (self, event) {
            (UserNewTicket | UserTicketStatus, ShowNewTicket) => Some(UserNewTicket),
            (UserNewTicket | UserTicketStatus, ShowTicketStatus) => Some(UserTicketStatus),
            (UserNewTicket, TicketSubmitted) => Some(UserTicketStatus),
            (UserNewTicket | UserTicketStatus, RequestAdminAccess) => Some(if admin_authenticated {
                AdminDashboard
            } else {
                AdminLogin
            }),
            (AdminLogin, AdminAuthenticated) if admin_authenticated => Some(AdminDashboard),
            (AdminLogin, CancelAdminLogin) => Some(UserNewTicket),
            (AdminDashboard, AdminLogout) => Some(UserNewTicket),
            _ => None,
        };

        next.ok_or_else(|| {
            CoreError::Validation(format!("{event:?} is not allowed from {self:?}"))
        })
    }
}
