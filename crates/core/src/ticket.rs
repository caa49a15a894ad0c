//! Ticket model and the pure half of the ticket create protocol.
//!
//! A ticket is owned by exactly one employee (`ps_number`), is created with
//! status `Open` and a single system comment, and afterwards only changes
//! through the update protocol (`crate::update`).

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::types::{EpochMillis, PsNumber};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Text of the system comment seeded on every new ticket.
pub const RECEIVED_COMMENT: &str = "Ticket received.";

/// Department used when the submission does not name one.
pub const DEFAULT_DEPARTMENT: &str = "IT";

/// Departments offered by the submission form. The stored field stays free text.
pub const DEPARTMENTS: &[&str] = &["IT", "HR", "Finance", "Operations", "Sales", "Other"];

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Ticket urgency. Immutable after creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
    /// Any stored value outside the four known priorities.
    #[serde(other)]
    Unknown,
}

impl Priority {
    /// The four priorities a client may submit, lowest first.
    pub const KNOWN: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    /// Parse a wire name; anything unrecognised is [`Priority::Unknown`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "Low" => Priority::Low,
            "Medium" => Priority::Medium,
            "High" => Priority::High,
            "Critical" => Priority::Critical,
            _ => Priority::Unknown,
        }
    }
}

/// Ticket lifecycle status. Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
    ];
}

/// Who wrote a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentAuthor {
    System,
    Admin,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A single entry in a ticket's comment thread. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: CommentAuthor,
    pub text: String,
    pub timestamp: EpochMillis,
}

impl Comment {
    pub fn system(text: impl Into<String>, timestamp: EpochMillis) -> Self {
        Self {
            author: CommentAuthor::System,
            text: text.into(),
            timestamp,
        }
    }

    pub fn admin(text: impl Into<String>, timestamp: EpochMillis) -> Self {
        Self {
            author: CommentAuthor::Admin,
            text: text.into(),
            timestamp,
        }
    }
}

/// A persisted support ticket as held in the `tickets` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub ps_number: PsNumber,
    pub email: String,
    #[serde(default)]
    pub department: Option<String>,
    pub subject: String,
    #[serde(default = "unknown_priority")]
    pub priority: Priority,
    /// Absent on records written without a status; see [`Ticket::effective_status`].
    #[serde(default)]
    pub status: Option<TicketStatus>,
    pub timestamp: EpochMillis,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub attachment_name: Option<String>,
    #[serde(default)]
    pub attachment_url: Option<String>,
}

fn unknown_priority() -> Priority {
    Priority::Unknown
}

impl Ticket {
    /// Status to display: an absent status reads as `Open` without being
    /// written back.
    pub fn effective_status(&self) -> TicketStatus {
        self.status.unwrap_or(TicketStatus::Open)
    }

    /// Attach the store-assigned id to a freshly built record.
    pub fn from_new(id: impl Into<String>, new: NewTicket) -> Self {
        Self {
            id: id.into(),
            ps_number: new.ps_number,
            email: new.email,
            department: new.department,
            subject: new.subject,
            priority: new.priority,
            status: Some(new.status),
            timestamp: new.timestamp,
            comments: new.comments,
            attachment_name: new.attachment_name,
            attachment_url: new.attachment_url,
        }
    }
}

/// A fully stamped ticket that has not been assigned an id yet.
///
/// Serializes to exactly the fields stored in a `tickets/{id}` document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    pub ps_number: PsNumber,
    pub email: String,
    pub department: Option<String>,
    pub subject: String,
    pub priority: Priority,
    pub status: TicketStatus,
    pub timestamp: EpochMillis,
    pub comments: Vec<Comment>,
    pub attachment_name: Option<String>,
    pub attachment_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Submission form
// ---------------------------------------------------------------------------

/// Ticket submission as sent by an employee.
///
/// `ps_number` is accepted for compatibility with the submission form but is
/// always replaced by the authenticated owner.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTicketForm {
    #[serde(default)]
    pub ps_number: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub email: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub subject: String,
    /// Name of the client-side file, if one was attached. Content is not stored.
    #[serde(default)]
    pub attachment_name: Option<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Check the submission before anything is stamped or stored.
///
/// Fails with a validation error naming every blank required field and a
/// priority outside [`Priority::KNOWN`]. `Unknown` is only ever read back
/// from stored documents.
pub fn validate_new_ticket(form: &NewTicketForm) -> Result<(), CoreError> {
    let mut errors = form.validate().err().unwrap_or_else(ValidationErrors::new);
    if form.priority == Some(Priority::Unknown) {
        errors.add("priority", ValidationError::new("unknown_priority"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}

/// Validate `form` and stamp the creation metadata.
///
/// The owner always comes from the authenticated session, never from the
/// form. Email and subject are stored trimmed.
pub fn build_ticket(
    owner: &str,
    form: &NewTicketForm,
    now: EpochMillis,
) -> Result<NewTicket, CoreError> {
    validate_new_ticket(form)?;

    let department = Some(
        form.department
            .clone()
            .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string()),
    );
    let attachment_name = form
        .attachment_name
        .as_ref()
        .filter(|name| !name.trim().is_empty())
        .cloned();

    Ok(NewTicket {
        ps_number: owner.to_string(),
        email: form.email.trim().to_string(),
        department,
        subject: form.subject.trim().to_string(),
        priority: form.priority.unwrap_or_default(),
        status: TicketStatus::Open,
        timestamp: now,
        comments: vec![Comment::system(RECEIVED_COMMENT, now)],
        attachment_name,
        attachment_url: None,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
