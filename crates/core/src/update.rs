//! Ticket update protocol: status overwrite plus optional comment append.

use serde::Serialize;

use crate::ticket::{Comment, Ticket, TicketStatus};
use crate::types::EpochMillis;

/// A status change and/or a comment to append.
///
/// Status is written unconditionally; there are no transition rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketUpdate {
    pub status: TicketStatus,
    pub comment: Option<Comment>,
}

impl TicketUpdate {
    pub fn status_only(status: TicketStatus) -> Self {
        Self {
            status,
            comment: None,
        }
    }

    /// Build an update from the admin dashboard's reply box.
    ///
    /// A reply that is blank after trimming adds no comment.
    pub fn from_admin_reply(status: TicketStatus, reply: Option<&str>, now: EpochMillis) -> Self {
        let comment = reply
            .filter(|text| !text.trim().is_empty())
            .map(|text| Comment::admin(text, now));
        Self { status, comment }
    }

    /// Merge into an in-memory record. Prior comments keep their order; the
    /// new comment, if any, becomes the last element.
    pub fn apply_to(&self, ticket: &Ticket) -> Ticket {
        let mut updated = ticket.clone();
        updated.status = Some(self.status);
        if let Some(comment) = &self.comment {
            updated.comments.push(comment.clone());
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::{CommentAuthor, Priority};

    fn ticket() -> Ticket {
        Ticket {
            id: "t1".into(),
            ps_number: "PS1".into(),
            email: "a@b.c".into(),
            department: Some("IT".into()),
            subject: "VPN".into(),
            priority: Priority::High,
            status: Some(TicketStatus::Open),
            timestamp: 10,
            comments: vec![Comment::system("Ticket received.", 10)],
            attachment_name: None,
            attachment_url: None,
        }
    }

    #[test]
    fn status_only_leaves_comments_untouched() {
        let before = ticket();
        let after = TicketUpdate::status_only(TicketStatus::Resolved).apply_to(&before);

        assert_eq!(after.status, Some(TicketStatus::Resolved));
        assert_eq!(after.comments, before.comments);
    }

    #[test]
    fn comment_is_appended_last() {
        let before = ticket();
        let update = TicketUpdate::from_admin_reply(TicketStatus::InProgress, Some("On it"), 20);
        let after = update.apply_to(&before);

        assert_eq!(after.comments.len(), before.comments.len() + 1);
        assert_eq!(after.comments[0], before.comments[0]);
        let last = after.comments.last().unwrap();
        assert_eq!(last.author, CommentAuthor::Admin);
        assert_eq!(last.text, "On it");
        assert_eq!(last.timestamp, 20);
    }

    #[test]
    fn blank_reply_adds_no_comment() {
        let update = TicketUpdate::from_admin_reply(TicketStatus::Open, Some("   "), 20);
        assert_eq!(update.comment, None);
        assert_eq!(TicketUpdate::from_admin_reply(TicketStatus::Open, None, 20).comment, None);
    }

    #[test]
    fn any_status_may_follow_any_other() {
        let mut current = ticket();
        let sequence = [
            TicketStatus::Resolved,
            TicketStatus::Open,
            TicketStatus::InProgress,
            TicketStatus::Open,
        ];
        for status in sequence {
            current = TicketUpdate::status_only(status).apply_to(&current);
            assert_eq!(current.status, Some(status));
        }
    }
}
