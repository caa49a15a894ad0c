//! Ticket query engine: ownership scoping, dashboard filters and sorting.
//!
//! Every function here is a pure function of its inputs. The input slice is
//! never reordered; results borrow from it, so a fresh snapshot can be
//! re-queried as often as needed.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::ticket::{Priority, Ticket};

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Priority filter value. `"All"` disables the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "All" => PriorityFilter::All,
            other => PriorityFilter::Only(Priority::from_name(other)),
        }
    }
}

/// Dashboard filter state. The default matches every ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilters {
    /// Case-insensitive substring; empty matches everything.
    pub search: String,
    pub priority: PriorityFilter,
    /// Creation day (UTC); `None` matches everything.
    pub date: Option<NaiveDate>,
}

impl TicketFilters {
    /// Build filters from raw request values.
    ///
    /// An empty or absent date disables the date filter; any other value must
    /// be an ISO `YYYY-MM-DD` date.
    pub fn from_raw(
        search: Option<&str>,
        priority: Option<&str>,
        date: Option<&str>,
    ) -> Result<Self, CoreError> {
        let date = match date.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                CoreError::Validation(format!("Invalid date filter '{raw}', expected YYYY-MM-DD"))
            })?),
        };

        Ok(Self {
            search: search.unwrap_or_default().to_string(),
            priority: priority.map(PriorityFilter::parse).unwrap_or_default(),
            date,
        })
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Date,
    Priority,
    /// Unrecognised key: input order is kept.
    Unsorted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Sort key and direction. Defaults to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Parse a dashboard selector value such as `"priority-asc"`.
    ///
    /// Never fails: unknown keys sort nothing, and any direction other than
    /// `asc` is descending. An empty value yields the default.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::default();
        }

        let (key, direction) = raw.split_once('-').unwrap_or((raw, ""));
        let key = match key {
            "date" => SortKey::Date,
            "priority" => SortKey::Priority,
            _ => SortKey::Unsorted,
        };
        let direction = if direction == "asc" {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        Self { key, direction }
    }
}

/// Numeric weight used for priority ordering. Unknown priorities weigh 0.
pub fn priority_weight(priority: Priority) -> u8 {
    match priority {
        Priority::Critical => 4,
        Priority::High => 3,
        Priority::Medium => 2,
        Priority::Low => 1,
        Priority::Unknown => 0,
    }
}

/// Stable in-place sort of a borrowed view. Equal keys keep their order.
pub fn sort_tickets(tickets: &mut [&Ticket], sort: SortConfig) {
    match sort.key {
        SortKey::Date => {
            tickets.sort_by(|a, b| sort.direction.apply(a.timestamp.cmp(&b.timestamp)));
        }
        SortKey::Priority => tickets.sort_by(|a, b| {
            sort.direction
                .apply(priority_weight(a.priority).cmp(&priority_weight(b.priority)))
        }),
        SortKey::Unsorted => {}
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Tickets owned by `ps_number`, in input order.
pub fn scope_to_user<'a>(tickets: &'a [Ticket], ps_number: &str) -> Vec<&'a Ticket> {
    tickets.iter().filter(|t| t.ps_number == ps_number).collect()
}

/// Free-text match against `subject + psNumber + email + department`.
///
/// The fields are concatenated before matching, so a term may span the
/// boundary between two fields.
pub fn matches_search(ticket: &Ticket, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let haystack = format!(
        "{}{}{}{}",
        ticket.subject,
        ticket.ps_number,
        ticket.email,
        ticket.department.as_deref().unwrap_or_default()
    )
    .to_lowercase();
    haystack.contains(&search.to_lowercase())
}

pub fn matches_priority(ticket: &Ticket, filter: PriorityFilter) -> bool {
    match filter {
        PriorityFilter::All => true,
        PriorityFilter::Only(priority) => ticket.priority == priority,
    }
}

/// UTC calendar day on which the ticket was created.
pub fn creation_date(ticket: &Ticket) -> Option<NaiveDate> {
    chrono::DateTime::from_timestamp_millis(ticket.timestamp).map(|dt| dt.date_naive())
}

pub fn matches_date(ticket: &Ticket, date: Option<NaiveDate>) -> bool {
    match date {
        None => true,
        Some(day) => creation_date(ticket) == Some(day),
    }
}

pub fn matches_filters(ticket: &Ticket, filters: &TicketFilters) -> bool {
    matches_search(ticket, &filters.search)
        && matches_priority(ticket, filters.priority)
        && matches_date(ticket, filters.date)
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Derive a view from the full collection.
///
/// With a `viewer`, only that employee's tickets are considered; without one
/// (admin view) the whole collection is. Filters are applied next, then the
/// stable sort.
pub fn query_tickets<'a>(
    all: &'a [Ticket],
    viewer: Option<&str>,
    filters: &TicketFilters,
    sort: SortConfig,
) -> Vec<&'a Ticket> {
    let mut view: Vec<&Ticket> = all
        .iter()
        .filter(|t| viewer.map_or(true, |ps| t.ps_number == ps))
        .filter(|t| matches_filters(t, filters))
        .collect();
    sort_tickets(&mut view, sort);
    view
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::ticket::TicketStatus;

    /// 2024-03-05T10:00:00Z in epoch millis.
    const MARCH_5: i64 = 1_709_632_800_000;
    const DAY: i64 = 86_400_000;

    fn ticket(id: &str, ps: &str, priority: Priority, timestamp: i64) -> Ticket {
        Ticket {
            id: id.to_string(),
            ps_number: ps.to_string(),
            email: format!("{ps}@example.com"),
            department: None,
            subject: format!("Subject {id}"),
            priority,
            status: Some(TicketStatus::Open),
            timestamp,
            comments: Vec::new(),
            attachment_name: None,
            attachment_url: None,
        }
    }

    /// Every ticket, unfiltered, in the given order.
    fn sorted(all: &[Ticket], sort: SortConfig) -> Vec<&Ticket> {
        query_tickets(all, None, &TicketFilters::default(), sort)
    }

    fn ids(view: &[&Ticket]) -> Vec<String> {
        view.iter().map(|t| t.id.clone()).collect()
    }

    fn sample() -> Vec<Ticket> {
        let mut vpn = ticket("a", "PS1", Priority::High, MARCH_5);
        vpn.subject = "VPN Connection Failure".into();
        vpn.department = Some("Finance".into());
        let mut printer = ticket("b", "PS2", Priority::Low, MARCH_5 + DAY);
        printer.subject = "Printer jam".into();
        let mut laptop = ticket("c", "PS1", Priority::Critical, MARCH_5 + 2 * DAY);
        laptop.subject = "Laptop won't boot".into();
        laptop.department = Some("HR".into());
        vec![vpn, printer, laptop]
    }

    #[test]
    fn scope_keeps_only_owned_tickets_in_input_order() {
        let all = sample();
        assert_eq!(ids(&scope_to_user(&all, "PS1")), vec!["a", "c"]);
        assert!(scope_to_user(&all, "nobody").is_empty());
    }

    #[test]
    fn viewer_scopes_query() {
        let all = sample();
        let view = query_tickets(
            &all,
            Some("PS2"),
            &TicketFilters::default(),
            SortConfig::default(),
        );
        assert_eq!(ids(&view), vec!["b"]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let all = sample();
        let by = |term: &str| {
            let filters = TicketFilters {
                search: term.into(),
                ..Default::default()
            };
            let by_date = SortConfig::new(SortKey::Date, SortDirection::Asc);
            let mut found = ids(&query_tickets(&all, None, &filters, by_date));
            found.sort();
            found
        };

        assert_eq!(by("vpn"), vec!["a"]);
        assert_eq!(by("FINANCE"), vec!["a"]);
        assert_eq!(by("ps2@"), vec!["b"]);
        assert_eq!(by("ps1"), vec!["a", "c"]);
        assert!(by("nothing-matches").is_empty());
    }

    #[test]
    fn search_spans_concatenated_fields() {
        let all = sample();
        // "...jam" + "PS2" -> "jamps2"
        assert!(matches_search(&all[1], "jamps2"));
    }

    #[test]
    fn empty_search_and_date_match_everything() {
        let mut all = sample();
        all[0].timestamp = -1;
        all[1].subject.clear();
        all[1].email.clear();

        let view = sorted(&all, SortConfig::new(SortKey::Unsorted, SortDirection::Asc));
        assert_eq!(view.len(), all.len());
    }

    #[test]
    fn priority_filter_is_exact() {
        let all = sample();
        let filters = TicketFilters {
            priority: PriorityFilter::parse("Critical"),
            ..Default::default()
        };
        assert_eq!(ids(&query_tickets(&all, None, &filters, SortConfig::default())), vec!["c"]);

        let all_filter = TicketFilters {
            priority: PriorityFilter::parse("All"),
            ..Default::default()
        };
        assert_eq!(query_tickets(&all, None, &all_filter, SortConfig::default()).len(), 3);
    }

    #[test]
    fn date_filter_matches_utc_creation_day() {
        let all = sample();
        let filters = TicketFilters::from_raw(None, None, Some("2024-03-06")).unwrap();
        assert_eq!(ids(&query_tickets(&all, None, &filters, SortConfig::default())), vec!["b"]);
    }

    #[test]
    fn invalid_date_filter_is_a_validation_error() {
        let err = TicketFilters::from_raw(None, None, Some("03/06/2024")).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
        assert_eq!(TicketFilters::from_raw(None, None, Some("")).unwrap().date, None);
    }

    #[test]
    fn filter_order_does_not_change_the_result() {
        let all = sample();
        let filters =
            TicketFilters::from_raw(Some("ps1"), Some("Critical"), Some("2024-03-07")).unwrap();

        let combined: Vec<&Ticket> = all.iter().filter(|t| matches_filters(t, &filters)).collect();
        let reversed: Vec<&Ticket> = all
            .iter()
            .filter(|t| matches_date(t, filters.date))
            .filter(|t| matches_priority(t, filters.priority))
            .filter(|t| matches_search(t, &filters.search))
            .collect();
        assert_eq!(ids(&combined), ids(&reversed));
        assert_eq!(ids(&combined), vec!["c"]);
    }

    #[test]
    fn priority_desc_orders_critical_high_low() {
        let all = vec![
            ticket("low", "P", Priority::Low, 100),
            ticket("critical", "P", Priority::Critical, 50),
            ticket("high", "P", Priority::High, 200),
        ];
        let view = sorted(&all, SortConfig::parse("priority-desc"));
        assert_eq!(ids(&view), vec!["critical", "high", "low"]);
    }

    #[test]
    fn date_sort_directions() {
        let all = sample();
        let asc = sorted(&all, SortConfig::parse("date-asc"));
        let desc = sorted(&all, SortConfig::parse("date-desc"));
        assert_eq!(ids(&asc), vec!["a", "b", "c"]);
        assert_eq!(ids(&desc), vec!["c", "b", "a"]);
    }

    #[test]
    fn sort_is_stable_and_idempotent() {
        let all = vec![
            ticket("m1", "P", Priority::Medium, 1),
            ticket("h1", "P", Priority::High, 2),
            ticket("m2", "P", Priority::Medium, 3),
            ticket("h2", "P", Priority::High, 4),
            ticket("m3", "P", Priority::Medium, 5),
        ];
        let sort = SortConfig::parse("priority-desc");

        let mut once: Vec<&Ticket> = all.iter().collect();
        sort_tickets(&mut once, sort);
        assert_eq!(ids(&once), vec!["h1", "h2", "m1", "m2", "m3"]);

        let mut twice = once.clone();
        sort_tickets(&mut twice, sort);
        assert_eq!(ids(&twice), ids(&once));
    }

    #[test]
    fn unknown_priority_sorts_below_low() {
        let all = vec![
            ticket("unknown", "P", Priority::Unknown, 1),
            ticket("low", "P", Priority::Low, 2),
        ];
        let view = sorted(&all, SortConfig::parse("priority-asc"));
        assert_eq!(ids(&view), vec!["unknown", "low"]);
    }

    #[test]
    fn unknown_sort_key_keeps_input_order() {
        let all = sample();
        let sort = SortConfig::parse("subject-asc");
        assert_eq!(sort.key, SortKey::Unsorted);
        let view = query_tickets(&all, None, &TicketFilters::default(), sort);
        assert_eq!(ids(&view), vec!["a", "b", "c"]);
    }

    #[test]
    fn sort_parse_defaults() {
        assert_eq!(SortConfig::parse(""), SortConfig::default());
        assert_eq!(
            SortConfig::parse("priority"),
            SortConfig::new(SortKey::Priority, SortDirection::Desc)
        );
        assert_eq!(
            SortConfig::parse("date-sideways"),
            SortConfig::new(SortKey::Date, SortDirection::Desc)
        );
    }

    #[test]
    fn query_is_repeatable_and_leaves_input_untouched() {
        let all = sample();
        let before = all.clone();
        let filters = TicketFilters::from_raw(Some("p"), None, None).unwrap();
        let first = ids(&query_tickets(&all, None, &filters, SortConfig::parse("priority-desc")));
        let second = ids(&query_tickets(&all, None, &filters, SortConfig::parse("priority-desc")));
        assert_eq!(first, second);
        assert_eq!(all, before);
    }
}
