/// Creation and comment instants, as epoch milliseconds (UTC).
pub type EpochMillis = i64;

/// Employee identifier ("PS Number"). Doubles as login identity and
/// ticket-ownership key.
pub type PsNumber = String;

/// Current instant as epoch milliseconds.
pub fn now_millis() -> EpochMillis {
    chrono::Utc::now().timestamp_millis()
}
