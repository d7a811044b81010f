use chrono::{DateTime, Utc};

/// Actor identity and clock injected into every mutating operation.
///
/// Timestamps and audit logging always derive from the context rather than
/// from ambient globals, so tests and replays can pin the instant.
#[derive(Debug, Clone)]
pub struct AuditContext {
    pub actor: String,
    pub now: DateTime<Utc>,
}

impl AuditContext {
    pub fn new(actor: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            actor: actor.into(),
            now,
        }
    }

    /// Context pinned to the wall clock, for boundary layers that have no
    /// caller-supplied instant.
    pub fn at_wall_clock(actor: impl Into<String>) -> Self {
        Self::new(actor, Utc::now())
    }
}
