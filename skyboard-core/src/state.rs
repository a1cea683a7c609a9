use parking_lot::Mutex;

use crate::model::WeatherSnapshot;

/// Sequence number handed out when a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct Inner {
    latest_issued: u64,
    current: Option<WeatherSnapshot>,
}

/// Holds the one snapshot currently on display.
///
/// Every fetch takes a ticket before its first await and commits with it
/// afterwards. Only the most recently issued ticket can install a snapshot,
/// so a slow earlier request can never overwrite a newer one.
#[derive(Debug, Default)]
pub struct SnapshotCell {
    inner: Mutex<Inner>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RequestTicket {
        let mut inner = self.inner.lock();
        inner.latest_issued += 1;
        RequestTicket(inner.latest_issued)
    }

    /// Returns `false` and drops `snapshot` when `ticket` is stale.
    pub fn commit(&self, ticket: RequestTicket, snapshot: WeatherSnapshot) -> bool {
        let mut inner = self.inner.lock();
        if ticket.0 != inner.latest_issued {
            tracing::warn!(
                ticket = ticket.0,
                latest = inner.latest_issued,
                "Discarding stale weather response"
            );
            return false;
        }
        inner.current = Some(snapshot);
        true
    }

    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.inner.lock().latest_issued == ticket.0
    }

    pub fn current(&self) -> Option<WeatherSnapshot> {
        self.inner.lock().current.clone()
    }
}
