//! Navigation approval gate.
//!
//! The engine has no "ask, then proceed" hook for navigations, so the first
//! attempt is canceled, the host is asked, and an approved URL is navigated to
//! again. The replayed navigation must pass through without being asked about
//! a second time.

use std::collections::BTreeMap;

/// Gate state consulted on every navigation-starting event.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum NavigationGate {
    /// The next navigation is canceled and sent to the host for approval.
    #[default]
    ReadyToIntercept,
    /// An approved navigation is being replayed; let the next one pass.
    AwaitingReplay,
}

/// What to do with a navigation that is starting.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StartingDecision {
    /// Cancel it and ask the host.
    Intercept,
    /// Let it proceed.
    Pass,
}

/// A navigation waiting for the host's answer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingUrlRequest {
    pub request_id: u64,
    pub url: String,
}

/// Gate state plus the table of unanswered requests.
#[derive(Debug, Default)]
pub struct NavigationApproval {
    gate: NavigationGate,
    next_request_id: u64,
    pending: BTreeMap<u64, PendingUrlRequest>,
}

impl NavigationApproval {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gate(&self) -> NavigationGate {
        self.gate
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Applies a navigation-starting event.
    pub fn on_starting(&mut self) -> StartingDecision {
        match self.gate {
            NavigationGate::ReadyToIntercept => StartingDecision::Intercept,
            NavigationGate::AwaitingReplay => {
                self.gate = NavigationGate::ReadyToIntercept;
                StartingDecision::Pass
            }
        }
    }

    /// Records an intercepted navigation and returns its request id.
    pub fn begin_request(&mut self, url: String) -> u64 {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.pending
            .insert(request_id, PendingUrlRequest { request_id, url });
        request_id
    }

    /// Resolves a pending request.
    ///
    /// Returns the URL to navigate to again when `approve` is true. Denial drops
    /// the request and leaves the gate as it was. Unknown ids return `None`.
    pub fn resolve(&mut self, request_id: u64, approve: bool) -> Option<String> {
        let request = self.pending.remove(&request_id)?;
        if !approve {
            return None;
        }
        self.gate = NavigationGate::AwaitingReplay;
        Some(request.url)
    }

    /// Re-arms the gate after an approved replay could not be issued.
    pub fn abandon_replay(&mut self) {
        self.gate = NavigationGate::ReadyToIntercept;
    }
}
