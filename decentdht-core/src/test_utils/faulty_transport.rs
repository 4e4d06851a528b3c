//! Transport wrapper for failure injection

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::binding::{BindingError, BindingResult, ConnectMode, DhtTransport, TicketId};

/// A call forwarded to the wrapped transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportCall {
    Connect,
    Disconnect,
    Get,
    Put,
    Replace,
    Remove,
    IssueTicket,
}

#[derive(Debug, Default)]
struct State {
    faults: HashSet<TransportCall>,
    calls: Vec<TransportCall>,
}

/// Wraps a transport, failing selected calls and logging every call.
///
/// Clones share the fault set and the call log.
#[derive(Debug, Clone)]
pub struct FaultyTransport<T> {
    inner: T,
    state: Arc<Mutex<State>>,
}

impl<T: DhtTransport> FaultyTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner, state: Arc::new(Mutex::new(State::default())) }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Make `call` fail with a transport error (or stop failing)
    pub fn set_fault(&self, call: TransportCall, enabled: bool) {
        if let Ok(mut state) = self.state.lock() {
            if enabled {
                state.faults.insert(call);
            } else {
                state.faults.remove(&call);
            }
        }
    }

    pub fn fail_connect(&self, enabled: bool) {
        self.set_fault(TransportCall::Connect, enabled);
    }

    pub fn fail_disconnect(&self, enabled: bool) {
        self.set_fault(TransportCall::Disconnect, enabled);
    }

    /// Calls forwarded or rejected so far, in order
    pub fn calls(&self) -> Vec<TransportCall> {
        self.state.lock().map(|state| state.calls.clone()).unwrap_or_default()
    }

    pub fn clear_calls(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.calls.clear();
        }
    }

    fn check(&self, call: TransportCall) -> BindingResult<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| BindingError::Transport(format!("Fault state poisoned: {}", e)))?;
        state.calls.push(call);

        if state.faults.contains(&call) {
            return Err(BindingError::Transport(format!("injected {:?} failure", call)));
        }
        Ok(())
    }
}

impl<T: DhtTransport> DhtTransport for FaultyTransport<T> {
    fn connect(&self, mode: ConnectMode) -> BindingResult<()> {
        self.check(TransportCall::Connect)?;
        self.inner.connect(mode)
    }

    fn disconnect(&self) -> BindingResult<()> {
        self.check(TransportCall::Disconnect)?;
        self.inner.disconnect()
    }

    fn get(&self, key: &str) -> BindingResult<Option<String>> {
        self.check(TransportCall::Get)?;
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &str) -> BindingResult<()> {
        self.check(TransportCall::Put)?;
        self.inner.put(key, value)
    }

    fn replace(&self, key: &str, value: &str) -> BindingResult<()> {
        self.check(TransportCall::Replace)?;
        self.inner.replace(key, value)
    }

    fn remove(&self, key: &str) -> BindingResult<()> {
        self.check(TransportCall::Remove)?;
        self.inner.remove(key)
    }

    fn issue_ticket(&self, max_ops: Option<u64>) -> BindingResult<TicketId> {
        self.check(TransportCall::IssueTicket)?;
        self.inner.issue_ticket(max_ops)
    }
}
