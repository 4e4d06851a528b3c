/*
    TicketedBinding - non-enclave binding with ticket-batched operations

    Responsibilities:
    `ticketed.rs` maps the binding capability set onto a transport connected in
    non-enclave mode. Each DHT call is charged against the current ticket; once
    a bounded ticket is spent a new one is requested before the call goes out.
    Offers a native update that swaps the whole document atomically.

    Inputs:
    - TicketConfig at initialize (bound per ticket, or unbounded)
    - read/insert/update/delete calls

    Outputs:
    - transport calls, each preceded by ticket authorization
*/

use tracing::trace;

use super::error::{BindingError, BindingResult};
use super::ticket::{TicketBudget, TicketConfig};
use super::transport::{ConnectMode, DhtTransport, TicketId};
use super::DhtBinding;
use crate::document::SerializedDocument;

/// Binding for the non-enclave client
#[derive(Debug, Clone)]
pub struct TicketedBinding<T> {
    transport: T,
    config: Option<TicketConfig>,
    budget: Option<TicketBudget>,
}

impl<T: DhtTransport> TicketedBinding<T> {
    pub fn new(transport: T) -> Self {
        TicketedBinding { transport, config: None, budget: None }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Configuration given at initialize, if initialized
    pub fn ticket_config(&self) -> Option<TicketConfig> {
        self.config
    }

    /// Tickets this binding has acquired since initialize
    pub fn tickets_acquired(&self) -> u64 {
        self.budget.as_ref().map_or(0, TicketBudget::acquired)
    }

    /// Operations left on the current ticket (`None` when unbounded)
    pub fn remaining_on_ticket(&self) -> Option<u64> {
        self.budget.as_ref().and_then(TicketBudget::remaining)
    }

    fn authorize(&mut self) -> BindingResult<TicketId> {
        let budget = self.budget.as_mut().ok_or(BindingError::NotConnected)?;
        let transport = &self.transport;
        let ticket = budget.authorize(|max_ops| transport.issue_ticket(max_ops))?;
        trace!(ticket, "operation authorized");
        Ok(ticket)
    }
}

impl<T: DhtTransport> DhtBinding for TicketedBinding<T> {
    type Config = TicketConfig;

    const NAME: &'static str = "ticketed";
    const NATIVE_UPDATE: bool = true;

    fn initialize(&mut self, config: &TicketConfig) -> BindingResult<()> {
        self.transport.connect(ConnectMode::NonEnclave)?;
        self.config = Some(*config);
        self.budget = Some(TicketBudget::new(*config));
        Ok(())
    }

    fn cleanup(&mut self) -> BindingResult<()> {
        self.budget = None;
        self.transport.disconnect()
    }

    fn read(&mut self, key: &str) -> BindingResult<SerializedDocument> {
        self.authorize()?;
        self.transport
            .get(key)?
            .map(SerializedDocument::from)
            .ok_or_else(|| BindingError::NotFound(key.to_string()))
    }

    fn insert(&mut self, key: &str, doc: &SerializedDocument) -> BindingResult<()> {
        self.authorize()?;
        self.transport.put(key, doc.as_str())
    }

    fn update(&mut self, key: &str, doc: &SerializedDocument) -> BindingResult<()> {
        self.authorize()?;
        self.transport.replace(key, doc.as_str())
    }

    fn delete(&mut self, key: &str) -> BindingResult<()> {
        self.authorize()?;
        self.transport.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::MemoryTransport;

    fn binding(config: TicketConfig) -> TicketedBinding<MemoryTransport> {
        let mut binding = TicketedBinding::new(MemoryTransport::new());
        binding.initialize(&config).unwrap();
        binding
    }

    #[test]
    fn test_native_update_replaces() {
        let mut binding = binding(TicketConfig::Unbounded);
        assert!(TicketedBinding::<MemoryTransport>::NATIVE_UPDATE);

        binding.insert("user1", &SerializedDocument::from(r#"{"a":"1","b":"2"}"#)).unwrap();
        binding.update("user1", &SerializedDocument::from(r#"{"c":"3"}"#)).unwrap();

        assert_eq!(binding.read("user1").unwrap().as_str(), r#"{"c":"3"}"#);
    }

    #[test]
    fn test_update_missing_key() {
        let mut binding = binding(TicketConfig::Unbounded);

        assert_eq!(
            binding.update("ghost", &SerializedDocument::from("{}")),
            Err(BindingError::NotFound("ghost".to_string()))
        );
    }

    #[test]
    fn test_bounded_tickets_rotate() {
        let mut binding = binding(TicketConfig::bounded(2).unwrap());
        let doc = SerializedDocument::from("{}");

        for i in 0..5 {
            binding.insert(&format!("user{}", i), &doc).unwrap();
        }

        assert_eq!(binding.tickets_acquired(), 3);
        assert_eq!(binding.transport().tickets_issued(), 3);
        assert_eq!(binding.remaining_on_ticket(), Some(1));
    }

    #[test]
    fn test_failed_operations_still_charged() {
        let mut binding = binding(TicketConfig::bounded(1).unwrap());

        assert!(binding.read("missing").is_err());
        assert!(binding.delete("missing").is_err());
        assert_eq!(binding.tickets_acquired(), 2);
    }

    #[test]
    fn test_unbounded_single_ticket() {
        let mut binding = binding(TicketConfig::Unbounded);
        let doc = SerializedDocument::from("{}");

        for i in 0..100 {
            binding.insert(&format!("user{}", i), &doc).unwrap();
        }

        assert_eq!(binding.tickets_acquired(), 1);
        assert_eq!(binding.remaining_on_ticket(), None);
        assert_eq!(binding.ticket_config(), Some(TicketConfig::Unbounded));
    }

    #[test]
    fn test_operations_before_initialize() {
        let mut binding = TicketedBinding::new(MemoryTransport::new());

        assert_eq!(binding.read("user1"), Err(BindingError::NotConnected));
        assert_eq!(binding.tickets_acquired(), 0);
    }
}
