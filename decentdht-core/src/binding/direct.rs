/*
    DirectBinding - enclave-backed binding without batching

    Responsibilities:
    `direct.rs` maps the binding capability set onto a transport connected in
    enclave mode. There are no tuning parameters and no native update: callers
    wanting an update must delete and re-insert, during which the key is absent.
*/

use super::error::{BindingError, BindingResult};
use super::transport::{ConnectMode, DhtTransport};
use super::DhtBinding;
use crate::document::SerializedDocument;

/// Binding for the enclave client
#[derive(Debug, Clone)]
pub struct DirectBinding<T> {
    transport: T,
}

impl<T: DhtTransport> DirectBinding<T> {
    pub fn new(transport: T) -> Self {
        DirectBinding { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: DhtTransport> DhtBinding for DirectBinding<T> {
    type Config = ();

    const NAME: &'static str = "direct";
    const NATIVE_UPDATE: bool = false;

    fn initialize(&mut self, _config: &()) -> BindingResult<()> {
        self.transport.connect(ConnectMode::Enclave)
    }

    fn cleanup(&mut self) -> BindingResult<()> {
        self.transport.disconnect()
    }

    fn read(&mut self, key: &str) -> BindingResult<SerializedDocument> {
        self.transport
            .get(key)?
            .map(SerializedDocument::from)
            .ok_or_else(|| BindingError::NotFound(key.to_string()))
    }

    fn insert(&mut self, key: &str, doc: &SerializedDocument) -> BindingResult<()> {
        self.transport.put(key, doc.as_str())
    }

    fn delete(&mut self, key: &str) -> BindingResult<()> {
        self.transport.remove(key)
    }
}
