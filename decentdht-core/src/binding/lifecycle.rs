/*
    BindingLifecycle - guards initialize/use/cleanup of a binding

    States: Uninitialized -> Ready -> Closed (terminal).

    - initialize is only accepted while Uninitialized; a second call fails
      without touching the binding, so no second connection is opened
    - cleanup from Ready closes the binding; from any other state it does nothing
    - binding calls are only handed out while Ready
*/

use tracing::{debug, info, warn};

use super::error::LifecycleError;
use super::DhtBinding;
use crate::error::AdapterResult;

/// Lifecycle state of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    Uninitialized,
    Ready,
    Closed,
}

impl BindingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingState::Uninitialized => "uninitialized",
            BindingState::Ready => "ready",
            BindingState::Closed => "closed",
        }
    }
}

/// Owns a binding together with its lifecycle state
#[derive(Debug)]
pub struct BindingLifecycle<B> {
    binding: B,
    state: BindingState,
}

impl<B: DhtBinding> BindingLifecycle<B> {
    pub fn new(binding: B) -> Self {
        BindingLifecycle { binding, state: BindingState::Uninitialized }
    }

    pub fn state(&self) -> BindingState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == BindingState::Ready
    }

    /// The wrapped binding, whatever the state (for inspection)
    pub fn binding(&self) -> &B {
        &self.binding
    }

    /// Initialize the binding.
    ///
    /// On a binding failure the state stays `Uninitialized`.
    pub fn initialize(&mut self, config: &B::Config) -> AdapterResult<()> {
        match self.state {
            BindingState::Uninitialized => {}
            BindingState::Ready => return Err(LifecycleError::AlreadyInitialized.into()),
            BindingState::Closed => return Err(LifecycleError::Closed.into()),
        }

        self.binding.initialize(config)?;
        self.state = BindingState::Ready;
        info!(binding = B::NAME, ?config, "binding initialized");
        Ok(())
    }

    /// Close the binding; a no-op unless `Ready`.
    ///
    /// The binding ends up `Closed` even if its own cleanup fails, and that
    /// failure is returned once.
    pub fn cleanup(&mut self) -> AdapterResult<()> {
        if self.state != BindingState::Ready {
            debug!(binding = B::NAME, state = self.state.as_str(), "cleanup ignored");
            return Ok(());
        }

        self.state = BindingState::Closed;
        match self.binding.cleanup() {
            Ok(()) => {
                info!(binding = B::NAME, "binding closed");
                Ok(())
            }
            Err(e) => {
                warn!(binding = B::NAME, error = %e, "binding cleanup failed");
                Err(e.into())
            }
        }
    }

    /// Mutable access to the binding, only while `Ready`
    pub fn ready(&mut self) -> Result<&mut B, LifecycleError> {
        match self.state {
            BindingState::Ready => Ok(&mut self.binding),
            BindingState::Uninitialized => Err(LifecycleError::NotInitialized),
            BindingState::Closed => Err(LifecycleError::Closed),
        }
    }
}
