//! Function call ID correlation across a single request

use std::collections::VecDeque;

use crate::error::LlmError;

const GENERATED_ID_PREFIX: &str = "relay-call-";

/// Pending function call IDs for one request
///
/// Every outgoing function call registers its ID; every function response
/// consumes one. A response without an ID is matched to the oldest pending
/// call.
#[derive(Debug, Default)]
pub struct CallTracker {
    pending: VecDeque<String>,
    generated: u64,
}

impl CallTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an outgoing call and return the ID to send
    ///
    /// Uses `id` when non-empty, otherwise generates one unique to this tracker.
    pub fn register_call(&mut self, id: Option<&str>) -> String {
        let id = match id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_owned(),
            None => self.next_generated_id(),
        };

        if !self.pending.contains(&id) {
            self.pending.push_back(id.clone());
        }
        id
    }

    /// Consume the pending call answered by a function response
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::UnknownCallId`] when `id` is not pending, and
    /// [`LlmError::FunctionResponseMissingCallId`] when `id` is absent and no
    /// call is pending. The pending list is unchanged on error.
    pub fn resolve_response(&mut self, id: Option<&str>, name: &str) -> Result<String, LlmError> {
        match id.filter(|id| !id.is_empty()) {
            Some(id) => {
                let pos = self
                    .pending
                    .iter()
                    .position(|pending| pending == id)
                    .ok_or_else(|| LlmError::UnknownCallId(id.to_owned()))?;
                self.pending.remove(pos);
                Ok(id.to_owned())
            }
            None => self
                .pending
                .pop_front()
                .ok_or_else(|| LlmError::FunctionResponseMissingCallId { name: name.to_owned() }),
        }
    }

    /// Number of calls still awaiting a response
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn next_generated_id(&mut self) -> String {
        loop {
            self.generated += 1;
            let id = format!("{GENERATED_ID_PREFIX}{}", self.generated);
            if !self.pending.contains(&id) {
                return id;
            }
        }
    }
}
