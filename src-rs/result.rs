use serde::{Deserialize, Serialize};

use crate::llm::Message;

/// Outcome of one agent run: the payload plus the exchange that produced it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunResult<T> {
    pub data: T,
    pub messages: Vec<Message>,
    /// Model requests made during the run.
    pub iterations: usize,
}

impl<T> RunResult<T> {
    pub fn new(data: T, messages: Vec<Message>, iterations: usize) -> Self {
        Self {
            data,
            messages,
            iterations,
        }
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<RunResult<U>, E> {
        Ok(RunResult {
            data: f(self.data)?,
            messages: self.messages,
            iterations: self.iterations,
        })
    }
}
