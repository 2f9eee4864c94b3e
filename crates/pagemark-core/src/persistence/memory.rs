//! In-memory save backend.

use super::{
    BoxFuture, PersistenceBackend, PersistenceError, PersistenceResult, SaveRequest, SaveResponse,
};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Records every request and answers from a queue of canned replies.
///
/// When the queue is empty it answers with the fallback reply.
pub struct MemoryBackend {
    requests: RefCell<Vec<SaveRequest>>,
    replies: RefCell<VecDeque<PersistenceResult<SaveResponse>>>,
    fallback: SaveResponse,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// A backend that accepts every save.
    pub fn new() -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            replies: RefCell::new(VecDeque::new()),
            fallback: SaveResponse::success("/download/annotated.pdf"),
        }
    }

    pub fn with_fallback(mut self, response: SaveResponse) -> Self {
        self.fallback = response;
        self
    }

    /// Queue a reply for the next save.
    pub fn push_reply(&self, reply: PersistenceResult<SaveResponse>) {
        self.replies.borrow_mut().push_back(reply);
    }

    /// Queue a transport failure for the next save.
    pub fn fail_next(&self, reason: impl Into<String>) {
        self.push_reply(Err(PersistenceError::Network(reason.into())));
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<SaveRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl PersistenceBackend for MemoryBackend {
    fn save<'a>(
        &'a self,
        request: &'a SaveRequest,
    ) -> BoxFuture<'a, PersistenceResult<SaveResponse>> {
        Box::pin(async move {
            self.requests.borrow_mut().push(request.clone());
            let reply = self.replies.borrow_mut().pop_front();
            reply.unwrap_or_else(|| Ok(self.fallback.clone()))
        })
    }
}
