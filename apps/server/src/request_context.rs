//! Context the request-id middleware attaches to every request.

use std::time::Instant;

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub received_at: Instant,
}

impl RequestContext {
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            received_at: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.received_at.elapsed().as_millis()
    }
}
