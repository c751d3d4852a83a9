//! FIFO queue pairing binary announcements with their out-of-band frames.
//!
//! A text frame may announce that N raw binary frames follow. [`PendingQueue`]
//! parks the announcing message until every attachment has arrived, relying on
//! the protocol guarantee that attachments arrive in the order their
//! announcing frames arrived and that one multi-part message completes before
//! the next one's attachments begin. The owner only ever observes a complete
//! message, never a partial one.

use std::collections::VecDeque;

use bytes::Bytes;

use crate::message::InboundMessage;

/// Outcome of attaching a binary frame to the queue head.
#[derive(Debug)]
pub enum AttachOutcome {
    /// The head entry received its final attachment and has been dequeued.
    Completed(InboundMessage),
    /// The head entry still awaits more attachments.
    Pending,
    /// No announcement is pending; the frame has no home.
    Unannounced,
}

/// Strict FIFO queue of messages awaiting binary attachments.
#[derive(Debug, Default)]
pub struct PendingQueue {
    entries: VecDeque<InboundMessage>,
}

impl PendingQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Park a message until its announced attachments arrive.
    pub fn push(&mut self, message: InboundMessage) { self.entries.push_back(message); }

    /// Attach `bytes` to the oldest pending entry.
    ///
    /// Only the head accepts attachments; later entries wait their turn.
    pub fn attach(&mut self, bytes: Bytes) -> AttachOutcome {
        let Some(head) = self.entries.front_mut() else {
            return AttachOutcome::Unannounced;
        };
        head.attachments.push(bytes);
        if !head.is_complete() {
            return AttachOutcome::Pending;
        }
        self.entries
            .pop_front()
            .map_or(AttachOutcome::Pending, AttachOutcome::Completed)
    }

    /// Number of messages still awaiting attachments.
    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    /// Whether no announcement is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
