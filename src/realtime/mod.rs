/**
 * Realtime Notification Channel
 *
 * A thin fire-and-forget relay: create handlers announce new records on
 * a process-wide broadcast channel, and an SSE endpoint streams those
 * events to connected clients. No delivery guarantee, no acknowledgment.
 */

pub mod broadcast;
pub mod subscription;

pub use broadcast::{broadcast_event, ContentEvent, ContentEventBroadcast};
