//! In-memory coordination store for single-process deployments and tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use uuid::Uuid;

use super::{CoordinationStore, Subscription};
use crate::core::{ExecutionHandle, SchedulerError};

type ChannelRegistry = Mutex<HashMap<String, Vec<(Uuid, Sender<()>)>>>;

/// In-memory store: per-key handle queues plus channel fan-out.
///
/// Queue mutation is serialized by a single mutex, which yields the same
/// total order a networked store provides through command atomicity. Wake
/// hints fan out over unbounded channels; a hint published between subscribe
/// and the first wait is buffered, so subscribers never miss a wakeup.
#[derive(Default)]
pub struct InMemoryStore {
    queues: Mutex<HashMap<String, VecDeque<ExecutionHandle>>>,
    channels: Arc<ChannelRegistry>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

struct MemorySubscription {
    id: Uuid,
    channel: String,
    registry: Arc<ChannelRegistry>,
    rx: Receiver<()>,
}

impl Subscription for MemorySubscription {
    fn wait(&self) -> Result<(), SchedulerError> {
        self.rx
            .recv()
            .map_err(|_| SchedulerError::StoreUnavailable("notification channel closed".into()))
    }
}

impl Drop for MemorySubscription {
    fn drop(&mut self) {
        let mut channels = self.registry.lock();
        if let Some(subscribers) = channels.get_mut(&self.channel) {
            subscribers.retain(|(id, _)| *id != self.id);
            if subscribers.is_empty() {
                channels.remove(&self.channel);
            }
        }
    }
}

impl CoordinationStore for InMemoryStore {
    fn reset_queue(&self, key: &str, handles: &[ExecutionHandle]) -> Result<(), SchedulerError> {
        let mut queues = self.queues.lock();
        queues.insert(key.to_owned(), handles.iter().copied().collect());
        Ok(())
    }

    fn pop_front(&self, key: &str) -> Result<Option<ExecutionHandle>, SchedulerError> {
        Ok(self.queues.lock().get_mut(key).and_then(VecDeque::pop_front))
    }

    fn push_back(&self, key: &str, handle: ExecutionHandle) -> Result<(), SchedulerError> {
        self.queues
            .lock()
            .entry(key.to_owned())
            .or_default()
            .push_back(handle);
        Ok(())
    }

    fn queue_len(&self, key: &str) -> Result<usize, SchedulerError> {
        Ok(self.queues.lock().get(key).map_or(0, VecDeque::len))
    }

    fn publish(&self, channel: &str) -> Result<(), SchedulerError> {
        let mut channels = self.channels.lock();
        if let Some(subscribers) = channels.get_mut(channel) {
            // Sending also prunes receivers whose subscription was dropped
            // without ever unregistering (a killed caller).
            subscribers.retain(|(_, tx)| tx.send(()).is_ok());
        }
        Ok(())
    }

    fn subscribe(&self, channel: &str) -> Result<Box<dyn Subscription>, SchedulerError> {
        let (tx, rx) = unbounded();
        let id = Uuid::new_v4();
        self.channels
            .lock()
            .entry(channel.to_owned())
            .or_default()
            .push((id, tx));
        Ok(Box::new(MemorySubscription {
            id,
            channel: channel.to_owned(),
            registry: Arc::clone(&self.channels),
            rx,
        }))
    }
}
