//! Typed event bus shared by the managers and the controller.
//!
//! Every manager emits onto the same [`EventBus`], so a subscriber on the
//! controller sees every event under its original name. Two ways to listen:
//! an async [`broadcast::Receiver`] from [`EventBus::subscribe`], or a
//! synchronous callback registered with [`EventBus::on`] and removed with
//! [`EventBus::off`].

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::manager::delete::DeleteSummary;
use crate::manager::upload::UploadSummary;

#[derive(Debug, Clone, PartialEq)]
pub enum ImageEvent {
    SelectionChanged {
        selected_images: Vec<String>,
        selection_count: usize,
    },
    /// Indices are `None` when the whole order was rewritten by a reset
    SortChanged {
        from_index: Option<usize>,
        to_index: Option<usize>,
        new_order: Vec<String>,
    },
    DragStarted {
        index: usize,
    },
    DragEnded {
        dragged_index: Option<usize>,
        drop_index: Option<usize>,
    },
    FilesAdded {
        files: Vec<String>,
        queue_length: usize,
    },
    UploadStarted {
        queue_length: usize,
    },
    FileUploaded {
        file: String,
        success: bool,
        error: Option<String>,
    },
    UploadCompleted(UploadSummary),
    UploadError {
        message: String,
        rejected: Vec<String>,
    },
    FileDeleted {
        file_name: String,
        success: bool,
        error: Option<String>,
    },
    DeleteStarted {
        files: Vec<String>,
    },
    DeleteCompleted(DeleteSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SelectionChanged,
    SortChanged,
    DragStarted,
    DragEnded,
    FilesAdded,
    UploadStarted,
    FileUploaded,
    UploadCompleted,
    UploadError,
    FileDeleted,
    DeleteStarted,
    DeleteCompleted,
}

impl EventKind {
    /// Wire name of the event
    pub fn name(self) -> &'static str {
        match self {
            EventKind::SelectionChanged => "selectionChanged",
            EventKind::SortChanged => "sortChanged",
            EventKind::DragStarted => "dragStarted",
            EventKind::DragEnded => "dragEnded",
            EventKind::FilesAdded => "filesAdded",
            EventKind::UploadStarted => "uploadStarted",
            EventKind::FileUploaded => "fileUploaded",
            EventKind::UploadCompleted => "uploadCompleted",
            EventKind::UploadError => "uploadError",
            EventKind::FileDeleted => "fileDeleted",
            EventKind::DeleteStarted => "deleteStarted",
            EventKind::DeleteCompleted => "deleteCompleted",
        }
    }
}

impl ImageEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ImageEvent::SelectionChanged { .. } => EventKind::SelectionChanged,
            ImageEvent::SortChanged { .. } => EventKind::SortChanged,
            ImageEvent::DragStarted { .. } => EventKind::DragStarted,
            ImageEvent::DragEnded { .. } => EventKind::DragEnded,
            ImageEvent::FilesAdded { .. } => EventKind::FilesAdded,
            ImageEvent::UploadStarted { .. } => EventKind::UploadStarted,
            ImageEvent::FileUploaded { .. } => EventKind::FileUploaded,
            ImageEvent::UploadCompleted(_) => EventKind::UploadCompleted,
            ImageEvent::UploadError { .. } => EventKind::UploadError,
            ImageEvent::FileDeleted { .. } => EventKind::FileDeleted,
            ImageEvent::DeleteStarted { .. } => EventKind::DeleteStarted,
            ImageEvent::DeleteCompleted(_) => EventKind::DeleteCompleted,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

pub type ListenerId = u64;

type Listener = Arc<dyn Fn(&ImageEvent) + Send + Sync>;

struct Registered {
    id: ListenerId,
    kind: Option<EventKind>,
    callback: Listener,
}

struct BusInner {
    tx: broadcast::Sender<ImageEvent>,
    listeners: Mutex<Vec<Registered>>,
    next_id: AtomicU64,
}

/// Cloneable handle; clones share subscribers
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(BusInner {
                tx,
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Receive every event emitted from now on.
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<ImageEvent> {
        self.inner.tx.subscribe()
    }

    /// Call `callback` for each event of one kind
    pub fn on<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&ImageEvent) + Send + Sync + 'static,
    {
        self.register(Some(kind), Arc::new(callback))
    }

    /// Call `callback` for every event
    pub fn on_any<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&ImageEvent) + Send + Sync + 'static,
    {
        self.register(None, Arc::new(callback))
    }

    /// Remove a callback; false if the id was unknown
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.lock();
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        listeners.len() != before
    }

    pub fn emit(&self, event: ImageEvent) {
        let kind = event.kind();
        // Snapshot so callbacks may register or remove listeners
        let callbacks: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .iter()
            .filter(|l| l.kind.map_or(true, |k| k == kind))
            .map(|l| l.callback.clone())
            .collect();

        tracing::trace!(event = kind.name(), listeners = callbacks.len(), "emit");

        for callback in callbacks {
            callback(&event);
        }

        // No receivers is not an error
        let _ = self.inner.tx.send(event);
    }

    fn register(&self, kind: Option<EventKind>, callback: Listener) -> ListenerId {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push(Registered { id, kind, callback });
        id
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("receivers", &self.inner.tx.receiver_count())
            .field("listeners", &self.inner.listeners.lock().len())
            .finish()
    }
}

/// Test helper: collect every event into a shared vector
#[cfg(test)]
pub(crate) fn record(bus: &EventBus) -> Arc<Mutex<Vec<ImageEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    bus.on_any(move |event| sink.lock().push(event.clone()));
    seen
}
