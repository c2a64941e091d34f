use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Mutex,
};

/// Something a generation pipeline did or rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A source file was written
    SourceFileGenerated {
        /// Path of the written file
        path: PathBuf,
    },
    /// An output directory was created
    DirectoryCreated {
        /// Path of the new directory
        path: PathBuf,
    },
    /// A stale file was removed
    FileDeleted {
        /// Path of the removed file
        path: PathBuf,
    },
    /// A stale directory was removed
    DirectoryDeleted {
        /// Path of the removed directory
        path: PathBuf,
    },
    /// A user supplied argument was rejected
    InvalidArgument {
        /// Name of the argument
        name: String,
        /// The rejected value
        value: String,
        /// Why the value was rejected
        reason: String,
    },
}

impl Event {
    /// The path the event is about, `None` for [`Event::InvalidArgument`]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Event::SourceFileGenerated { path }
            | Event::DirectoryCreated { path }
            | Event::FileDeleted { path }
            | Event::DirectoryDeleted { path } => Some(path),
            Event::InvalidArgument { .. } => None,
        }
    }

    /// Returns `true` for events reporting a failure
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Event::InvalidArgument { .. })
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::SourceFileGenerated { path } => write!(f, "Generated source file {}", path.display()),
            Event::DirectoryCreated { path } => write!(f, "Created directory {}", path.display()),
            Event::FileDeleted { path } => write!(f, "Deleted file {}", path.display()),
            Event::DirectoryDeleted { path } => write!(f, "Deleted directory {}", path.display()),
            Event::InvalidArgument {
                name,
                value,
                reason,
            } => write!(f, "Invalid value '{value}' for argument {name}: {reason}"),
        }
    }
}

/// Receiver of [`Event`]s.
///
/// Implemented for every `Fn(&Event)`, so a closure can serve as a listener.
pub trait EventListener: Send + Sync {
    /// Called once per event, in the order the events happen
    fn on_event(&self, event: &Event);
}

impl<F> EventListener for F
where
    F: Fn(&Event) + Send + Sync,
{
    fn on_event(&self, event: &Event) {
        self(event);
    }
}

/// Forwards events to the `log` facade: progress at debug level, rejected arguments at
/// error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogListener;

impl EventListener for LogListener {
    fn on_event(&self, event: &Event) {
        if event.is_error() {
            log::error!("{event}");
        } else {
            log::debug!("{event}");
        }
    }
}

/// Keeps every event it receives.
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Mutex<Vec<Event>>,
}

impl EventRecorder {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The events received so far
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EventListener for EventRecorder {
    fn on_event(&self, event: &Event) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
