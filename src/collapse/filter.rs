use super::window::TimeWindow;

/// Per-event time and thread scoping, evaluated for every event rather than
/// per batch.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    window: Option<TimeWindow>,
    // Lower-cased once at construction; events are lowered per comparison.
    thread: Option<String>,
}

impl EventFilter {
    /// Builds a filter. The thread name, when given, is trimmed and
    /// lower-cased once here.
    pub fn new(window: Option<TimeWindow>, thread: Option<&str>) -> EventFilter {
        EventFilter {
            window,
            thread: thread.map(|t| t.trim().to_lowercase()),
        }
    }

    /// Whether an event falls outside the configured scope.
    ///
    /// Window bounds are inclusive. An event without a thread name never
    /// matches an active thread filter.
    pub fn should_skip(&self, timestamp_millis: i64, thread_name: Option<&str>) -> bool {
        if let Some(window) = &self.window {
            if timestamp_millis < window.start_millis || timestamp_millis > window.end_millis {
                return true;
            }
        }
        if let Some(filter) = &self.thread {
            match thread_name {
                Some(name) => {
                    if name.to_lowercase() != *filter {
                        return true;
                    }
                }
                None => return true,
            }
        }
        false
    }
}
