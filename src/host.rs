//! The platform the explorer runs in: something that owns the URL fragment,
//! dispatches fragment-change notifications, runs deferred tasks and shows
//! the columns.  `MemoryHost` is a browser-shaped in-process implementation
//! used by the command line tool and the tests.

use std::collections::VecDeque;

use crate::render_plan::RenderPlan;

/// Work scheduled for the next turn of the event loop (a zero-delay timer).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deferred {
    ClearFragmentGuard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Nearest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollTarget {
    Column(usize),
    Entry { column: usize, entry: usize },
}

/// Events the platform hands back to the engine, in dispatch order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    FragmentChanged,
    Deferred(Deferred),
}

pub trait Host {
    /// Current URL fragment including the leading `#`, or empty.
    fn fragment(&self) -> String;

    /// Assign the fragment.  When the value actually changes the platform
    /// queues a `HostEvent::FragmentChanged` notification.
    fn set_fragment(&mut self, fragment: &str);

    /// Schedule `task` as a zero-delay task behind everything already queued.
    fn defer(&mut self, task: Deferred);

    /// Next pending event, if any.
    fn poll_event(&mut self) -> Option<HostEvent>;

    fn scroll_into_view(&mut self, _target: ScrollTarget, _behavior: ScrollBehavior) {}

    /// The column set or its selection markers changed.
    fn columns_changed(&mut self, _plan: &RenderPlan) {}
}

/// Fragment, session history and event queue held in memory.
#[derive(Debug, Default)]
pub struct MemoryHost {
    fragment: String,
    history: Vec<String>,
    history_pos: usize,
    queue: VecDeque<HostEvent>,
    pub scrolls: Vec<(ScrollTarget, ScrollBehavior)>,
    pub repaints: usize,
    pub fragment_writes: usize,
}

impl MemoryHost {
    pub fn new() -> MemoryHost {
        MemoryHost::with_fragment("")
    }

    /// A host as it looks when a page is opened on `fragment`.
    pub fn with_fragment(fragment: &str) -> MemoryHost {
        MemoryHost {
            fragment: fragment.to_string(),
            history: vec![fragment.to_string()],
            history_pos: 0,
            ..Default::default()
        }
    }

    fn change_fragment(&mut self, fragment: &str) -> bool {
        if self.fragment == fragment {
            return false;
        }
        self.fragment = fragment.to_string();
        self.queue.push_back(HostEvent::FragmentChanged);
        true
    }

    /// The user typed a new fragment into the address bar.
    pub fn navigate(&mut self, fragment: &str) {
        if self.change_fragment(fragment) {
            self.push_history(fragment);
        }
    }

    pub fn back(&mut self) -> bool {
        if self.history_pos == 0 {
            return false;
        }
        self.history_pos -= 1;
        let fragment = self.history[self.history_pos].clone();
        self.change_fragment(&fragment);
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.history_pos + 1 >= self.history.len() {
            return false;
        }
        self.history_pos += 1;
        let fragment = self.history[self.history_pos].clone();
        self.change_fragment(&fragment);
        true
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    fn push_history(&mut self, fragment: &str) {
        self.history.truncate(self.history_pos + 1);
        self.history.push(fragment.to_string());
        self.history_pos = self.history.len() - 1;
    }
}

impl Host for MemoryHost {
    fn fragment(&self) -> String {
        self.fragment.clone()
    }

    fn set_fragment(&mut self, fragment: &str) {
        // Fragments are stored with their `#`; assigning "" or "#" clears it.
        let normalized = if fragment.is_empty() || fragment == "#" {
            String::new()
        } else if fragment.starts_with('#') {
            fragment.to_string()
        } else {
            format!("#{}", fragment)
        };
        self.fragment_writes += 1;
        if self.change_fragment(&normalized) {
            self.push_history(&normalized);
        }
    }

    fn defer(&mut self, task: Deferred) {
        self.queue.push_back(HostEvent::Deferred(task));
    }

    fn poll_event(&mut self) -> Option<HostEvent> {
        self.queue.pop_front()
    }

    fn scroll_into_view(&mut self, target: ScrollTarget, behavior: ScrollBehavior) {
        self.scrolls.push((target, behavior));
    }

    fn columns_changed(&mut self, _plan: &RenderPlan) {
        self.repaints += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_fragment_queues_notification_once() {
        let mut host = MemoryHost::new();
        host.set_fragment("#v1.Pod");
        host.set_fragment("#v1.Pod");
        assert_eq!(host.fragment(), "#v1.Pod");
        assert_eq!(host.poll_event(), Some(HostEvent::FragmentChanged));
        assert_eq!(host.poll_event(), None);
        assert_eq!(host.fragment_writes, 2);
        assert_eq!(host.history_len(), 2);
    }

    #[test]
    fn test_deferred_runs_after_notification() {
        let mut host = MemoryHost::new();
        host.set_fragment("v1.Pod");
        host.defer(Deferred::ClearFragmentGuard);
        assert_eq!(host.fragment(), "#v1.Pod");
        assert_eq!(host.poll_event(), Some(HostEvent::FragmentChanged));
        assert_eq!(
            host.poll_event(),
            Some(HostEvent::Deferred(Deferred::ClearFragmentGuard))
        );
    }

    #[test]
    fn test_back_and_forward() {
        let mut host = MemoryHost::with_fragment("#a.A");
        host.navigate("#b.B");
        host.navigate("#c.C");
        assert!(host.back());
        assert_eq!(host.fragment(), "#b.B");
        assert!(host.back());
        assert_eq!(host.fragment(), "#a.A");
        assert!(!host.back());
        assert!(host.forward());
        assert_eq!(host.fragment(), "#b.B");
        // Navigating from the middle drops the forward entries.
        host.navigate("#d.D");
        assert!(!host.forward());
        assert_eq!(host.history_len(), 3);
        // Two navigates, two backs, one forward and the last navigate; the
        // refused back and forward queue nothing.
        assert_eq!(host.pending_events(), 6);
    }
}
