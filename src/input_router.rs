//! Keyboard and pointer dispatch.  Routes each event either to the quick-open
//! search overlay or to the navigation engine.

use serde::Serialize;

use crate::host::Host;
use crate::navigation::NavigationEngine;
use crate::search_index::SearchIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Escape,
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    /// Parse a key name as used by the `navigate` command: `up`, `down`,
    /// `left`, `right`, `enter`, `esc`, `backspace`, or a single character.
    pub fn from_name(name: &str) -> Option<Key> {
        let key = match name.to_lowercase().as_str() {
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "enter" => Key::Enter,
            "esc" | "escape" => Key::Escape,
            "backspace" => Key::Backspace,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

/// Where keyboard focus was when a key went down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Page,
    TextInput,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key { key: Key, focus: Focus },
    ClickEntry { column: usize, entry: usize },
    ClickDocToggle { column: usize, entry: usize },
    ClickSearchResult(usize),
    /// A click on the dimmed area around the overlay's dialog.
    ClickBackdrop,
    ClickHelp,
}

impl InputEvent {
    pub fn key(key: Key) -> InputEvent {
        InputEvent::Key {
            key,
            focus: Focus::Page,
        }
    }
}

/// State of the quick-open dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchOverlay {
    pub open: bool,
    pub filter: String,
    pub results: Vec<String>,
    pub highlight: Option<usize>,
}

impl SearchOverlay {
    pub fn highlighted(&self) -> Option<&str> {
        self.highlight
            .and_then(|i| self.results.get(i))
            .map(|s| s.as_str())
    }
}

pub struct InputRouter {
    index: SearchIndex,
    overlay: SearchOverlay,
}

impl InputRouter {
    pub fn new(index: SearchIndex) -> InputRouter {
        InputRouter {
            index,
            overlay: SearchOverlay::default(),
        }
    }

    pub fn overlay(&self) -> &SearchOverlay {
        &self.overlay
    }

    /// Dispatch one event.  Returns whether anything consumed it.
    pub fn handle<H: Host>(
        &mut self,
        engine: &mut NavigationEngine<'_, H>,
        event: InputEvent,
    ) -> bool {
        trace!(event = ?event, overlay_open = self.overlay.open, "input");
        match event {
            InputEvent::Key { key, focus } => self.handle_key(engine, key, focus),
            InputEvent::ClickEntry { column, entry } => {
                if self.overlay.open {
                    return false;
                }
                engine.click_entry(column, entry)
            }
            InputEvent::ClickDocToggle { column, entry } => {
                if self.overlay.open {
                    return false;
                }
                engine.toggle_doc(column, entry)
            }
            InputEvent::ClickSearchResult(index) => {
                if !self.overlay.open || index >= self.overlay.results.len() {
                    return false;
                }
                self.overlay.highlight = Some(index);
                self.confirm(engine)
            }
            InputEvent::ClickBackdrop => self.close(),
            InputEvent::ClickHelp => {
                self.open();
                true
            }
        }
    }

    fn handle_key<H: Host>(
        &mut self,
        engine: &mut NavigationEngine<'_, H>,
        key: Key,
        focus: Focus,
    ) -> bool {
        if key == Key::Char('/') && focus != Focus::TextInput {
            self.open();
            return true;
        }
        if key == Key::Escape {
            return self.close();
        }

        if self.overlay.open {
            return match key {
                Key::Up => self.move_highlight(false),
                Key::Down => self.move_highlight(true),
                Key::Enter => self.confirm(engine),
                Key::Char(c) => {
                    self.overlay.filter.push(c);
                    self.refilter();
                    true
                }
                Key::Backspace => {
                    let changed = self.overlay.filter.pop().is_some();
                    if changed {
                        self.refilter();
                    }
                    changed
                }
                Key::Left | Key::Right | Key::Escape => false,
            };
        }

        if focus == Focus::TextInput {
            return false;
        }
        match key {
            Key::Up => engine.move_up(),
            Key::Down => engine.move_down(),
            Key::Left => engine.move_left(),
            Key::Right => engine.move_right(),
            Key::Enter => engine.toggle_active_doc(),
            _ => false,
        }
    }

    /// Show the overlay with an empty filter and everything listed.
    pub fn open(&mut self) {
        self.overlay.open = true;
        self.overlay.filter.clear();
        self.refilter();
    }

    pub fn close(&mut self) -> bool {
        if !self.overlay.open {
            return false;
        }
        self.overlay = SearchOverlay::default();
        true
    }

    fn refilter(&mut self) {
        self.overlay.results = self
            .index
            .query(&self.overlay.filter)
            .into_iter()
            .map(String::from)
            .collect();
        self.overlay.highlight = if self.overlay.results.is_empty() {
            None
        } else {
            Some(0)
        };
    }

    fn move_highlight(&mut self, forward: bool) -> bool {
        let current = match self.overlay.highlight {
            Some(current) => current,
            None => return false,
        };
        let next = if forward {
            current + 1
        } else {
            match current.checked_sub(1) {
                Some(next) => next,
                None => return false,
            }
        };
        if next >= self.overlay.results.len() {
            return false;
        }
        self.overlay.highlight = Some(next);
        true
    }

    fn confirm<H: Host>(&mut self, engine: &mut NavigationEngine<'_, H>) -> bool {
        let type_name = match self.overlay.highlighted() {
            Some(type_name) => type_name.to_string(),
            None => return false,
        };
        self.close();
        engine.open_type(&type_name);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_format::type_graph::TypeGraph;
    use crate::host::MemoryHost;
    use serde_json::json;

    fn graph() -> TypeGraph {
        TypeGraph::from_value(json!({
            "v1.Pod": {
                "typeName": "Pod", "package": "v1", "isRoot": true,
                "fields": [
                    { "fieldName": "Spec", "typeName": "v1.PodSpec",
                      "docString": "A. B.", "parsedDocString": { "elements": [
                          { "type": "p", "content": ["A."] },
                          { "type": "p", "content": ["B."] } ] } }
                ]
            },
            "v1.PodSpec": {
                "typeName": "PodSpec", "package": "v1",
                "fields": [ { "fieldName": "Hostname", "typeName": "string" } ]
            },
            "v1.PodList": { "typeName": "PodList", "package": "v1", "isRoot": true },
            "v1.Service": { "typeName": "Service", "package": "v1", "isRoot": true }
        }))
        .unwrap()
    }

    fn typed(router: &mut InputRouter, engine: &mut NavigationEngine<'_, MemoryHost>, s: &str) {
        for c in s.chars() {
            router.handle(
                engine,
                InputEvent::Key {
                    key: Key::Char(c),
                    focus: Focus::TextInput,
                },
            );
        }
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("Down"), Some(Key::Down));
        assert_eq!(Key::from_name("esc"), Some(Key::Escape));
        assert_eq!(Key::from_name("/"), Some(Key::Char('/')));
        assert_eq!(Key::from_name("xyz"), None);
    }

    #[test]
    fn test_slash_opens_overlay_unless_typing() {
        let graph = graph();
        let mut engine = NavigationEngine::new(&graph, MemoryHost::new());
        engine.init();
        let mut router = InputRouter::new(SearchIndex::new(&graph));

        let typing = InputEvent::Key {
            key: Key::Char('/'),
            focus: Focus::TextInput,
        };
        assert!(!router.handle(&mut engine, typing));
        assert!(!router.overlay().open);

        assert!(router.handle(&mut engine, InputEvent::key(Key::Char('/'))));
        assert!(router.overlay().open);
        assert_eq!(router.overlay().results, vec!["v1.Pod", "v1.PodList", "v1.Service"]);
        assert_eq!(router.overlay().highlight, Some(0));

        assert!(router.handle(&mut engine, InputEvent::key(Key::Escape)));
        assert!(!router.overlay().open);
        assert!(!router.handle(&mut engine, InputEvent::key(Key::Escape)));
    }

    #[test]
    fn test_search_filter_and_confirm() {
        let graph = graph();
        let mut engine = NavigationEngine::new(&graph, MemoryHost::with_fragment("#v1.Pod/Spec"));
        engine.init();
        let mut router = InputRouter::new(SearchIndex::new(&graph));

        router.handle(&mut engine, InputEvent::ClickHelp);
        typed(&mut router, &mut engine, "pod");
        assert_eq!(router.overlay().results, vec!["v1.Pod", "v1.PodList"]);

        // Arrows move the highlight, not the column selection.
        assert!(router.handle(&mut engine, InputEvent::key(Key::Down)));
        assert!(!router.handle(&mut engine, InputEvent::key(Key::Down)));
        assert_eq!(router.overlay().highlighted(), Some("v1.PodList"));
        assert_eq!(engine.active_selection(), Some((0, 0)));

        // Typing resets the highlight to the first result.
        typed(&mut router, &mut engine, "l");
        assert_eq!(router.overlay().results, vec!["v1.PodList"]);
        assert_eq!(router.overlay().highlight, Some(0));
        router.handle(
            &mut engine,
            InputEvent::Key {
                key: Key::Backspace,
                focus: Focus::TextInput,
            },
        );
        assert_eq!(router.overlay().filter, "pod");

        assert!(router.handle(&mut engine, InputEvent::key(Key::Down)));
        assert!(router.handle(&mut engine, InputEvent::key(Key::Enter)));
        assert!(!router.overlay().open);
        assert!(router.overlay().filter.is_empty());
        assert_eq!(engine.host().fragment(), "#v1.PodList");

        engine.run_until_idle();
        assert_eq!(engine.plan().columns[0].type_name, "v1.PodList");
    }

    #[test]
    fn test_no_results_has_no_highlight() {
        let graph = graph();
        let mut engine = NavigationEngine::new(&graph, MemoryHost::new());
        engine.init();
        let mut router = InputRouter::new(SearchIndex::new(&graph));
        router.open();
        typed(&mut router, &mut engine, "zzz");
        assert_eq!(router.overlay().highlight, None);
        assert!(!router.handle(&mut engine, InputEvent::key(Key::Enter)));
        assert!(router.overlay().open);
    }

    #[test]
    fn test_keys_drive_engine_when_closed() {
        let graph = graph();
        let mut engine = NavigationEngine::new(&graph, MemoryHost::new());
        engine.init();
        let mut router = InputRouter::new(SearchIndex::new(&graph));

        assert!(router.handle(&mut engine, InputEvent::key(Key::Down)));
        assert_eq!(engine.host().fragment(), "#v1.Pod/Spec");
        assert!(router.handle(&mut engine, InputEvent::key(Key::Enter)));
        assert!(engine.plan().entry(0, 0).unwrap().doc.as_ref().unwrap().expanded);
        assert!(router.handle(&mut engine, InputEvent::key(Key::Right)));
        assert_eq!(engine.host().fragment(), "#v1.Pod/Spec/Hostname");
        assert!(router.handle(&mut engine, InputEvent::key(Key::Left)));
        assert_eq!(engine.host().fragment(), "#v1.Pod/Spec");
        // Unbound keys fall through.
        assert!(!router.handle(&mut engine, InputEvent::key(Key::Char('x'))));
    }

    #[test]
    fn test_clicks() {
        let graph = graph();
        let mut engine = NavigationEngine::new(&graph, MemoryHost::new());
        engine.init();
        let mut router = InputRouter::new(SearchIndex::new(&graph));

        assert!(router.handle(&mut engine, InputEvent::ClickEntry { column: 0, entry: 0 }));
        assert_eq!(engine.plan().columns.len(), 2);
        assert!(router.handle(&mut engine, InputEvent::ClickDocToggle { column: 0, entry: 0 }));

        router.open();
        // The page underneath the overlay doesn't take clicks.
        assert!(!router.handle(&mut engine, InputEvent::ClickEntry { column: 1, entry: 0 }));
        assert!(!router.handle(&mut engine, InputEvent::ClickSearchResult(7)));
        assert!(router.handle(&mut engine, InputEvent::ClickSearchResult(2)));
        assert_eq!(engine.host().fragment(), "#v1.Service");

        router.open();
        assert!(router.handle(&mut engine, InputEvent::ClickBackdrop));
        assert!(!router.overlay().open);
    }
}
