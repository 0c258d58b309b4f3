//! The navigation state machine.  `NavigationEngine` owns the drill-down
//! path, the columns derived from it and the guard that keeps its own
//! fragment writes from coming back around as restores.

use crate::file_format::type_graph::TypeGraph;
use crate::hash_codec;
use crate::host::{Deferred, Host, HostEvent, ScrollBehavior, ScrollTarget};
use crate::nav_path::NavigationPath;
use crate::render_plan::{build_column, plan, RenderPlan};

pub struct NavigationEngine<'g, H: Host> {
    graph: &'g TypeGraph,
    host: H,
    start_type: Option<String>,
    path: Option<NavigationPath>,
    plan: RenderPlan,
    /// Fragment writes whose deferred guard reset hasn't run yet.  Change
    /// notifications are ignored while this is non-zero.
    pending_fragment_writes: usize,
    restore_count: usize,
}

impl<'g, H: Host> NavigationEngine<'g, H> {
    pub fn new(graph: &'g TypeGraph, host: H) -> Self {
        NavigationEngine {
            graph,
            host,
            start_type: None,
            path: None,
            plan: RenderPlan::default(),
            pending_fragment_writes: 0,
            restore_count: 0,
        }
    }

    pub fn with_start_type(mut self, start_type: Option<String>) -> Self {
        self.start_type = start_type;
        self
    }

    pub fn graph(&self) -> &'g TypeGraph {
        self.graph
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn plan(&self) -> &RenderPlan {
        &self.plan
    }

    pub fn current_path(&self) -> Option<&NavigationPath> {
        self.path.as_ref()
    }

    pub fn active_selection(&self) -> Option<(usize, usize)> {
        self.plan.active_selection()
    }

    /// How many times the columns were rebuilt from a path.
    pub fn restore_count(&self) -> usize {
        self.restore_count
    }

    pub fn is_updating_fragment(&self) -> bool {
        self.pending_fragment_writes > 0
    }

    /// Show the initial view: the fragment if it decodes, else the start type
    /// when the graph has it, else the first type in the graph.  The fragment
    /// is left untouched.
    pub fn init(&mut self) {
        if self.restore_from_fragment() {
            info!("Restored [{}] from fragment", self.host.fragment());
            return;
        }

        let root = match &self.start_type {
            Some(start) if self.graph.contains(start) => Some(start.clone()),
            Some(start) => {
                warn!("Start type [{}] not in graph; using first type", start);
                self.graph.first_type_name().map(String::from)
            }
            None => self.graph.first_type_name().map(String::from),
        };
        match root {
            Some(root) => {
                info!("Starting at [{}]", root);
                self.restore_from_path(&NavigationPath::new(root));
            }
            None => warn!("Type graph is empty; nothing to show"),
        }
    }

    /// Decode the host's fragment and restore it.  Returns false, leaving the
    /// view alone, when the fragment is empty or doesn't decode.
    pub fn restore_from_fragment(&mut self) -> bool {
        let fragment = self.host.fragment();
        match hash_codec::decode(&fragment, self.graph) {
            Some(path) => self.restore_from_path(&path),
            None => false,
        }
    }

    /// Rebuild every column for `path`.  Fields that don't resolve cut the
    /// restore short; the tracked path is whatever part of `path` survived.
    pub fn restore_from_path(&mut self, path: &NavigationPath) -> bool {
        let rendered = match plan(self.graph, path) {
            Some(rendered) => rendered,
            None => {
                warn!("Root type [{}] not in graph", path.root);
                return false;
            }
        };
        self.restore_count += 1;
        self.path = rendered.selected_path();
        self.plan = rendered;
        trace!(path = %path, columns = self.plan.columns.len(), "restored");

        self.host.columns_changed(&self.plan);
        if let Some(last) = self.plan.columns.len().checked_sub(1) {
            self.host
                .scroll_into_view(ScrollTarget::Column(last), ScrollBehavior::Smooth);
        }
        true
    }

    /// Select `field_name` in column `column`, replacing whatever was selected
    /// there and everything to its right.
    pub fn select_field(&mut self, column: usize, field_name: &str) -> bool {
        let entry = match self
            .plan
            .columns
            .get(column)
            .and_then(|c| c.position(field_name))
        {
            Some(entry) => entry,
            None => {
                warn!("No field [{}] in column {}", field_name, column);
                return false;
            }
        };
        self.select_entry(column, entry);
        self.host.columns_changed(&self.plan);
        self.sync_fragment();
        true
    }

    /// Make `column` the rightmost column holding a selection.  The column its
    /// selection opens stays, unselected; everything past that goes.
    pub fn collapse_to_column(&mut self, column: usize) -> bool {
        if self
            .plan
            .columns
            .get(column)
            .and_then(|c| c.selected_index())
            .is_none()
        {
            return false;
        }

        self.plan.columns.truncate(column + 2);
        if let Some(opened) = self.plan.columns.get_mut(column + 1) {
            opened.clear_selection();
        }
        if let Some(path) = self.path.as_mut() {
            path.truncate_fields(column + 1);
        }
        self.host.columns_changed(&self.plan);
        self.sync_fragment();
        true
    }

    /// Click on an entry row.  Enum values aren't part of the path and do
    /// nothing.
    pub fn click_entry(&mut self, column: usize, entry: usize) -> bool {
        let field_name = match self.plan.entry(column, entry) {
            Some(e) if e.is_selectable() => e.field_name.clone(),
            _ => return false,
        };
        self.select_field(column, &field_name)
    }

    /// Flip an entry's doc between summary and detail.
    pub fn toggle_doc(&mut self, column: usize, entry: usize) -> bool {
        let toggled = self
            .plan
            .entry_mut(column, entry)
            .and_then(|e| e.doc.as_mut())
            .map_or(false, |doc| doc.toggle());
        if toggled {
            self.host.columns_changed(&self.plan);
        }
        toggled
    }

    pub fn toggle_active_doc(&mut self) -> bool {
        match self.active_selection() {
            Some((column, entry)) => self.toggle_doc(column, entry),
            None => false,
        }
    }

    /// With nothing selected, select the first entry of the root column.
    pub fn select_first_entry(&mut self) -> bool {
        let first = match self.plan.columns.first().and_then(|c| c.first_selectable()) {
            Some(first) => first,
            None => return false,
        };
        self.select_entry(0, first);
        self.finish_move(0, first);
        true
    }

    pub fn move_up(&mut self) -> bool {
        self.move_vertically(false)
    }

    pub fn move_down(&mut self) -> bool {
        self.move_vertically(true)
    }

    fn move_vertically(&mut self, forward: bool) -> bool {
        let (column, entry) = match self.active_selection() {
            Some(active) => active,
            None => return self.select_first_entry(),
        };
        let next = match self.plan.columns[column].neighbor(entry, forward) {
            Some(next) => next,
            None => return false,
        };
        self.select_entry(column, next);
        self.finish_move(column, next);
        true
    }

    /// Open the active entry's type and select its first field.
    pub fn move_right(&mut self) -> bool {
        let (column, entry) = match self.active_selection() {
            Some(active) => active,
            None => return self.select_first_entry(),
        };
        if !self.plan.columns[column].entries[entry].navigable {
            return false;
        }

        // Reselecting discards any deeper columns and reopens the target.
        self.select_entry(column, entry);
        let first = self
            .plan
            .columns
            .get(column + 1)
            .and_then(|c| c.first_selectable());
        match first {
            Some(first) => {
                self.select_entry(column + 1, first);
                self.finish_move(column + 1, first);
            }
            None => {
                self.host.columns_changed(&self.plan);
                self.sync_fragment();
            }
        }
        true
    }

    /// Step back one column.  The root column is never removed.
    pub fn move_left(&mut self) -> bool {
        let column = match self.active_selection() {
            Some((0, _)) => return false,
            Some((column, _)) => column,
            None => return self.select_first_entry(),
        };
        if !self.collapse_to_column(column - 1) {
            return false;
        }
        if let Some((column, entry)) = self.active_selection() {
            self.host.scroll_into_view(
                ScrollTarget::Entry { column, entry },
                ScrollBehavior::Nearest,
            );
        }
        true
    }

    /// Put the fragment on `type_name`.  This is a user-driven navigation, so
    /// the change notification goes through and restores the view.
    pub fn open_type(&mut self, type_name: &str) {
        trace!(type_name, "opening type");
        self.host.set_fragment(&format!("#{}", type_name));
    }

    pub fn on_fragment_changed(&mut self) -> bool {
        if self.is_updating_fragment() {
            trace!("Ignoring fragment change from our own write");
            return false;
        }
        trace!(fragment = %self.host.fragment(), "fragment changed");
        self.restore_from_fragment()
    }

    pub fn run_deferred(&mut self, task: Deferred) {
        match task {
            Deferred::ClearFragmentGuard => {
                self.pending_fragment_writes = self.pending_fragment_writes.saturating_sub(1);
            }
        }
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::FragmentChanged => {
                self.on_fragment_changed();
            }
            HostEvent::Deferred(task) => self.run_deferred(task),
        }
    }

    /// Dispatch everything the host has queued, including events queued while
    /// dispatching.
    pub fn run_until_idle(&mut self) {
        while let Some(event) = self.host.poll_event() {
            self.handle_event(event);
        }
    }

    /// Write the fragment for the current path if it differs from what the
    /// host shows, guarding against the resulting change notification.
    pub fn sync_fragment(&mut self) {
        debug_assert_eq!(self.path, self.plan.selected_path());

        let fragment = match &self.path {
            Some(path) => hash_codec::encode(path),
            None => String::new(),
        };
        if self.host.fragment() == fragment {
            return;
        }
        trace!(fragment = %fragment, "updating fragment");
        self.pending_fragment_writes += 1;
        self.host.set_fragment(&fragment);
        self.host.defer(Deferred::ClearFragmentGuard);
    }

    /// Mark `entry` selected in `column`, dropping the columns to the right
    /// and opening the entry's type if the graph has it.  The path follows.
    fn select_entry(&mut self, column: usize, entry: usize) {
        self.plan.columns.truncate(column + 1);
        let current = &mut self.plan.columns[column];
        current.clear_selection();
        let selected = &mut current.entries[entry];
        selected.selected = true;
        let field_name = selected.field_name.clone();
        let type_name = selected.type_name.clone();

        if let Some(path) = self.path.as_mut() {
            path.truncate_fields(column);
            path.push(field_name);
        }

        if let Some(opened) = build_column(self.graph, &type_name) {
            self.plan.columns.push(opened);
            let last = self.plan.columns.len() - 1;
            self.host
                .scroll_into_view(ScrollTarget::Column(last), ScrollBehavior::Smooth);
        }
    }

    fn finish_move(&mut self, column: usize, entry: usize) {
        self.host.scroll_into_view(
            ScrollTarget::Entry { column, entry },
            ScrollBehavior::Nearest,
        );
        self.host.columns_changed(&self.plan);
        self.sync_fragment();
    }
}
