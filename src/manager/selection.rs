//! Selection set with click, ctrl-click and shift-click semantics

use std::collections::HashSet;

use super::ManagerBase;
use crate::events::{EventBus, ImageEvent};
use crate::media::{MediaFile, TargetFolder};

/// How clicks change the selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// Every click selects exactly one file
    Single,
    /// Ctrl/Cmd toggles, Shift extends from the anchor
    #[default]
    Multiple,
    /// Like `Multiple`, but a plain click also extends from the anchor
    Range,
}

/// Keyboard modifiers held during a click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl_or_cmd: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl_or_cmd: false,
        shift: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl_or_cmd: true,
        shift: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        ctrl_or_cmd: false,
        shift: true,
    };
}

/// Tracks which files of the current (display-ordered) list are selected
#[derive(Debug)]
pub struct SelectionManager {
    base: ManagerBase,
    selected: HashSet<String>,
    mode: SelectionMode,
    last_selected_index: Option<usize>,
}

impl SelectionManager {
    pub fn new(events: EventBus) -> Self {
        Self {
            base: ManagerBase::new(events),
            selected: HashSet::new(),
            mode: SelectionMode::default(),
            last_selected_index: None,
        }
    }

    /// New folder: nothing is selected
    pub fn set_current_item(&mut self, folder: Option<TargetFolder>) {
        self.base.set_folder(folder);
        self.last_selected_index = None;
        if !self.selected.is_empty() {
            self.selected.clear();
            self.notify();
        }
    }

    /// Replace the file list, silently dropping selected names that are gone
    pub fn update_image_files(&mut self, files: Vec<MediaFile>) {
        self.base.set_files(files);

        let before = self.selected.len();
        let base = &self.base;
        self.selected.retain(|name| base.contains(name));

        if let Some(anchor) = self.last_selected_index {
            if anchor >= self.base.files().len() {
                self.last_selected_index = None;
            }
        }

        if self.selected.len() != before {
            tracing::debug!("pruned {} stale selections", before - self.selected.len());
            self.notify();
        }
    }

    /// Apply a click on `name` at display position `index`
    pub fn select_image(&mut self, name: &str, index: usize, modifiers: Modifiers) {
        let extend = modifiers.shift || self.mode == SelectionMode::Range;

        if self.mode == SelectionMode::Single || (!modifiers.ctrl_or_cmd && !extend) {
            self.select_single(name, index);
        } else if modifiers.ctrl_or_cmd {
            self.toggle(name, index);
        } else {
            match self.last_selected_index {
                Some(anchor) => self.select_range(anchor, index),
                None => {
                    let name = self.base.files().get(index).map(|f| f.name.clone());
                    if let Some(name) = name {
                        self.select_single(&name, index);
                    }
                }
            }
        }
    }

    pub fn deselect_image(&mut self, name: &str) {
        if self.selected.remove(name) {
            self.notify();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.last_selected_index = None;
        self.notify();
    }

    pub fn select_all(&mut self) {
        self.selected = self.base.files().iter().map(|f| f.name.clone()).collect();
        self.notify();
    }

    pub fn invert_selection(&mut self) {
        self.selected = self
            .base
            .files()
            .iter()
            .filter(|f| !self.selected.contains(&f.name))
            .map(|f| f.name.clone())
            .collect();
        self.notify();
    }

    /// Replace the selection; names outside the file list are ignored
    pub fn set_selection<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: HashSet<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        self.selected = self
            .base
            .files()
            .iter()
            .filter(|f| wanted.contains(&f.name))
            .map(|f| f.name.clone())
            .collect();
        self.notify();
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    /// Selected names in display order
    pub fn selected_images(&self) -> Vec<String> {
        self.base
            .files()
            .iter()
            .filter(|f| self.selected.contains(&f.name))
            .map(|f| f.name.clone())
            .collect()
    }

    pub fn selection_count(&self) -> usize {
        self.selected.len()
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Switching to single mode collapses a multi-selection
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        if mode == SelectionMode::Single && self.selected.len() > 1 {
            self.clear_selection();
        }
    }

    pub fn last_selected_index(&self) -> Option<usize> {
        self.last_selected_index
    }

    fn select_single(&mut self, name: &str, index: usize) {
        if !self.base.contains(name) {
            return;
        }
        self.selected.clear();
        self.selected.insert(name.to_string());
        self.last_selected_index = Some(index);
        self.notify();
    }

    fn toggle(&mut self, name: &str, index: usize) {
        if !self.base.contains(name) {
            return;
        }
        if !self.selected.remove(name) {
            self.selected.insert(name.to_string());
        }
        self.last_selected_index = Some(index);
        self.notify();
    }

    /// Add the inclusive range between the two positions; the anchor stays
    fn select_range(&mut self, anchor: usize, index: usize) {
        let files = self.base.files();
        if files.is_empty() {
            return;
        }
        let last = files.len() - 1;
        let start = anchor.min(index).min(last);
        let end = anchor.max(index).min(last);

        for file in &files[start..=end] {
            self.selected.insert(file.name.clone());
        }
        self.notify();
    }

    fn notify(&self) {
        let selected_images = self.selected_images();
        self.base.emit(ImageEvent::SelectionChanged {
            selection_count: selected_images.len(),
            selected_images,
        });
    }
}
