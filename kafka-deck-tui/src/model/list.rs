//! Selectable row list shared by every list panel

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{UiError, UiResult};
use crate::model::notifier::{ChangeEvent, ChangeField, Notifier};

/// Rows moved by Ctrl+D / Ctrl+U
pub const PAGE_SIZE: usize = 10;

/// One-line rendering of a row
pub trait DisplayRow {
    fn display_row(&self) -> String;
}

pub type SelectionCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct ListState<T> {
    rows: Vec<T>,
    selected: Option<usize>,
}

/// Rows plus an optional selection, guarded by a per-list lock
///
/// `selected` is either `None` or a valid index into `rows`. Every mutation notifies
/// after the lock is released, and the selection callback runs outside the lock too.
pub struct ListViewModel<T> {
    state: RwLock<ListState<T>>,
    notifier: Notifier,
    on_selection_changed: RwLock<Option<SelectionCallback<T>>>,
}

impl<T: Clone + Send + Sync + 'static> ListViewModel<T> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ListState {
                rows: Vec::new(),
                selected: None,
            }),
            notifier: Notifier::new(),
            on_selection_changed: RwLock::new(None),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ListState<T>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ListState<T>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_on_change<F>(&self, handler: F)
    where
        F: Fn(ChangeEvent) + Send + Sync + 'static,
    {
        self.notifier.on_change(handler);
    }

    pub fn set_on_selection_changed<F>(&self, callback: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        *self
            .on_selection_changed
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(callback));
    }

    pub fn notify(&self, field: ChangeField) {
        self.notifier.notify(field);
    }

    /// Replace every row, clear the selection, then select the first row if any.
    pub fn load(&self, rows: Vec<T>) {
        {
            let mut state = self.write();
            state.rows = rows;
            state.selected = None;
        }
        self.notifier.notify(ChangeField::Items);
        self.set_selected_index(0);
    }

    /// Append one row without touching the selection.
    pub fn push(&self, row: T) {
        self.write().rows.push(row);
        self.notifier.notify(ChangeField::Items);
    }

    /// Select `index`. Out-of-range indices are ignored; returns whether the selection was set.
    pub fn set_selected_index(&self, index: usize) -> bool {
        let row = {
            let mut state = self.write();
            let Some(row) = state.rows.get(index).cloned() else {
                return false;
            };
            state.selected = Some(index);
            row
        };
        self.notifier.notify(ChangeField::SelectedIndex);

        let callback = self
            .on_selection_changed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(callback) = callback {
            callback(&row);
        }
        true
    }

    pub fn move_up(&self) -> UiResult<()> {
        match self.selected_index() {
            Some(i) if i > 0 => self.select_or_fail(i - 1),
            _ => Err(UiError::NoSelection),
        }
    }

    pub fn move_down(&self) -> UiResult<()> {
        let len = self.len();
        let next = self.selected_index().map_or(0, |i| i + 1);
        if next < len {
            self.select_or_fail(next)
        } else {
            Err(UiError::NoSelection)
        }
    }

    pub fn jump_to_top(&self) -> UiResult<()> {
        self.select_or_fail(0)
    }

    pub fn jump_to_bottom(&self) -> UiResult<()> {
        let len = self.len();
        if len == 0 {
            return Err(UiError::NoSelection);
        }
        self.select_or_fail(len - 1)
    }

    pub fn page_down(&self) -> UiResult<()> {
        let len = self.len();
        if len == 0 {
            return Err(UiError::NoSelection);
        }
        let target = self
            .selected_index()
            .map_or(0, |i| (i + PAGE_SIZE).min(len - 1));
        if Some(target) == self.selected_index() {
            return Err(UiError::NoSelection);
        }
        self.select_or_fail(target)
    }

    pub fn page_up(&self) -> UiResult<()> {
        match self.selected_index() {
            Some(i) if i > 0 => self.select_or_fail(i.saturating_sub(PAGE_SIZE)),
            _ => Err(UiError::NoSelection),
        }
    }

    fn select_or_fail(&self, index: usize) -> UiResult<()> {
        if self.set_selected_index(index) {
            Ok(())
        } else {
            Err(UiError::NoSelection)
        }
    }

    /// Drop matching rows and keep the selection on a valid index.
    ///
    /// Returns the number of removed rows.
    pub fn remove_where<P>(&self, pred: P) -> usize
    where
        P: Fn(&T) -> bool,
    {
        let (removed, reselect) = {
            let mut state = self.write();
            let before = state.rows.len();
            state.rows.retain(|row| !pred(row));
            let removed = before - state.rows.len();
            if removed == 0 {
                return 0;
            }
            let reselect = match state.selected {
                _ if state.rows.is_empty() => None,
                Some(i) => Some(i.min(state.rows.len() - 1)),
                None => None,
            };
            state.selected = None;
            (removed, reselect)
        };

        self.notifier.notify(ChangeField::Items);
        match reselect {
            Some(i) => {
                self.set_selected_index(i);
            }
            None => self.notifier.notify(ChangeField::SelectedIndex),
        }
        removed
    }

    pub fn rows(&self) -> Vec<T> {
        self.read().rows.clone()
    }

    pub fn len(&self) -> usize {
        self.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().rows.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.read().selected
    }

    pub fn selected(&self) -> Option<T> {
        let state = self.read();
        state.selected.and_then(|i| state.rows.get(i).cloned())
    }
}

impl<T: DisplayRow + Clone + Send + Sync + 'static> ListViewModel<T> {
    pub fn display_rows(&self) -> Vec<String> {
        self.read().rows.iter().map(DisplayRow::display_row).collect()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for ListViewModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every change event in order.
    pub(crate) fn record_changes<T: Clone + Send + Sync + 'static>(
        list: &ListViewModel<T>,
    ) -> Arc<Mutex<Vec<ChangeField>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        list.set_on_change(move |e| sink.lock().unwrap().push(e.field));
        events
    }

    fn list_of(n: usize) -> ListViewModel<usize> {
        let list = ListViewModel::new();
        list.load((0..n).collect());
        list
    }

    #[test]
    fn load_selects_first_row_after_items() {
        let list = ListViewModel::new();
        let events = record_changes(&list);
        let selected = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&selected);
        list.set_on_selection_changed(move |row: &u32| s.lock().unwrap().push(*row));

        list.load(vec![7, 8, 9]);

        assert_eq!(list.selected_index(), Some(0));
        assert_eq!(
            *events.lock().unwrap(),
            vec![ChangeField::Items, ChangeField::SelectedIndex]
        );
        assert_eq!(*selected.lock().unwrap(), vec![7]);
    }

    #[test]
    fn load_empty_leaves_no_selection() {
        let list = list_of(3);
        let events = record_changes(&list);
        list.load(Vec::new());
        assert_eq!(list.selected_index(), None);
        assert_eq!(*events.lock().unwrap(), vec![ChangeField::Items]);
    }

    #[test]
    fn move_down_at_last_row_fails_without_change() {
        let list = list_of(3);
        list.set_selected_index(2);
        let events = record_changes(&list);

        assert!(matches!(list.move_down(), Err(UiError::NoSelection)));
        assert_eq!(list.selected_index(), Some(2));
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn move_down_on_empty_fails() {
        let list: ListViewModel<usize> = ListViewModel::new();
        assert!(matches!(list.move_down(), Err(UiError::NoSelection)));
        assert_eq!(list.selected_index(), None);
    }

    #[test]
    fn move_up_at_top_fails() {
        let list = list_of(2);
        assert!(matches!(list.move_up(), Err(UiError::NoSelection)));
        list.move_down().unwrap();
        list.move_up().unwrap();
        assert_eq!(list.selected_index(), Some(0));
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let list = list_of(2);
        let events = record_changes(&list);
        assert!(!list.set_selected_index(5));
        assert_eq!(list.selected_index(), Some(0));
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn paging_clamps_to_bounds() {
        let list = list_of(25);
        list.page_down().unwrap();
        assert_eq!(list.selected_index(), Some(10));
        list.page_down().unwrap();
        list.page_down().unwrap();
        assert_eq!(list.selected_index(), Some(24));
        assert!(list.page_down().is_err());

        list.page_up().unwrap();
        assert_eq!(list.selected_index(), Some(14));
        list.jump_to_top().unwrap();
        assert!(list.page_up().is_err());
        list.jump_to_bottom().unwrap();
        assert_eq!(list.selected_index(), Some(24));
    }

    #[test]
    fn remove_clamps_selection() {
        let list = list_of(3);
        list.set_selected_index(2);
        assert_eq!(list.remove_where(|r| *r == 2), 1);
        assert_eq!(list.selected_index(), Some(1));

        assert_eq!(list.remove_where(|_| true), 2);
        assert_eq!(list.selected_index(), None);
        assert_eq!(list.remove_where(|_| true), 0);
    }
}
