use std::future::Future;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::modal::SelectOption;
use crate::components::table::CellValue;
use crate::error::ApiError;
use crate::format::{display_date, format_currency};

/// What the page's modal is currently doing.
#[derive(Clone, Debug, PartialEq)]
pub enum ModalMode<R> {
    Closed,
    Create,
    Edit(R),
    Delete(R),
}

impl<R> ModalMode<R> {
    pub fn is_open(&self) -> bool {
        !matches!(self, ModalMode::Closed)
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, ModalMode::Delete(_))
    }

    pub fn record(&self) -> Option<&R> {
        match self {
            ModalMode::Edit(record) | ModalMode::Delete(record) => Some(record),
            _ => None,
        }
    }

    pub fn title(&self, noun: &str) -> String {
        match self {
            ModalMode::Closed => String::new(),
            ModalMode::Create => format!("New {}", noun),
            ModalMode::Edit(_) => format!("Edit {}", noun),
            ModalMode::Delete(_) => format!("Delete {}", noun),
        }
    }
}

/// Confirmation text for deleting a record shown by `label`.
pub fn delete_message(label: &str) -> String {
    format!("Are you sure you want to delete \"{}\"?", label)
}

/// Counter bumped after any successful mutation so views derived from the
/// stored data (the summary cards) reload.
#[derive(Clone, PartialEq)]
pub struct DataRevision {
    pub value: u32,
    pub bump: Callback<()>,
}

fn notify_changed(revision: &Option<DataRevision>) {
    if let Some(revision) = revision {
        revision.bump.emit(());
    }
}

/// State shared by every list page: modal mode, in-flight flag, mutation error
/// and a counter bumped to trigger a reload.
pub struct CrudHandles<R: 'static> {
    pub mode: UseStateHandle<ModalMode<R>>,
    pub busy: UseStateHandle<bool>,
    pub error: UseStateHandle<Option<String>>,
    pub reload: UseStateHandle<u32>,
    pub revision: Option<DataRevision>,
}

impl<R: 'static> Clone for CrudHandles<R> {
    fn clone(&self) -> Self {
        Self {
            mode: self.mode.clone(),
            busy: self.busy.clone(),
            error: self.error.clone(),
            reload: self.reload.clone(),
            revision: self.revision.clone(),
        }
    }
}

#[hook]
pub fn use_crud<R: 'static>() -> CrudHandles<R> {
    CrudHandles {
        mode: use_state(|| ModalMode::Closed),
        busy: use_state(|| false),
        error: use_state(|| None),
        reload: use_state(|| 0u32),
        revision: use_context::<DataRevision>(),
    }
}

impl<R: Clone + 'static> CrudHandles<R> {
    pub fn opener(&self, make: fn(R) -> ModalMode<R>) -> Callback<R> {
        let mode = self.mode.clone();
        let error = self.error.clone();
        Callback::from(move |record: R| {
            error.set(None);
            mode.set(make(record));
        })
    }

    pub fn open_create(&self) -> Callback<MouseEvent> {
        let mode = self.mode.clone();
        let error = self.error.clone();
        Callback::from(move |_| {
            error.set(None);
            mode.set(ModalMode::Create);
        })
    }

    pub fn close(&self) -> Callback<()> {
        let handles = self.clone();
        Callback::from(move |_| {
            if !*handles.busy {
                handles.mode.set(ModalMode::Closed);
                handles.error.set(None);
            }
        })
    }

    /// Runs one create/update/delete; success closes the modal and reloads the
    /// list, failure keeps the modal open with the server's message.
    pub fn mutate<F>(&self, action: &'static str, request: F)
    where
        F: Future<Output = Result<(), ApiError>> + 'static,
    {
        if *self.busy {
            return;
        }
        self.busy.set(true);
        self.error.set(None);
        let handles = self.clone();
        spawn_local(async move {
            match request.await {
                Ok(()) => {
                    log::info!("{} succeeded", action);
                    handles.mode.set(ModalMode::Closed);
                    handles.reload.set(handles.reload.wrapping_add(1));
                    notify_changed(&handles.revision);
                }
                Err(err) => {
                    log::error!("{} failed: {}", action, err);
                    handles.error.set(Some(err.message));
                }
            }
            handles.busy.set(false);
        });
    }

    /// Rejects a submission before it reaches the network.
    pub fn refuse(&self, message: impl Into<String>) {
        self.error.set(Some(message.into()));
    }
}

pub fn currency_cell<R>(value: &CellValue, _row: &R) -> String {
    match value {
        CellValue::Number(amount) => format_currency(*amount),
        other => other.to_string(),
    }
}

pub fn date_cell<R>(value: &CellValue, _row: &R) -> String {
    display_date(&value.to_string())
}

/// Id-to-name table for joined lookups.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lookup {
    entries: Vec<(String, String)>,
}

pub const UNKNOWN: &str = "Unknown";

impl Lookup {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn name(&self, id: &str) -> String {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, name)| name.clone())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn options(&self) -> Vec<SelectOption> {
        self.entries
            .iter()
            .map(|(id, name)| SelectOption::new(id.clone(), name.clone()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn successful_mutations_bump_the_shared_revision() {
        let bumps = Rc::new(Cell::new(0));
        let revision = DataRevision {
            value: 0,
            bump: {
                let bumps = bumps.clone();
                Callback::from(move |_| bumps.set(bumps.get() + 1))
            },
        };
        notify_changed(&Some(revision));
        assert_eq!(bumps.get(), 1);
        notify_changed(&None);
        assert_eq!(bumps.get(), 1);
    }

    #[test]
    fn titles_follow_the_mode() {
        assert_eq!(ModalMode::<u8>::Create.title("Budget"), "New Budget");
        assert_eq!(ModalMode::Edit(1u8).title("Budget"), "Edit Budget");
        assert_eq!(ModalMode::Delete(1u8).title("Budget"), "Delete Budget");
        assert!(!ModalMode::<u8>::Closed.is_open());
        assert!(ModalMode::Delete(3u8).is_delete());
        assert_eq!(ModalMode::Edit(3u8).record(), Some(&3));
    }

    #[test]
    fn unknown_ids_are_labelled() {
        let lookup = Lookup::new(vec![("t1".to_string(), "Food".to_string())]);
        assert_eq!(lookup.name("t1"), "Food");
        assert_eq!(lookup.name("missing"), UNKNOWN);
        assert_eq!(lookup.options(), vec![SelectOption::new("t1", "Food")]);
    }

    #[test]
    fn cell_formatters() {
        assert_eq!(currency_cell(&CellValue::Number(1500.0), &()), "$1,500.00");
        assert_eq!(currency_cell(&CellValue::Empty, &()), "");
        assert_eq!(date_cell(&CellValue::from("2025-06-02T00:00:00Z"), &()), "02/06/2025");
    }

    #[test]
    fn delete_prompt_quotes_the_label() {
        assert_eq!(delete_message("Rent"), "Are you sure you want to delete \"Rent\"?");
    }
}
