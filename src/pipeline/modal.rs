//! The "add record" dialog: pick a kind, continue into that kind's form,
//! go back, submit, or dismiss.
//!
//! ```text
//! Closed --open--> Selecting --continue--> FormOpen
//!   ^                 ^  |                    |  |
//!   |                 |  +----dismiss---------+  |
//!   +-----------------+-------back-----------+   |
//!   +<---------------- form success -------------+
//! ```

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::gateway::RecordStore;
use crate::i18n::Localize;
use crate::models::record::RecordKind;
use crate::pipeline::form::{RecordForm, SubmitOutcome};
use crate::pipeline::notify::NotificationSink;
use crate::pipeline::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalState {
    Closed,
    Selecting,
    FormOpen,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordTypeOption {
    pub value: RecordKind,
    pub label: String,
}

/// Selector options with their display labels. Kinds without a translation
/// fall back to fixed English labels.
pub fn record_type_options<L: Localize + ?Sized>(localizer: &L) -> Vec<RecordTypeOption> {
    RecordKind::ALL
        .into_iter()
        .map(|kind| RecordTypeOption {
            value: kind,
            label: localizer
                .lookup(kind.label_key())
                .unwrap_or_else(|| kind.fallback_label().to_string()),
        })
        .collect()
}

/// What the page should render for the current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModalView {
    pub state: ModalState,
    pub title: String,
    /// Only shown while selecting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub options: Vec<RecordTypeOption>,
    pub selected: Option<RecordKind>,
    pub continue_enabled: bool,
    pub back_visible: bool,
    /// Kind of the mounted form, if any.
    pub form: Option<RecordKind>,
}

pub struct RecordModal<C: FnMut()> {
    open: bool,
    selected: Option<RecordKind>,
    show_form: bool,
    form: Option<RecordForm>,
    on_close: C,
}

impl<C: FnMut()> RecordModal<C> {
    /// `on_close` is the external close notification.
    pub fn new(on_close: C) -> Self {
        Self {
            open: false,
            selected: None,
            show_form: false,
            form: None,
            on_close,
        }
    }

    pub fn state(&self) -> ModalState {
        if !self.open {
            ModalState::Closed
        } else if self.show_form {
            ModalState::FormOpen
        } else {
            ModalState::Selecting
        }
    }

    pub fn selected(&self) -> Option<RecordKind> {
        self.selected
    }

    pub fn form(&self) -> Option<&RecordForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut RecordForm> {
        self.form.as_mut()
    }

    pub fn open(&mut self) {
        self.reset();
        self.open = true;
    }

    /// Choose a kind. Only meaningful while selecting; never mounts a form.
    pub fn select(&mut self, kind: RecordKind) -> bool {
        if self.state() != ModalState::Selecting {
            return false;
        }
        self.selected = Some(kind);
        self.show_form = false;
        self.form = None;
        true
    }

    pub fn can_continue(&self) -> bool {
        self.state() == ModalState::Selecting && self.selected.is_some()
    }

    /// Mount the form for the selected kind. No-op without a selection.
    pub fn continue_to_form(&mut self, now: DateTime<FixedOffset>) -> bool {
        let Some(kind) = self.selected.filter(|_| self.can_continue()) else {
            return false;
        };
        self.form = Some(RecordForm::new(kind, now));
        self.show_form = true;
        true
    }

    /// Unmount the form but keep the selection highlighted.
    pub fn back(&mut self) -> bool {
        if self.state() != ModalState::FormOpen {
            return false;
        }
        self.show_form = false;
        self.form = None;
        true
    }

    /// Submit the mounted form. On success the modal resets and closes.
    /// Returns `None` when no form is mounted.
    pub async fn submit<S, N, L>(
        &mut self,
        session: &Session,
        store: &S,
        notifier: &N,
        localizer: &L,
    ) -> Option<SubmitOutcome>
    where
        S: RecordStore,
        N: NotificationSink + ?Sized,
        L: Localize + ?Sized,
    {
        let form = self.form.as_mut()?;
        let mut succeeded = false;
        let outcome = form
            .submit(session, store, notifier, localizer, || succeeded = true)
            .await;
        if succeeded {
            self.close();
        }
        Some(outcome)
    }

    /// Outer dismissal (overlay click, close button, escape).
    pub fn dismiss(&mut self) {
        if self.state() != ModalState::Closed {
            self.close();
        }
    }

    pub fn view<L: Localize + ?Sized>(&self, localizer: &L) -> Option<ModalView> {
        let state = self.state();
        if state == ModalState::Closed {
            return None;
        }
        let options = record_type_options(localizer);

        let (title, description) = match state {
            ModalState::FormOpen => {
                let label = options
                    .iter()
                    .find(|o| Some(o.value) == self.selected)
                    .map(|o| o.label.as_str())
                    .unwrap_or_default();
                (format!("{} - {}", localizer.t("addRecordModal.title"), label), None)
            }
            _ => (
                localizer.t("addRecordModal.selectTitle"),
                Some(localizer.t("addRecordModal.selectDescription")),
            ),
        };

        Some(ModalView {
            state,
            title,
            description,
            options,
            selected: self.selected,
            continue_enabled: self.can_continue(),
            back_visible: state == ModalState::FormOpen,
            form: self.form.as_ref().map(RecordForm::kind),
        })
    }

    fn reset(&mut self) {
        self.show_form = false;
        self.selected = None;
        self.form = None;
    }

    fn close(&mut self) {
        self.reset();
        self.open = false;
        (self.on_close)();
    }
}
