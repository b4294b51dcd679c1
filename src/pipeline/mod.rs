//! Record submission pipeline: selector modal, per-kind forms, outcome
//! notifications. Everything here is driven through an explicit `Session`.

pub mod form;
pub mod modal;
pub mod notify;
pub mod schema;
pub mod session;

pub use form::{error_messages, RecordForm, SubmitOutcome};
pub use modal::{record_type_options, ModalState, ModalView, RecordModal, RecordTypeOption};
pub use notify::{Notification, NotificationLog, NotificationSink, Variant};
pub use session::{CurrentUser, Session};
