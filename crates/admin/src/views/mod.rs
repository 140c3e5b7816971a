//! Headless view state.
//!
//! Each type here is the state behind one piece of the console: a list, the
//! dual-list assignment editor, a create/edit dialog, a delete confirmation
//! and the login form. Only [`LoginForm::submit`] talks to the network;
//! front-ends drive the rest with method calls and render whatever their
//! accessors report.

pub mod assignment;
pub mod delete;
pub mod dialog;
pub mod filter;
pub mod list;
pub mod login;

pub use assignment::{AssignmentEditor, Pane, Transfer};
pub use delete::DeleteConfirmation;
pub use dialog::{ChannelDraft, Draft, FormDialog, FormMode, UserDraft, ValidationError};
pub use filter::filter;
pub use list::{EntityList, ListState};
pub use login::LoginForm;
