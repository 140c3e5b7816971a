//! The `Entity` trait shared by every record the console manages.

use std::borrow::Cow;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

/// A record with a stable id and a searchable display label.
///
/// List filtering, the assignment panes and the generic management screen
/// only need these two facts about a record.
pub trait Entity {
    /// Identifier type of the record.
    type Id: Copy + Ord + Hash + Debug + Display + FromStr + Send + Sync + 'static;

    /// Singular noun used in messages (`"channel"`, `"user"`).
    const KIND: &'static str;

    /// The record's identifier.
    fn id(&self) -> Self::Id;

    /// The text shown in tables and matched by search.
    fn label(&self) -> Cow<'_, str>;
}
