//! Management screens.
//!
//! One generic [`ManagementScreen`] serves both channels and users; the
//! [`ManagedEntity`] impls below are all that differs between them.

mod management;

pub use management::ManagementScreen;

use ptt_admin_core::{Channel, Entity, User};

use crate::api::Resource;
use crate::views::{ChannelDraft, Draft, UserDraft};

/// A record with its own management screen.
pub trait ManagedEntity: Resource + Clone {
    /// The other side of the many-to-many relation, shown in the
    /// assignment editor.
    type Related: Resource + Clone;

    /// Form fields for this record.
    type Draft: Draft<
            Record = Self,
            RelatedId = <Self::Related as Entity>::Id,
            Payload = <Self as Resource>::Payload,
        >;
}

impl ManagedEntity for Channel {
    type Related = User;
    type Draft = ChannelDraft;
}

impl ManagedEntity for User {
    type Related = Channel;
    type Draft = UserDraft;
}

/// Screen managing channels and their authorized users.
pub type ChannelScreen = ManagementScreen<Channel>;

/// Screen managing users and their channels.
pub type UserScreen = ManagementScreen<User>;
