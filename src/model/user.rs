use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::database::Record;

/// The identity handed to us by the session provider.
///
/// Users are not stored by this service; comments keep a copy of this snippet so they can be rendered without a join.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, new)]
pub struct User {
    pub id: Record<User>,
    pub email: String,
}

crate::define_table!("users" : User);

impl User {
    /// The part of the email before the `@`, used as a display name.
    pub fn handle(&self) -> &str {
        self.email
            .split_once('@')
            .map_or(self.email.as_str(), |(handle, _)| handle)
    }
}
