pub mod account;
pub mod listing;
pub mod review;
pub mod token;
pub mod user;

use bazaar_identity::extract::Identity;

use crate::domain::types::Caller;

pub(crate) fn caller_of(identity: Identity) -> Caller {
    Caller {
        user_id: identity.user_id,
        role: identity.role,
    }
}
