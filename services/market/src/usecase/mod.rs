pub mod account;
pub mod listing;
pub mod review;
pub mod token;
pub mod user;

use bazaar_domain::policy::Access;

use crate::error::MarketServiceError;

/// Map a policy verdict onto the service error space.
pub(crate) fn ensure(access: Access) -> Result<(), MarketServiceError> {
    match access {
        Access::Granted => Ok(()),
        Access::Unauthenticated => Err(MarketServiceError::Unauthenticated),
        Access::Forbidden => Err(MarketServiceError::Forbidden),
    }
}
