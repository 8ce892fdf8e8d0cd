//! Rate-admin capability and the single-owner authorizer.

use crate::error::AuthError;
use crate::traits::Authorizer;
use crate::types::HolderId;

/// Proof that a caller passed an [`Authorizer`] check for rate changes.
///
/// Holding one of these is the only way to call the ledger's rate setter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateAdmin {
    caller: HolderId,
}

impl RateAdmin {
    /// Mint a capability for `caller`. Intended for [`Authorizer`] implementations.
    pub fn attest(caller: HolderId) -> Self {
        Self { caller }
    }

    /// The identity the capability was issued to.
    pub fn caller(&self) -> &HolderId {
        &self.caller
    }
}

/// Authorizes exactly one owner identity.
#[derive(Debug, Clone)]
pub struct OwnerAuthorizer {
    owner: HolderId,
}

impl OwnerAuthorizer {
    pub fn new(owner: HolderId) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> &HolderId {
        &self.owner
    }
}

impl Authorizer for OwnerAuthorizer {
    fn authorize_rate_admin(&self, caller: &HolderId) -> Result<RateAdmin, AuthError> {
        if *caller == self.owner {
            Ok(RateAdmin::attest(*caller))
        } else {
            Err(AuthError::Unauthorized(*caller))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_authorized() {
        let owner = HolderId([1; 20]);
        let auth = OwnerAuthorizer::new(owner);
        let cap = auth.authorize_rate_admin(&owner).unwrap();
        assert_eq!(cap.caller(), &owner);
    }

    #[test]
    fn stranger_is_rejected() {
        let auth = OwnerAuthorizer::new(HolderId([1; 20]));
        let stranger = HolderId([2; 20]);
        assert_eq!(
            auth.authorize_rate_admin(&stranger),
            Err(AuthError::Unauthorized(stranger))
        );
    }

    #[test]
    fn authorizer_is_object_safe() {
        let auth = OwnerAuthorizer::new(HolderId::ZERO);
        let dyn_auth: &dyn Authorizer = &auth;
        assert!(dyn_auth.authorize_rate_admin(&HolderId::ZERO).is_ok());
    }
}
