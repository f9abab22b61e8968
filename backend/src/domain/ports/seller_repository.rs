//! Port for seller profile persistence.
//!
//! Creating and deleting a profile also changes the owner's role, so both
//! operations are single units of work in the adapter.
use async_trait::async_trait;

use crate::domain::{Seller, SellerId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by seller repository adapters.
    pub enum SellerPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "seller repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "seller repository query failed: {message}",
        /// The user already owns a seller profile.
        Duplicate { user_id: String } => "user {user_id} already has a seller profile",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SellerRepository: Send + Sync {
    /// Insert `seller` and promote its owner to the seller role atomically.
    async fn create_and_promote(&self, seller: &Seller) -> Result<(), SellerPersistenceError>;

    /// Overwrite the mutable columns of an existing profile.
    async fn update(&self, seller: &Seller) -> Result<(), SellerPersistenceError>;

    async fn find_by_id(&self, id: &SellerId) -> Result<Option<Seller>, SellerPersistenceError>;

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Seller>, SellerPersistenceError>;

    /// Approved, active sellers that have both coordinates.
    async fn list_discoverable(&self) -> Result<Vec<Seller>, SellerPersistenceError>;

    /// Delete `seller` (cascading to its catalogue) and demote its owner to
    /// an end user atomically.
    async fn delete_and_demote(&self, seller: &Seller) -> Result<(), SellerPersistenceError>;
}
