//! Ownership checks shared by the catalogue services.

use crate::domain::ports::SellerRepository;
use crate::domain::{Actor, Error, Seller, SellerId};

/// Resolve the caller's seller profile, or refuse.
pub(crate) async fn require_seller(
    sellers: &dyn SellerRepository,
    actor: &Actor,
) -> Result<Seller, Error> {
    sellers
        .find_by_user(&actor.user_id)
        .await?
        .ok_or_else(|| Error::forbidden("a seller profile is required"))
}

/// Allow administrators and the seller owning `owner`.
pub(crate) async fn require_owner_or_admin(
    sellers: &dyn SellerRepository,
    actor: &Actor,
    owner: &SellerId,
) -> Result<(), Error> {
    if actor.is_admin() {
        return Ok(());
    }
    require_owner(sellers, actor, owner).await
}

/// Allow only the seller owning `owner`.
pub(crate) async fn require_owner(
    sellers: &dyn SellerRepository,
    actor: &Actor,
    owner: &SellerId,
) -> Result<(), Error> {
    match sellers.find_by_user(&actor.user_id).await? {
        Some(seller) if seller.id == *owner => Ok(()),
        _ => Err(Error::forbidden("you do not own this resource")),
    }
}
