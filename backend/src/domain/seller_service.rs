//! Seller profile use cases: onboarding, discovery, moderation, and removal.

use std::sync::Arc;

use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::geo::within_radius;
use crate::domain::ports::SellerRepository;
use crate::domain::port_errors::duplicate;
use crate::domain::{
    Actor, Error, GeoPoint, NEARBY_RADIUS_KM, NearbySeller, Seller, SellerId, SellerProfileInput,
    SharedClock, UserRole,
};

/// Seller service backed by the seller repository.
#[derive(Clone)]
pub struct SellerService {
    sellers: Arc<dyn SellerRepository>,
    clock: SharedClock,
}

impl SellerService {
    pub fn new(sellers: Arc<dyn SellerRepository>, clock: SharedClock) -> Self {
        Self { sellers, clock }
    }

    /// Create a pending profile for an end user and promote them to seller.
    pub async fn create(&self, actor: &Actor, input: SellerProfileInput) -> Result<Seller, Error> {
        match actor.role {
            UserRole::Admin => {
                return Err(Error::forbidden("administrators cannot open a seller profile"));
            }
            UserRole::Seller => {
                return Err(duplicate("user_id", "user already has a seller profile"));
            }
            UserRole::EndUser => {}
        }
        if self.sellers.find_by_user(&actor.user_id).await?.is_some() {
            return Err(duplicate("user_id", "user already has a seller profile"));
        }

        let profile = input.validate()?;
        let seller = Seller::pending(actor.user_id, profile, self.clock.utc());
        self.sellers.create_and_promote(&seller).await?;
        info!(seller_id = %seller.id, user_id = %actor.user_id, "seller profile created");
        Ok(seller)
    }

    /// Partially update the caller's own profile.
    pub async fn update(&self, actor: &Actor, input: SellerProfileInput) -> Result<Seller, Error> {
        if actor.role != UserRole::Seller {
            return Err(Error::invalid_request("only sellers can update a seller profile"));
        }
        let mut seller = self
            .sellers
            .find_by_user(&actor.user_id)
            .await?
            .ok_or_else(|| Error::not_found("seller profile not found"))?;
        seller.profile = input.apply_to(&seller.profile)?;
        seller.updated_at = self.clock.utc();
        self.sellers.update(&seller).await?;
        Ok(seller)
    }

    /// Approved, active sellers within [`NEARBY_RADIUS_KM`] of `origin`,
    /// nearest first.
    pub async fn nearby(
        &self,
        origin: GeoPoint,
        request: PageRequest,
    ) -> Result<Page<NearbySeller>, Error> {
        let mut candidates = self.sellers.list_discoverable().await?;
        candidates.retain(Seller::is_discoverable);
        candidates.sort_by_key(|seller| seller.id);
        let hits = within_radius(
            &origin,
            candidates.into_iter().map(|seller| {
                let location = seller.profile.location();
                (seller, location)
            }),
            NEARBY_RADIUS_KM,
        );
        let nearby = hits
            .into_iter()
            .map(|(seller, distance_km)| NearbySeller {
                seller,
                distance_km,
            })
            .collect();
        Ok(Page::from_items(nearby, request))
    }

    /// Public profile lookup.
    pub async fn get(&self, id: &SellerId) -> Result<Seller, Error> {
        self.sellers
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("seller not found"))
    }

    /// Resolve which profile a seller or administrator is acting on.
    async fn resolve_target(
        &self,
        actor: &Actor,
        target: Option<SellerId>,
    ) -> Result<Seller, Error> {
        match actor.role {
            UserRole::Admin => {
                let id = target.ok_or_else(|| {
                    Error::invalid_request("seller_id is required").with_details(
                        serde_json::json!({"field": "seller_id", "code": "missing_field"}),
                    )
                })?;
                self.get(&id).await
            }
            UserRole::Seller => {
                let own = self
                    .sellers
                    .find_by_user(&actor.user_id)
                    .await?
                    .ok_or_else(|| Error::not_found("seller profile not found"))?;
                match target {
                    Some(id) if id != own.id => {
                        Err(Error::forbidden("sellers may only manage their own profile"))
                    }
                    _ => Ok(own),
                }
            }
            UserRole::EndUser => Err(Error::forbidden("a seller profile is required")),
        }
    }

    /// Hide a profile from discovery. Idempotent.
    pub async fn deactivate(
        &self,
        actor: &Actor,
        target: Option<SellerId>,
    ) -> Result<Seller, Error> {
        let mut seller = self.resolve_target(actor, target).await?;
        seller.is_active = false;
        seller.updated_at = self.clock.utc();
        self.sellers.update(&seller).await?;
        info!(seller_id = %seller.id, by = %actor.user_id, "seller deactivated");
        Ok(seller)
    }

    /// Remove a profile and its catalogue, demoting the owner to end user.
    pub async fn delete(&self, actor: &Actor, target: Option<SellerId>) -> Result<(), Error> {
        let seller = self.resolve_target(actor, target).await?;
        self.sellers.delete_and_demote(&seller).await?;
        info!(seller_id = %seller.id, by = %actor.user_id, "seller deleted");
        Ok(())
    }

    /// Approve and activate a profile.
    pub async fn approve(&self, actor: &Actor, id: &SellerId) -> Result<Seller, Error> {
        self.moderate(actor, id, true).await
    }

    /// Withdraw approval. The active flag is left untouched.
    pub async fn reject(&self, actor: &Actor, id: &SellerId) -> Result<Seller, Error> {
        self.moderate(actor, id, false).await
    }

    async fn moderate(&self, actor: &Actor, id: &SellerId, approve: bool) -> Result<Seller, Error> {
        actor.require_admin()?;
        let mut seller = self.get(id).await?;
        seller.is_approved = approve;
        if approve {
            seller.is_active = true;
        }
        seller.updated_at = self.clock.utc();
        self.sellers.update(&seller).await?;
        info!(seller_id = %seller.id, approved = approve, by = %actor.user_id, "seller moderated");
        Ok(seller)
    }
}

#[cfg(test)]
#[path = "seller_service_tests.rs"]
mod tests;
