//! In-memory implementation of every persistence port.
//!
//! One [`InMemoryStore`] holds all tables so cross-table effects match the
//! PostgreSQL schema: seller deletion cascades to the catalogue, category
//! deletion cascades to subcategories and detaches products.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    CategoryPersistenceError, CategoryRepository, HeroSectionPersistenceError,
    HeroSectionRepository, ProductPersistenceError, ProductRepository, ProductSlice,
    SellerPersistenceError, SellerRepository, TokenBlacklist, TokenBlacklistError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Category, CategoryId, CategoryTree, ContactNumber, EmailAddress, HeroSection, HeroSectionId,
    Product, ProductFilter, ProductId, ProductImage, Seller, SellerId, TokenDigest, User, UserId,
    UserRole, sort_hero_sections,
};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    sellers: HashMap<SellerId, Seller>,
    categories: HashMap<CategoryId, Category>,
    products: HashMap<ProductId, Product>,
    images: Vec<ProductImage>,
    hero_sections: HashMap<HeroSectionId, HeroSection>,
    revoked: HashMap<String, DateTime<Utc>>,
    unavailable: bool,
}

impl Tables {
    fn drop_products(&mut self, doomed: &HashSet<ProductId>) {
        self.products.retain(|id, _| !doomed.contains(id));
        self.images.retain(|image| !doomed.contains(&image.product_id));
        self.hero_sections
            .retain(|_, section| !doomed.contains(&section.product_id));
    }
}

/// Shared in-memory tables implementing the repository ports.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

const UNAVAILABLE: &str = "store marked unavailable";

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a connection error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Seed a user directly, bypassing uniqueness checks.
    pub fn put_user(&self, user: User) {
        self.lock().users.insert(user.id, user);
    }

    /// Snapshot of a stored user.
    #[must_use]
    pub fn user(&self, id: &UserId) -> Option<User> {
        self.lock().users.get(id).cloned()
    }

    /// Seed a seller directly.
    pub fn put_seller(&self, seller: Seller) {
        self.lock().sellers.insert(seller.id, seller);
    }

    /// Number of revoked tokens recorded.
    #[must_use]
    pub fn revoked_count(&self) -> usize {
        self.lock().revoked.len()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        match self.tables.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn available<E>(
        &self,
        connection: impl FnOnce(&'static str) -> E,
    ) -> Result<MutexGuard<'_, Tables>, E> {
        let tables = self.lock();
        if tables.unavailable {
            return Err(connection(UNAVAILABLE));
        }
        Ok(tables)
    }
}

fn user_conflict(tables: &Tables, user: &User) -> Option<&'static str> {
    tables.users.values().filter(|other| other.id != user.id).find_map(|other| {
        if other.email == user.email {
            Some("email")
        } else if other.contact_number == user.contact_number {
            Some("contact_number")
        } else {
            None
        }
    })
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.available(UserPersistenceError::connection)?;
        if let Some(field) = user_conflict(&tables, user) {
            return Err(UserPersistenceError::duplicate(field));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.available(UserPersistenceError::connection)?;
        if let Some(field) = user_conflict(&tables, user) {
            return Err(UserPersistenceError::duplicate(field));
        }
        match tables.users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(UserPersistenceError::query("user not found")),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.available(UserPersistenceError::connection)?;
        Ok(tables.users.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.available(UserPersistenceError::connection)?;
        Ok(tables.users.values().find(|u| u.email == *email).cloned())
    }

    async fn find_by_contact_number(
        &self,
        number: &ContactNumber,
    ) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.available(UserPersistenceError::connection)?;
        Ok(tables
            .users
            .values()
            .find(|u| u.contact_number == *number)
            .cloned())
    }
}

#[async_trait]
impl SellerRepository for InMemoryStore {
    async fn create_and_promote(&self, seller: &Seller) -> Result<(), SellerPersistenceError> {
        let mut tables = self.available(SellerPersistenceError::connection)?;
        if tables.sellers.values().any(|s| s.user_id == seller.user_id) {
            return Err(SellerPersistenceError::duplicate(seller.user_id.to_string()));
        }
        let Some(owner) = tables.users.get_mut(&seller.user_id) else {
            return Err(SellerPersistenceError::query("owning user not found"));
        };
        owner.role = UserRole::Seller;
        tables.sellers.insert(seller.id, seller.clone());
        Ok(())
    }

    async fn update(&self, seller: &Seller) -> Result<(), SellerPersistenceError> {
        let mut tables = self.available(SellerPersistenceError::connection)?;
        match tables.sellers.get_mut(&seller.id) {
            Some(stored) => {
                *stored = seller.clone();
                Ok(())
            }
            None => Err(SellerPersistenceError::query("seller not found")),
        }
    }

    async fn find_by_id(&self, id: &SellerId) -> Result<Option<Seller>, SellerPersistenceError> {
        let tables = self.available(SellerPersistenceError::connection)?;
        Ok(tables.sellers.get(id).cloned())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Seller>, SellerPersistenceError> {
        let tables = self.available(SellerPersistenceError::connection)?;
        Ok(tables
            .sellers
            .values()
            .find(|s| s.user_id == *user_id)
            .cloned())
    }

    async fn list_discoverable(&self) -> Result<Vec<Seller>, SellerPersistenceError> {
        let tables = self.available(SellerPersistenceError::connection)?;
        Ok(tables
            .sellers
            .values()
            .filter(|s| s.is_discoverable() && s.profile.location().is_some())
            .cloned()
            .collect())
    }

    async fn delete_and_demote(&self, seller: &Seller) -> Result<(), SellerPersistenceError> {
        let mut tables = self.available(SellerPersistenceError::connection)?;
        if tables.sellers.remove(&seller.id).is_none() {
            return Err(SellerPersistenceError::query("seller not found"));
        }
        tables.categories.retain(|_, c| c.seller_id != seller.id);
        let doomed: HashSet<ProductId> = tables
            .products
            .values()
            .filter(|p| p.seller_id == seller.id)
            .map(|p| p.id)
            .collect();
        tables.drop_products(&doomed);
        tables.hero_sections.retain(|_, h| h.seller_id != seller.id);
        if let Some(owner) = tables.users.get_mut(&seller.user_id)
            && owner.role == UserRole::Seller
        {
            owner.role = UserRole::EndUser;
        }
        Ok(())
    }
}

fn name_conflict(tables: &Tables, category: &Category) -> bool {
    tables
        .categories
        .values()
        .any(|c| c.id != category.id && c.seller_id == category.seller_id && c.name == category.name)
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn insert(&self, category: &Category) -> Result<(), CategoryPersistenceError> {
        let mut tables = self.available(CategoryPersistenceError::connection)?;
        if name_conflict(&tables, category) {
            return Err(CategoryPersistenceError::duplicate(category.name.clone()));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn update(&self, category: &Category) -> Result<(), CategoryPersistenceError> {
        let mut tables = self.available(CategoryPersistenceError::connection)?;
        if name_conflict(&tables, category) {
            return Err(CategoryPersistenceError::duplicate(category.name.clone()));
        }
        match tables.categories.get_mut(&category.id) {
            Some(stored) => {
                *stored = category.clone();
                Ok(())
            }
            None => Err(CategoryPersistenceError::query("category not found")),
        }
    }

    async fn find_by_id(
        &self,
        id: &CategoryId,
    ) -> Result<Option<Category>, CategoryPersistenceError> {
        let tables = self.available(CategoryPersistenceError::connection)?;
        Ok(tables.categories.get(id).cloned())
    }

    async fn list_for_seller(
        &self,
        seller_id: &SellerId,
    ) -> Result<Vec<Category>, CategoryPersistenceError> {
        let tables = self.available(CategoryPersistenceError::connection)?;
        Ok(tables
            .categories
            .values()
            .filter(|c| c.seller_id == *seller_id)
            .cloned()
            .collect())
    }

    async fn name_taken(
        &self,
        seller_id: &SellerId,
        name: &str,
        except: Option<CategoryId>,
    ) -> Result<bool, CategoryPersistenceError> {
        let tables = self.available(CategoryPersistenceError::connection)?;
        Ok(tables
            .categories
            .values()
            .any(|c| c.seller_id == *seller_id && c.name == name && Some(c.id) != except))
    }

    async fn delete(&self, id: &CategoryId) -> Result<(), CategoryPersistenceError> {
        let mut tables = self.available(CategoryPersistenceError::connection)?;
        let Some(seller_id) = tables.categories.get(id).map(|c| c.seller_id) else {
            return Ok(());
        };
        let tree = CategoryTree::new(
            tables
                .categories
                .values()
                .filter(|c| c.seller_id == seller_id)
                .cloned()
                .collect(),
        );
        let mut doomed = tree.descendants(*id);
        doomed.insert(*id);
        tables.categories.retain(|cid, _| !doomed.contains(cid));
        for product in tables.products.values_mut() {
            if product.category_id.is_some_and(|cid| doomed.contains(&cid)) {
                product.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn insert(&self, product: &Product) -> Result<(), ProductPersistenceError> {
        let mut tables = self.available(ProductPersistenceError::connection)?;
        tables.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<(), ProductPersistenceError> {
        let mut tables = self.available(ProductPersistenceError::connection)?;
        match tables.products.get_mut(&product.id) {
            Some(stored) => {
                *stored = product.clone();
                Ok(())
            }
            None => Err(ProductPersistenceError::query("product not found")),
        }
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductPersistenceError> {
        let tables = self.available(ProductPersistenceError::connection)?;
        Ok(tables.products.get(id).cloned())
    }

    async fn list_active(
        &self,
        filter: &ProductFilter,
        offset: u64,
        limit: u32,
    ) -> Result<ProductSlice, ProductPersistenceError> {
        let tables = self.available(ProductPersistenceError::connection)?;
        let mut matching: Vec<Product> = tables
            .products
            .values()
            .filter(|p| p.is_active)
            .filter(|p| filter.seller_id.is_none_or(|s| p.seller_id == s))
            .filter(|p| filter.category_id.is_none_or(|c| p.category_id == Some(c)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(limit as usize)
            .collect();
        Ok(ProductSlice { items, total })
    }

    async fn delete(&self, id: &ProductId) -> Result<(), ProductPersistenceError> {
        let mut tables = self.available(ProductPersistenceError::connection)?;
        tables.drop_products(&HashSet::from([*id]));
        Ok(())
    }

    async fn add_image(&self, image: &ProductImage) -> Result<(), ProductPersistenceError> {
        let mut tables = self.available(ProductPersistenceError::connection)?;
        if !tables.products.contains_key(&image.product_id) {
            return Err(ProductPersistenceError::query("product not found"));
        }
        tables.images.push(image.clone());
        Ok(())
    }

    async fn list_images(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<ProductImage>, ProductPersistenceError> {
        let tables = self.available(ProductPersistenceError::connection)?;
        Ok(tables
            .images
            .iter()
            .filter(|image| image.product_id == *product_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl HeroSectionRepository for InMemoryStore {
    async fn insert(&self, section: &HeroSection) -> Result<(), HeroSectionPersistenceError> {
        let mut tables = self.available(HeroSectionPersistenceError::connection)?;
        tables.hero_sections.insert(section.id, section.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &HeroSectionId,
    ) -> Result<Option<HeroSection>, HeroSectionPersistenceError> {
        let tables = self.available(HeroSectionPersistenceError::connection)?;
        Ok(tables.hero_sections.get(id).cloned())
    }

    async fn list(
        &self,
        seller_id: Option<SellerId>,
    ) -> Result<Vec<HeroSection>, HeroSectionPersistenceError> {
        let tables = self.available(HeroSectionPersistenceError::connection)?;
        let mut sections: Vec<HeroSection> = tables
            .hero_sections
            .values()
            .filter(|h| seller_id.is_none_or(|s| h.seller_id == s))
            .cloned()
            .collect();
        sort_hero_sections(&mut sections);
        Ok(sections)
    }

    async fn delete(&self, id: &HeroSectionId) -> Result<(), HeroSectionPersistenceError> {
        let mut tables = self.available(HeroSectionPersistenceError::connection)?;
        tables.hero_sections.remove(id);
        Ok(())
    }
}

#[async_trait]
impl TokenBlacklist for InMemoryStore {
    async fn revoke(
        &self,
        digest: &TokenDigest,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), TokenBlacklistError> {
        let mut tables = self.available(TokenBlacklistError::connection)?;
        tables
            .revoked
            .entry(digest.as_str().to_owned())
            .or_insert(revoked_at);
        Ok(())
    }

    async fn is_revoked(&self, digest: &TokenDigest) -> Result<bool, TokenBlacklistError> {
        let tables = self.available(TokenBlacklistError::connection)?;
        Ok(tables.revoked.contains_key(digest.as_str()))
    }
}
