//! Driven ports: the persistence and security seams services depend on.

mod macros;
pub(crate) use macros::define_port_error;

mod category_repository;
mod hero_section_repository;
mod password_hasher;
mod product_repository;
mod seller_repository;
mod token_blacklist;
mod token_codec;
mod user_repository;

#[cfg(test)]
pub use category_repository::MockCategoryRepository;
pub use category_repository::{CategoryPersistenceError, CategoryRepository};
#[cfg(test)]
pub use hero_section_repository::MockHeroSectionRepository;
pub use hero_section_repository::{HeroSectionPersistenceError, HeroSectionRepository};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{ProductPersistenceError, ProductRepository, ProductSlice};
#[cfg(test)]
pub use seller_repository::MockSellerRepository;
pub use seller_repository::{SellerPersistenceError, SellerRepository};
#[cfg(test)]
pub use token_blacklist::MockTokenBlacklist;
pub use token_blacklist::{TokenBlacklist, TokenBlacklistError};
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenCodecError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
