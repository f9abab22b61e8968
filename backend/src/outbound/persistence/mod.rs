//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel rows and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are never exposed to the domain layer.
//! - **Strongly typed errors**: Pool and Diesel failures are classified once
//!   (`diesel_error_mapping.rs`) and mapped onto each port's error type.
//!
//! # Example
//!
//! ```ignore
//! use bazaar::outbound::persistence::{DbPool, PoolConfig, DieselUserRepository};
//!
//! let config = PoolConfig::new("postgres://localhost/bazaar");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

pub(crate) mod diesel_error_mapping;
mod diesel_category_repository;
mod diesel_hero_section_repository;
mod diesel_product_repository;
mod diesel_seller_repository;
mod diesel_token_blacklist;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_hero_section_repository::DieselHeroSectionRepository;
pub use diesel_product_repository::DieselProductRepository;
pub use diesel_seller_repository::DieselSellerRepository;
pub use diesel_token_blacklist::DieselTokenBlacklist;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
