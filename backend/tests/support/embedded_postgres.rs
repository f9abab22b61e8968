//! Migrated throwaway databases on a shared embedded PostgreSQL cluster.
//!
//! The first suite to ask for a database creates a template with every
//! migration applied; each test then gets a fresh clone of it. The template
//! name carries a hash of `migrations/` so schema edits never reuse a stale
//! template.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use bazaar::domain::{
    AccountPorts, AccountService, Actor, CatalogueService, HeroSectionService, ProductService,
    SellerService, SharedClock, TokenLifetimes, User, UserRole,
};
use bazaar::outbound::persistence::{
    DbPool, DieselCategoryRepository, DieselHeroSectionRepository, DieselProductRepository,
    DieselSellerRepository, DieselTokenBlacklist, DieselUserRepository, PoolConfig,
    run_pending_migrations,
};
use bazaar::outbound::security::JwtTokenCodec;
use bazaar::test_support::{
    MutableClock, PlainTextHasher, TEST_JWT_SECRET, actor_for, moderator, seller_profile_input,
    signup_request, start_of_tests,
};
use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::handle_cluster_setup_failure;

const TEMPLATE_PREFIX: &str = "bazaar_template";
const SETUP_ATTEMPTS: usize = 5;
const SETUP_RETRY_DELAY: Duration = Duration::from_millis(500);

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn retry<T>(what: &str, mut attempt_once: impl FnMut() -> Result<T, String>) -> Result<T, String> {
    let mut last_error = String::new();
    for attempt in 1..=SETUP_ATTEMPTS {
        match attempt_once() {
            Ok(value) => return Ok(value),
            Err(error) => last_error = format!("{what}: attempt {attempt}/{SETUP_ATTEMPTS}: {error}"),
        }
        if attempt < SETUP_ATTEMPTS {
            std::thread::sleep(SETUP_RETRY_DELAY);
        }
    }
    Err(last_error)
}

fn cluster() -> Result<&'static ClusterHandle, String> {
    retry("start shared cluster", || {
        shared_cluster_handle().map_err(|error| format!("{error:?}"))
    })
}

fn template_name() -> Result<String, String> {
    let migrations = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(migrations).map_err(|error| format!("hash migrations: {error}"))?;
    let short = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_PREFIX}_{short}"))
}

/// Create the migrated template once per cluster and return its name.
fn ensure_template(cluster: &ClusterHandle) -> Result<String, String> {
    let name = template_name()?;
    let _guard = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let exists = cluster
        .database_exists(name.as_str())
        .map_err(|error| format!("template lookup: {error:?}"))?;
    if !exists {
        cluster
            .create_database(name.as_str())
            .map_err(|error| format!("create template: {error:?}"))?;
        let url = cluster.connection().database_url(&name);
        run_pending_migrations(&url).map_err(|error| format!("migrate template: {error}"))?;
    }
    Ok(name)
}

fn provision_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    retry("provision database", || {
        let template = ensure_template(cluster)?;
        let name = format!("test_{}", Uuid::new_v4().simple());
        cluster
            .temporary_database_from_template(name.as_str(), template.as_str())
            .map_err(|error| format!("clone template: {error:?}"))
    })
}

/// Services wired to Diesel adapters over one freshly migrated database.
///
/// Passwords use the plain-text test hasher so suites stay fast; everything
/// else is the production adapter.
pub struct DieselBackend {
    /// Runtime driving every async call in a suite.
    pub runtime: Runtime,
    pub clock: Arc<MutableClock>,
    pub blacklist: DieselTokenBlacklist,
    pub accounts: AccountService,
    pub sellers: SellerService,
    pub seller_repository: DieselSellerRepository,
    pub catalogue: CatalogueService,
    pub products: ProductService,
    pub hero_sections: HeroSectionService,
    _database: TemporaryDatabase,
}

impl DieselBackend {
    fn connect() -> Result<Self, String> {
        let runtime = Runtime::new().map_err(|error| error.to_string())?;
        let database = provision_database(cluster()?)?;
        let config = PoolConfig::new(database.url())
            .with_max_size(2)
            .with_min_idle(Some(1));
        let pool = runtime
            .block_on(DbPool::new(config))
            .map_err(|error| error.to_string())?;
        let codec = JwtTokenCodec::new(&Zeroizing::new(TEST_JWT_SECRET.to_owned()))
            .map_err(|error| error.to_string())?;

        let clock = Arc::new(MutableClock::new(start_of_tests()));
        let shared_clock: SharedClock = clock.clone();
        let users = Arc::new(DieselUserRepository::new(pool.clone()));
        let sellers = Arc::new(DieselSellerRepository::new(pool.clone()));
        let categories = Arc::new(DieselCategoryRepository::new(pool.clone()));
        let products = Arc::new(DieselProductRepository::new(pool.clone()));
        let sections = Arc::new(DieselHeroSectionRepository::new(pool.clone()));
        let blacklist = DieselTokenBlacklist::new(pool.clone());

        let accounts = AccountService::new(
            AccountPorts {
                users,
                blacklist: Arc::new(blacklist.clone()),
                hasher: Arc::new(PlainTextHasher),
                tokens: Arc::new(codec),
            },
            shared_clock.clone(),
            TokenLifetimes::default(),
        );

        Ok(Self {
            runtime,
            clock,
            blacklist,
            accounts,
            sellers: SellerService::new(sellers.clone(), shared_clock.clone()),
            seller_repository: DieselSellerRepository::new(pool),
            catalogue: CatalogueService::new(
                categories.clone(),
                sellers.clone(),
                shared_clock.clone(),
            ),
            products: ProductService::new(products.clone(), categories, sellers.clone(), shared_clock),
            hero_sections: HeroSectionService::new(sections, products, sellers),
            _database: database,
        })
    }

    /// Sign up an end user.
    pub fn register(&self, first_name: &str, contact_number: &str) -> User {
        let signup = self
            .runtime
            .block_on(self.accounts.signup(signup_request(first_name, contact_number)));
        match signup {
            Ok(user) => user,
            Err(error) => panic!("signup against PostgreSQL failed: {error:?}"),
        }
    }

    /// Sign up a user, open a shop for them and approve it.
    pub fn register_seller(&self, first_name: &str, contact_number: &str) -> (User, Actor) {
        let user = self.register(first_name, contact_number);
        let shop = format!("{first_name}'s Shop");
        let approved = self.runtime.block_on(async {
            let pending = self
                .sellers
                .create(&actor_for(&user), seller_profile_input(&shop, 12.9716, 77.5946))
                .await?;
            self.sellers.approve(&moderator(), &pending.id).await
        });
        if let Err(error) = approved {
            panic!("opening {shop} failed: {error:?}");
        }
        let actor = Actor {
            user_id: user.id,
            role: UserRole::Seller,
        };
        (user, actor)
    }
}

/// Fixture body shared by every suite: a backend, or `None` when the cluster
/// is unavailable and skipping was requested.
pub fn diesel_backend() -> Option<DieselBackend> {
    match DieselBackend::connect() {
        Ok(backend) => Some(backend),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
