//! Fully wired services over the in-memory store.
//!
//! Service tests and HTTP suites share this harness so both exercise the
//! same rules with the same fixtures.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use zeroize::Zeroizing;

use crate::domain::{
    AccountPorts, AccountService, Actor, CatalogueService, ContactNumber, EmailAddress, Error,
    HeroSectionService, LoginCredentials, LoginOutcome, Money, NewAccount, Password, PersonName,
    ProductInput, ProductService, Seller, SellerProfileInput, SellerService, SharedClock,
    TokenLifetimes, User, UserId, UserRole,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::security::JwtTokenCodec;

use super::{InMemoryStore, MutableClock, PlainTextHasher};

/// Signing secret used by every test codec.
pub const TEST_JWT_SECRET: &str = "bazaar-test-signing-secret-0123456789";

/// Password given to every account created through the harness.
pub const TEST_PASSWORD: &str = "open sesame";

fn ok<T>(result: Result<T, Error>, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(error) => panic!("{what} failed: {error:?}"),
    }
}

fn valid<T, E: std::fmt::Debug>(result: Result<T, E>, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(error) => panic!("invalid fixture {what}: {error:?}"),
    }
}

/// Instant every harness clock starts at.
#[must_use]
pub fn start_of_tests() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).single() {
        Some(instant) => instant,
        None => panic!("fixed test instant is ambiguous"),
    }
}

/// Registration details for `first_name`, emailed at
/// `<first_name>@example.com`.
#[must_use]
pub fn signup_request(first_name: &str, contact_number: &str) -> NewAccount {
    NewAccount {
        first_name: valid(PersonName::new(first_name), "first name"),
        last_name: valid(PersonName::new("Tester"), "last name"),
        email: valid(
            EmailAddress::new(format!("{}@example.com", first_name.to_lowercase())),
            "email",
        ),
        contact_number: valid(ContactNumber::new(contact_number), "contact number"),
        password: valid(Password::new(TEST_PASSWORD), "password"),
    }
}

/// A complete shop profile located at `(lat, lng)`.
#[must_use]
pub fn seller_profile_input(business_name: &str, lat: f64, lng: f64) -> SellerProfileInput {
    SellerProfileInput {
        business_name: Some(business_name.to_owned()),
        business_address: Some("12 MG Road, Bengaluru".to_owned()),
        business_contact_number: Some("08041234567".to_owned()),
        shop_timing_open: Some("09:30".to_owned()),
        shop_timing_close: Some("21:00".to_owned()),
        shop_location: Some("MG Road".to_owned()),
        geo_location_lat: Some(lat),
        geo_location_lng: Some(lng),
        ..SellerProfileInput::default()
    }
}

/// A complete product priced at `price` with no discount.
#[must_use]
pub fn product_input(name: &str, price: &str) -> ProductInput {
    ProductInput {
        name: Some(name.to_owned()),
        title: Some(format!("{name} (listing)")),
        description: Some(format!("A fine {name}")),
        price: Some(valid(Money::parse(price), "price")),
        banner_image: Some(format!("https://cdn.example/{}.jpg", name.to_lowercase())),
        exclusives: Some("None".to_owned()),
        ..ProductInput::default()
    }
}

/// Services wired to one shared [`InMemoryStore`] and [`MutableClock`].
pub struct TestBackend {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MutableClock>,
    pub accounts: AccountService,
    pub sellers: SellerService,
    pub catalogue: CatalogueService,
    pub products: ProductService,
    pub hero_sections: HeroSectionService,
}

impl Default for TestBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::with_lifetimes(TokenLifetimes::default())
    }

    #[must_use]
    pub fn with_lifetimes(lifetimes: TokenLifetimes) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(MutableClock::new(start_of_tests()));
        let shared_clock: SharedClock = clock.clone();
        let codec = valid(
            JwtTokenCodec::new(&Zeroizing::new(TEST_JWT_SECRET.to_owned())),
            "jwt secret",
        );

        let accounts = AccountService::new(
            AccountPorts {
                users: store.clone(),
                blacklist: store.clone(),
                hasher: Arc::new(PlainTextHasher),
                tokens: Arc::new(codec),
            },
            shared_clock.clone(),
            lifetimes,
        );
        let sellers = SellerService::new(store.clone(), shared_clock.clone());
        let catalogue = CatalogueService::new(store.clone(), store.clone(), shared_clock.clone());
        let products =
            ProductService::new(store.clone(), store.clone(), store.clone(), shared_clock);
        let hero_sections = HeroSectionService::new(store.clone(), store.clone(), store.clone());

        Self {
            store,
            clock,
            accounts,
            sellers,
            catalogue,
            products,
            hero_sections,
        }
    }

    /// HTTP state backed by these services.
    #[must_use]
    pub fn http_state(&self) -> HttpState {
        HttpState {
            accounts: self.accounts.clone(),
            sellers: self.sellers.clone(),
            catalogue: self.catalogue.clone(),
            products: self.products.clone(),
            hero_sections: self.hero_sections.clone(),
        }
    }

    /// Register an end user and return it with its actor.
    pub async fn register(&self, first_name: &str, contact_number: &str) -> (User, Actor) {
        let user = ok(
            self.accounts
                .signup(signup_request(first_name, contact_number))
                .await,
            "signup",
        );
        let actor = actor_for(&user);
        (user, actor)
    }

    /// Register an administrator.
    pub async fn register_admin(&self, first_name: &str, contact_number: &str) -> (User, Actor) {
        let user = ok(
            self.accounts
                .create_admin(signup_request(first_name, contact_number))
                .await,
            "admin registration",
        );
        let actor = actor_for(&user);
        (user, actor)
    }

    /// Register a user, open a shop at `(lat, lng)`, and approve it.
    pub async fn register_seller(
        &self,
        first_name: &str,
        contact_number: &str,
        lat: f64,
        lng: f64,
    ) -> (Actor, Seller) {
        let (user, actor) = self.register(first_name, contact_number).await;
        let pending = ok(
            self.sellers
                .create(&actor, seller_profile_input(&format!("{first_name}'s Shop"), lat, lng))
                .await,
            "seller creation",
        );
        let seller = ok(
            self.sellers.approve(&moderator(), &pending.id).await,
            "seller approval",
        );
        let actor = Actor {
            user_id: user.id,
            role: UserRole::Seller,
        };
        (actor, seller)
    }

    /// Log in with [`TEST_PASSWORD`].
    pub async fn login(&self, identifier: &str) -> LoginOutcome {
        let credentials = valid(
            LoginCredentials::try_from_parts(identifier, TEST_PASSWORD),
            "credentials",
        );
        ok(self.accounts.login(&credentials).await, "login")
    }
}

/// Actor for a stored user, using its current role.
#[must_use]
pub fn actor_for(user: &User) -> Actor {
    Actor {
        user_id: user.id,
        role: user.role,
    }
}

/// An administrator actor not backed by a stored user.
#[must_use]
pub fn moderator() -> Actor {
    Actor {
        user_id: UserId::random(),
        role: UserRole::Admin,
    }
}
