//! Shared fixtures for the Diesel adapter suites.
//!
//! Each suite is its own test crate, so helpers live here and are pulled in
//! with `mod support;`.

pub mod embedded_postgres;

use bazaar::domain::{CategoryDraft, CategoryId, ProductInput};
use bazaar::test_support::product_input;

pub use embedded_postgres::{DieselBackend, diesel_backend};

/// A valid, active category called `name`.
pub fn category_draft(name: &str, parent: Option<CategoryId>) -> CategoryDraft {
    match CategoryDraft::try_new(Some(name.to_owned()), None, None, parent, None) {
        Ok(draft) => draft,
        Err(error) => panic!("invalid category draft {name}: {error:?}"),
    }
}

/// A valid product filed under `category`.
pub fn product_in(name: &str, category: Option<CategoryId>) -> ProductInput {
    ProductInput {
        category_id: category,
        ..product_input(name, "1499")
    }
}

/// Whether `SKIP_TEST_CLUSTER` asks for cluster-backed tests to be skipped.
///
/// Accepts `1`, `true` or `yes`, ignoring case.
fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Turn a cluster setup failure into a skip or a loud failure.
///
/// Returns `None` when skipping is allowed; panics otherwise so broken CI
/// images are not mistaken for passing suites.
#[expect(clippy::print_stderr, reason = "skip marker for the test log")]
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("embedded PostgreSQL setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
