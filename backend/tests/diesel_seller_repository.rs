//! `DieselSellerRepository` against embedded PostgreSQL.
//!
//! Opening a shop and closing it both touch two tables; these tests check
//! that the role change and the profile row move together, and that the
//! catalogue goes with the profile.
//!
//! Run with `cargo test -- --ignored`; the first run downloads PostgreSQL.

use bazaar::domain::ports::{SellerPersistenceError, SellerRepository};
use bazaar::domain::{ErrorCode, HeroSectionDraft, Seller, UserRole};
use bazaar::test_support::start_of_tests;
use rstest::{fixture, rstest};

mod support;

use support::DieselBackend;

#[fixture]
fn backend() -> Option<DieselBackend> {
    support::diesel_backend()
}

#[rstest]
#[ignore = "needs embedded PostgreSQL; run with --ignored"]
fn opening_a_shop_promotes_the_owner(backend: Option<DieselBackend>) {
    let Some(backend) = backend else {
        eprintln!("SKIP-TEST-CLUSTER: opening_a_shop_promotes_the_owner skipped");
        return;
    };
    let (user, actor) = backend.register_seller("Ada", "9000000001");

    let (stored_user, shop) = backend.runtime.block_on(async {
        let stored_user = backend
            .accounts
            .current_user(&actor)
            .await
            .expect("user lookup");
        let shop = backend
            .seller_repository
            .find_by_user(&user.id)
            .await
            .expect("seller lookup");
        (stored_user, shop)
    });

    assert_eq!(stored_user.role, UserRole::Seller);
    let shop = shop.expect("profile stored");
    assert!(shop.is_approved);
    assert!(shop.is_active);
    assert_eq!(shop.profile.business_name, "Ada's Shop");
}

#[rstest]
#[ignore = "needs embedded PostgreSQL; run with --ignored"]
fn a_second_profile_for_the_same_user_is_a_duplicate(backend: Option<DieselBackend>) {
    let Some(backend) = backend else {
        eprintln!("SKIP-TEST-CLUSTER: a_second_profile_for_the_same_user_is_a_duplicate skipped");
        return;
    };
    let (user, _) = backend.register_seller("Ada", "9000000001");
    let existing = backend
        .runtime
        .block_on(backend.seller_repository.find_by_user(&user.id))
        .expect("seller lookup")
        .expect("profile stored");
    let second = Seller::pending(user.id, existing.profile.clone(), start_of_tests());

    let error = backend
        .runtime
        .block_on(backend.seller_repository.create_and_promote(&second))
        .expect_err("unique user_id");

    assert!(
        matches!(error, SellerPersistenceError::Duplicate { .. }),
        "expected duplicate, got {error:?}"
    );
    let still_there = backend
        .runtime
        .block_on(backend.seller_repository.find_by_user(&user.id))
        .expect("seller lookup")
        .expect("original profile survives");
    assert_eq!(still_there.id, existing.id);
}

#[rstest]
#[ignore = "needs embedded PostgreSQL; run with --ignored"]
fn closing_a_shop_demotes_the_owner_and_drops_its_catalogue(backend: Option<DieselBackend>) {
    let Some(backend) = backend else {
        eprintln!(
            "SKIP-TEST-CLUSTER: closing_a_shop_demotes_the_owner_and_drops_its_catalogue skipped"
        );
        return;
    };
    let (user, actor) = backend.register_seller("Ada", "9000000001");

    backend.runtime.block_on(async {
        let chairs = backend
            .catalogue
            .create(&actor, support::category_draft("Chairs", None))
            .await
            .expect("category created");
        let armchair = backend
            .products
            .create(&actor, support::product_in("Armchair", Some(chairs.id)))
            .await
            .expect("product created");
        backend
            .hero_sections
            .create(
                &actor,
                HeroSectionDraft::try_new(
                    Some(armchair.id),
                    Some("Monsoon sale".to_owned()),
                    Some("Featured".to_owned()),
                    Some(1),
                    Some("https://cdn.example/monsoon.jpg".to_owned()),
                )
                .expect("valid hero section"),
            )
            .await
            .expect("hero section created");

        backend
            .sellers
            .delete(&actor, None)
            .await
            .expect("seller deleted");

        let owner = backend
            .accounts
            .current_user(&actor)
            .await
            .expect("user survives");
        assert_eq!(owner.role, UserRole::EndUser);
        assert!(
            backend
                .seller_repository
                .find_by_user(&user.id)
                .await
                .expect("seller lookup")
                .is_none()
        );
        let missing = backend
            .products
            .get(&armchair.id)
            .await
            .expect_err("product removed with the shop");
        assert_eq!(missing.code(), ErrorCode::NotFound);
        let banners = backend
            .hero_sections
            .list(None)
            .await
            .expect("hero sections listed");
        assert!(banners.is_empty());
    });
}
