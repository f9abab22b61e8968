//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`.
//! Foreign keys carry the cascade rules the repositories rely on: deleting a
//! seller removes its catalogue, deleting a category removes its subtree and
//! nulls `products.category_id`.

diesel::table! {
    /// Registered accounts. `email` and `contact_number` are unique.
    users (id) {
        id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        email -> Varchar,
        contact_number -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Varchar,
        /// One of `admin`, `seller`, `end_user`.
        role -> Varchar,
        is_active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Seller profiles, one per user.
    sellers (id) {
        id -> Uuid,
        user_id -> Uuid,
        business_name -> Varchar,
        business_address -> Text,
        business_contact_number -> Varchar,
        business_email -> Nullable<Varchar>,
        seller_category -> Varchar,
        seller_exclusives -> Text,
        is_seller_exclusives -> Bool,
        shop_description -> Nullable<Text>,
        shop_timing_open -> Time,
        shop_timing_close -> Time,
        shop_location -> Text,
        geo_location_lat -> Nullable<Float8>,
        geo_location_lng -> Nullable<Float8>,
        shop_photo -> Nullable<Text>,
        days_closed -> Varchar,
        gst_number -> Varchar,
        is_approved -> Bool,
        is_active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Seller-owned category tree. `(seller_id, name)` is unique.
    categories (id) {
        id -> Uuid,
        seller_id -> Uuid,
        parent_category_id -> Nullable<Uuid>,
        name -> Varchar,
        description -> Nullable<Text>,
        image -> Nullable<Text>,
        is_active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Products; prices are stored in minor units.
    products (id) {
        id -> Uuid,
        seller_id -> Uuid,
        category_id -> Nullable<Uuid>,
        name -> Varchar,
        title -> Varchar,
        description -> Text,
        price_minor -> Int8,
        discounted_price_minor -> Int8,
        stock_quantity -> Int4,
        is_active -> Bool,
        banner_image -> Text,
        exclusives -> Text,
        default_category -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    product_images (id) {
        id -> Uuid,
        product_id -> Uuid,
        image -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    hero_sections (id) {
        id -> Uuid,
        seller_id -> Uuid,
        product_id -> Uuid,
        name -> Varchar,
        section_name -> Varchar,
        priority -> Int4,
        banner_image -> Text,
    }
}

diesel::table! {
    /// Revoked bearer tokens keyed by SHA-256 hex digest.
    blacklisted_tokens (token_digest) {
        token_digest -> Varchar,
        blacklisted_at -> Timestamptz,
    }
}

diesel::joinable!(sellers -> users (user_id));
diesel::joinable!(categories -> sellers (seller_id));
diesel::joinable!(products -> sellers (seller_id));
diesel::joinable!(products -> categories (category_id));
diesel::joinable!(product_images -> products (product_id));
diesel::joinable!(hero_sections -> products (product_id));
diesel::joinable!(hero_sections -> sellers (seller_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    sellers,
    categories,
    products,
    product_images,
    hero_sections,
    blacklisted_tokens,
);
