//! Internal Diesel row structs and their conversions.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Rows read back from the database are
//! revalidated through the domain constructors; a failure means the stored
//! data is corrupt and surfaces as a query error.

use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Category, CategoryId, ContactNumber, EmailAddress, HeroSection, HeroSectionId, ImageRef,
    Money, PasswordDigest, PersonName, Product, ProductId, ProductImage, ProductImageId, Seller,
    SellerCategory, SellerId, SellerProfile, User, UserId, UserRole,
};

use super::schema::{
    blacklisted_tokens, categories, hero_sections, product_images, products, sellers, users,
};

fn corrupt(table: &str, column: &str, detail: impl std::fmt::Display) -> String {
    format!("corrupt {table}.{column}: {detail}")
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            first_name: user.first_name.clone().into(),
            last_name: user.last_name.clone().into(),
            email: user.email.clone().into(),
            contact_number: user.contact_number.clone().into(),
            password_hash: user.password.as_str().to_owned(),
            role: user.role.as_str().to_owned(),
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            first_name: PersonName::new(&row.first_name)
                .map_err(|e| corrupt("users", "first_name", e))?,
            last_name: PersonName::new(&row.last_name)
                .map_err(|e| corrupt("users", "last_name", e))?,
            email: EmailAddress::new(&row.email).map_err(|e| corrupt("users", "email", e))?,
            contact_number: ContactNumber::new(&row.contact_number)
                .map_err(|e| corrupt("users", "contact_number", e))?,
            password: PasswordDigest::new(row.password_hash),
            role: UserRole::from_str(&row.role).map_err(|e| corrupt("users", "role", e))?,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = sellers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct SellerRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_name: String,
    pub business_address: String,
    pub business_contact_number: String,
    pub business_email: Option<String>,
    pub seller_category: String,
    pub seller_exclusives: String,
    pub is_seller_exclusives: bool,
    pub shop_description: Option<String>,
    pub shop_timing_open: NaiveTime,
    pub shop_timing_close: NaiveTime,
    pub shop_location: String,
    pub geo_location_lat: Option<f64>,
    pub geo_location_lng: Option<f64>,
    pub shop_photo: Option<String>,
    pub days_closed: String,
    pub gst_number: String,
    pub is_approved: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Seller> for SellerRow {
    fn from(seller: &Seller) -> Self {
        let profile = &seller.profile;
        Self {
            id: *seller.id.as_uuid(),
            user_id: *seller.user_id.as_uuid(),
            business_name: profile.business_name.clone(),
            business_address: profile.business_address.clone(),
            business_contact_number: profile.business_contact_number.clone().into(),
            business_email: profile.business_email.clone().map(String::from),
            seller_category: profile.seller_category.as_str().to_owned(),
            seller_exclusives: profile.seller_exclusives.clone(),
            is_seller_exclusives: seller.is_seller_exclusives,
            shop_description: profile.shop_description.clone(),
            shop_timing_open: profile.shop_timing_open,
            shop_timing_close: profile.shop_timing_close,
            shop_location: profile.shop_location.clone(),
            geo_location_lat: profile.geo_location_lat,
            geo_location_lng: profile.geo_location_lng,
            shop_photo: profile.shop_photo.as_ref().map(|p| p.as_str().to_owned()),
            days_closed: profile.days_closed.clone(),
            gst_number: profile.gst_number.clone(),
            is_approved: seller.is_approved,
            is_active: seller.is_active,
            created_at: seller.created_at,
            updated_at: seller.updated_at,
        }
    }
}

impl TryFrom<SellerRow> for Seller {
    type Error = String;

    fn try_from(row: SellerRow) -> Result<Self, Self::Error> {
        let business_email = row
            .business_email
            .map(|email| EmailAddress::new(email).map_err(|e| corrupt("sellers", "business_email", e)))
            .transpose()?;
        let profile = SellerProfile {
            business_name: row.business_name,
            business_address: row.business_address,
            business_contact_number: ContactNumber::new(&row.business_contact_number)
                .map_err(|e| corrupt("sellers", "business_contact_number", e))?,
            business_email,
            seller_category: SellerCategory::from_str(&row.seller_category)
                .map_err(|e| corrupt("sellers", "seller_category", e))?,
            seller_exclusives: row.seller_exclusives,
            shop_description: row.shop_description,
            shop_timing_open: row.shop_timing_open,
            shop_timing_close: row.shop_timing_close,
            shop_location: row.shop_location,
            geo_location_lat: row.geo_location_lat,
            geo_location_lng: row.geo_location_lng,
            shop_photo: row.shop_photo.map(ImageRef::from_stored),
            days_closed: row.days_closed,
            gst_number: row.gst_number,
        };
        Ok(Self {
            id: SellerId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            profile,
            is_seller_exclusives: row.is_seller_exclusives,
            is_approved: row.is_approved,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CategoryRow {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub parent_category_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Category> for CategoryRow {
    fn from(category: &Category) -> Self {
        Self {
            id: *category.id.as_uuid(),
            seller_id: *category.seller_id.as_uuid(),
            parent_category_id: category.parent_id.map(|id| *id.as_uuid()),
            name: category.name.clone(),
            description: category.description.clone(),
            image: category.image.as_ref().map(|i| i.as_str().to_owned()),
            is_active: category.is_active,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::from_uuid(row.id),
            seller_id: SellerId::from_uuid(row.seller_id),
            name: row.name,
            description: row.description,
            image: row.image.map(ImageRef::from_stored),
            parent_id: row.parent_category_id.map(CategoryId::from_uuid),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProductRow {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub title: String,
    pub description: String,
    pub price_minor: i64,
    pub discounted_price_minor: i64,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub banner_image: String,
    pub exclusives: String,
    pub default_category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: *product.id.as_uuid(),
            seller_id: *product.seller_id.as_uuid(),
            category_id: product.category_id.map(|id| *id.as_uuid()),
            name: product.name.clone(),
            title: product.title.clone(),
            description: product.description.clone(),
            price_minor: product.price.minor(),
            discounted_price_minor: product.discounted_price.minor(),
            stock_quantity: i32::try_from(product.stock_quantity).unwrap_or(i32::MAX),
            is_active: product.is_active,
            banner_image: product.banner_image.as_str().to_owned(),
            exclusives: product.exclusives.clone(),
            default_category: product.default_category.as_str().to_owned(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = String;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProductId::from_uuid(row.id),
            seller_id: SellerId::from_uuid(row.seller_id),
            category_id: row.category_id.map(CategoryId::from_uuid),
            name: row.name,
            title: row.title,
            description: row.description,
            price: Money::from_minor(row.price_minor)
                .map_err(|e| corrupt("products", "price_minor", e))?,
            discounted_price: Money::from_minor(row.discounted_price_minor)
                .map_err(|e| corrupt("products", "discounted_price_minor", e))?,
            stock_quantity: u32::try_from(row.stock_quantity)
                .map_err(|e| corrupt("products", "stock_quantity", e))?,
            is_active: row.is_active,
            banner_image: ImageRef::from_stored(row.banner_image),
            exclusives: row.exclusives,
            default_category: SellerCategory::from_str(&row.default_category)
                .map_err(|e| corrupt("products", "default_category", e))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = product_images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductImageRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl From<&ProductImage> for ProductImageRow {
    fn from(image: &ProductImage) -> Self {
        Self {
            id: *image.id.as_uuid(),
            product_id: *image.product_id.as_uuid(),
            image: image.image.as_str().to_owned(),
            created_at: image.created_at,
        }
    }
}

impl From<ProductImageRow> for ProductImage {
    fn from(row: ProductImageRow) -> Self {
        Self {
            id: ProductImageId::from_uuid(row.id),
            product_id: ProductId::from_uuid(row.product_id),
            image: ImageRef::from_stored(row.image),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = hero_sections)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HeroSectionRow {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub section_name: String,
    pub priority: i32,
    pub banner_image: String,
}

impl From<&HeroSection> for HeroSectionRow {
    fn from(section: &HeroSection) -> Self {
        Self {
            id: *section.id.as_uuid(),
            seller_id: *section.seller_id.as_uuid(),
            product_id: *section.product_id.as_uuid(),
            name: section.name.clone(),
            section_name: section.section_name.clone(),
            priority: section.priority,
            banner_image: section.banner_image.as_str().to_owned(),
        }
    }
}

impl From<HeroSectionRow> for HeroSection {
    fn from(row: HeroSectionRow) -> Self {
        Self {
            id: HeroSectionId::from_uuid(row.id),
            seller_id: SellerId::from_uuid(row.seller_id),
            product_id: ProductId::from_uuid(row.product_id),
            name: row.name,
            section_name: row.section_name,
            priority: row.priority,
            banner_image: ImageRef::from_stored(row.banner_image),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = blacklisted_tokens)]
pub(crate) struct NewBlacklistedTokenRow<'a> {
    pub token_digest: &'a str,
    pub blacklisted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn row() -> ProductRow {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().expect("valid time");
        ProductRow {
            id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            category_id: None,
            name: "Lamp".to_owned(),
            title: "Desk lamp".to_owned(),
            description: "Brass".to_owned(),
            price_minor: 1_000,
            discounted_price_minor: 900,
            stock_quantity: 3,
            is_active: true,
            banner_image: "https://cdn.example/lamp.jpg".to_owned(),
            exclusives: "None".to_owned(),
            default_category: "electronic".to_owned(),
            created_at: at,
            updated_at: at,
        }
    }

    #[rstest]
    fn product_rows_convert_to_domain() {
        let product = Product::try_from(row()).expect("valid row");
        assert_eq!(product.price.minor(), 1_000);
        assert_eq!(product.default_category, SellerCategory::Electronic);
        assert_eq!(ProductRow::from(&product).discounted_price_minor, 900);
    }

    #[rstest]
    #[case::negative_stock(ProductRow { stock_quantity: -1, ..row() }, "stock_quantity")]
    #[case::negative_price(ProductRow { price_minor: -5, ..row() }, "price_minor")]
    #[case::unknown_category(ProductRow { default_category: "toys".to_owned(), ..row() }, "default_category")]
    fn corrupt_product_rows_are_reported(#[case] row: ProductRow, #[case] column: &str) {
        let err = Product::try_from(row).expect_err("corrupt row");
        assert!(err.contains(column), "{err}");
    }

    #[rstest]
    fn unknown_roles_are_corrupt() {
        let at = Utc::now();
        let row = UserRow {
            id: Uuid::new_v4(),
            first_name: "Asha".to_owned(),
            last_name: "Rao".to_owned(),
            email: "asha@example.com".to_owned(),
            contact_number: "9876543210".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            role: "superuser".to_owned(),
            is_active: true,
            created_at: at,
            updated_at: at,
        };
        assert!(User::try_from(row).expect_err("bad role").contains("users.role"));
    }
}
