//! Products, their gallery images, and promotional hero sections.

use chrono::{DateTime, Utc};

use crate::domain::validation::{FieldError, FieldErrorCode, required_text};
use crate::domain::{
    CategoryId, HeroSectionId, ImageRef, Money, ProductId, ProductImageId, SellerCategory,
    SellerId,
};

const NAME_MAX: usize = 255;
const SECTION_TEXT_MAX: usize = 100;

/// A product listed by a seller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub seller_id: SellerId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub title: String,
    pub description: String,
    pub price: Money,
    pub discounted_price: Money,
    pub stock_quantity: u32,
    pub is_active: bool,
    pub banner_image: ImageRef,
    pub exclusives: String,
    pub default_category: SellerCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reject a discounted price above the list price.
pub fn ensure_discount_within_price(price: Money, discounted: Money) -> Result<(), FieldError> {
    if discounted > price {
        return Err(FieldError::new(
            "discounted_price",
            FieldErrorCode::DiscountExceedsPrice,
            "discounted_price must not exceed price",
        ));
    }
    Ok(())
}

/// Raw product fields. Creation requires the core fields; updates merge
/// over the stored product first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductInput {
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub discounted_price: Option<Money>,
    pub stock_quantity: Option<u32>,
    pub is_active: Option<bool>,
    pub banner_image: Option<String>,
    pub exclusives: Option<String>,
    pub category_id: Option<CategoryId>,
    pub default_category: Option<SellerCategory>,
}

/// Validated product fields, independent of identity and ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetails {
    pub name: String,
    pub title: String,
    pub description: String,
    pub price: Money,
    pub discounted_price: Money,
    pub stock_quantity: u32,
    pub is_active: bool,
    pub banner_image: ImageRef,
    pub exclusives: String,
    pub category_id: Option<CategoryId>,
    pub default_category: Option<SellerCategory>,
}

impl ProductInput {
    /// Validate a complete set of fields.
    ///
    /// A missing `discounted_price` defaults to `price`.
    pub fn validate(self) -> Result<ProductDetails, FieldError> {
        let price = self.price.ok_or_else(|| FieldError::missing("price"))?;
        let discounted_price = self.discounted_price.unwrap_or(price);
        ensure_discount_within_price(price, discounted_price)?;
        Ok(ProductDetails {
            name: required_text("name", self.name, NAME_MAX)?,
            title: required_text("title", self.title, NAME_MAX)?,
            description: required_text("description", self.description, NAME_MAX)?,
            price,
            discounted_price,
            stock_quantity: self.stock_quantity.unwrap_or(0),
            is_active: self.is_active.unwrap_or(true),
            banner_image: ImageRef::parse("banner_image", self.banner_image)?,
            exclusives: required_text("exclusives", self.exclusives, NAME_MAX)?,
            category_id: self.category_id,
            default_category: self.default_category,
        })
    }

    /// Merge over an existing product and revalidate, including the
    /// discount rule against the merged prices.
    pub fn apply_to(self, current: &Product) -> Result<ProductDetails, FieldError> {
        Self {
            name: self.name.or_else(|| Some(current.name.clone())),
            title: self.title.or_else(|| Some(current.title.clone())),
            description: self.description.or_else(|| Some(current.description.clone())),
            price: self.price.or(Some(current.price)),
            discounted_price: self.discounted_price.or(Some(current.discounted_price)),
            stock_quantity: self.stock_quantity.or(Some(current.stock_quantity)),
            is_active: self.is_active.or(Some(current.is_active)),
            banner_image: self
                .banner_image
                .or_else(|| Some(current.banner_image.as_str().to_owned())),
            exclusives: self.exclusives.or_else(|| Some(current.exclusives.clone())),
            category_id: self.category_id.or(current.category_id),
            default_category: self.default_category.or(Some(current.default_category)),
        }
        .validate()
    }
}

impl ProductDetails {
    /// Write validated fields onto `product`.
    pub fn write_to(self, product: &mut Product, now: DateTime<Utc>) {
        product.name = self.name;
        product.title = self.title;
        product.description = self.description;
        product.price = self.price;
        product.discounted_price = self.discounted_price;
        product.stock_quantity = self.stock_quantity;
        product.is_active = self.is_active;
        product.banner_image = self.banner_image;
        product.exclusives = self.exclusives;
        product.category_id = self.category_id;
        if let Some(category) = self.default_category {
            product.default_category = category;
        }
        product.updated_at = now;
    }
}

/// Filter for the public product listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub seller_id: Option<SellerId>,
    pub category_id: Option<CategoryId>,
}

/// An additional product photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub product_id: ProductId,
    pub image: ImageRef,
    pub created_at: DateTime<Utc>,
}

/// A product together with its gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductWithImages {
    pub product: Product,
    pub images: Vec<ProductImage>,
}

/// Promotional banner featuring one of a seller's products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroSection {
    pub id: HeroSectionId,
    pub seller_id: SellerId,
    pub product_id: ProductId,
    pub name: String,
    pub section_name: String,
    pub priority: i32,
    pub banner_image: ImageRef,
}

/// Validated hero section fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroSectionDraft {
    pub product_id: ProductId,
    pub name: String,
    pub section_name: String,
    pub priority: i32,
    pub banner_image: ImageRef,
}

impl HeroSectionDraft {
    pub fn try_new(
        product_id: Option<ProductId>,
        name: Option<String>,
        section_name: Option<String>,
        priority: Option<i32>,
        banner_image: Option<String>,
    ) -> Result<Self, FieldError> {
        use crate::domain::validation::optional_text;

        Ok(Self {
            product_id: product_id.ok_or_else(|| FieldError::missing("product_id"))?,
            name: optional_text("name", name, SECTION_TEXT_MAX)?.unwrap_or_default(),
            section_name: optional_text("section_name", section_name, SECTION_TEXT_MAX)?
                .unwrap_or_default(),
            priority: priority.ok_or_else(|| FieldError::missing("priority"))?,
            banner_image: ImageRef::parse("banner_image", banner_image)?,
        })
    }
}

/// Order hero sections by ascending priority, then name.
pub fn sort_hero_sections(sections: &mut [HeroSection]) {
    sections.sort_by(|a, b| (a.priority, a.name.as_str()).cmp(&(b.priority, b.name.as_str())));
}
