//! Product Models

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{domain::money::Price, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product Model
#[derive(Debug, Clone)]
pub struct Product {
    pub uuid: ProductUuid,
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: Price,
    pub unit: UnitOfMeasure,
    pub photo: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: Price,
    pub unit: UnitOfMeasure,
    pub photo: Option<String>,
}

/// Product Update Model
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: Price,
    pub unit: UnitOfMeasure,
    pub photo: Option<String>,
}

/// Result of a batch catalog lookup. Uuids that resolved are in `found`;
/// every uuid with no live product is reported in `missing`.
#[derive(Debug, Clone, Default)]
pub struct CatalogLookup {
    pub found: Vec<Product>,
    pub missing: Vec<ProductUuid>,
}

/// Unit of measurement for a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitOfMeasure {
    Piece,
    Kilogram,
    Litre,
}

impl UnitOfMeasure {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Piece => "piece",
            Self::Kilogram => "kilogram",
            Self::Litre => "litre",
        }
    }

    /// The measure code the acquiring gateway expects on receipt items.
    #[must_use]
    pub const fn measure_code(self) -> &'static str {
        match self {
            Self::Piece => "pcs",
            Self::Kilogram => "kg",
            Self::Litre => "l",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown unit of measure")]
pub struct ParseUnitOfMeasureError;

impl FromStr for UnitOfMeasure {
    type Err = ParseUnitOfMeasureError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "piece" => Ok(Self::Piece),
            "kilogram" => Ok(Self::Kilogram),
            "litre" => Ok(Self::Litre),
            _ => Err(ParseUnitOfMeasureError),
        }
    }
}
