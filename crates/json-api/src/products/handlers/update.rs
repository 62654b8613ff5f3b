//! Update Product Handler

use std::{str::FromStr, sync::Arc};

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{
    money::Price,
    products::models::{ProductUpdate, UnitOfMeasure},
};

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

/// Update Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProductRequest {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Price in minor currency units, must be positive
    pub price: u64,
    /// Unit of measurement: `piece`, `kilogram`, or `litre`
    pub unit: String,
    #[serde(default)]
    pub photo: Option<String>,
}

impl UpdateProductRequest {
    fn into_update(self) -> Result<ProductUpdate, StatusError> {
        let price = Price::from_minor(self.price)
            .map_err(|_| StatusError::bad_request().brief("Price must be positive"))?;

        let unit = UnitOfMeasure::from_str(&self.unit)
            .map_err(|_| StatusError::bad_request().brief("Unknown unit of measure"))?;

        Ok(ProductUpdate {
            name: self.name,
            category: self.category,
            description: self.description,
            price,
            unit,
            photo: self.photo,
        })
    }
}

/// Update Product Handler
#[endpoint(
    tags("products"),
    summary = "Update Product",
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<UpdateProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let update = json.into_inner().into_update()?;

    let product = state
        .app
        .products
        .update_product(uuid.into_inner().into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::products::{
        MockProductsService, ProductsServiceError, models::ProductUuid,
    };

    use crate::test_helpers::{make_product, products_service};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        products_service(products, Router::with_path("products/{uuid}").put(handler))
    }

    fn request_body() -> serde_json::Value {
        json!({
            "name": "Rose bouquet",
            "category": "bouquets",
            "price": 175_000,
            "unit": "piece",
        })
    }

    #[tokio::test]
    async fn test_update_product_returns_200() -> TestResult {
        let uuid = ProductUuid::new();

        let mut updated = make_product(uuid, 175_000);
        updated.name = "Rose bouquet".to_string();

        let mut products = MockProductsService::new();

        products
            .expect_update_product()
            .once()
            .withf(move |requested, update| {
                *requested == uuid && update.price.minor_units() == 175_000
            })
            .return_once(move |_, _| Ok(updated));

        let mut res = TestClient::put(format!("http://example.com/products/{uuid}"))
            .json(&request_body())
            .send(&make_service(products))
            .await;

        let body: ProductResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.price, 175_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_404() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_update_product()
            .once()
            .return_once(|_, _| Err(ProductsServiceError::NotFound));

        let res = TestClient::put(format!(
            "http://example.com/products/{}",
            ProductUuid::new()
        ))
        .json(&request_body())
        .send(&make_service(products))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_zero_price_returns_400_without_calling_service() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_update_product().never();

        let mut body = request_body();
        body["price"] = json!(0);

        let res = TestClient::put(format!(
            "http://example.com/products/{}",
            ProductUuid::new()
        ))
        .json(&body)
        .send(&make_service(products))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
