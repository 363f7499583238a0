use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{CartItem, NewCartItem};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub email: String,
    pub menu_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    #[schema(value_type = String)]
    pub price: Decimal,
}

impl From<AddToCartRequest> for NewCartItem {
    fn from(req: AddToCartRequest) -> Self {
        NewCartItem {
            email: req.email,
            menu_id: req.menu_id,
            name: req.name,
            image: req.image,
            price: req.price,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartQuery {
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CartList {
    #[schema(value_type = Vec<CartItem>)]
    pub items: Vec<CartItem>,
}
