use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{MenuItem, MenuItemPatch, NewMenuItem, Review};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMenuItemRequest {
    pub name: String,
    pub recipe: String,
    pub image: Option<String>,
    pub category: String,
    #[schema(value_type = String)]
    pub price: Decimal,
}

impl From<CreateMenuItemRequest> for NewMenuItem {
    fn from(req: CreateMenuItemRequest) -> Self {
        NewMenuItem {
            name: req.name,
            recipe: req.recipe,
            image: req.image,
            category: req.category,
            price: req.price,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub recipe: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
}

impl From<UpdateMenuItemRequest> for MenuItemPatch {
    fn from(req: UpdateMenuItemRequest) -> Self {
        MenuItemPatch {
            name: req.name,
            recipe: req.recipe,
            image: req.image,
            category: req.category,
            price: req.price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct MenuList {
    #[schema(value_type = Vec<MenuItem>)]
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ReviewList {
    #[schema(value_type = Vec<Review>)]
    pub items: Vec<Review>,
}
