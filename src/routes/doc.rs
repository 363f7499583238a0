use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{TokenRequest, TokenResponse},
        cart::{AddToCartRequest, CartList},
        menu::{CreateMenuItemRequest, MenuList, ReviewList, UpdateMenuItemRequest},
        payments::{
            CreateIntentRequest, CreateIntentResponse, FinalizePaymentRequest,
            FinalizePaymentResponse, PaymentList, PaymentRecordResult,
        },
        users::{AdminStatus, CreateUserRequest, UserList},
    },
    models::{
        CartItem, DeleteResult, InsertResult, MenuItem, Payment, Review, Role, UpdateResult, User,
    },
    response::{ApiResponse, Meta},
    routes::{auth, cart, health, menu, payments, reviews, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        health::health_check,
        auth::create_token,
        users::list_users,
        users::create_user,
        users::delete_user,
        users::make_admin,
        users::admin_status,
        menu::list_menu,
        menu::create_menu_item,
        menu::delete_menu_item,
        menu::get_menu_item,
        menu::update_menu_item,
        reviews::list_reviews,
        cart::cart_list,
        cart::add_to_cart,
        cart::remove_from_cart,
        payments::create_payment_intent,
        payments::finalize_payment,
        payments::payment_history
    ),
    components(
        schemas(
            User,
            Role,
            MenuItem,
            Review,
            CartItem,
            Payment,
            InsertResult,
            UpdateResult,
            DeleteResult,
            TokenRequest,
            TokenResponse,
            CreateUserRequest,
            UserList,
            AdminStatus,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            MenuList,
            ReviewList,
            AddToCartRequest,
            CartList,
            CreateIntentRequest,
            CreateIntentResponse,
            FinalizePaymentRequest,
            FinalizePaymentResponse,
            PaymentRecordResult,
            PaymentList,
            health::HealthData,
            Meta,
            ApiResponse<MenuItem>,
            ApiResponse<MenuList>,
            ApiResponse<UserList>,
            ApiResponse<PaymentList>,
            ApiResponse<FinalizePaymentResponse>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and health endpoints"),
        (name = "Auth", description = "Credential issuance"),
        (name = "Users", description = "User endpoints"),
        (name = "Menu", description = "Menu endpoints"),
        (name = "Reviews", description = "Review endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Payments", description = "Payment endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
