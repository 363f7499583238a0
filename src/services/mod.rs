pub mod cart_service;
pub mod menu_service;
pub mod money;
pub mod payment_service;
pub mod token_service;
pub mod user_service;
