pub mod cart_items;
pub mod menu_items;
pub mod payments;
pub mod reviews;
pub mod users;

pub use cart_items::Entity as CartItems;
pub use menu_items::Entity as MenuItems;
pub use payments::Entity as Payments;
pub use reviews::Entity as Reviews;
pub use users::Entity as Users;
