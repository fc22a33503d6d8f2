pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod order;

pub use accounts::Accounts;
pub use cart::CartService;
pub use catalog::Catalog;
pub use checkout::Checkout;
pub use order::OrderService;
