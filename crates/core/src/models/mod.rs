//! Persisted records shared by every store.
//!
//! JSON field names are camelCase so records written by earlier versions of
//! the storefront keep loading.

pub mod cart;
pub mod customer;
pub mod order;
pub mod product;
pub mod session;

pub use cart::CartLine;
pub use customer::Customer;
pub use order::{NewOrder, Order};
pub use product::{Product, ProductDraft};
pub use session::AdminSession;
