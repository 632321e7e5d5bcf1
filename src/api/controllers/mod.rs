//! Controllers: route lists and the handlers behind them.
//!
//! Each controller owns its collaborators, registers its routes with their
//! guard chains, and answers through the `ok` / `created` / `no_content`
//! helpers only.

pub mod offer_controller;
pub mod user_controller;

pub use offer_controller::OfferController;
pub use user_controller::UserController;
