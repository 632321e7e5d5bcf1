//! Data Transfer Objects for API requests and responses.
//!
//! Request DTOs derive `Deserialize` + `Validate` and are checked by the
//! `ValidateDto` guard before a handler runs. Response objects (`*Rdo`) only
//! carry fields that are safe to expose.

pub mod offer;
pub mod user;

pub use offer::{CreateOfferDto, OfferRdo};
pub use user::{CreateUserDto, LoggedUserRdo, LoginUserDto, UserRdo};
