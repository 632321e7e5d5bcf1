//! Declarative request pipeline.
//!
//! Controllers describe their endpoints as [`Route`]s: a method, a path
//! template, an ordered list of [`Guard`]s and a handler. A [`RouteTable`]
//! collects them at startup and compiles them into an Axum router.
//!
//! For each matched request:
//!
//! 1. a [`RequestContext`] is built (path params, query, headers, body),
//! 2. the [`executor`] runs the guards in registration order, stopping at the
//!    first failure,
//! 3. the handler runs,
//! 4. any [`crate::error::AppError`] is rendered by the error mapper.
//!
//! # Modules
//!
//! - [`context`] - Per-request state shared by guards and handler
//! - [`guard`] - Built-in guard variants and the [`Middleware`] extension trait
//! - [`route`] - Route entries and handler type erasure
//! - [`route_table`] - Registration, duplicate detection, router compilation
//! - [`executor`] - Ordered, deadline-bounded chain execution
//! - [`controller`] - `Controller` trait and response helpers

pub mod context;
pub mod controller;
pub mod executor;
pub mod guard;
pub mod route;
pub mod route_table;

pub use context::{RequestContext, UploadedFile};
pub use controller::{Controller, created, no_content, ok};
pub use guard::{
    Authenticate, DocumentExists, DocumentLookup, Guard, Middleware, UploadFile, ValidateDto,
    ValidateObjectId,
};
pub use route::{Handler, Route, bind};
pub use route_table::{PipelineSettings, RouteError, RouteTable};
