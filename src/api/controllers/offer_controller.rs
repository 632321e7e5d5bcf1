//! `/offers` endpoints.

use axum::response::Response;
use std::sync::Arc;

use crate::api::dto::{CreateOfferDto, OfferRdo};
use crate::application::services::{AuthService, OfferService, offer_service::OFFER_COLLECTION};
use crate::domain::ObjectId;
use crate::domain::repositories::OfferRepository;
use crate::error::AppError;
use crate::rest::{
    Authenticate, Controller, DocumentExists, RequestContext, Route, ValidateDto,
    ValidateObjectId, bind, created, no_content, ok,
};

const ORIGIN: &str = "OfferController";

pub struct OfferController<R: OfferRepository> {
    offers: Arc<OfferService<R>>,
    auth: Arc<dyn AuthService>,
}

impl<R: OfferRepository + 'static> OfferController<R> {
    pub fn new(offers: Arc<OfferService<R>>, auth: Arc<dyn AuthService>) -> Self {
        Self { offers, auth }
    }

    async fn index(self: Arc<Self>, ctx: RequestContext) -> Result<Response, AppError> {
        let limit = match ctx.query("limit") {
            Some(raw) => Some(raw.parse::<usize>().map_err(|_| {
                AppError::bad_request(format!("`{raw}` is not a valid limit"), ORIGIN)
            })?),
            None => None,
        };

        let offers = self.offers.list(limit).await?;
        ok(offers.into_iter().map(OfferRdo::from).collect::<Vec<_>>())
    }

    async fn create(self: Arc<Self>, mut ctx: RequestContext) -> Result<Response, AppError> {
        let host_id = ctx.require_identity()?.id;
        let new_offer = ctx.take_dto::<CreateOfferDto>()?.into_new_offer(host_id)?;

        let offer = self.offers.create(new_offer).await?;
        created(OfferRdo::from(offer))
    }

    async fn show(self: Arc<Self>, ctx: RequestContext) -> Result<Response, AppError> {
        let id = offer_id(&ctx)?;
        let offer = self.offers.find(&id).await?;

        ok(OfferRdo::from(offer))
    }

    async fn delete(self: Arc<Self>, ctx: RequestContext) -> Result<Response, AppError> {
        let id = offer_id(&ctx)?;
        let requester = ctx.require_identity()?;

        self.offers.delete(&id, requester).await?;
        no_content()
    }

    fn exists_guard(&self) -> DocumentExists {
        DocumentExists::new(self.offers.clone(), OFFER_COLLECTION, "offerId")
    }
}

fn offer_id(ctx: &RequestContext) -> Result<ObjectId, AppError> {
    ctx.param("offerId")
        .unwrap_or_default()
        .parse::<ObjectId>()
        .map_err(|e| AppError::bad_request(e.to_string(), ORIGIN))
}

impl<R: OfferRepository + 'static> Controller for OfferController<R> {
    fn prefix(&self) -> &'static str {
        "/offers"
    }

    fn routes(self: Arc<Self>) -> Vec<Route> {
        let authenticate = Authenticate::new(Arc::clone(&self.auth));

        vec![
            Route::get("/", bind(&self, Self::index)),
            Route::post("/", bind(&self, Self::create))
                .guard(authenticate.clone())
                .guard(ValidateDto::new::<CreateOfferDto>()),
            Route::get("/:offerId", bind(&self, Self::show))
                .guard(ValidateObjectId::new("offerId"))
                .guard(self.exists_guard()),
            Route::delete("/:offerId", bind(&self, Self::delete))
                .guard(authenticate)
                .guard(ValidateObjectId::new("offerId"))
                .guard(self.exists_guard()),
        ]
    }
}
