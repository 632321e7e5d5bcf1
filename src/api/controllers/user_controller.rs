//! `/users` endpoints.
//!
//! | Method | Path | Chain |
//! |--------|------|-------|
//! | POST | `/users/register` | ValidateDto(CreateUserDto) |
//! | POST | `/users/login` | ValidateDto(LoginUserDto) |
//! | GET | `/users/profile` | Authenticate |
//! | POST | `/users/:hostId/avatar` | ValidateObjectId → DocumentExists → UploadFile |

use axum::response::Response;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::dto::{CreateUserDto, LoggedUserRdo, LoginUserDto, UserRdo};
use crate::application::services::{AuthService, UserService, user_service::USER_COLLECTION};
use crate::domain::ObjectId;
use crate::domain::entities::Credentials;
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::rest::{
    Authenticate, Controller, DocumentExists, RequestContext, Route, UploadFile, ValidateDto,
    ValidateObjectId, bind, created, ok,
};
use crate::routes::UPLOAD_ROUTE;

const ORIGIN: &str = "UserController";

/// Multipart field carrying the avatar image.
pub const AVATAR_FIELD: &str = "avatar";

pub struct UserController<R: UserRepository> {
    users: Arc<UserService<R>>,
    auth: Arc<dyn AuthService>,
    upload_directory: PathBuf,
    max_upload_bytes: usize,
}

impl<R: UserRepository + 'static> UserController<R> {
    pub fn new(
        users: Arc<UserService<R>>,
        auth: Arc<dyn AuthService>,
        upload_directory: PathBuf,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            users,
            auth,
            upload_directory,
            max_upload_bytes,
        }
    }

    async fn create(self: Arc<Self>, mut ctx: RequestContext) -> Result<Response, AppError> {
        let dto = ctx.take_dto::<CreateUserDto>()?;

        if self.users.find_by_email(&dto.email).await?.is_some() {
            return Err(AppError::conflict(
                format!("User with email «{}» exists.", dto.email),
                ORIGIN,
            ));
        }

        let user = self.users.create(dto.into()).await?;
        created(UserRdo::from(user))
    }

    async fn login(self: Arc<Self>, mut ctx: RequestContext) -> Result<Response, AppError> {
        let credentials: Credentials = ctx.take_dto::<LoginUserDto>()?.into();

        let user = self.auth.verify(&credentials).await?;
        let token = self.auth.authenticate(&user).await?;

        ok(LoggedUserRdo {
            email: user.email,
            token,
        })
    }

    async fn profile(self: Arc<Self>, ctx: RequestContext) -> Result<Response, AppError> {
        let identity = ctx.require_identity()?;

        let user = self
            .users
            .find_by_id(&identity.id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Unauthorized", ORIGIN))?;

        ok(UserRdo::from(user))
    }

    async fn update_avatar(self: Arc<Self>, mut ctx: RequestContext) -> Result<Response, AppError> {
        let host_id = ctx
            .param("hostId")
            .unwrap_or_default()
            .parse::<ObjectId>()
            .map_err(|e| AppError::bad_request(e.to_string(), ORIGIN))?;
        let file = ctx.take_file(AVATAR_FIELD)?;

        let avatar_url = format!("{UPLOAD_ROUTE}/{}", file.stored_name);
        let user = self.users.update_avatar(&host_id, &avatar_url).await?;

        ok(UserRdo::from(user))
    }
}

impl<R: UserRepository + 'static> Controller for UserController<R> {
    fn prefix(&self) -> &'static str {
        "/users"
    }

    fn routes(self: Arc<Self>) -> Vec<Route> {
        vec![
            Route::post("/register", bind(&self, Self::create))
                .guard(ValidateDto::new::<CreateUserDto>()),
            Route::post("/login", bind(&self, Self::login)).guard(ValidateDto::new::<LoginUserDto>()),
            Route::get("/profile", bind(&self, Self::profile))
                .guard(Authenticate::new(Arc::clone(&self.auth))),
            Route::post("/:hostId/avatar", bind(&self, Self::update_avatar))
                .guard(ValidateObjectId::new("hostId"))
                .guard(DocumentExists::new(
                    self.users.clone(),
                    USER_COLLECTION,
                    "hostId",
                ))
                .guard(UploadFile::new(
                    self.upload_directory.clone(),
                    AVATAR_FIELD,
                    self.max_upload_bytes,
                )),
        ]
    }
}
