use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{Claims, User},
};

// Valida o Bearer token e insere o usuário (e as claims, para a renovação de
// sessão) nos "extensions" da requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let auth_header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let (user, claims) = app_state.auth_service.validate_token(token).await?;

            request.extensions_mut().insert(user);
            request.extensions_mut().insert(claims);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::InvalidToken)
}

// Bloqueia as rotas de negócio enquanto a conta convidada ainda não definiu
// a própria senha. Roda depois do `auth_guard`, que já colocou o usuário nos
// extensions.
pub async fn troca_senha_guard(
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<User>()
        .ok_or(AppError::InvalidToken)?;

    if user.forcar_troca_senha {
        return Err(AppError::TrocaSenhaPendente);
    }

    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}

// Claims da sessão atual (prazo original do login), para a renovação
pub struct SessaoClaims(pub Claims);

impl<S> FromRequestParts<S> for SessaoClaims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(SessaoClaims)
            .ok_or(AppError::InvalidToken)
    }
}
