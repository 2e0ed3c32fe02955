use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AtualizarPerfilPayload, ConvidarUsuarioPayload, User},
};

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/usuarios/me",
    tag = "Usuários",
    responses((status = 200, description = "Usuário logado", body = User)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

#[utoipa::path(
    put,
    path = "/api/usuarios/me",
    tag = "Usuários",
    request_body = AtualizarPerfilPayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = User),
        (status = 409, description = "E-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar_perfil(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<AtualizarPerfilPayload>,
) -> Result<Json<User>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state.auth_service.atualizar_perfil(user.id, &payload).await?;
    Ok(Json(user))
}

// Convida um novo usuário (somente admin). A conta nasce bloqueada até a
// primeira troca de senha.
#[utoipa::path(
    post,
    path = "/api/usuarios/convidar",
    tag = "Usuários",
    request_body = ConvidarUsuarioPayload,
    responses(
        (status = 201, description = "Usuário convidado", body = User),
        (status = 403, description = "Apenas administradores"),
        (status = 409, description = "E-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn convidar(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ConvidarUsuarioPayload>,
) -> Result<(StatusCode, Json<User>), AppError> {
    if !user.is_admin() {
        return Err(AppError::AcessoNegado);
    }
    payload.validate().map_err(AppError::ValidationError)?;

    let convidado = app_state.auth_service.convidar(&payload).await?;
    tracing::info!(
        convidado = %convidado.email,
        por = %user.email,
        "Novo usuário convidado"
    );

    Ok((StatusCode::CREATED, Json(convidado)))
}
