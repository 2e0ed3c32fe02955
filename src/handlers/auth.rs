use axum::{Json, extract::State};
use serde_json::{Value, json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AuthenticatedUser, SessaoClaims},
    models::auth::{
        AtualizarSenhaPayload, LoginPayload, RecuperarSenhaPayload, SessaoResponse, TokenResponse,
        User,
    },
};

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Autenticação",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Sessão criada", body = SessaoResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<SessaoResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let sessao = app_state
        .auth_service
        .login(&payload.email, &payload.senha, payload.manter_conectado)
        .await?;

    Ok(Json(sessao))
}

// Pedido de recuperação de senha. A resposta é sempre a mesma, exista a
// conta ou não, para não revelar quais e-mails estão cadastrados.
#[utoipa::path(
    post,
    path = "/api/auth/recuperar-senha",
    tag = "Autenticação",
    request_body = RecuperarSenhaPayload,
    responses(
        (status = 200, description = "Instruções enviadas, se a conta existir")
    )
)]
pub async fn recuperar_senha(
    State(app_state): State<AppState>,
    Json(payload): Json<RecuperarSenhaPayload>,
) -> Result<Json<Value>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state.auth_service.recuperar_senha(&payload.email).await?;

    Ok(Json(json!({
        "mensagem": "Se o e-mail estiver cadastrado, as instruções de recuperação foram enviadas."
    })))
}

// Renova a sessão curta: reemite o token com o prazo original do login
#[utoipa::path(
    post,
    path = "/api/auth/renovar",
    tag = "Autenticação",
    responses(
        (status = 200, description = "Token renovado", body = TokenResponse),
        (status = 401, description = "Sessão expirada")
    ),
    security(("api_jwt" = []))
)]
pub async fn renovar(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    SessaoClaims(claims): SessaoClaims,
) -> Result<Json<TokenResponse>, AppError> {
    Ok(Json(app_state.auth_service.renovar(user.id, claims.lembrar)?))
}

// Define a nova senha (troca forçada, recuperação ou troca voluntária)
#[utoipa::path(
    post,
    path = "/api/auth/atualizar-senha",
    tag = "Autenticação",
    request_body = AtualizarSenhaPayload,
    responses(
        (status = 200, description = "Senha atualizada", body = User),
        (status = 400, description = "Senha curta ou confirmação divergente")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar_senha(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<AtualizarSenhaPayload>,
) -> Result<Json<User>, AppError> {
    let user = app_state.auth_service.atualizar_senha(user.id, &payload).await?;
    Ok(Json(user))
}
