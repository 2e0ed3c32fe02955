use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::cliente::BuscaClienteResponse,
    services::orcamento::apenas_digitos,
};

// Consulta a base de clientes pelo CNPJ (com ou sem máscara). CNPJ não
// cadastrado não é erro: devolve 200 com status "nao-encontrado" e o
// formulário segue em branco para preenchimento manual.
#[utoipa::path(
    get,
    path = "/api/clientes/{cnpj}",
    tag = "Clientes",
    params(("cnpj" = String, Path, description = "CNPJ, com ou sem máscara")),
    responses(
        (status = 200, description = "Resultado da consulta", body = BuscaClienteResponse),
        (status = 400, description = "CNPJ com menos de 14 dígitos")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    Path(cnpj): Path<String>,
) -> Result<Json<BuscaClienteResponse>, AppError> {
    let normalizado = apenas_digitos(&cnpj);
    if normalizado.len() != 14 {
        return Err(AppError::CnpjInvalido);
    }

    let cliente = app_state.cliente_repo.buscar_por_cnpj(&normalizado).await?;

    let status = if cliente.is_some() { "encontrado" } else { "nao-encontrado" };
    Ok(Json(BuscaClienteResponse { status: status.to_string(), cliente }))
}
