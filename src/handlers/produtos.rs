use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    models::produto::Produto,
    services::orcamento::filtrar_produtos,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BuscaProdutos {
    // Texto do autocomplete; vazio ou ausente devolve o catálogo inteiro
    pub busca: Option<String>,
}

// Catálogo de produtos, opcionalmente filtrado pelo texto do autocomplete
#[utoipa::path(
    get,
    path = "/api/produtos",
    tag = "Produtos",
    params(BuscaProdutos),
    responses((status = 200, description = "Catálogo de produtos", body = Vec<Produto>)),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    Query(query): Query<BuscaProdutos>,
) -> Result<Json<Vec<Produto>>, AppError> {
    let catalogo = app_state.produto_repo.listar().await?;
    let busca = query.busca.unwrap_or_default();

    let filtrados = filtrar_produtos(&catalogo, &busca)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(filtrados))
}
