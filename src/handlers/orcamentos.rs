use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Local;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        cliente::TIPOS_VENDA,
        orcamento::{
            DadosComerciais, FORMAS_PAGAMENTO, FRETES, GeracaoResponse, GerarOrcamentoPayload,
            HistoricoFiltro, NovoOrcamentoResponse, OrcamentoRegistro,
        },
    },
    services::orcamento::{self, DESCONTO_MAX, ICMS_OPCOES, UFS},
};

// Valores iniciais do formulário: condições comerciais padrão (validade já
// calculada para o momento da chamada) e as opções dos selects.
#[utoipa::path(
    get,
    path = "/api/orcamentos/novo",
    tag = "Orçamentos",
    responses((status = 200, description = "Valores iniciais", body = NovoOrcamentoResponse)),
    security(("api_jwt" = []))
)]
pub async fn novo() -> Json<NovoOrcamentoResponse> {
    let comercial = DadosComerciais {
        validade: orcamento::validade_padrao(Local::now().naive_local()),
        ..DadosComerciais::default()
    };

    Json(NovoOrcamentoResponse {
        comercial,
        icms_opcoes: ICMS_OPCOES.to_vec(),
        desconto_opcoes: (0..=DESCONTO_MAX as i64).map(|d| d as f64).collect(),
        formas_pagamento: FORMAS_PAGAMENTO.iter().map(|s| s.to_string()).collect(),
        fretes: FRETES.iter().map(|s| s.to_string()).collect(),
        tipos_venda: TIPOS_VENDA.iter().map(|s| s.to_string()).collect(),
        ufs: UFS.iter().map(|s| s.to_string()).collect(),
    })
}

// Gera o orçamento: valida, monta o snapshot, grava no histórico e envia ao
// gateway de propostas, que cuida do documento e do e-mail.
#[utoipa::path(
    post,
    path = "/api/orcamentos",
    tag = "Orçamentos",
    request_body = GerarOrcamentoPayload,
    responses(
        (status = 200, description = "Orçamento gerado", body = GeracaoResponse),
        (status = 400, description = "Campos obrigatórios pendentes"),
        (status = 502, description = "Falha no gateway de propostas")
    ),
    security(("api_jwt" = []))
)]
pub async fn gerar(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(pedido): Json<GerarOrcamentoPayload>,
) -> Result<Json<GeracaoResponse>, AppError> {
    orcamento::validar(&pedido).map_err(AppError::OrcamentoInvalido)?;

    let payload = orcamento::montar_payload(
        &pedido,
        &user.nome_representante(),
        Local::now().naive_local(),
    );

    // O histórico é melhor-esforço: uma falha aqui não pode impedir o
    // representante de gerar o documento.
    if let Err(e) = app_state.orcamento_repo.inserir(user.id, &payload).await {
        tracing::warn!("Falha ao gravar orçamento no histórico: {}", e);
    }

    let resposta = app_state.gateway.gerar_proposta(&payload).await?;

    Ok(Json(GeracaoResponse {
        resposta,
        valores: payload.valores,
        version: payload.version,
        versao_label: payload.versao_label,
    }))
}

// Histórico de orçamentos. Representante enxerga só os próprios;
// administrador enxerga os de todos.
#[utoipa::path(
    get,
    path = "/api/orcamentos",
    tag = "Orçamentos",
    params(HistoricoFiltro),
    responses((status = 200, description = "Histórico filtrado", body = Vec<OrcamentoRegistro>)),
    security(("api_jwt" = []))
)]
pub async fn historico(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filtro): Query<HistoricoFiltro>,
) -> Result<Json<Vec<OrcamentoRegistro>>, AppError> {
    let somente_user = if user.is_admin() { None } else { Some(user.id) };

    let registros = app_state.orcamento_repo.listar(somente_user, &filtro).await?;
    Ok(Json(registros))
}

// Um registro do histórico, com o snapshot completo (usado pela edição)
#[utoipa::path(
    get,
    path = "/api/orcamentos/{id}",
    tag = "Orçamentos",
    params(("id" = Uuid, Path, description = "ID do registro")),
    responses(
        (status = 200, description = "Registro encontrado", body = OrcamentoRegistro),
        (status = 404, description = "Registro inexistente ou de outro usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn detalhe(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OrcamentoRegistro>, AppError> {
    let registro = app_state
        .orcamento_repo
        .buscar_por_id(id)
        .await?
        .ok_or(AppError::OrcamentoNaoEncontrado)?;

    // Registro de outro usuário responde 404, não 403: a existência do
    // orçamento também é informação do dono.
    if !user.is_admin() && registro.user_id != user.id {
        return Err(AppError::OrcamentoNaoEncontrado);
    }

    Ok(Json(registro))
}
