use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::models::orcamento::ErrosOrcamento;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Orçamento reprovado pelo motor de validação: carrega o mapa
    // seção/campo para a tela destacar e focar os campos.
    #[error("Orçamento com campos inválidos")]
    OrcamentoInvalido(ErrosOrcamento),

    #[error("CNPJ incompleto")]
    CnpjInvalido,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Orçamento não encontrado")]
    OrcamentoNaoEncontrado,

    #[error("Acesso restrito a administradores")]
    AcessoNegado,

    // Conta convidada com troca de senha pendente
    #[error("Troca de senha pendente")]
    TrocaSenhaPendente,

    #[error("As senhas não coincidem")]
    SenhasNaoConferem,

    #[error("Função de usuário inválida")]
    FuncaoInvalida,

    #[error("A senha deve ter no mínimo 6 caracteres")]
    SenhaCurta,

    // Falha na chamada ao gateway de geração de propostas
    #[error("Erro no gateway de propostas: {0}")]
    GatewayError(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação de payload.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // O mapa do motor vai inteiro no corpo, junto com o primeiro
            // campo a receber foco na ordem fixa do formulário.
            AppError::OrcamentoInvalido(erros) => {
                let body = Json(json!({
                    "error": "Preencha os campos obrigatórios destacados antes de gerar o orçamento.",
                    "primeiroCampo": erros.primeiro_campo(),
                    "details": erros,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::CnpjInvalido => {
                (StatusCode::BAD_REQUEST, "Informe um CNPJ válido (14 dígitos).")
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.",
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::OrcamentoNaoEncontrado => {
                (StatusCode::NOT_FOUND, "Orçamento não encontrado.")
            }
            AppError::AcessoNegado => (
                StatusCode::FORBIDDEN,
                "Apenas administradores podem executar esta ação.",
            ),
            AppError::TrocaSenhaPendente => (
                StatusCode::FORBIDDEN,
                "Defina uma nova senha antes de continuar.",
            ),
            AppError::SenhasNaoConferem => (StatusCode::BAD_REQUEST, "As senhas não coincidem."),
            AppError::FuncaoInvalida => (
                StatusCode::BAD_REQUEST,
                "Função inválida. Use 'representative' ou 'admin'.",
            ),
            AppError::SenhaCurta => (
                StatusCode::BAD_REQUEST,
                "A senha deve ter no mínimo 6 caracteres.",
            ),

            AppError::GatewayError(mensagem) => {
                tracing::error!("Falha no gateway de propostas: {}", mensagem);
                let body = Json(json!({
                    "error": "Erro ao gerar orçamento no servidor. Tente novamente.",
                    "details": mensagem,
                }));
                return (StatusCode::BAD_GATEWAY, body).into_response();
            }

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
