// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const FUNCAO_ADMIN: &str = "admin";
pub const FUNCAO_REPRESENTANTE: &str = "representative";

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub nome_completo: Option<String>,

    // 'admin' ou 'representative', gravado no convite
    pub role: String,

    // Conta convidada que ainda não definiu a própria senha: enquanto true,
    // as rotas de negócio ficam bloqueadas (403) até o usuário definir senha.
    pub forcar_troca_senha: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == FUNCAO_ADMIN
    }

    // Nome exibido como "representante" nos orçamentos. Sem nome cadastrado,
    // cai para o prefixo do e-mail (mesmo fallback do formulário).
    pub fn nome_representante(&self) -> String {
        match self.nome_completo.as_deref() {
            Some(nome) if !nome.trim().is_empty() => nome.trim().to_string(),
            _ => self.email.split('@').next().unwrap_or_default().to_string(),
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "representante@empresa.com.br")]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,

    // Tri-state explícito: ausente vale `true` (padrão da tela de login).
    // `false` arma a sessão curta de 30 minutos, renovável por atividade.
    pub manter_conectado: Option<bool>,
}

// Pedido de recuperação de senha
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecuperarSenhaPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
}

// Nova senha (troca forçada, recuperação ou troca voluntária)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarSenhaPayload {
    pub senha: String,
    pub confirmacao: String,
}

// Edição do próprio perfil
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarPerfilPayload {
    #[validate(length(min = 1, message = "O nome não pode ficar vazio."))]
    pub nome_completo: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    // Senha é opcional; quando presente exige confirmação igual
    pub senha: Option<String>,
    pub confirmacao: Option<String>,
}

// Convite de novo usuário (somente admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvidarUsuarioPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "João Silva")]
    pub nome: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[schema(example = "representative")]
    pub role: Option<String>,
}

// Resposta de autenticação com o token e o usuário logado
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessaoResponse {
    pub token: String,
    pub usuario: User,
}

// Resposta simples com apenas o token (renovação de sessão)
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
    // Preferência "permanecer conectado" capturada no login; a renovação
    // reemite o token com o mesmo prazo.
    pub lembrar: bool,
}
