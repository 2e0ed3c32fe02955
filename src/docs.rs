// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::recuperar_senha,
        handlers::auth::renovar,
        handlers::auth::atualizar_senha,

        // --- Usuários ---
        handlers::usuarios::get_me,
        handlers::usuarios::atualizar_perfil,
        handlers::usuarios::convidar,

        // --- Clientes ---
        handlers::clientes::buscar,

        // --- Produtos ---
        handlers::produtos::listar,

        // --- Orçamentos ---
        handlers::orcamentos::novo,
        handlers::orcamentos::gerar,
        handlers::orcamentos::historico,
        handlers::orcamentos::detalhe,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::RecuperarSenhaPayload,
            models::auth::AtualizarSenhaPayload,
            models::auth::AtualizarPerfilPayload,
            models::auth::ConvidarUsuarioPayload,
            models::auth::SessaoResponse,
            models::auth::TokenResponse,

            // --- Clientes ---
            models::cliente::Cliente,
            models::cliente::BuscaClienteResponse,

            // --- Produtos ---
            models::produto::Produto,

            // --- Orçamentos ---
            models::orcamento::Item,
            models::orcamento::ItemPayload,
            models::orcamento::DadosComerciais,
            models::orcamento::GerarOrcamentoPayload,
            models::orcamento::Totais,
            models::orcamento::ComercialPayload,
            models::orcamento::OrcamentoPayload,
            models::orcamento::OrcamentoRegistro,
            models::orcamento::GeracaoResponse,
            models::orcamento::NovoOrcamentoResponse,
            models::orcamento::ErroItem,
            models::orcamento::ErrosOrcamento,
        )
    ),
    tags(
        (name = "Autenticação", description = "Login, recuperação e renovação de sessão"),
        (name = "Usuários", description = "Perfil e convites"),
        (name = "Clientes", description = "Consulta da base de clientes por CNPJ"),
        (name = "Produtos", description = "Catálogo de produtos"),
        (name = "Orçamentos", description = "Geração e histórico de orçamentos")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
