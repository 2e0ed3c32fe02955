//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::{auth_guard, troca_senha_guard};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/recuperar-senha", post(handlers::auth::recuperar_senha));

    // Rotas de sessão: exigem token válido, mas continuam acessíveis com a
    // troca de senha pendente (é por aqui que a conta se desbloqueia).
    let sessao_routes = Router::new()
        .route("/auth/renovar", post(handlers::auth::renovar))
        .route("/auth/atualizar-senha", post(handlers::auth::atualizar_senha))
        .route("/usuarios/me", get(handlers::usuarios::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas de negócio: token válido E senha em dia
    let negocio_routes = Router::new()
        .route("/usuarios/me", put(handlers::usuarios::atualizar_perfil))
        .route("/usuarios/convidar", post(handlers::usuarios::convidar))
        .route("/clientes/{cnpj}", get(handlers::clientes::buscar))
        .route("/produtos", get(handlers::produtos::listar))
        .route("/orcamentos/novo", get(handlers::orcamentos::novo))
        .route(
            "/orcamentos",
            post(handlers::orcamentos::gerar).get(handlers::orcamentos::historico),
        )
        .route("/orcamentos/{id}", get(handlers::orcamentos::detalhe))
        // a ordem importa: auth_guard (camada externa) roda antes e popula o
        // usuário que o troca_senha_guard consulta
        .layer(axum_middleware::from_fn(troca_senha_guard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api", auth_routes)
        .nest("/api", sessao_routes)
        .nest("/api", negocio_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
