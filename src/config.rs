// src/config.rs

use anyhow::Context;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{ClienteRepository, OrcamentoRepository, ProdutoRepository, UserRepository},
    services::{auth::AuthService, gateway::GatewayClient},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub cliente_repo: ClienteRepository,
    pub produto_repo: ProdutoRepository,
    pub orcamento_repo: OrcamentoRepository,
    pub gateway: GatewayClient,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let gateway_url =
            env::var("N8N_GATEWAY_URL").context("N8N_GATEWAY_URL deve ser definida")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let auth_service = AuthService::new(user_repo, jwt_secret);
        let cliente_repo = ClienteRepository::new(db_pool.clone());
        let produto_repo = ProdutoRepository::new(db_pool.clone());
        let orcamento_repo = OrcamentoRepository::new(db_pool.clone());
        let gateway = GatewayClient::new(gateway_url)?;

        Ok(Self {
            db_pool,
            auth_service,
            cliente_repo,
            produto_repo,
            orcamento_repo,
            gateway,
        })
    }
}
