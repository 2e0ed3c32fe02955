// src/db/cliente_repo.rs

use serde_json::Value;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::cliente::Cliente,
    services::orcamento::formatar_cnpj,
};

// Consulta da base de clientes importada. A tabela veio de planilhas, com
// colunas inconsistentes, então a linha é lida crua (`row_to_json`) e
// normalizada no modelo.
#[derive(Clone)]
pub struct ClienteRepository {
    pool: PgPool,
}

impl ClienteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca em dois passos: primeiro pela coluna normalizada (14 dígitos),
    // depois pela coluna legada "CNPJ", que guarda o valor com máscara.
    pub async fn buscar_por_cnpj(&self, cnpj_normalizado: &str) -> Result<Option<Cliente>, AppError> {
        let linha: Option<Value> = sqlx::query_scalar(
            "SELECT row_to_json(c) FROM clientes c WHERE c.cnpj_normalizado = $1 LIMIT 1",
        )
        .bind(cnpj_normalizado)
        .fetch_optional(&self.pool)
        .await?;

        let linha = match linha {
            Some(l) => Some(l),
            None => {
                sqlx::query_scalar(
                    r#"SELECT row_to_json(c) FROM clientes c WHERE c."CNPJ" = $1 LIMIT 1"#,
                )
                .bind(formatar_cnpj(cnpj_normalizado))
                .fetch_optional(&self.pool)
                .await?
            }
        };

        Ok(linha.map(|l| Cliente::de_linha(&l, cnpj_normalizado)))
    }
}
