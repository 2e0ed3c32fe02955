// src/db/produto_repo.rs

use serde_json::Value;
use sqlx::PgPool;

use crate::{common::error::AppError, models::produto::Produto};

// Catálogo de produtos. Mesma situação da base de clientes: a tabela veio de
// importações com nomes de coluna variados, então as linhas chegam cruas e a
// normalização fica no modelo.
#[derive(Clone)]
pub struct ProdutoRepository {
    pool: PgPool,
}

impl ProdutoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Catálogo inteiro, ordenado por código. O volume é pequeno (centenas de
    // itens) e o filtro de autocomplete roda em memória.
    pub async fn listar(&self) -> Result<Vec<Produto>, AppError> {
        let linhas: Vec<Value> =
            sqlx::query_scalar("SELECT row_to_json(p) FROM lista_produtos p ORDER BY 1")
                .fetch_all(&self.pool)
                .await?;

        Ok(linhas.iter().map(Produto::de_linha).collect())
    }
}
