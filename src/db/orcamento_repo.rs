// src/db/orcamento_repo.rs

use chrono::{Days, NaiveTime};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::orcamento::{HistoricoFiltro, OrcamentoPayload, OrcamentoRegistro},
};

const COLUNAS: &str = "id, user_id, cliente_nome, cliente_empresa, cliente_cnpj, valor_total, \
                       status, payload, created_at";

// Histórico de orçamentos gerados. Append-only: edição gera uma linha nova
// com a versão incrementada, nunca atualiza nem remove as anteriores.
#[derive(Clone)]
pub struct OrcamentoRepository {
    pool: PgPool,
}

impl OrcamentoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Grava o snapshot completo junto com as colunas desnormalizadas que o
    // histórico lista sem abrir o JSON.
    pub async fn inserir(
        &self,
        user_id: Uuid,
        payload: &OrcamentoPayload,
    ) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO orcamentos
                (user_id, cliente_nome, cliente_empresa, cliente_cnpj, valor_total, status, payload)
            VALUES ($1, $2, $3, $4, $5, 'gerado', $6)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(&payload.cliente.nome)
        .bind(&payload.cliente.empresa)
        .bind(&payload.cliente.cnpj)
        .bind(payload.valores.total)
        .bind(sqlx::types::Json(payload))
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    // Lista com filtros opcionais combináveis (AND). `somente_user` restringe
    // a visão ao dono; admin passa None e enxerga tudo.
    pub async fn listar(
        &self,
        somente_user: Option<Uuid>,
        filtro: &HistoricoFiltro,
    ) -> Result<Vec<OrcamentoRegistro>, AppError> {
        let mut consulta: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUNAS} FROM orcamentos WHERE 1=1"));

        if let Some(user_id) = somente_user {
            consulta.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(de) = filtro.de {
            consulta
                .push(" AND created_at >= ")
                .push_bind(de.and_time(NaiveTime::MIN).and_utc());
        }
        if let Some(ate) = filtro.ate {
            // inclusivo: compara com o início do dia seguinte
            consulta
                .push(" AND created_at < ")
                .push_bind((ate + Days::new(1)).and_time(NaiveTime::MIN).and_utc());
        }
        if let Some(cliente) = filtro.cliente.as_deref().filter(|s| !s.trim().is_empty()) {
            consulta
                .push(" AND cliente_empresa ILIKE ")
                .push_bind(format!("%{}%", cliente.trim()));
        }
        if let Some(rep) = filtro.representante.as_deref().filter(|s| !s.trim().is_empty()) {
            consulta
                .push(" AND payload->>'representante' ILIKE ")
                .push_bind(format!("%{}%", rep.trim()));
        }

        consulta.push(" ORDER BY created_at DESC");

        let registros = consulta
            .build_query_as::<OrcamentoRegistro>()
            .fetch_all(&self.pool)
            .await?;

        Ok(registros)
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<OrcamentoRegistro>, AppError> {
        let registro = sqlx::query_as::<_, OrcamentoRegistro>(&format!(
            "SELECT {COLUNAS} FROM orcamentos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registro)
    }
}
