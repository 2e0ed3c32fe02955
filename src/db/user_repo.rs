// src/db/user_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::User};

const COLUNAS: &str =
    "id, email, password_hash, nome_completo, role, forcar_troca_senha, created_at, updated_at";

// O repositório de usuários, responsável por todas as interações com a tabela 'usuarios'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUNAS} FROM usuarios WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUNAS} FROM usuarios WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Cria a conta convidada: senha provisória e troca de senha pendente.
    // Tratamento específico para e-mail duplicado.
    pub async fn criar_convidado(
        &self,
        nome: &str,
        email: &str,
        role: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO usuarios (nome_completo, email, role, password_hash, forcar_troca_senha)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING {COLUNAS}
            "#
        ))
        .bind(nome)
        .bind(email)
        .bind(role)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::mapear_email_duplicado)?;

        Ok(user)
    }

    // Grava a nova senha e libera a conta (limpa a troca pendente)
    pub async fn atualizar_senha(&self, id: Uuid, password_hash: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE usuarios
            SET password_hash = $2, forcar_troca_senha = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUNAS}
            "#
        ))
        .bind(id)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or(AppError::UserNotFound)
    }

    // Atualização parcial do perfil: campos ausentes mantêm o valor atual
    pub async fn atualizar_perfil(
        &self,
        id: Uuid,
        nome_completo: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE usuarios
            SET nome_completo = COALESCE($2, nome_completo),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUNAS}
            "#
        ))
        .bind(id)
        .bind(nome_completo)
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::mapear_email_duplicado)?;

        user.ok_or(AppError::UserNotFound)
    }

    fn mapear_email_duplicado(e: sqlx::Error) -> AppError {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() && db_err.constraint() == Some("usuarios_email_key") {
                return AppError::EmailAlreadyExists;
            }
        }
        e.into()
    }
}
