// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{
        AtualizarPerfilPayload, AtualizarSenhaPayload, Claims, ConvidarUsuarioPayload,
        FUNCAO_ADMIN, FUNCAO_REPRESENTANTE, SessaoResponse, TokenResponse, User,
    },
};

// Sessão longa ("manter conectado", padrão da tela de login)
const SESSAO_LONGA_DIAS: i64 = 7;
// Sessão curta, renovada a cada atividade até expirar por ociosidade
const SESSAO_CURTA_MINUTOS: i64 = 30;

const SENHA_MINIMA: usize = 6;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub async fn login(
        &self,
        email: &str,
        senha: &str,
        manter_conectado: Option<bool>,
    ) -> Result<SessaoResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let senha_clone = senha.to_owned();
        let hash_clone = user.password_hash.clone();

        // Bcrypt é pesado; roda em thread separada para não travar o runtime
        let senha_confere = tokio::task::spawn_blocking(move || verify(&senha_clone, &hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !senha_confere {
            return Err(AppError::InvalidCredentials);
        }

        // Ausente = true: a tela de login marca "manter conectado" por padrão
        let lembrar = manter_conectado.unwrap_or(true);
        let token = self.criar_token(user.id, lembrar)?;

        Ok(SessaoResponse { token, usuario: user })
    }

    // Decodifica o token e carrega o usuário correspondente. Usado pelo
    // middleware de autenticação em toda rota protegida.
    pub async fn validate_token(&self, token: &str) -> Result<(User, Claims), AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        Ok((user, token_data.claims))
    }

    // Reemite o token com o mesmo prazo do login original. A sessão curta
    // chama isto a cada atividade, empurrando a expiração por ociosidade.
    pub fn renovar(&self, user_id: Uuid, lembrar: bool) -> Result<TokenResponse, AppError> {
        let token = self.criar_token(user_id, lembrar)?;
        Ok(TokenResponse { token })
    }

    // Registra o token de recuperação no log para entrega fora de banda. A
    // resposta ao cliente é sempre a mesma, exista a conta ou não. O pedido
    // não altera nada na conta: uma sessão válida continua funcionando, e só
    // a troca de senha em si (via token) tem efeito. O bloqueio por
    // `forcar_troca_senha` é exclusivo do fluxo de convite.
    pub async fn recuperar_senha(&self, email: &str) -> Result<(), AppError> {
        let Some(user) = self.user_repo.find_by_email(email).await? else {
            tracing::info!("Recuperação de senha solicitada para e-mail desconhecido");
            return Ok(());
        };

        let token = self.criar_token(user.id, false)?;
        tracing::info!(
            usuario = %user.email,
            "Token de recuperação de senha (válido por {} minutos): {}",
            SESSAO_CURTA_MINUTOS,
            token
        );

        Ok(())
    }

    // Define a nova senha e libera a conta (limpa a troca pendente)
    pub async fn atualizar_senha(
        &self,
        user_id: Uuid,
        payload: &AtualizarSenhaPayload,
    ) -> Result<User, AppError> {
        if payload.senha != payload.confirmacao {
            return Err(AppError::SenhasNaoConferem);
        }
        if payload.senha.chars().count() < SENHA_MINIMA {
            return Err(AppError::SenhaCurta);
        }

        let nova_hash = Self::hash_senha(payload.senha.clone()).await?;
        self.user_repo.atualizar_senha(user_id, &nova_hash).await
    }

    pub async fn atualizar_perfil(
        &self,
        user_id: Uuid,
        payload: &AtualizarPerfilPayload,
    ) -> Result<User, AppError> {
        let nova_hash = match &payload.senha {
            Some(senha) => {
                if payload.confirmacao.as_deref() != Some(senha.as_str()) {
                    return Err(AppError::SenhasNaoConferem);
                }
                if senha.chars().count() < SENHA_MINIMA {
                    return Err(AppError::SenhaCurta);
                }
                Some(Self::hash_senha(senha.clone()).await?)
            }
            None => None,
        };

        self.user_repo
            .atualizar_perfil(
                user_id,
                payload.nome_completo.as_deref(),
                payload.email.as_deref(),
                nova_hash.as_deref(),
            )
            .await
    }

    // Convite de novo usuário: a conta nasce com uma senha provisória
    // aleatória e troca de senha pendente. O primeiro acesso é pela
    // recuperação de senha.
    pub async fn convidar(&self, payload: &ConvidarUsuarioPayload) -> Result<User, AppError> {
        let role = match payload.role.as_deref() {
            None => FUNCAO_REPRESENTANTE,
            Some(FUNCAO_REPRESENTANTE) => FUNCAO_REPRESENTANTE,
            Some(FUNCAO_ADMIN) => FUNCAO_ADMIN,
            Some(_) => return Err(AppError::FuncaoInvalida),
        };

        let senha_provisoria = Uuid::new_v4().to_string();
        let hash_provisoria = Self::hash_senha(senha_provisoria).await?;

        self.user_repo
            .criar_convidado(&payload.nome, &payload.email, role, &hash_provisoria)
            .await
    }

    async fn hash_senha(senha: String) -> Result<String, AppError> {
        let nova_hash = tokio::task::spawn_blocking(move || hash(&senha, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(nova_hash)
    }

    fn criar_token(&self, user_id: Uuid, lembrar: bool) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = if lembrar {
            now + chrono::Duration::days(SESSAO_LONGA_DIAS)
        } else {
            now + chrono::Duration::minutes(SESSAO_CURTA_MINUTOS)
        };

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
            lembrar,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
