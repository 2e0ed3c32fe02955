pub mod auth;
pub mod clientes;
pub mod orcamentos;
pub mod produtos;
pub mod usuarios;
