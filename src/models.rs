pub mod auth;
pub mod cliente;
pub mod orcamento;
pub mod produto;
