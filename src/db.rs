pub mod cliente_repo;
pub mod orcamento_repo;
pub mod produto_repo;
pub mod user_repo;

pub use cliente_repo::ClienteRepository;
pub use orcamento_repo::OrcamentoRepository;
pub use produto_repo::ProdutoRepository;
pub use user_repo::UserRepository;
