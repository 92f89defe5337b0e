pub mod di;
pub mod entity;
pub mod interactor;
pub mod market;
pub mod retry;
pub mod router;
pub mod session;
pub mod solana;
pub mod storage;
pub mod utils;
pub mod view;

pub use di::ServiceContainer;
pub use router::TelegramRouter;
pub use solana::create_solana_client;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
