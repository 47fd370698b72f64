use presupuesto_client::{ClientError, ExportError, ImportError, LoadError, SaveError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("client error: {0}")]
    Client(#[from] ClientError),
    #[error("engine error: {0}")]
    Engine(#[from] engine::EngineError),
    #[error("load failed: {0}")]
    Load(#[from] LoadError),
    #[error("save failed: {0}")]
    Save(#[from] SaveError),
    #[error("import failed: {0}")]
    Import(#[from] ImportError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
    #[error("invalid edit {0:?}: expected CATEGORY_ID:MONTH=AMOUNT")]
    InvalidEdit(String),
    #[error("unknown command {0:?}, try `help`")]
    UnknownCommand(String),
    #[error("budget not loaded")]
    NotLoaded,
}
