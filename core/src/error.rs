use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("cell index {index} is out of range (notebook has {len} cells)")]
    CellOutOfRange { index: usize, len: usize },

    #[error("no active cell")]
    NoActiveCell,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("command '{0}' does not insert a layout")]
    NotALayout(String),

    #[error("template '{0}' has no cells")]
    EmptyTemplate(String),

    #[error("template id '{0}' is defined more than once")]
    DuplicateTemplate(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
