//! Serde model of Jupyter notebook documents (nbformat 4) and of the layout
//! templates inserted into them.
//!
//! Only the fields slide-layout reads or writes are typed. Everything else a
//! notebook carries is kept in the `extra` maps so a load/save cycle does not
//! drop data written by other tools.

mod notebook;
mod source;
mod template;

pub use notebook::Cell;
pub use notebook::CellType;
pub use notebook::Metadata;
pub use notebook::Notebook;
pub use notebook::UnsupportedFormat;
pub use template::CellSpec;
pub use template::TemplateSpec;
