//! Slide layouts for Jupyter notebooks.
//!
//! [`slideshow`] holds the metadata normalization rule every other module
//! funnels through; [`host`], [`template`] and [`catalog`] build the layout
//! insertion workflow on top of it.

pub mod catalog;
pub mod error;
pub mod host;
pub mod slideshow;
pub mod template;

pub use catalog::Catalog;
pub use catalog::Command;
pub use catalog::Menu;
pub use catalog::MenuItem;
pub use error::LayoutError;
pub use error::Result;
pub use host::NotebookHost;
pub use host::NotebookSession;
pub use slideshow::SlideRole;
pub use slideshow::SlideshowUpdate;
pub use template::apply_template;
