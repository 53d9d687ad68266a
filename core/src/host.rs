//! The notebook primitives layout templates are built from.
//!
//! A host has an active cell. New cells go directly below it and become
//! active, so a template's cells land in order without the caller tracking
//! indices.

use slide_layout_protocol::Cell;
use slide_layout_protocol::CellType;
use slide_layout_protocol::Metadata;
use slide_layout_protocol::Notebook;

use crate::error::LayoutError;
use crate::error::Result;

pub trait NotebookHost {
    fn cell_count(&self) -> usize;

    fn active_index(&self) -> Option<usize>;

    /// Inserts an empty code cell below the active cell (at the end when no
    /// cell is active), makes it active and returns its index.
    fn insert_below(&mut self) -> usize;

    fn set_active_cell_type(&mut self, cell_type: CellType) -> Result<()>;

    fn set_active_text(&mut self, text: &str) -> Result<()>;

    fn cell_metadata(&self, index: usize) -> Option<&Metadata>;

    fn set_cell_metadata(&mut self, index: usize, metadata: Metadata) -> Result<()>;
}

/// In-memory host over an owned [`Notebook`].
#[derive(Debug, Clone)]
pub struct NotebookSession {
    notebook: Notebook,
    active: Option<usize>,
    assign_cell_ids: bool,
}

impl NotebookSession {
    /// Starts with no active cell, so the first insertion appends.
    pub fn new(notebook: Notebook) -> Self {
        Self {
            notebook,
            active: None,
            assign_cell_ids: true,
        }
    }

    /// Whether inserted cells get an `id` on notebooks that support them.
    pub fn with_cell_ids(mut self, assign: bool) -> Self {
        self.assign_cell_ids = assign;
        self
    }

    pub fn select(&mut self, index: usize) -> Result<()> {
        let len = self.notebook.cells.len();
        if index >= len {
            return Err(LayoutError::CellOutOfRange { index, len });
        }
        self.active = Some(index);
        Ok(())
    }

    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    fn active_cell_mut(&mut self) -> Option<&mut Cell> {
        self.active.and_then(|i| self.notebook.cells.get_mut(i))
    }
}

impl NotebookHost for NotebookSession {
    fn cell_count(&self) -> usize {
        self.notebook.cells.len()
    }

    fn active_index(&self) -> Option<usize> {
        self.active
    }

    fn insert_below(&mut self) -> usize {
        let index = match self.active {
            Some(i) => (i + 1).min(self.notebook.cells.len()),
            None => self.notebook.cells.len(),
        };

        let mut cell = Cell::new(CellType::Code, "");
        if self.assign_cell_ids && self.notebook.supports_cell_ids() {
            cell.id = Some(Notebook::new_cell_id());
        }
        self.notebook.cells.insert(index, cell);
        self.active = Some(index);
        index
    }

    fn set_active_cell_type(&mut self, cell_type: CellType) -> Result<()> {
        let cell = self.active_cell_mut().ok_or(LayoutError::NoActiveCell)?;
        cell.set_cell_type(cell_type);
        Ok(())
    }

    fn set_active_text(&mut self, text: &str) -> Result<()> {
        let cell = self.active_cell_mut().ok_or(LayoutError::NoActiveCell)?;
        cell.source = text.to_string();
        Ok(())
    }

    fn cell_metadata(&self, index: usize) -> Option<&Metadata> {
        self.notebook.cells.get(index).map(|cell| &cell.metadata)
    }

    fn set_cell_metadata(&mut self, index: usize, metadata: Metadata) -> Result<()> {
        let len = self.notebook.cells.len();
        let cell = self
            .notebook
            .cells
            .get_mut(index)
            .ok_or(LayoutError::CellOutOfRange { index, len })?;
        cell.metadata = metadata;
        Ok(())
    }
}
