use serde::Deserialize;
use serde::Serialize;

use crate::CellType;

/// One cell a layout template inserts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSpec {
    #[serde(default = "default_cell_type")]
    pub cell_type: CellType,
    #[serde(default)]
    pub source: String,
    /// Requested slide role. Kept as a raw string: values outside the known
    /// role set are cleared when the template is applied, not rejected here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slide: Option<String>,
}

fn default_cell_type() -> CellType {
    CellType::Markdown
}

impl CellSpec {
    pub fn markdown(source: impl Into<String>, slide: Option<&str>) -> Self {
        Self {
            cell_type: CellType::Markdown,
            source: source.into(),
            slide: slide.map(str::to_string),
        }
    }

    pub fn code(source: impl Into<String>, slide: Option<&str>) -> Self {
        Self {
            cell_type: CellType::Code,
            source: source.into(),
            slide: slide.map(str::to_string),
        }
    }
}

/// A named slide layout: an ordered run of cells inserted below the active
/// cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSpec {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default)]
    pub cells: Vec<CellSpec>,
}

impl TemplateSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>, cells: Vec<CellSpec>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            caption: None,
            cells,
        }
    }

    /// Falls back to the label, as menu entries do.
    pub fn caption(&self) -> &str {
        self.caption.as_deref().unwrap_or(&self.label)
    }
}
