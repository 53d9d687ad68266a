use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

/// Per-cell and per-notebook metadata: an open JSON object.
pub type Metadata = Map<String, Value>;

const OUTPUTS_KEY: &str = "outputs";
const EXECUTION_COUNT_KEY: &str = "execution_count";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    Code,
    Markdown,
    Raw,
}

impl CellType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::Code => "code",
            CellType::Markdown => "markdown",
            CellType::Raw => "raw",
        }
    }
}

impl std::str::FromStr for CellType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "code" => Ok(CellType::Code),
            "markdown" => Ok(CellType::Markdown),
            "raw" => Ok(CellType::Raw),
            other => Err(format!("unknown cell type '{other}': use code, markdown, raw")),
        }
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Present from nbformat 4.5 onwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub cell_type: CellType,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default, with = "crate::source")]
    pub source: String,
    /// `outputs`, `execution_count`, `attachments` and anything else.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    pub fn new(cell_type: CellType, source: impl Into<String>) -> Self {
        let mut cell = Self {
            id: None,
            cell_type: CellType::Raw,
            metadata: Metadata::new(),
            source: source.into(),
            extra: Map::new(),
        };
        cell.set_cell_type(cell_type);
        cell
    }

    /// Changes the type and fixes up the fields that only code cells carry.
    pub fn set_cell_type(&mut self, cell_type: CellType) {
        self.cell_type = cell_type;
        if cell_type == CellType::Code {
            self.extra
                .entry(OUTPUTS_KEY)
                .or_insert_with(|| Value::Array(Vec::new()));
            self.extra
                .entry(EXECUTION_COUNT_KEY)
                .or_insert(Value::Null);
        } else {
            self.extra.remove(OUTPUTS_KEY);
            self.extra.remove(EXECUTION_COUNT_KEY);
        }
    }

    pub fn first_line(&self) -> &str {
        self.source.lines().next().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    #[serde(default)]
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub metadata: Metadata,
    pub nbformat: u32,
    pub nbformat_minor: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported nbformat {nbformat}: only version 4 notebooks are handled")]
pub struct UnsupportedFormat {
    pub nbformat: u32,
}

impl Default for Notebook {
    fn default() -> Self {
        Self {
            cells: Vec::new(),
            metadata: Metadata::new(),
            nbformat: 4,
            nbformat_minor: 5,
            extra: Map::new(),
        }
    }
}

impl Notebook {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Pretty JSON with `indent` spaces per level and a trailing newline.
    pub fn to_json_string(&self, indent: usize) -> serde_json::Result<String> {
        let indent = " ".repeat(indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        buf.push(b'\n');
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn check_format(&self) -> Result<(), UnsupportedFormat> {
        if self.nbformat == 4 {
            Ok(())
        } else {
            Err(UnsupportedFormat { nbformat: self.nbformat })
        }
    }

    pub fn supports_cell_ids(&self) -> bool {
        self.nbformat > 4 || (self.nbformat == 4 && self.nbformat_minor >= 5)
    }

    /// Random 8 character id, the length nbformat itself generates.
    pub fn new_cell_id() -> String {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(8);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_accepts_string_and_lines() {
        let nb = Notebook::from_json(
            r##"{
                "cells": [
                    {"cell_type": "markdown", "metadata": {}, "source": "# Title\nbody"},
                    {"cell_type": "markdown", "metadata": {}, "source": ["# Title\n", "body"]}
                ],
                "metadata": {},
                "nbformat": 4,
                "nbformat_minor": 2
            }"##,
        )
        .unwrap();
        assert_eq!(nb.cells[0].source, "# Title\nbody");
        assert_eq!(nb.cells[1].source, "# Title\nbody");
    }

    #[test]
    fn test_source_written_as_lines() {
        let cell = Cell::new(CellType::Markdown, "# Title\nbody");
        let value = serde_json::to_value(&cell).unwrap();
        assert_eq!(value["source"], json!(["# Title\n", "body"]));
        assert!(value.get("outputs").is_none());
    }

    #[test]
    fn test_unknown_fields_survive() {
        let input = json!({
            "cells": [{
                "cell_type": "markdown",
                "metadata": {"tags": ["intro"]},
                "source": [],
                "attachments": {"a.png": {"image/png": "AAAA"}}
            }],
            "metadata": {"kernelspec": {"name": "python3"}},
            "nbformat": 4,
            "nbformat_minor": 4,
            "x-custom": true
        });
        let nb: Notebook = serde_json::from_value(input.clone()).unwrap();
        let output = serde_json::to_value(&nb).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_set_cell_type_manages_code_fields() {
        let mut cell = Cell::new(CellType::Markdown, "x");
        cell.set_cell_type(CellType::Code);
        assert_eq!(cell.extra.get("outputs"), Some(&json!([])));
        assert_eq!(cell.extra.get("execution_count"), Some(&Value::Null));

        cell.set_cell_type(CellType::Raw);
        assert!(cell.extra.is_empty());
    }

    #[test]
    fn test_cell_ids_from_minor_five() {
        let mut nb = Notebook::default();
        assert!(nb.supports_cell_ids());
        nb.nbformat_minor = 4;
        assert!(!nb.supports_cell_ids());
        assert_eq!(Notebook::new_cell_id().len(), 8);
    }

    #[test]
    fn test_check_format_rejects_v3() {
        let nb = Notebook {
            nbformat: 3,
            ..Notebook::default()
        };
        assert_eq!(nb.check_format(), Err(UnsupportedFormat { nbformat: 3 }));
    }

    #[test]
    fn test_to_json_string_uses_indent() {
        let json = Notebook::default().to_json_string(1).unwrap();
        assert!(json.starts_with("{\n \"cells\": []"));
        assert!(json.ends_with("}\n"));
    }
}
