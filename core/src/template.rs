use slide_layout_protocol::TemplateSpec;
use tracing::info;

use crate::error::LayoutError;
use crate::error::Result;
use crate::host::NotebookHost;
use crate::slideshow::set_cell_slide;

pub fn validate_template(template: &TemplateSpec) -> Result<()> {
    if template.cells.is_empty() {
        return Err(LayoutError::EmptyTemplate(template.id.clone()));
    }
    Ok(())
}

/// Inserts every cell of `template` below the host's active cell, in order,
/// and returns the indices of the new cells. The last inserted cell is left
/// active.
pub fn apply_template<H>(host: &mut H, template: &TemplateSpec) -> Result<Vec<usize>>
where
    H: NotebookHost + ?Sized,
{
    validate_template(template)?;

    let mut inserted = Vec::with_capacity(template.cells.len());
    for spec in &template.cells {
        let index = host.insert_below();
        host.set_active_cell_type(spec.cell_type)?;
        host.set_active_text(&spec.source)?;
        set_cell_slide(host, index, spec.slide.as_deref());
        inserted.push(index);
    }

    info!(
        template = %template.id,
        cells = inserted.len(),
        "Inserted layout"
    );
    Ok(inserted)
}
