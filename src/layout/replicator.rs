//! Page instance stamping.

use log::debug;

use crate::canvas::{Canvas, CopyBuffer};
use crate::error::Result;
use crate::model::{CellRange, PageTemplate};

/// Stamps copies of the page template next to (or below) the original.
///
/// Instance 0 is the template itself; instance `k` starts `k` template
/// widths to the right (or `k` heights down). Copies carry formatting,
/// merges and column widths through the caller's [`CopyBuffer`].
#[derive(Debug, Clone, Copy)]
pub struct TemplateReplicator {
    template: PageTemplate,
}

impl TemplateReplicator {
    /// Create a replicator for `template`.
    pub fn new(template: PageTemplate) -> Self {
        Self { template }
    }

    /// The template being replicated.
    pub fn template(&self) -> &PageTemplate {
        &self.template
    }

    /// Stamp a measuring copy at instance 1 and return its range.
    ///
    /// The copy carries content and merges only, so column widths and row
    /// heights at instance 1 survive [`clear_probe`](Self::clear_probe).
    pub fn probe<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        buffer: &mut CopyBuffer,
    ) -> Result<CellRange> {
        canvas.copy_range(self.template.range, buffer)?;
        buffer.discard_sizes();
        let probe = canvas.paste(buffer, self.template.instance_origin(1))?;
        debug!("Probe copy of {} stamped at {}", self.template.range, probe);
        Ok(probe)
    }

    /// Remove the measuring copy.
    pub fn clear_probe<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<()> {
        canvas.clear_range(self.template.instance_range(1))
    }

    /// Create page instances `1..page_count`.
    ///
    /// The engine does not check for earlier instances: running this twice
    /// stamps over the previous copies. The buffer is cleared afterwards.
    /// Returns the number of copies made.
    pub fn replicate<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        page_count: usize,
        buffer: &mut CopyBuffer,
    ) -> Result<usize> {
        if page_count <= 1 {
            return Ok(0);
        }

        canvas.copy_range(self.template.range, buffer)?;
        for index in 1..page_count as u32 {
            let written = canvas.paste(buffer, self.template.instance_origin(index))?;
            debug!("Page instance {} stamped at {}", index, written);
        }
        buffer.clear();

        Ok(page_count - 1)
    }
}
