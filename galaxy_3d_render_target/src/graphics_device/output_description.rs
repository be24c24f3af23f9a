/// OutputDescription - format/sample-count summary of a framebuffer's attachments
///
/// Pipelines keep an OutputDescription instead of a framebuffer reference and
/// compare it against the framebuffer they are about to draw into.

use super::texture::{SampleCount, TextureFormat};

/// Format and sample count of one attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputAttachmentDescription {
    pub format: TextureFormat,
    pub sample_count: SampleCount,
}

/// Format, sample count and resolve flag of one color slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorOutputDescription {
    pub format: TextureFormat,
    pub sample_count: SampleCount,
    /// True if this slot has a resolve target
    pub has_resolve: bool,
}

/// Summary of a framebuffer's outputs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputDescription {
    depth_attachment: Option<OutputAttachmentDescription>,
    color_attachments: Vec<ColorOutputDescription>,
    sample_count: SampleCount,
}

impl OutputDescription {
    /// Build a description directly (e.g. when authoring a pipeline)
    ///
    /// The overall sample count is taken from the first color slot, else from
    /// the depth attachment, else single-sampled.
    pub fn new(
        depth_attachment: Option<OutputAttachmentDescription>,
        color_attachments: Vec<ColorOutputDescription>,
    ) -> Self {
        let sample_count = color_attachments
            .first()
            .map(|c| c.sample_count)
            .or(depth_attachment.map(|d| d.sample_count))
            .unwrap_or_default();

        Self { depth_attachment, color_attachments, sample_count }
    }

    /// Depth attachment summary, if the framebuffer has one
    pub fn depth_attachment(&self) -> Option<&OutputAttachmentDescription> {
        self.depth_attachment.as_ref()
    }

    /// Color slot summaries, in shader output order
    pub fn color_attachments(&self) -> &[ColorOutputDescription] {
        &self.color_attachments
    }

    /// Shared sample count of all attachments
    pub fn sample_count(&self) -> SampleCount {
        self.sample_count
    }

    pub fn color_count(&self) -> usize {
        self.color_attachments.len()
    }

    pub fn has_depth(&self) -> bool {
        self.depth_attachment.is_some()
    }

    /// True if any color slot is resolved
    pub fn has_resolve_targets(&self) -> bool {
        self.color_attachments.iter().any(|c| c.has_resolve)
    }

    /// Render-pipeline/render-target compatibility check
    ///
    /// Two outputs are compatible when they have the same depth presence and
    /// format, the same color slot formats in the same order, and the same
    /// sample count. Resolve flags don't affect pipeline compatibility.
    pub fn is_compatible_with(&self, other: &OutputDescription) -> bool {
        self.sample_count == other.sample_count
            && self.depth_attachment.map(|d| d.format) == other.depth_attachment.map(|d| d.format)
            && self.color_attachments.len() == other.color_attachments.len()
            && self
                .color_attachments
                .iter()
                .zip(&other.color_attachments)
                .all(|(a, b)| a.format == b.format)
    }
}

#[cfg(test)]
#[path = "output_description_tests.rs"]
mod tests;
