/// Framebuffer - groups color, depth/stencil and resolve attachments
///
/// `FramebufferTargets` holds the validated attachment set and everything
/// derived from it (dimensions, output description). It is built once and is
/// read-only afterwards. Backends wrap it in their own type implementing the
/// `Framebuffer` trait, which adds naming and disposal of backend handles.

use crate::error::Result;
use crate::engine_bail;
use super::attachment::Attachment;
use super::output_description::{
    ColorOutputDescription, OutputAttachmentDescription, OutputDescription,
};
use super::texture::{SampleCount, TextureInfo, TextureSource, TextureUsage};

/// Descriptor for creating a framebuffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FramebufferDesc {
    /// Optional depth/stencil attachment
    pub depth_target: Option<Attachment>,
    /// Color attachments, in shader output slot order
    pub color_targets: Vec<Attachment>,
    /// Either empty, or one entry per color attachment (None = slot not resolved)
    pub resolve_targets: Vec<Option<Attachment>>,
}

impl FramebufferDesc {
    /// Framebuffer without resolve targets
    pub fn new(depth_target: Option<Attachment>, color_targets: Vec<Attachment>) -> Self {
        Self {
            depth_target,
            color_targets,
            resolve_targets: Vec::new(),
        }
    }

    /// Color attachments only
    pub fn color_only(color_targets: Vec<Attachment>) -> Self {
        Self::new(None, color_targets)
    }

    /// Depth attachment only (shadow maps, depth pre-pass)
    pub fn depth_only(depth_target: Attachment) -> Self {
        Self::new(Some(depth_target), Vec::new())
    }

    /// Set the resolve targets (one entry per color attachment)
    pub fn with_resolve_targets(mut self, resolve_targets: Vec<Option<Attachment>>) -> Self {
        self.resolve_targets = resolve_targets;
        self
    }
}

/// Validated, immutable attachment set of a framebuffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramebufferTargets {
    depth_target: Option<Attachment>,
    color_targets: Vec<Attachment>,
    resolve_targets: Vec<Option<Attachment>>,
    width: u32,
    height: u32,
    output_description: OutputDescription,
}

const SOURCE: &str = "galaxy3d::Framebuffer";

impl FramebufferTargets {
    /// Validate a framebuffer descriptor and derive its dimensions and outputs
    ///
    /// Width and height come from the first color attachment (or the depth
    /// attachment when there is no color) at its mip level.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if:
    /// - there is neither a depth nor a color attachment
    /// - resolve targets are given but their count differs from the color count
    /// - an attachment references an unknown texture
    /// - a texture's format or usage doesn't fit its attachment role
    /// - attachments disagree on mip-adjusted size or sample count
    /// - a resolve target is multisampled, has a different format than its
    ///   color slot, or resolves a single-sampled color slot
    pub fn new<S: TextureSource + ?Sized>(desc: &FramebufferDesc, textures: &S) -> Result<Self> {
        if !desc.resolve_targets.is_empty() && desc.resolve_targets.len() != desc.color_targets.len() {
            engine_bail!(SOURCE, InvalidConfiguration:
                "Resolve target count ({}) must be 0 or equal to the color target count ({})",
                desc.resolve_targets.len(), desc.color_targets.len());
        }

        let reference = match (desc.color_targets.first(), desc.depth_target.as_ref()) {
            (Some(color), _) => color,
            (None, Some(depth)) => depth,
            (None, None) => {
                engine_bail!(SOURCE, InvalidConfiguration:
                    "Framebuffer needs at least one color or depth attachment");
            }
        };

        let reference_info = Self::lookup(textures, reference, "reference")?;
        let size = reference_info.mip_dimensions(reference.mip_level());
        let (width, height) = (size.x, size.y);
        let sample_count = reference_info.sample_count;

        let check_extent = |attachment: &Attachment, info: &TextureInfo, role: &str| -> Result<()> {
            let dims = info.mip_dimensions(attachment.mip_level());
            if dims.x != width || dims.y != height {
                engine_bail!(SOURCE, InvalidConfiguration:
                    "{} attachment is {}x{} at mip {}, expected {}x{}",
                    role, dims.x, dims.y, attachment.mip_level(), width, height);
            }
            Ok(())
        };

        let mut color_outputs = Vec::with_capacity(desc.color_targets.len());
        for (slot, attachment) in desc.color_targets.iter().enumerate() {
            let role = format!("Color[{}]", slot);
            let info = Self::lookup(textures, attachment, &role)?;

            if info.format.is_depth_stencil() {
                engine_bail!(SOURCE, InvalidConfiguration:
                    "{} attachment uses depth format {:?}", role, info.format);
            }
            if !info.usage.contains(TextureUsage::RENDER_TARGET) {
                engine_bail!(SOURCE, InvalidConfiguration:
                    "{} texture lacks RENDER_TARGET usage", role);
            }
            check_extent(attachment, info, role.as_str())?;
            Self::check_sample_count(info.sample_count, sample_count, &role)?;

            let has_resolve = match desc.resolve_targets.get(slot).copied().flatten() {
                Some(resolve) => {
                    Self::check_resolve(textures, &resolve, info, slot, &check_extent)?;
                    true
                }
                None => false,
            };

            color_outputs.push(ColorOutputDescription {
                format: info.format,
                sample_count: info.sample_count,
                has_resolve,
            });
        }

        let depth_output = match &desc.depth_target {
            Some(attachment) => {
                let info = Self::lookup(textures, attachment, "Depth")?;
                if !info.format.is_depth_stencil() {
                    engine_bail!(SOURCE, InvalidConfiguration:
                        "Depth attachment uses color format {:?}", info.format);
                }
                if !info.usage.contains(TextureUsage::DEPTH_STENCIL) {
                    engine_bail!(SOURCE, InvalidConfiguration:
                        "Depth texture lacks DEPTH_STENCIL usage");
                }
                check_extent(attachment, info, "Depth")?;
                Self::check_sample_count(info.sample_count, sample_count, "Depth")?;

                Some(OutputAttachmentDescription {
                    format: info.format,
                    sample_count: info.sample_count,
                })
            }
            None => None,
        };

        Ok(Self {
            depth_target: desc.depth_target,
            color_targets: desc.color_targets.clone(),
            resolve_targets: desc.resolve_targets.clone(),
            width,
            height,
            output_description: OutputDescription::new(depth_output, color_outputs),
        })
    }

    fn lookup<'a, S: TextureSource + ?Sized>(
        textures: &'a S,
        attachment: &Attachment,
        role: &str,
    ) -> Result<&'a TextureInfo> {
        match textures.texture_info(attachment.target()) {
            Some(info) => Ok(info),
            None => {
                engine_bail!(SOURCE, InvalidConfiguration:
                    "{} attachment references unknown texture {:?}", role, attachment.target());
            }
        }
    }

    fn check_sample_count(actual: SampleCount, expected: SampleCount, role: &str) -> Result<()> {
        if actual != expected {
            engine_bail!(SOURCE, InvalidConfiguration:
                "{} attachment has {} samples, expected {}",
                role, actual.samples(), expected.samples());
        }
        Ok(())
    }

    fn check_resolve<S, F>(
        textures: &S,
        resolve: &Attachment,
        color_info: &TextureInfo,
        slot: usize,
        check_extent: &F,
    ) -> Result<()>
    where
        S: TextureSource + ?Sized,
        F: Fn(&Attachment, &TextureInfo, &str) -> Result<()>,
    {
        let role = format!("Resolve[{}]", slot);
        let info = Self::lookup(textures, resolve, &role)?;

        if !color_info.sample_count.is_multisampled() {
            engine_bail!(SOURCE, InvalidConfiguration:
                "{} resolves a single-sampled color attachment", role);
        }
        if info.sample_count.is_multisampled() {
            engine_bail!(SOURCE, InvalidConfiguration:
                "{} target must be single-sampled (has {} samples)", role, info.sample_count.samples());
        }
        if info.format != color_info.format {
            engine_bail!(SOURCE, InvalidConfiguration:
                "{} format {:?} differs from color format {:?}", role, info.format, color_info.format);
        }
        if !info.usage.contains(TextureUsage::RENDER_TARGET) {
            engine_bail!(SOURCE, InvalidConfiguration:
                "{} texture lacks RENDER_TARGET usage", role);
        }
        check_extent(resolve, info, role.as_str())
    }

    pub fn depth_target(&self) -> Option<&Attachment> {
        self.depth_target.as_ref()
    }

    pub fn color_targets(&self) -> &[Attachment] {
        &self.color_targets
    }

    /// Empty, or one entry per color target
    pub fn resolve_targets(&self) -> &[Option<Attachment>] {
        &self.resolve_targets
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn output_description(&self) -> &OutputDescription {
        &self.output_description
    }

    /// Iterate over every referenced attachment (depth, colors, resolves)
    pub fn attachments(&self) -> impl Iterator<Item = &Attachment> {
        self.depth_target
            .iter()
            .chain(self.color_targets.iter())
            .chain(self.resolve_targets.iter().flatten())
    }
}

/// Framebuffer: the render target set a render pass draws into
///
/// Implemented by backend-specific framebuffer types. Created via
/// `GraphicsDevice::create_framebuffer()` and shared as `Arc<dyn Framebuffer>`.
/// Disposal releases backend handles tied to the attachment combination but
/// never the referenced textures.
pub trait Framebuffer: Send + Sync {
    /// Validated attachment set and derived properties
    fn targets(&self) -> &FramebufferTargets;

    /// Debug name (graphics debuggers, logs)
    fn name(&self) -> String;

    fn set_name(&self, name: &str);

    fn is_disposed(&self) -> bool;

    /// Release backend handles. Safe to call any number of times.
    fn dispose(&self);

    fn width(&self) -> u32 {
        self.targets().width()
    }

    fn height(&self) -> u32 {
        self.targets().height()
    }

    fn depth_target(&self) -> Option<&Attachment> {
        self.targets().depth_target()
    }

    fn color_targets(&self) -> &[Attachment] {
        self.targets().color_targets()
    }

    fn resolve_targets(&self) -> &[Option<Attachment>] {
        self.targets().resolve_targets()
    }

    fn output_description(&self) -> &OutputDescription {
        self.targets().output_description()
    }
}

#[cfg(test)]
#[path = "frame_buffer_tests.rs"]
mod tests;
