/// Tests for OutputDescription
///
/// Validates sample-count derivation and pipeline compatibility rules.

use super::*;

fn color(format: TextureFormat, sample_count: SampleCount, has_resolve: bool) -> ColorOutputDescription {
    ColorOutputDescription { format, sample_count, has_resolve }
}

fn depth(format: TextureFormat, sample_count: SampleCount) -> OutputAttachmentDescription {
    OutputAttachmentDescription { format, sample_count }
}

// ============================================================================
// Tests: Construction
// ============================================================================

#[test]
fn test_sample_count_from_first_color_slot() {
    let desc = OutputDescription::new(
        Some(depth(TextureFormat::D32_FLOAT, SampleCount::Count4)),
        vec![color(TextureFormat::R8G8B8A8_UNORM, SampleCount::Count4, true)],
    );
    assert_eq!(desc.sample_count(), SampleCount::Count4);
    assert_eq!(desc.color_count(), 1);
    assert!(desc.has_depth());
    assert!(desc.has_resolve_targets());
}

#[test]
fn test_sample_count_from_depth_when_no_color() {
    let desc = OutputDescription::new(Some(depth(TextureFormat::D16_UNORM, SampleCount::Count2)), vec![]);
    assert_eq!(desc.sample_count(), SampleCount::Count2);
    assert_eq!(desc.color_count(), 0);
    assert!(!desc.has_resolve_targets());
}

#[test]
fn test_empty_description_is_single_sampled() {
    let desc = OutputDescription::new(None, vec![]);
    assert_eq!(desc.sample_count(), SampleCount::Count1);
    assert!(!desc.has_depth());
}

// ============================================================================
// Tests: Compatibility
// ============================================================================

#[test]
fn test_identical_descriptions_are_compatible() {
    let a = OutputDescription::new(
        Some(depth(TextureFormat::D32_FLOAT, SampleCount::Count1)),
        vec![color(TextureFormat::B8G8R8A8_UNORM, SampleCount::Count1, false)],
    );
    assert!(a.is_compatible_with(&a.clone()));
    assert_eq!(a, a.clone());
}

#[test]
fn test_resolve_flag_does_not_affect_compatibility() {
    let a = OutputDescription::new(None, vec![color(TextureFormat::R8G8B8A8_UNORM, SampleCount::Count4, true)]);
    let b = OutputDescription::new(None, vec![color(TextureFormat::R8G8B8A8_UNORM, SampleCount::Count4, false)]);
    assert!(a.is_compatible_with(&b));
    assert_ne!(a, b);
}

#[test]
fn test_depth_presence_mismatch_is_incompatible() {
    let a = OutputDescription::new(
        Some(depth(TextureFormat::D32_FLOAT, SampleCount::Count1)),
        vec![color(TextureFormat::R8G8B8A8_UNORM, SampleCount::Count1, false)],
    );
    let b = OutputDescription::new(None, vec![color(TextureFormat::R8G8B8A8_UNORM, SampleCount::Count1, false)]);
    assert!(!a.is_compatible_with(&b));
    assert!(!b.is_compatible_with(&a));
}

#[test]
fn test_color_format_or_order_mismatch_is_incompatible() {
    let a = OutputDescription::new(None, vec![
        color(TextureFormat::R8G8B8A8_UNORM, SampleCount::Count1, false),
        color(TextureFormat::R16G16B16A16_SFLOAT, SampleCount::Count1, false),
    ]);
    let swapped = OutputDescription::new(None, vec![
        color(TextureFormat::R16G16B16A16_SFLOAT, SampleCount::Count1, false),
        color(TextureFormat::R8G8B8A8_UNORM, SampleCount::Count1, false),
    ]);
    assert!(!a.is_compatible_with(&swapped));
}

#[test]
fn test_sample_count_mismatch_is_incompatible() {
    let a = OutputDescription::new(None, vec![color(TextureFormat::R8G8B8A8_UNORM, SampleCount::Count1, false)]);
    let b = OutputDescription::new(None, vec![color(TextureFormat::R8G8B8A8_UNORM, SampleCount::Count8, false)]);
    assert!(!a.is_compatible_with(&b));
}
