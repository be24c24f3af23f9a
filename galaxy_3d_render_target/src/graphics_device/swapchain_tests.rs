/// Tests for SwapchainDesc and the SwapchainState lifecycle

use super::*;
use crate::error::Error;

// ============================================================================
// Tests: SwapchainDesc
// ============================================================================

#[test]
fn test_default_desc() {
    let desc = SwapchainDesc::default();
    assert_eq!((desc.width, desc.height), (1280, 720));
    assert_eq!(desc.buffer_count, 3);
    assert_eq!(desc.color_format, TextureFormat::B8G8R8A8_UNORM);
    assert_eq!(desc.depth_format, None);
    assert!(desc.sync_to_vertical_blank);
    assert_eq!(desc.acquire_timeout, Duration::from_secs(1));
    assert!(desc.validate().is_ok());
}

#[test]
fn test_desc_zero_extent_rejected() {
    let desc = SwapchainDesc { width: 0, ..Default::default() };
    assert!(matches!(desc.validate(), Err(Error::InvalidConfiguration(_))));

    let desc = SwapchainDesc { height: 0, ..Default::default() };
    assert!(matches!(desc.validate(), Err(Error::InvalidConfiguration(_))));
}

#[test]
fn test_desc_zero_buffers_rejected() {
    let desc = SwapchainDesc { buffer_count: 0, ..Default::default() };
    assert!(matches!(desc.validate(), Err(Error::InvalidConfiguration(_))));
}

#[test]
fn test_desc_format_roles_checked() {
    let desc = SwapchainDesc { color_format: TextureFormat::D32_FLOAT, ..Default::default() };
    assert!(matches!(desc.validate(), Err(Error::InvalidConfiguration(_))));

    let desc = SwapchainDesc { depth_format: Some(TextureFormat::R8G8B8A8_UNORM), ..Default::default() };
    assert!(matches!(desc.validate(), Err(Error::InvalidConfiguration(_))));

    let desc = SwapchainDesc { depth_format: Some(TextureFormat::D24_UNORM_S8_UINT), ..Default::default() };
    assert!(desc.validate().is_ok());
}

// ============================================================================
// Tests: SwapchainState transitions
// ============================================================================

#[test]
fn test_state_starts_created() {
    let state = SwapchainState::default();
    assert_eq!(state, SwapchainState::Created);
    assert!(state.is_live());
    assert_eq!(state.acquired_image(), None);
}

#[test]
fn test_acquire_present_cycle() {
    let mut state = SwapchainState::Created;

    state.acquire(1, 3).unwrap();
    assert_eq!(state, SwapchainState::Acquired { image: 1 });
    assert_eq!(state.acquired_image(), Some(1));

    assert_eq!(state.present().unwrap(), 1);
    assert_eq!(state, SwapchainState::Presented);
    assert_eq!(state.acquired_image(), None);

    state.acquire(2, 3).unwrap();
    assert_eq!(state.present().unwrap(), 2);
}

#[test]
fn test_present_without_acquire_fails() {
    let mut state = SwapchainState::Created;
    assert!(matches!(state.present(), Err(Error::InvalidOperation(_))));

    state.acquire(0, 2).unwrap();
    state.present().unwrap();
    assert!(matches!(state.present(), Err(Error::InvalidOperation(_))));
    assert_eq!(state, SwapchainState::Presented);
}

#[test]
fn test_double_acquire_fails() {
    let mut state = SwapchainState::Created;
    state.acquire(0, 2).unwrap();
    assert!(matches!(state.acquire(1, 2), Err(Error::InvalidOperation(_))));
    assert_eq!(state, SwapchainState::Acquired { image: 0 });
}

#[test]
fn test_acquire_out_of_range_fails() {
    let mut state = SwapchainState::Created;
    assert!(matches!(state.acquire(3, 3), Err(Error::InvalidResource(_))));
    assert_eq!(state, SwapchainState::Created);
}

#[test]
fn test_reset_from_any_live_state() {
    let mut state = SwapchainState::Created;
    state.reset().unwrap();
    assert_eq!(state, SwapchainState::Created);

    state.acquire(1, 2).unwrap();
    state.reset().unwrap();
    assert_eq!(state, SwapchainState::Created);

    state.acquire(1, 2).unwrap();
    state.present().unwrap();
    state.reset().unwrap();
    assert_eq!(state, SwapchainState::Created);
}

// ============================================================================
// Tests: Disposal
// ============================================================================

#[test]
fn test_dispose_is_terminal_and_idempotent() {
    let mut state = SwapchainState::Acquired { image: 0 };

    assert!(state.dispose());
    assert!(!state.is_live());
    assert!(!state.dispose());
    assert_eq!(state, SwapchainState::Disposed);
}

#[test]
fn test_operations_after_dispose_fail() {
    let mut state = SwapchainState::Created;
    state.dispose();

    assert!(matches!(state.acquire(0, 1), Err(Error::InvalidOperation(_))));
    assert!(matches!(state.present(), Err(Error::InvalidOperation(_))));
    assert!(matches!(state.reset(), Err(Error::InvalidOperation(_))));
    assert!(matches!(state.ensure_live("resize"), Err(Error::InvalidOperation(_))));
    assert_eq!(state, SwapchainState::Disposed);
}
