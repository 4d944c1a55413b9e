//! Keyboard modifier state handling
//!
//! A window only sees key events while it has focus, so a modifier released
//! while another window was focused would stay "held" forever. On activation
//! the cached counters are compared with the OS and compensating releases are
//! synthesized for every group the OS no longer reports.

use anchor::{ModifierKey, PlatformSystem};
use smallvec::SmallVec;

use crate::event::{Event, EventType, EventValue, ModifierKind};

/// Whether the OS reports either key of `kind` as held.
pub fn os_modifier_held(system: &dyn PlatformSystem, kind: ModifierKind) -> bool {
    let keys: &[ModifierKey] = match kind {
        ModifierKind::Shift => &[ModifierKey::LeftShift, ModifierKey::RightShift],
        ModifierKind::Ctrl => &[ModifierKey::LeftControl, ModifierKey::RightControl],
        ModifierKind::Alt => &[ModifierKey::LeftAlt, ModifierKey::RightAlt],
        ModifierKind::Os => &[ModifierKey::Os],
    };
    keys.iter().any(|key| system.modifier_key_state(*key))
}

/// Resync the cached modifier counters with the OS.
///
/// Returns one release event per stale group, in shift, ctrl, alt, os order.
/// The raw key modifier is always cleared.
///
/// # Arguments
/// * `state` - The window's event state
/// * `os_held` - Reports whether the OS holds a modifier group
pub fn handle_modifiers_changed(
    state: &mut Event,
    os_held: impl Fn(ModifierKind) -> bool,
) -> SmallVec<[Event; 4]> {
    let mut releases = SmallVec::new();

    for kind in ModifierKind::ORDER {
        if !state.modifiers.is_held(kind) || os_held(kind) {
            continue;
        }
        state.modifiers.clear_kind(kind);

        let mut release = state.snapshot();
        release.prev_ty = state.ty;
        release.prev_val = state.val;
        release.ty = EventType::Key(kind.left_key());
        release.val = EventValue::Release;
        release.is_repeat = false;
        release.utf8.clear();
        release.ascii = 0;
        release.modifiers = state.modifiers;
        tracing::debug!("Releasing stale {:?} modifier", kind);
        releases.push(release);
    }

    state.keymodifier = None;
    releases
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor::Key;

    #[test]
    fn test_stale_modifiers_released_in_order() {
        let mut state = Event::default();
        state.modifiers.oskey = 1;
        state.modifiers.shift = 2;
        state.modifiers.alt = 1;
        state.keymodifier = Some(Key::Letter('g'));

        let releases = handle_modifiers_changed(&mut state, |kind| kind == ModifierKind::Alt);
        let keys: Vec<_> = releases.iter().map(|e| e.ty).collect();
        assert_eq!(
            keys,
            vec![EventType::Key(Key::LeftShift), EventType::Key(Key::Os)]
        );
        assert!(releases.iter().all(|e| e.val == EventValue::Release));
        assert_eq!(state.modifiers.shift, 0);
        assert_eq!(state.modifiers.alt, 1);
        assert_eq!(state.keymodifier, None);
    }

    #[test]
    fn test_nothing_held_nothing_synthesized() {
        let mut state = Event::default();
        assert!(handle_modifiers_changed(&mut state, |_| false).is_empty());
    }
}
