// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixed-capacity active slot array.

use vidslot_port::{ActiveSlotArray, InputId};

use crate::reconcile::Slot;

/// Active slot array plus whatever did not fit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSlots {
    /// Exactly `capacity` entries; `None` marks an empty position.
    pub slots: ActiveSlotArray,
    /// Inputs dropped from the tail because capacity ran out, in slot order.
    pub overflow: Vec<InputId>,
}

/// Map `slots` onto exactly `capacity` positions.
///
/// Slot order is priority order, so overflow drops the lowest-priority
/// (trailing) inputs.
pub fn build_active_array(slots: &[Slot], capacity: usize) -> ActiveSlots {
    let mut out: ActiveSlotArray = slots
        .iter()
        .take(capacity)
        .map(|slot| Some(slot.to_active_slot()))
        .collect();
    out.resize(capacity, None);
    let overflow = slots
        .iter()
        .skip(capacity)
        .map(|slot| slot.id.clone())
        .collect();
    ActiveSlots {
        slots: out,
        overflow,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;
    use vidslot_port::{VideoInput, VideoInputType};

    fn slot(id: &str) -> Slot {
        VideoInput {
            id: InputId::camera(id),
            kind: VideoInputType::Camera,
            display_name: id.into(),
            dominant: false,
            paused: false,
            paused_by_user: false,
            track: None,
            surface: None,
        }
    }

    #[test]
    fn pads_with_empty_markers() {
        let out = build_active_array(&[slot("a")], 3);
        assert_eq!(out.slots.len(), 3);
        assert_eq!(out.slots[0].as_ref().map(|s| s.id.as_str()), Some("a"));
        assert!(out.slots[1].is_none());
        assert!(out.slots[2].is_none());
        assert!(out.overflow.is_empty());
    }

    #[test]
    fn truncates_tail_and_reports_overflow() {
        let out = build_active_array(&[slot("a"), slot("b"), slot("c")], 2);
        assert_eq!(out.slots.len(), 2);
        assert!(out.slots.iter().all(Option::is_some));
        assert_eq!(out.overflow, vec![InputId::camera("c")]);
    }
}
