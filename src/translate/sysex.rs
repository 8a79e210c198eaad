//! Yamaha parameter-change frames
//!
//! `F0 43 1n 0ggggghh 0ppppppp 0ddddddd F7`

use std::fmt;

use super::param_map::{MapEntry, ValueRange};
use crate::midi::{format_hex, SYSEX_END, SYSEX_START};

/// Yamaha manufacturer ID
pub const YAMAHA_ID: u8 = 0x43;

/// Sub-status nibble for a parameter change
const PARAMETER_CHANGE: u8 = 0x10;

const GROUP: usize = 3;
const PARAMETER: usize = 4;
const DATA: usize = 5;

/// A complete 7-byte parameter change message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterChange {
    bytes: [u8; 7],
}

impl ParameterChange {
    /// Build the frame for a sysex-class entry
    ///
    /// `channel` is the synth's basic receive channel (0-15). The raw CC value
    /// is rescaled into the entry's range and every field is masked to its
    /// wire width, so any input produces a well-formed frame.
    pub fn build(channel: u8, entry: &MapEntry, raw_value: u8) -> Self {
        let data = rescale(raw_value, entry.range);
        let (group, subgroup) = split_group(entry.group);

        Self {
            bytes: [
                SYSEX_START,
                YAMAHA_ID,
                PARAMETER_CHANGE | (channel & 0x0F),
                pack_group(group, subgroup),
                entry.parameter & 0x7F,
                data & 0x7F,
                SYSEX_END,
            ],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn channel(&self) -> u8 {
        self.bytes[2] & 0x0F
    }

    pub fn group_byte(&self) -> u8 {
        self.bytes[GROUP]
    }

    pub fn parameter(&self) -> u8 {
        self.bytes[PARAMETER]
    }

    pub fn data(&self) -> u8 {
        self.bytes[DATA]
    }
}

impl fmt::Display for ParameterChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_hex(&self.bytes))
    }
}

/// Linearly map a raw 0-127 value into `range`, rounding to nearest
pub fn rescale(raw_value: u8, range: ValueRange) -> u8 {
    let raw = raw_value.min(127) as u32;
    let (min, max) = (range.min as u32, range.max as u32);
    if max <= min {
        return range.min;
    }

    let scaled = min + (raw * (max - min) + 63) / 127;
    scaled.clamp(min, max) as u8
}

/// Split a packed group byte into (group, subgroup)
pub fn split_group(group_byte: u8) -> (u8, u8) {
    ((group_byte >> 2) & 0x1F, group_byte & 0x03)
}

/// Pack a 5-bit group and 2-bit subgroup into one data byte
pub fn pack_group(group: u8, subgroup: u8) -> u8 {
    ((group & 0x1F) << 2) | (subgroup & 0x03)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::param_map::{lookup, CcClass, ACED, DX7_VOICE_HIGH, MAP, VCED};
    use proptest::prelude::*;

    #[test]
    fn test_transpose_full_scale() {
        let frame = ParameterChange::build(0, lookup(1), 127);
        assert_eq!(frame.as_bytes(), &[0xF0, 0x43, 0x10, 0x12, 0x3E, 0x30, 0xF7]);
        assert_eq!(frame.group_byte(), VCED);
        assert_eq!(frame.parameter(), 62);
        assert_eq!(frame.data(), 48);
    }

    #[test]
    fn test_channel_lands_in_status_nibble() {
        let frame = ParameterChange::build(9, lookup(3), 0);
        assert_eq!(frame.as_bytes()[2], 0x19);
        assert_eq!(frame.channel(), 9);

        // out of range channel is masked, never rejected
        let frame = ParameterChange::build(0x1F, lookup(3), 0);
        assert_eq!(frame.as_bytes()[2], 0x1F);
    }

    #[test]
    fn test_dx7_high_parameter_bank() {
        // Algorithm is DX7 voice parameter 134 = bank 1, parameter 6
        let frame = ParameterChange::build(0, lookup(76), 127);
        assert_eq!(frame.group_byte(), DX7_VOICE_HIGH);
        assert_eq!(frame.parameter(), 6);
        assert_eq!(frame.data(), 31);
    }

    #[test]
    fn test_group_split_round_trip() {
        assert_eq!(split_group(VCED), (4, 2));
        assert_eq!(split_group(ACED), (4, 3));
        assert_eq!(pack_group(4, 2), VCED);
        assert_eq!(split_group(DX7_VOICE_HIGH), (0, 1));
    }

    #[test]
    fn test_rescale_endpoints() {
        let range = ValueRange::new(0, 99);
        assert_eq!(rescale(0, range), 0);
        assert_eq!(rescale(127, range), 99);
        assert_eq!(rescale(64, range), 50);

        let switch = ValueRange::new(0, 1);
        assert_eq!(rescale(63, switch), 0);
        assert_eq!(rescale(64, switch), 1);
    }

    #[test]
    fn test_rescale_clamps_bad_input() {
        let range = ValueRange::new(10, 20);
        assert_eq!(rescale(255, range), 20);
        assert_eq!(rescale(0, range), 10);

        let inverted = ValueRange::new(20, 10);
        assert_eq!(rescale(127, inverted), 20);
    }

    #[test]
    fn test_display_is_hex() {
        let frame = ParameterChange::build(0, lookup(1), 127);
        assert_eq!(frame.to_string(), "F0 43 10 12 3E 30 F7");
    }

    proptest! {
        #[test]
        fn frame_is_always_well_formed(cc in 0u8..128, raw in 0u8..128, channel in 0u8..16) {
            let entry = &MAP[cc as usize];
            prop_assume!(entry.class == CcClass::Sysex);

            let frame = ParameterChange::build(channel, entry, raw);
            let bytes = frame.as_bytes();
            prop_assert_eq!(bytes.len(), 7);
            prop_assert_eq!(bytes[0], 0xF0);
            prop_assert_eq!(bytes[6], 0xF7);
            for b in &bytes[1..6] {
                prop_assert!(b & 0x80 == 0);
            }
            prop_assert!(frame.data() >= entry.range.min && frame.data() <= entry.range.max);
        }

        #[test]
        fn rescale_is_monotonic(a in 0u8..128, b in 0u8..128, min in 0u8..128, span in 0u8..128) {
            let range = ValueRange::new(min, min.saturating_add(span).min(127));
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(rescale(lo, range) <= rescale(hi, range));
        }
    }
}
