//! CC parameter map
//!
//! One entry per controller number. The table is the address book for the
//! target synth family: CC 0-20 drive TX81Z voice (VCED) parameters, CC 21-107
//! drive DX7-style operator parameters, a handful of controllers stay native
//! for host plugins, and CC 120-127 are forwarded untouched.
//!
//! Group values are packed group bytes (`0ggggghh`): five group bits and two
//! subgroup bits, exactly as they appear on the wire.

use std::fmt;

/// TX81Z voice parameters (group 4, subgroup 2)
pub const VCED: u8 = 0x12;
/// TX81Z additional voice parameters (group 4, subgroup 3)
pub const ACED: u8 = 0x13;
/// DX7 voice parameters 0-127
pub const DX7_VOICE: u8 = 0x00;
/// DX7 voice parameters 128-155; the parameter MSB rides in the subgroup bits
pub const DX7_VOICE_HIGH: u8 = 0x01;

/// How a controller number is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CcClass {
    /// Channel mode region, forwarded as-is
    System,
    /// Translated into a parameter change
    Sysex,
    /// Intentionally unmapped, dropped
    Skip,
    /// Passed through as a standard Control Change
    Cc,
}

impl CcClass {
    pub const ALL: [CcClass; 4] = [CcClass::System, CcClass::Sysex, CcClass::Skip, CcClass::Cc];

    /// Dense index for per-class state
    pub const fn index(self) -> usize {
        match self {
            CcClass::System => 0,
            CcClass::Sysex => 1,
            CcClass::Skip => 2,
            CcClass::Cc => 3,
        }
    }
}

impl fmt::Display for CcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CcClass::System => "system",
            CcClass::Sysex => "sysex",
            CcClass::Skip => "skip",
            CcClass::Cc => "cc",
        };
        f.write_str(name)
    }
}

/// Output range a raw 0-127 value is rescaled into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    pub min: u8,
    pub max: u8,
}

impl ValueRange {
    pub const FULL: ValueRange = ValueRange { min: 0, max: 127 };

    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }
}

/// One row of the parameter map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapEntry {
    pub class: CcClass,
    pub cc: u8,
    pub range: ValueRange,
    /// Packed group byte, meaningful for `Sysex` entries only
    pub group: u8,
    /// Parameter number within the group, meaningful for `Sysex` entries only
    pub parameter: u8,
    pub label: &'static str,
}

impl MapEntry {
    const fn sysex(cc: u8, max: u8, group: u8, parameter: u8, label: &'static str) -> Self {
        Self {
            class: CcClass::Sysex,
            cc,
            range: ValueRange::new(0, max),
            group,
            parameter,
            label,
        }
    }

    const fn passthrough(cc: u8, label: &'static str) -> Self {
        Self { class: CcClass::Cc, cc, range: ValueRange::FULL, group: 0, parameter: 0, label }
    }

    const fn skip(cc: u8) -> Self {
        Self { class: CcClass::Skip, cc, range: ValueRange::FULL, group: 0, parameter: 0, label: "" }
    }

    const fn system(cc: u8, label: &'static str) -> Self {
        Self { class: CcClass::System, cc, range: ValueRange::FULL, group: 0, parameter: 0, label }
    }
}

use MapEntry as E;

/// The parameter map, indexed by CC number
pub static MAP: [MapEntry; 128] = [
    E::sysex(0, 1, VCED, 63, "VCED Poly/Mono"),
    E::sysex(1, 48, VCED, 62, "VCED Transpose"),
    E::passthrough(2, "Breath"),
    E::sysex(3, 99, VCED, 54, "VCED LFO Speed"),
    E::passthrough(4, "Foot"),
    E::passthrough(5, "Portamento Time"),
    E::sysex(6, 99, VCED, 55, "VCED LFO Delay"),
    E::passthrough(7, "Volume"),
    E::sysex(8, 99, VCED, 56, "VCED Pitch Mod Depth"),
    E::sysex(9, 99, VCED, 57, "VCED Amp Mod Depth"),
    E::passthrough(10, "Pan"),
    E::sysex(11, 12, VCED, 64, "VCED Pitch Bend Range"),
    E::sysex(12, 3, VCED, 59, "VCED LFO Wave"),
    E::sysex(13, 1, VCED, 58, "VCED LFO Sync"),
    E::sysex(14, 7, VCED, 60, "VCED Pitch Mod Sens"),
    E::sysex(15, 3, VCED, 61, "VCED Amp Mod Sens"),
    E::sysex(16, 1, VCED, 65, "VCED Portamento Mode"),
    E::sysex(17, 99, VCED, 66, "VCED Portamento Time"),
    E::sysex(18, 99, VCED, 67, "VCED Foot Control Volume"),
    E::sysex(19, 1, VCED, 68, "VCED Sustain"),
    E::sysex(20, 99, VCED, 69, "VCED Portamento"),
    E::sysex(21, 99, DX7_VOICE, 84, "OP2 EG Rate 1"),
    E::sysex(22, 99, DX7_VOICE, 63, "OP3 EG Rate 1"),
    E::sysex(23, 99, DX7_VOICE, 42, "OP4 EG Rate 1"),
    E::sysex(24, 99, DX7_VOICE, 21, "OP5 EG Rate 1"),
    E::sysex(25, 99, DX7_VOICE, 0, "OP6 EG Rate 1"),
    E::sysex(26, 99, DX7_VOICE, 106, "OP1 EG Rate 2"),
    E::sysex(27, 99, DX7_VOICE, 85, "OP2 EG Rate 2"),
    E::sysex(28, 99, DX7_VOICE, 64, "OP3 EG Rate 2"),
    E::sysex(29, 99, DX7_VOICE, 43, "OP4 EG Rate 2"),
    E::sysex(30, 99, DX7_VOICE, 22, "OP5 EG Rate 2"),
    E::sysex(31, 99, DX7_VOICE, 1, "OP6 EG Rate 2"),
    E::sysex(32, 99, DX7_VOICE, 107, "OP1 EG Rate 3"),
    E::sysex(33, 99, DX7_VOICE, 86, "OP2 EG Rate 3"),
    E::sysex(34, 99, DX7_VOICE, 65, "OP3 EG Rate 3"),
    E::sysex(35, 99, DX7_VOICE, 44, "OP4 EG Rate 3"),
    E::sysex(36, 99, DX7_VOICE, 23, "OP5 EG Rate 3"),
    E::sysex(37, 99, DX7_VOICE, 2, "OP6 EG Rate 3"),
    E::sysex(38, 99, DX7_VOICE, 108, "OP1 EG Rate 4"),
    E::sysex(39, 99, DX7_VOICE, 87, "OP2 EG Rate 4"),
    E::sysex(40, 99, DX7_VOICE, 66, "OP3 EG Rate 4"),
    E::sysex(41, 99, DX7_VOICE, 45, "OP4 EG Rate 4"),
    E::sysex(42, 99, DX7_VOICE, 24, "OP5 EG Rate 4"),
    E::sysex(43, 99, DX7_VOICE, 3, "OP6 EG Rate 4"),
    E::sysex(44, 31, DX7_VOICE, 123, "OP1 Coarse"),
    E::sysex(45, 31, DX7_VOICE, 102, "OP2 Coarse"),
    E::sysex(46, 31, DX7_VOICE, 81, "OP3 Coarse"),
    E::sysex(47, 31, DX7_VOICE, 60, "OP4 Coarse"),
    E::sysex(48, 31, DX7_VOICE, 39, "OP5 Coarse"),
    E::sysex(49, 31, DX7_VOICE, 18, "OP6 Coarse"),
    E::sysex(50, 99, DX7_VOICE, 124, "OP1 Fine"),
    E::sysex(51, 99, DX7_VOICE, 103, "OP2 Fine"),
    E::sysex(52, 99, DX7_VOICE, 82, "OP3 Fine"),
    E::sysex(53, 99, DX7_VOICE, 61, "OP4 Fine"),
    E::sysex(54, 99, DX7_VOICE, 40, "OP5 Fine"),
    E::sysex(55, 99, DX7_VOICE, 19, "OP6 Fine"),
    E::skip(56),
    E::skip(57),
    E::skip(58),
    E::skip(59),
    E::skip(60),
    E::skip(61),
    E::skip(62),
    E::skip(63),
    E::passthrough(64, "Sustain"),
    E::skip(65),
    E::passthrough(66, "Sostenuto"),
    E::skip(67),
    E::skip(68),
    E::skip(69),
    E::skip(70),
    E::passthrough(71, "Resonance"),
    E::skip(72),
    E::sysex(73, 48, DX7_VOICE_HIGH, 16, "Transpose"),
    E::passthrough(74, "Cutoff"),
    E::sysex(75, 7, DX7_VOICE_HIGH, 7, "Feedback"),
    E::sysex(76, 31, DX7_VOICE_HIGH, 6, "Algorithm"),
    E::skip(77),
    E::sysex(78, 99, DX7_VOICE, 109, "OP1 EG Level 1"),
    E::sysex(79, 99, DX7_VOICE, 110, "OP1 EG Level 2"),
    E::sysex(80, 99, DX7_VOICE, 111, "OP1 EG Level 3"),
    E::sysex(81, 99, DX7_VOICE, 112, "OP1 EG Level 4"),
    E::sysex(82, 99, DX7_VOICE, 88, "OP2 EG Level 1"),
    E::sysex(83, 99, DX7_VOICE, 89, "OP2 EG Level 2"),
    E::sysex(84, 99, DX7_VOICE, 90, "OP2 EG Level 3"),
    E::sysex(85, 99, DX7_VOICE, 91, "OP2 EG Level 4"),
    E::sysex(86, 99, DX7_VOICE, 67, "OP3 EG Level 1"),
    E::sysex(87, 99, DX7_VOICE, 68, "OP3 EG Level 2"),
    E::sysex(88, 99, DX7_VOICE, 69, "OP3 EG Level 3"),
    E::sysex(89, 99, DX7_VOICE, 70, "OP3 EG Level 4"),
    E::sysex(90, 99, DX7_VOICE, 46, "OP4 EG Level 1"),
    E::sysex(91, 99, DX7_VOICE, 47, "OP4 EG Level 2"),
    E::sysex(92, 99, DX7_VOICE, 48, "OP4 EG Level 3"),
    E::sysex(93, 99, DX7_VOICE, 49, "OP4 EG Level 4"),
    E::sysex(94, 99, DX7_VOICE, 25, "OP5 EG Level 1"),
    E::sysex(95, 99, DX7_VOICE, 26, "OP5 EG Level 2"),
    E::sysex(96, 99, DX7_VOICE, 27, "OP5 EG Level 3"),
    E::sysex(97, 99, DX7_VOICE, 28, "OP5 EG Level 4"),
    E::sysex(98, 99, DX7_VOICE, 4, "OP6 EG Level 1"),
    E::sysex(99, 99, DX7_VOICE, 5, "OP6 EG Level 2"),
    E::sysex(100, 99, DX7_VOICE, 6, "OP6 EG Level 3"),
    E::sysex(101, 99, DX7_VOICE, 7, "OP6 EG Level 4"),
    E::sysex(102, 99, DX7_VOICE, 121, "OP1 Output Level"),
    E::sysex(103, 99, DX7_VOICE, 100, "OP2 Output Level"),
    E::sysex(104, 99, DX7_VOICE, 79, "OP3 Output Level"),
    E::sysex(105, 99, DX7_VOICE, 58, "OP4 Output Level"),
    E::sysex(106, 99, DX7_VOICE, 37, "OP5 Output Level"),
    E::sysex(107, 99, DX7_VOICE, 16, "OP6 Output Level"),
    E::skip(108),
    E::skip(109),
    E::skip(110),
    E::skip(111),
    E::skip(112),
    E::skip(113),
    E::skip(114),
    E::skip(115),
    E::skip(116),
    E::skip(117),
    E::skip(118),
    E::skip(119),
    E::system(120, "All Sound Off"),
    E::system(121, "Reset All Controllers"),
    E::system(122, "Local Control"),
    E::system(123, "All Notes Off"),
    E::system(124, "Omni Off"),
    E::system(125, "Omni On"),
    E::system(126, "Mono On"),
    E::system(127, "Poly On"),
];

/// Look up the entry for a controller number
///
/// Total over 0-127; the top bit of `cc` is ignored.
pub fn lookup(cc: u8) -> &'static MapEntry {
    &MAP[(cc & 0x7F) as usize]
}

/// Iterate entries of one class in CC order
pub fn entries_of(class: CcClass) -> impl Iterator<Item = &'static MapEntry> {
    MAP.iter().filter(move |e| e.class == class)
}
