//! MIDI message model
//!
//! Parses inbound byte buffers into typed messages for classification and
//! logging. Forwarded traffic always goes out as the original bytes.

use std::fmt;

/// Status byte of a Control Change on channel 0
pub const CONTROL_CHANGE: u8 = 0xB0;
/// Start of System Exclusive
pub const SYSEX_START: u8 = 0xF0;
/// End of System Exclusive
pub const SYSEX_END: u8 = 0xF7;

/// MIDI message types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidiMessage {
    /// Note Off: channel (0-15), note (0-127), velocity (0-127)
    NoteOff { channel: u8, note: u8, velocity: u8 },

    /// Note On: channel (0-15), note (0-127), velocity (0-127)
    NoteOn { channel: u8, note: u8, velocity: u8 },

    /// Polyphonic Key Pressure: channel (0-15), note (0-127), pressure (0-127)
    PolyPressure { channel: u8, note: u8, pressure: u8 },

    /// Control Change: channel (0-15), cc (0-127), value (0-127)
    ControlChange { channel: u8, cc: u8, value: u8 },

    /// Program Change: channel (0-15), program (0-127)
    ProgramChange { channel: u8, program: u8 },

    /// Channel Pressure: channel (0-15), pressure (0-127)
    ChannelPressure { channel: u8, pressure: u8 },

    /// Pitch Bend: channel (0-15), value (0-16383, 14-bit)
    PitchBend { channel: u8, value: u16 },

    /// System Exclusive payload without the F0/F7 framing
    SysEx { data: Vec<u8> },

    /// System common (F1-F6) and realtime (F8-FF) messages, kept as status byte
    System { status: u8 },
}

impl MidiMessage {
    /// Parse a MIDI message from raw bytes
    ///
    /// Returns `None` for empty buffers, running status and truncated messages.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let status = *data.first()?;
        if status < 0x80 {
            return None;
        }

        let d1 = data.get(1).map(|b| b & 0x7F);
        let d2 = data.get(2).map(|b| b & 0x7F);
        let channel = status & 0x0F;

        match status & 0xF0 {
            0x80 => Some(MidiMessage::NoteOff { channel, note: d1?, velocity: d2? }),
            0x90 => Some(MidiMessage::NoteOn { channel, note: d1?, velocity: d2? }),
            0xA0 => Some(MidiMessage::PolyPressure { channel, note: d1?, pressure: d2? }),
            0xB0 => Some(MidiMessage::ControlChange { channel, cc: d1?, value: d2? }),
            0xC0 => Some(MidiMessage::ProgramChange { channel, program: d1? }),
            0xD0 => Some(MidiMessage::ChannelPressure { channel, pressure: d1? }),
            0xE0 => {
                let value = ((d2? as u16) << 7) | d1? as u16;
                Some(MidiMessage::PitchBend { channel, value })
            }
            _ if status == SYSEX_START => {
                let end = data.iter().position(|&b| b == SYSEX_END)?;
                Some(MidiMessage::SysEx { data: data[1..end].to_vec() })
            }
            _ => Some(MidiMessage::System { status }),
        }
    }
}

impl fmt::Display for MidiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MidiMessage::NoteOff { channel, note, velocity } => {
                write!(f, "NoteOff ch:{} n:{} v:{}", channel + 1, note, velocity)
            }
            MidiMessage::NoteOn { channel, note, velocity } => {
                write!(f, "NoteOn ch:{} n:{} v:{}", channel + 1, note, velocity)
            }
            MidiMessage::PolyPressure { channel, note, pressure } => {
                write!(f, "PolyPressure ch:{} n:{} p:{}", channel + 1, note, pressure)
            }
            MidiMessage::ControlChange { channel, cc, value } => {
                write!(f, "CC ch:{} cc:{} v:{}", channel + 1, cc, value)
            }
            MidiMessage::ProgramChange { channel, program } => {
                write!(f, "ProgramChange ch:{} p:{}", channel + 1, program)
            }
            MidiMessage::ChannelPressure { channel, pressure } => {
                write!(f, "ChannelPressure ch:{} p:{}", channel + 1, pressure)
            }
            MidiMessage::PitchBend { channel, value } => {
                write!(f, "PitchBend ch:{} v:{}", channel + 1, value)
            }
            MidiMessage::SysEx { ref data } => write!(f, "SysEx {} bytes", data.len()),
            MidiMessage::System { status } => match status {
                0xF8 => write!(f, "Clock"),
                0xFA => write!(f, "Start"),
                0xFB => write!(f, "Continue"),
                0xFC => write!(f, "Stop"),
                0xFE => write!(f, "ActiveSensing"),
                0xFF => write!(f, "Reset"),
                other => write!(f, "System {:02X}", other),
            },
        }
    }
}

/// Format MIDI bytes as hex string for debugging
pub fn format_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_change() {
        let data = vec![0xB2, 7, 100]; // CC ch 3, volume, value 100
        let msg = MidiMessage::parse(&data).unwrap();

        assert_eq!(msg, MidiMessage::ControlChange { channel: 2, cc: 7, value: 100 });
    }

    #[test]
    fn test_truncated_control_change() {
        assert_eq!(MidiMessage::parse(&[0xB0, 7]), None);
        assert_eq!(MidiMessage::parse(&[]), None);
    }

    #[test]
    fn test_running_status_rejected() {
        assert_eq!(MidiMessage::parse(&[0x07, 0x40]), None);
    }

    #[test]
    fn test_pitch_bend() {
        let data = vec![0xE0, 0x00, 0x40]; // Pitch Bend ch 1, center (8192)
        let msg = MidiMessage::parse(&data).unwrap();

        assert_eq!(msg, MidiMessage::PitchBend { channel: 0, value: 8192 });
    }

    #[test]
    fn test_clock() {
        let msg = MidiMessage::parse(&[0xF8]).unwrap();
        assert_eq!(msg.to_string(), "Clock");
    }

    #[test]
    fn test_sysex_parse() {
        let data = [0xF0, 0x43, 0x10, 0x12, 0x3E, 0x30, 0xF7];
        let msg = MidiMessage::parse(&data).unwrap();

        assert_eq!(msg, MidiMessage::SysEx { data: vec![0x43, 0x10, 0x12, 0x3E, 0x30] });
    }

    #[test]
    fn test_unterminated_sysex() {
        assert_eq!(MidiMessage::parse(&[0xF0, 0x43, 0x10]), None);
    }

    #[test]
    fn test_format_hex() {
        assert_eq!(format_hex(&[0xF0, 0x43, 0x10, 0xF7]), "F0 43 10 F7");
        assert_eq!(format_hex(&[]), "");
    }
}
