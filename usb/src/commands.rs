/// Option flag carried by every command we send.
pub const OPT: u8 = 1 << 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    PowerOn,
    SetAudioVolume(AudioVolume),
}

impl Command {
    pub fn command_id(&self) -> u8 {
        match self {
            Command::PowerOn => 0x05,
            Command::SetAudioVolume(_) => 0x08,
        }
    }

    pub fn options(&self) -> u8 {
        OPT
    }

    pub fn payload(&self) -> Vec<u8> {
        match self {
            Command::PowerOn => vec![0x00],
            Command::SetAudioVolume(volume) => volume.payload().to_vec(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum AudioSubCommand {
    Volume = 0x03,
}

const AUDIO_VOLUME_UNMUTE: u8 = 0x04;

/// Headset volume levels, sent alongside the unmute flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AudioVolume {
    pub output: u8,
    pub chat: u8,
    pub input: u8,
}

impl Default for AudioVolume {
    fn default() -> Self {
        Self {
            output: 60,
            chat: 60,
            input: 60,
        }
    }
}

impl AudioVolume {
    // Sub command, unmute, the three levels, then three bytes we've only ever seen as zero.
    fn payload(&self) -> [u8; 8] {
        [
            AudioSubCommand::Volume as u8,
            AUDIO_VOLUME_UNMUTE,
            self.output,
            self.chat,
            self.input,
            0x00,
            0x00,
            0x00,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::CommandFramer;

    #[test]
    fn power_on_wire_bytes() {
        let frame = CommandFramer::starting_at(0x11)
            .frame(Command::PowerOn)
            .unwrap();
        assert_eq!(frame.to_bytes(), vec![0x05, 0x20, 0x11, 0x01, 0x00]);
    }

    #[test]
    fn default_volume_wire_bytes() {
        let frame = CommandFramer::starting_at(0x01)
            .frame(Command::SetAudioVolume(AudioVolume::default()))
            .unwrap();
        assert_eq!(
            frame.to_bytes(),
            vec![0x08, 0x20, 0x01, 0x08, 0x03, 0x04, 0x3c, 0x3c, 0x3c, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn volume_levels_land_in_channel_order() {
        let volume = AudioVolume {
            output: 10,
            chat: 20,
            input: 30,
        };
        assert_eq!(
            Command::SetAudioVolume(volume).payload(),
            vec![0x03, 0x04, 10, 20, 30, 0x00, 0x00, 0x00]
        );
    }
}
