//! DFPlayer Mini MP3 module, driven over a TX only UART at 9600 8N1.
//!
//! Every command is a fixed 10 byte frame:
//!
//! ```text
//! 7E FF 06 CMD 00 PH PL CH CL EF
//! ```
//!
//! where `PH PL` is the big endian parameter and `CH CL` the big endian
//! two's complement of the sum of the six bytes from version to `PL`.

use crate::mood::Mood;
use crate::SinkError;

pub const FRAME_LEN: usize = 10;
pub const BAUD_RATE: u32 = 9600;
pub const MAX_VOLUME: u8 = 30;

const START: u8 = 0x7e;
const VERSION: u8 = 0xff;
const LEN: u8 = 0x06;
const NO_FEEDBACK: u8 = 0x00;
const END: u8 = 0xef;

const CMD_PLAY_TRACK: u8 = 0x03;
const CMD_SET_VOLUME: u8 = 0x06;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    PlayTrack(u16),
    SetVolume(u8),
}

impl Command {
    fn code(&self) -> u8 {
        match self {
            Command::PlayTrack(_) => CMD_PLAY_TRACK,
            Command::SetVolume(_) => CMD_SET_VOLUME,
        }
    }

    fn param(&self) -> u16 {
        match self {
            Command::PlayTrack(track) => *track,
            Command::SetVolume(volume) => (*volume).min(MAX_VOLUME) as u16,
        }
    }

    pub fn frame(&self) -> [u8; FRAME_LEN] {
        let code = self.code();
        let [param_hi, param_lo] = self.param().to_be_bytes();
        let [sum_hi, sum_lo] = checksum(code, self.param()).to_be_bytes();
        [
            START,
            VERSION,
            LEN,
            code,
            NO_FEEDBACK,
            param_hi,
            param_lo,
            sum_hi,
            sum_lo,
            END,
        ]
    }
}

pub fn checksum(code: u8, param: u16) -> u16 {
    let [param_hi, param_lo] = param.to_be_bytes();
    let sum = [VERSION, LEN, code, NO_FEEDBACK, param_hi, param_lo]
        .iter()
        .map(|b| *b as u16)
        .sum::<u16>();
    0u16.wrapping_sub(sum)
}

/// Clips on the SD card, numbered in the order they were copied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Track {
    /// "Such a pleasant day!"
    Pleasant = 1,
    /// "It's too hot today."
    Hot = 2,
    /// "Gas detected. Please stay safe."
    Gas = 3,
    /// "Someone is near me. Hello!"
    Visitor = 4,
    /// "It's quite cold today."
    Cold = 5,
}

impl Track {
    pub fn for_mood(mood: Mood) -> Self {
        match mood {
            Mood::Chilly => Track::Cold,
            Mood::Pleasant => Track::Pleasant,
            Mood::Hot => Track::Hot,
        }
    }

    pub fn number(self) -> u16 {
        self as u16
    }
}

/// Byte sink the frames are written to (the UART TX half on the board)
pub trait AudioLink {
    fn send(&mut self, frame: &[u8]) -> Result<(), SinkError>;
}

pub struct DfPlayer<L: AudioLink> {
    link: L,
}

impl<L: AudioLink> DfPlayer<L> {
    pub fn new(link: L) -> Self {
        Self { link }
    }

    pub fn send(&mut self, command: Command) -> Result<(), SinkError> {
        self.link.send(&command.frame())
    }

    pub fn play(&mut self, track: Track) -> Result<(), SinkError> {
        self.send(Command::PlayTrack(track.number()))?;
        log::info!(target: crate::TAG, "Played track {}", track.number());
        Ok(())
    }

    pub fn set_volume(&mut self, volume: u8) -> Result<(), SinkError> {
        self.send(Command::SetVolume(volume))
    }

    pub fn get_ref(&self) -> &L {
        &self.link
    }

    pub fn release(self) -> L {
        self.link
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_track_frame() {
        assert_eq!(
            Command::PlayTrack(1).frame(),
            [0x7e, 0xff, 0x06, 0x03, 0x00, 0x00, 0x01, 0xfe, 0xf7, 0xef]
        );
        assert_eq!(
            Command::PlayTrack(4).frame(),
            [0x7e, 0xff, 0x06, 0x03, 0x00, 0x00, 0x04, 0xfe, 0xf4, 0xef]
        );
    }

    #[test]
    fn checksum_cancels_payload_sum() {
        for track in [Track::Pleasant, Track::Hot, Track::Gas, Track::Visitor, Track::Cold] {
            let frame = Command::PlayTrack(track.number()).frame();
            let payload: u16 = frame[1..7].iter().map(|b| *b as u16).sum();
            let sum = u16::from_be_bytes([frame[7], frame[8]]);
            assert_eq!(payload.wrapping_add(sum), 0);
        }
    }

    #[test]
    fn volume_is_clamped() {
        assert_eq!(Command::SetVolume(99).frame(), Command::SetVolume(30).frame());
        assert_eq!(
            Command::SetVolume(20).frame(),
            [0x7e, 0xff, 0x06, 0x06, 0x00, 0x00, 0x14, 0xfe, 0xe1, 0xef]
        );
    }

    #[test]
    fn tracks_follow_mood() {
        assert_eq!(Track::for_mood(Mood::Hot), Track::Hot);
        assert_eq!(Track::for_mood(Mood::Chilly), Track::Cold);
        assert_eq!(Track::for_mood(Mood::Pleasant), Track::Pleasant);
    }

    #[test]
    fn player_writes_frames_to_link() {
        let mut player = DfPlayer::new(Vec::new());
        player.set_volume(25).unwrap();
        player.play(Track::Gas).unwrap();
        let written = player.release();
        assert_eq!(written.len(), 2 * FRAME_LEN);
        assert_eq!(written[3], CMD_SET_VOLUME);
        assert_eq!(&written[FRAME_LEN..], &Command::PlayTrack(3).frame());
    }
}
