use std::io::Write;

/// The cue vocabulary of the machine. Waveform design lives entirely in the
/// sink; the game only names the moment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum AudioCue {
    /// Claw sliding along the rail.
    Move,
    /// Claw closing around a capsule.
    Grab,
    /// Claw (or capsule) dropping.
    Drop,
    Win,
    Lose,
    /// Coin-in chime on menu confirmations.
    Coin,
}

/// Fire-and-forget audio output. The game never awaits completion and any
/// sink failure must degrade silently.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
    fn set_muted(&mut self, muted: bool);
}

/// Sink that swallows every cue. Used headless and in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudioSink;

impl AudioSink for NullAudioSink {
    fn play(&mut self, _cue: AudioCue) {}
    fn set_muted(&mut self, _muted: bool) {}
}

/// Rings the terminal bell for the salient cues. Move and Drop fire far too
/// often for a bell, so only the event-like cues ring.
#[derive(Debug, Default)]
pub struct TerminalBell {
    muted: bool,
}

impl TerminalBell {
    pub fn new(muted: bool) -> Self {
        Self { muted }
    }
}

impl AudioSink for TerminalBell {
    fn play(&mut self, cue: AudioCue) {
        if self.muted {
            return;
        }
        match cue {
            AudioCue::Grab | AudioCue::Win | AudioCue::Lose | AudioCue::Coin => {
                let mut out = std::io::stdout();
                let _ = out.write_all(b"\x07");
                let _ = out.flush();
            }
            AudioCue::Move | AudioCue::Drop => {}
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}
