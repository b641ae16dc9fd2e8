use std::env;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

/// Fire-and-forget speech output with a single-utterance-at-a-time contract:
/// starting a new utterance cancels the one still playing.
pub trait SpeechSynth {
    fn speak(&mut self, text: &str);
}

/// Synth that says nothing. Used headless, in tests, and when no speech
/// command is installed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSpeech;

impl SpeechSynth for NullSpeech {
    fn speak(&mut self, _text: &str) {}
}

/// Commands probed for, in preference order.
const SPEECH_COMMANDS: [&str; 3] = ["say", "espeak", "spd-say"];

/// Speaks by shelling out to the system speech command, killing the previous
/// child first so utterances never overlap.
#[derive(Debug)]
pub struct CommandSpeech {
    program: PathBuf,
    child: Option<Child>,
}

impl CommandSpeech {
    /// Find the first available speech command on PATH.
    pub fn detect() -> Option<Self> {
        let path = env::var_os("PATH")?;
        for program in SPEECH_COMMANDS {
            for dir in env::split_paths(&path) {
                let candidate = dir.join(program);
                if candidate.is_file() {
                    return Some(Self {
                        program: candidate,
                        child: None,
                    });
                }
            }
        }
        None
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl SpeechSynth for CommandSpeech {
    fn speak(&mut self, text: &str) {
        self.cancel();
        self.child = Command::new(&self.program)
            .arg(normalize_utterance(text))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .ok();
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A letter-pair token is spoken as its single uppercase letter, with the
/// fullwidth `Ｉ` mapped back to ASCII. Longer phrases pass through.
pub fn normalize_utterance(text: &str) -> String {
    if text.chars().count() <= 2 {
        match text.chars().next() {
            Some('Ｉ') => "I".to_string(),
            Some(letter) => letter.to_string(),
            None => String::new(),
        }
    } else {
        text.to_string()
    }
}
