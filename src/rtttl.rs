//! RTTTL melody parsing.
//!
//! A melody is written as `NAME:d=<dur>,o=<oct>,b=<bpm>:<notes>` where each
//! note is `[duration]<letter>[#][.][octave][.]`, letter `a`..`g` or `p` for
//! a pause. Header keys that are absent default to `d=4`, `o=6`, `b=63`.
//!
//! ```
//! use jurassiclife::rtttl;
//!
//! let melody = rtttl::parse("HOME:d=8,o=6,b=120:c,e,g,c7").unwrap();
//! assert_eq!(melody.notes.len(), 4);
//! assert_eq!(melody.notes[0].duration_ms, 250);
//! ```

use serde::Serialize;

const DEFAULT_DURATION: u32 = 4;
const DEFAULT_OCTAVE: u8 = 6;
const DEFAULT_BPM: u32 = 63;
const VALID_DURATIONS: [u32; 7] = [1, 2, 4, 8, 16, 32, 64];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RtttlError {
    #[error("expected `name:defaults:notes`")]
    MissingSection,
    #[error("bad header entry `{0}`")]
    BadHeader(String),
    #[error("unsupported duration {0}")]
    BadDuration(u32),
    #[error("unsupported octave {0}")]
    BadOctave(u8),
    #[error("bad note `{0}`")]
    BadNote(String),
    #[error("tempo must be greater than zero")]
    ZeroTempo,
    #[error("melody has no notes")]
    NoNotes,
}

/// One note (or pause) ready to be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Note {
    /// Tone frequency, `None` for a pause.
    pub freq_hz: Option<u32>,
    pub duration_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Melody {
    pub name: String,
    pub notes: Vec<Note>,
}

impl Melody {
    pub fn total_ms(&self) -> u32 {
        self.notes.iter().map(|n| n.duration_ms).sum()
    }
}

fn check_duration(d: u32) -> Result<u32, RtttlError> {
    if VALID_DURATIONS.contains(&d) {
        Ok(d)
    } else {
        Err(RtttlError::BadDuration(d))
    }
}

fn check_octave(o: u8) -> Result<u8, RtttlError> {
    if (1..=8).contains(&o) {
        Ok(o)
    } else {
        Err(RtttlError::BadOctave(o))
    }
}

/// Equal-tempered frequency, A4 = 440 Hz. `semitone` counts from C.
pub fn frequency(semitone: u8, octave: u8) -> u32 {
    let midi = 12 * (octave as i32 + 1) + semitone as i32;
    let hz = 440.0_f32 * 2.0_f32.powf((midi - 69) as f32 / 12.0);
    hz.round() as u32
}

pub fn parse(text: &str) -> Result<Melody, RtttlError> {
    let mut sections = text.splitn(3, ':');
    let (Some(name), Some(header), Some(body)) =
        (sections.next(), sections.next(), sections.next())
    else {
        return Err(RtttlError::MissingSection);
    };

    let mut duration = DEFAULT_DURATION;
    let mut octave = DEFAULT_OCTAVE;
    let mut bpm = DEFAULT_BPM;
    for entry in header.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| RtttlError::BadHeader(entry.to_string()))?;
        let value: u32 = value
            .trim()
            .parse()
            .map_err(|_| RtttlError::BadHeader(entry.to_string()))?;
        match key.trim() {
            "d" => duration = check_duration(value)?,
            "o" => {
                let o = u8::try_from(value).map_err(|_| RtttlError::BadOctave(u8::MAX))?;
                octave = check_octave(o)?;
            }
            "b" => bpm = value,
            _ => return Err(RtttlError::BadHeader(entry.to_string())),
        }
    }
    if bpm == 0 {
        return Err(RtttlError::ZeroTempo);
    }

    let whole_ms = 60_000 * 4 / bpm;
    let notes = body
        .split(',')
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(|n| parse_note(n, duration, octave, whole_ms))
        .collect::<Result<Vec<_>, _>>()?;
    if notes.is_empty() {
        return Err(RtttlError::NoNotes);
    }

    Ok(Melody {
        name: name.trim().to_string(),
        notes,
    })
}

fn parse_note(src: &str, default_duration: u32, default_octave: u8, whole_ms: u32) -> Result<Note, RtttlError> {
    let bad = || RtttlError::BadNote(src.to_string());
    let bytes = src.as_bytes();
    let mut i = 0;

    let digits_end = |from: usize| {
        let mut j = from;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        j
    };

    let end = digits_end(i);
    let duration = if end > i {
        check_duration(src[i..end].parse().map_err(|_| bad())?)?
    } else {
        default_duration
    };
    i = end;

    let letter = bytes.get(i).ok_or_else(bad)?.to_ascii_lowercase();
    i += 1;
    let mut semitone = match letter {
        b'c' => Some(0u8),
        b'd' => Some(2),
        b'e' => Some(4),
        b'f' => Some(5),
        b'g' => Some(7),
        b'a' => Some(9),
        b'b' | b'h' => Some(11),
        b'p' => None,
        _ => return Err(bad()),
    };

    if bytes.get(i) == Some(&b'#') {
        semitone = semitone.map(|s| s + 1);
        i += 1;
    }

    let mut dotted = false;
    if bytes.get(i) == Some(&b'.') {
        dotted = true;
        i += 1;
    }

    let end = digits_end(i);
    let octave = if end > i {
        let o: u8 = src[i..end].parse().map_err(|_| bad())?;
        check_octave(o)?
    } else {
        default_octave
    };
    i = end;

    if bytes.get(i) == Some(&b'.') {
        dotted = true;
        i += 1;
    }
    if i != bytes.len() {
        return Err(bad());
    }

    let mut duration_ms = whole_ms / duration;
    if dotted {
        duration_ms += duration_ms / 2;
    }

    // b# wraps into the next octave's c.
    let freq_hz = semitone.map(|s| {
        if s == 12 {
            frequency(0, octave + 1)
        } else {
            frequency(s, octave)
        }
    });

    Ok(Note {
        freq_hz,
        duration_ms,
    })
}
