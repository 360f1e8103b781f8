//! Built-in melody catalogue.
//!
//! Every cue the creature can play is a [`MelodyId`] with a fixed RTTTL text
//! and a [`MelodyKind`]. The texts are loaded into the audio thread once at
//! startup (see [`crate::resources::audio::load_melodies`]); afterwards only
//! ids cross the channel.
//!
//! `RainHit` and `BalloonCatch` are mini-game effects with no game behind
//! them here; like `AlertLoop` they are only heard through the simulator's
//! audition key.

use serde::{Deserialize, Serialize};

use crate::resources::cues::CueConfig;

/// How a melody was written: a jingle with an ending, or a phrase meant to
/// repeat seamlessly. The cue dispatcher may still repeat a `OneShot` as a
/// phase loop; see [`CueConfig::is_looped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MelodyKind {
    OneShot,
    Loop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MelodyId {
    Home,
    Hatch,
    Death,
    Rip,
    AgeUpAdult,
    AgeUpSenior,
    EatIntro,
    EatLoop,
    DrinkIntro,
    DrinkLoop,
    CleanIntro,
    HugIntro,
    SleepIntro,
    AlertUnit,
    AlertLoop,
    RainHit,
    BalloonCatch,
}

impl MelodyId {
    pub const ALL: [MelodyId; 17] = [
        MelodyId::Home,
        MelodyId::Hatch,
        MelodyId::Death,
        MelodyId::Rip,
        MelodyId::AgeUpAdult,
        MelodyId::AgeUpSenior,
        MelodyId::EatIntro,
        MelodyId::EatLoop,
        MelodyId::DrinkIntro,
        MelodyId::DrinkLoop,
        MelodyId::CleanIntro,
        MelodyId::HugIntro,
        MelodyId::SleepIntro,
        MelodyId::AlertUnit,
        MelodyId::AlertLoop,
        MelodyId::RainHit,
        MelodyId::BalloonCatch,
    ];

    pub fn rtttl(self) -> &'static str {
        match self {
            MelodyId::Home => "HOME:d=8,o=6,b=120:c,e,g,c7,g,e,c,p,c,e,g,c7",
            MelodyId::Hatch => "HATCH:d=16,o=6,b=180:8c,16p,8e,16p,8g,16p,8c7,16p,8b,16p,8c7",
            MelodyId::Death => "DEATH:d=8,o=5,b=90:8e,8d#,8d,8c#,8c,8p,4b4,8p,2a4",
            MelodyId::Rip => "RIP:d=8,o=5,b=80:8c,8p,8d,8p,8c,8p,4a4,8p,2g4",
            MelodyId::AgeUpAdult => "AGEUP1:d=16,o=6,b=190:8c,16p,8e,16p,8g,16p,8c7",
            MelodyId::AgeUpSenior => "AGEUP2:d=16,o=6,b=160:8g,16p,8a,16p,8b,16p,8c7",
            MelodyId::EatIntro => "EATIN:d=16,o=5,b=167:16a,32p,16c#6",
            MelodyId::EatLoop => "EAT:d=16,o=6,b=220:16c,16p,16c,16p,16g,16p,16a,16p",
            MelodyId::DrinkIntro => "DRINKIN:d=16,o=5,b=188:16f,32p.,16g#",
            MelodyId::DrinkLoop => "DRINK:d=16,o=6,b=210:16e,16p,16d,16p,16c,16p,16d,16p",
            MelodyId::CleanIntro => "CLEAN:d=4,o=3,b=86:f#",
            MelodyId::HugIntro => "HUG:d=16,o=5,b=100:16e,32p,16a,32p,16b",
            MelodyId::SleepIntro => "SLEEP:d=8,o=5,b=94:8c,32p.,8a4,32p.,8g4,16p,8a4.",
            MelodyId::AlertUnit => "ALERT:d=8,o=7,b=250:c#7,p",
            MelodyId::AlertLoop => "ALERTL:d=32,o=7,b=300:32c#7,32p,32c#7,32p,32c#7,32p,32c#7,32p",
            MelodyId::RainHit => "RAINHIT:d=32,o=7,b=125:d#7",
            MelodyId::BalloonCatch => "BALCATCH:d=32,o=7,b=150:e7",
        }
    }

    /// The following catalogue entry, wrapping around.
    pub fn next(self) -> MelodyId {
        let i = MelodyId::ALL.iter().position(|&id| id == self).unwrap_or(0);
        MelodyId::ALL[(i + 1) % MelodyId::ALL.len()]
    }

    pub fn kind(self) -> MelodyKind {
        match self {
            MelodyId::EatLoop | MelodyId::DrinkLoop | MelodyId::AlertLoop => MelodyKind::Loop,
            _ => MelodyKind::OneShot,
        }
    }
}

/// Serializable description of one catalogue entry.
#[derive(Debug, Clone, Serialize)]
pub struct MelodyInfo {
    pub id: MelodyId,
    pub kind: MelodyKind,
    /// Started as a phase loop by the cue dispatcher.
    pub looped: bool,
    pub rtttl: &'static str,
    pub total_ms: Option<u32>,
}

/// The whole catalogue, with each melody's play time when it parses and
/// whether `cues` repeats it.
pub fn catalogue(cues: &CueConfig) -> Vec<MelodyInfo> {
    MelodyId::ALL
        .iter()
        .map(|&id| MelodyInfo {
            id,
            kind: id.kind(),
            looped: cues.is_looped(id),
            rtttl: id.rtttl(),
            total_ms: crate::rtttl::parse(id.rtttl()).ok().map(|m| m.total_ms()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_melody_parses() {
        for id in MelodyId::ALL {
            let melody = crate::rtttl::parse(id.rtttl());
            assert!(melody.is_ok(), "{id:?}: {melody:?}");
        }
    }

    #[test]
    fn catalogue_lists_everything_once() {
        let list = catalogue(&CueConfig::default());
        assert_eq!(list.len(), MelodyId::ALL.len());
        assert!(list.iter().all(|info| info.total_ms.is_some()));
        let json = serde_json::to_string(&list).unwrap();
        assert!(json.contains("\"EatLoop\""));
        assert!(json.contains("\"Loop\""));
    }

    #[test]
    fn catalogue_reports_intros_repeated_as_loops() {
        let list = catalogue(&CueConfig::default());
        let clean = list.iter().find(|info| info.id == MelodyId::CleanIntro).unwrap();
        assert_eq!(clean.kind, MelodyKind::OneShot);
        assert!(clean.looped);
        let home = list.iter().find(|info| info.id == MelodyId::Home).unwrap();
        assert!(!home.looped);
    }

    #[test]
    fn minigame_effects_are_single_blips() {
        for id in [MelodyId::RainHit, MelodyId::BalloonCatch] {
            let melody = crate::rtttl::parse(id.rtttl()).unwrap();
            assert_eq!(melody.notes.len(), 1, "{id:?}");
            assert!(melody.notes[0].freq_hz.is_some(), "{id:?}");
            assert_eq!(id.kind(), MelodyKind::OneShot);
        }
    }

    #[test]
    fn next_cycles_through_the_whole_catalogue() {
        let mut id = MelodyId::ALL[0];
        let mut seen = Vec::new();
        for _ in 0..MelodyId::ALL.len() {
            seen.push(id);
            id = id.next();
        }
        assert_eq!(seen, MelodyId::ALL);
        assert_eq!(id, MelodyId::ALL[0]);
    }
}
