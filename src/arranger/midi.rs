// MIDI Export - Encode drum lanes as Standard MIDI Files using midly
// One single-track file per instrument, notes on the GM drum channel

use midly::{Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};
use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::drum_lanes::DrumLane;

/// Largest tempo value a Set Tempo meta event can hold (24 bits)
const MAX_MICROS_PER_QUARTER: u32 = 0x00FF_FFFF;

/// MIDI export options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidiExportOptions {
    /// Pulses per quarter note (PPQ) - typically 480 or 960
    /// Higher values = better timing resolution
    pub ppq: u16,

    /// Length of every note in beats
    pub note_duration_beats: f64,

    /// MIDI channel, 0-indexed (9 = GM drums)
    pub channel: u8,

    /// Include tempo metadata
    pub include_tempo: bool,

    /// Include time signature metadata
    pub include_time_signature: bool,

    /// Include track names
    pub track_names: bool,
}

impl Default for MidiExportOptions {
    fn default() -> Self {
        MidiExportOptions {
            ppq: 480,
            note_duration_beats: 0.1,
            channel: 9,
            include_tempo: true,
            include_time_signature: true,
            track_names: true,
        }
    }
}

/// Encode one lane to MIDI file bytes
///
/// Times are rebased so that `span.start` lands on tick 0, and the track
/// never ends before `span.end`, so a file loops cleanly at its phrase length.
///
/// # Arguments
/// * `lane` - The lane to encode (events need not be sorted)
/// * `note` - MIDI note number played by every event
/// * `tempo` - Tempo in BPM
/// * `span` - Beat range the file covers
/// * `options` - Export options
pub fn encode_lane(
    lane: &DrumLane,
    note: u8,
    tempo: f64,
    span: Range<f64>,
    options: &MidiExportOptions,
) -> Result<Vec<u8>, String> {
    if note > 127 {
        return Err(format!("Note number {} is out of range", note));
    }
    if options.channel > 15 {
        return Err(format!("Channel {} is out of range", options.channel));
    }
    if options.ppq == 0 || options.ppq > 0x7FFF {
        return Err(format!("PPQ {} is out of range", options.ppq));
    }

    let header = Header {
        format: midly::Format::SingleTrack,
        timing: Timing::Metrical(options.ppq.into()),
    };

    let mut track = Track::new();

    if options.track_names {
        add_track_name(&mut track, 0, lane.instrument.display_name());
    }

    if options.include_tempo {
        let micros = tempo_to_micros(tempo).ok_or_else(|| format!("Invalid tempo {}", tempo))?;
        add_tempo(&mut track, 0, micros);
    }

    if options.include_time_signature {
        add_time_signature(&mut track, 0);
    }

    // (tick, is_note_on, kind) - note-offs sort before note-ons on the same tick
    let mut events: Vec<(u32, bool, TrackEventKind)> = Vec::with_capacity(lane.len() * 2);
    let duration = options.note_duration_beats.max(0.0);

    for event in &lane.events {
        let tick_on = beats_to_ticks(event.time - span.start, options.ppq);
        let tick_off = beats_to_ticks(event.time - span.start + duration, options.ppq);

        events.push((
            tick_on,
            true,
            TrackEventKind::Midi {
                channel: options.channel.into(),
                message: MidiMessage::NoteOn {
                    key: note.into(),
                    vel: event.velocity.into(),
                },
            },
        ));

        events.push((
            tick_off,
            false,
            TrackEventKind::Midi {
                channel: options.channel.into(),
                message: MidiMessage::NoteOff {
                    key: note.into(),
                    vel: 0.into(),
                },
            },
        ));
    }

    // Stable sort keeps per-lane event order among simultaneous hits
    events.sort_by_key(|(tick, is_on, _)| (*tick, *is_on));

    // Convert to delta times
    let mut last_tick = 0;
    for (tick, _, kind) in events {
        track.push(TrackEvent {
            delta: tick.saturating_sub(last_tick).into(),
            kind,
        });
        last_tick = last_tick.max(tick);
    }

    // End of track at the phrase boundary or the last note-off, whichever is later
    let end_tick = beats_to_ticks(span.end - span.start, options.ppq).max(last_tick);
    add_end_of_track(&mut track, end_tick - last_tick);

    let smf = Smf {
        header,
        tracks: vec![track],
    };

    let mut bytes = Vec::new();
    smf.write(&mut bytes)
        .map_err(|e| format!("Failed to write MIDI: {}", e))?;

    Ok(bytes)
}

/// Convert a beat offset to ticks, rounding to the nearest tick
pub fn beats_to_ticks(beats: f64, ppq: u16) -> u32 {
    (beats.max(0.0) * ppq as f64).round() as u32
}

/// Microseconds per quarter note for a BPM, if it fits a Set Tempo event
pub fn tempo_to_micros(bpm: f64) -> Option<u32> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return None;
    }

    let micros = (60_000_000.0 / bpm).round();
    if micros < 1.0 || micros > MAX_MICROS_PER_QUARTER as f64 {
        return None;
    }

    Some(micros as u32)
}

/// Add track name to track
fn add_track_name<'a>(track: &mut Track<'a>, delta: u32, name: &'a str) {
    track.push(TrackEvent {
        delta: delta.into(),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes())),
    });
}

/// Add tempo meta message
fn add_tempo(track: &mut Track<'_>, delta: u32, micros_per_quarter: u32) {
    track.push(TrackEvent {
        delta: delta.into(),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(micros_per_quarter.into())),
    });
}

/// Add a 4/4 time signature meta message
fn add_time_signature(track: &mut Track<'_>, delta: u32) {
    let numerator = 4u8;
    let denominator = 2u8; // 2^2 = 4 (quarter note)

    // MIDI clocks per metronome click (24 for quarter note)
    let clocks_per_click = 24u8;

    // 32nd notes per quarter note (8)
    let thirty_seconds_per_quarter = 8u8;

    track.push(TrackEvent {
        delta: delta.into(),
        kind: TrackEventKind::Meta(MetaMessage::TimeSignature(
            numerator,
            denominator,
            clocks_per_click,
            thirty_seconds_per_quarter,
        )),
    });
}

/// Add end of track message
fn add_end_of_track(track: &mut Track<'_>, delta: u32) {
    track.push(TrackEvent {
        delta: delta.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
}
