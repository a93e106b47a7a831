use raylib::core::audio::{RaylibAudio, Sound};
use tracing::warn;

/// Decoded speech: 16-bit mono PCM at the service's sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechClip {
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

/// Interpret raw little-endian bytes as 16-bit samples. A trailing odd byte
/// is dropped to keep the alignment.
pub fn pcm16_from_le_bytes(raw: &[u8]) -> Vec<i16> {
    raw.chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Wrap a clip in a minimal RIFF/WAVE container so the audio device can load
/// it from memory.
pub fn wav_from_clip(clip: &SpeechClip) -> Vec<u8> {
    const CHANNELS: u16 = 1;
    const BITS_PER_SAMPLE: u16 = 16;
    let data_len = (clip.samples.len() * 2) as u32;
    let byte_rate = clip.sample_rate * u32::from(CHANNELS) * u32::from(BITS_PER_SAMPLE) / 8;
    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;

    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes()); // PCM fmt chunk size
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM format tag
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&clip.sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for sample in &clip.samples {
        out.extend_from_slice(&sample.to_le_bytes());
    }
    out
}

/// The one narration slot. Starting a new clip always stops the active one
/// first, so two playbacks are never audible at once.
pub struct Narrator<'aud> {
    audio: &'aud RaylibAudio,
    active: Option<Sound<'aud>>,
}

impl<'aud> Narrator<'aud> {
    pub fn new(audio: &'aud RaylibAudio) -> Self {
        Self {
            audio,
            active: None,
        }
    }

    pub fn play(&mut self, clip: &SpeechClip) {
        self.stop();
        let bytes = wav_from_clip(clip);
        let wave = match self.audio.new_wave_from_memory(".wav", &bytes) {
            Ok(wave) => wave,
            Err(e) => {
                warn!("narration clip rejected by audio device: {e}");
                return;
            }
        };
        match self.audio.new_sound_from_wave(&wave) {
            Ok(sound) => {
                sound.play();
                self.active = Some(sound);
            }
            Err(e) => warn!("narration clip rejected by audio device: {e}"),
        }
    }

    pub fn stop(&mut self) {
        if let Some(sound) = self.active.take() {
            sound.stop();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.active.as_ref().is_some_and(|s| s.is_playing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcm_pairs_decode_little_endian() {
        assert_eq!(pcm16_from_le_bytes(&[0x34, 0x12]), vec![0x1234]);
        assert_eq!(pcm16_from_le_bytes(&[0xFF, 0x7F, 0x00, 0x80]), vec![i16::MAX, i16::MIN]);
    }

    #[test]
    fn odd_trailing_byte_is_dropped() {
        assert_eq!(pcm16_from_le_bytes(&[0x01, 0x00, 0x7F]), vec![1]);
        assert!(pcm16_from_le_bytes(&[0x7F]).is_empty());
    }

    #[test]
    fn wav_container_is_well_formed() {
        let clip = SpeechClip {
            sample_rate: 24_000,
            samples: vec![0, 1, -1],
        };
        let wav = wav_from_clip(&clip);
        assert_eq!(wav.len(), 44 + 6);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(&wav[36..40], b"data");
        // Chunk sizes
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 36 + 6);
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 6);
        // Mono, 16-bit, at the clip's rate
        assert_eq!(u16::from_le_bytes(wav[22..24].try_into().unwrap()), 1);
        assert_eq!(u32::from_le_bytes(wav[24..28].try_into().unwrap()), 24_000);
        assert_eq!(u32::from_le_bytes(wav[28..32].try_into().unwrap()), 48_000);
        assert_eq!(u16::from_le_bytes(wav[34..36].try_into().unwrap()), 16);
        // Payload is the samples, little-endian
        assert_eq!(&wav[44..46], &[0, 0]);
        assert_eq!(&wav[46..48], &[1, 0]);
        assert_eq!(&wav[48..50], &[0xFF, 0xFF]);
    }
}
