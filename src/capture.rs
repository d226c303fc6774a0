use crate::buffer::FrameWriter;
use cpal::Stream;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

pub const TARGET_RATE: usize = 16000;
/// 100 ms of audio per outbound frame
pub const FRAME_SAMPLES: usize = TARGET_RATE / 10;

pub fn resample(samples: &[f32], from_rate: usize, to_rate: usize) -> Vec<f32> {
    if from_rate == to_rate {
        return samples.to_vec();
    }
    let ratio = to_rate as f64 / from_rate as f64;
    let new_len = (samples.len() as f64 * ratio) as usize;
    (0..new_len)
        .map(|i| {
            let src_idx = i as f64 / ratio;
            let idx = src_idx as usize;
            let frac = src_idx - idx as f64;
            if idx + 1 < samples.len() {
                samples[idx] * (1.0 - frac as f32) + samples[idx + 1] * frac as f32
            } else {
                samples.get(idx).copied().unwrap_or(0.0)
            }
        })
        .collect()
}

/// Open the default input device and start feeding 16 kHz mono LINEAR16
/// frames into the buffer.
///
/// The returned `Stream` is `!Send` and must be kept alive on the calling
/// thread; dropping it stops capture and releases the device.
pub fn start_capture(
    writer: FrameWriter,
) -> Result<Stream, Box<dyn std::error::Error + Send + Sync>> {
    let host = cpal::default_host();
    let device = host.default_input_device().ok_or("No input device")?;
    let supported = device.default_input_config()?;
    let sample_rate = u32::from(supported.sample_rate()) as usize;
    let channels = supported.channels() as usize;

    println!("Mic: {}Hz {}ch", sample_rate, channels);

    let mut pending: Vec<i16> = Vec::with_capacity(FRAME_SAMPLES);
    let stream = device.build_input_stream(
        &supported.config(),
        move |data: &[f32], _| {
            let mono: Vec<f32> = if channels == 1 {
                data.to_vec()
            } else {
                data.chunks(channels)
                    .map(|c| c.iter().sum::<f32>() / channels as f32)
                    .collect()
            };
            for s in resample(&mono, sample_rate, TARGET_RATE) {
                pending.push((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16);
                if pending.len() == FRAME_SAMPLES {
                    writer.enqueue(encode_frame(&pending));
                    pending.clear();
                }
            }
        },
        |e| eprintln!("Mic error: {}", e),
        None,
    )?;
    stream.play()?;

    Ok(stream)
}

fn encode_frame(samples: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for s in samples {
        bytes.extend_from_slice(&s.to_le_bytes());
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resample_halves_length_when_downsampling_2x() {
        let samples: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).sin()).collect();
        let out = resample(&samples, 32000, 16000);
        assert_eq!(out.len(), 500);
    }

    #[test]
    fn resample_is_identity_at_target_rate() {
        let samples = vec![0.1, -0.2, 0.3];
        assert_eq!(resample(&samples, 16000, 16000), samples);
    }

    #[test]
    fn encode_frame_is_little_endian() {
        let bytes = encode_frame(&[1, -2]);
        assert_eq!(bytes, vec![0x01, 0x00, 0xFE, 0xFF]);
    }
}
