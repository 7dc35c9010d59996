//! Lossy transcoding of encoded WAV files.

use crate::capability::LossyTranscoder;
use crate::error::{AudioError, AudioResult, Capability};

/// Transcodes WAV bytes to the transcoder's lossy format.
///
/// Fails with [`AudioError::CapabilityUnavailable`] without invoking the
/// transcoder when it reports itself unavailable, and with
/// [`AudioError::WavDecode`] when the input is not a RIFF/WAVE file.
pub fn transcode_to_lossy(
    transcoder: &dyn LossyTranscoder,
    wav_bytes: &[u8],
) -> AudioResult<Vec<u8>> {
    if !transcoder.is_available() {
        return Err(AudioError::unavailable(
            Capability::Transcoder,
            format!("transcoder '{}' is not available", transcoder.name()),
        ));
    }
    if crate::wav::data_chunk(wav_bytes).is_none() {
        return Err(AudioError::WavDecode(
            "input to transcoder is not a WAV file".to_string(),
        ));
    }

    let encoded = transcoder.transcode(wav_bytes)?;
    log::debug!(
        "transcoded {} WAV bytes to {} {} bytes with '{}'",
        wav_bytes.len(),
        encoded.len(),
        transcoder.format().extension,
        transcoder.name()
    );
    Ok(encoded)
}
