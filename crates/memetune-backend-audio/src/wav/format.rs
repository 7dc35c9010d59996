//! WAV file format parameters.

/// How samples are stored in the data chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleEncoding {
    /// 32-bit IEEE float (`WAVE_FORMAT_IEEE_FLOAT`).
    Float32,
    /// 16-bit signed integer PCM (`WAVE_FORMAT_PCM`).
    Pcm16,
}

impl SampleEncoding {
    /// `wFormatTag` value in the fmt chunk.
    pub fn format_tag(self) -> u16 {
        match self {
            SampleEncoding::Float32 => 3,
            SampleEncoding::Pcm16 => 1,
        }
    }

    /// Bits per sample.
    pub fn bits_per_sample(self) -> u16 {
        match self {
            SampleEncoding::Float32 => 32,
            SampleEncoding::Pcm16 => 16,
        }
    }
}

/// WAV file format parameters. Output is always mono.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Sample encoding.
    pub encoding: SampleEncoding,
}

impl WavFormat {
    /// Mono float WAV.
    pub fn float32(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            encoding: SampleEncoding::Float32,
        }
    }

    /// Mono 16-bit PCM WAV.
    pub fn pcm16(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            encoding: SampleEncoding::Pcm16,
        }
    }

    pub(crate) fn channels(&self) -> u16 {
        1
    }

    pub(crate) fn bytes_per_sample(&self) -> u16 {
        self.encoding.bits_per_sample() / 8
    }

    /// Bytes per sample frame.
    pub(crate) fn block_align(&self) -> u16 {
        self.channels() * self.bytes_per_sample()
    }

    /// Bytes per second.
    pub(crate) fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }

    /// Non-PCM formats carry a `cbSize` field and a fact chunk.
    pub(crate) fn is_extended(&self) -> bool {
        self.encoding != SampleEncoding::Pcm16
    }
}
