/// Header summary of a WAV file, shown next to each player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub is_float: bool,
    pub duration_secs: f64,
}

impl WavInfo {
    pub fn describe(&self) -> String {
        let format = if self.is_float { "float" } else { "PCM" };
        format!(
            "{} Hz · {} ch · {}-bit {} · {:.2}s",
            self.sample_rate, self.channels, self.bits_per_sample, format, self.duration_secs
        )
    }
}

/// Read the RIFF header. `None` when the bytes are not a WAV file hound can
/// open; playback does not depend on this.
pub fn probe(bytes: &[u8]) -> Option<WavInfo> {
    let reader = match hound::WavReader::new(std::io::Cursor::new(bytes)) {
        Ok(r) => r,
        Err(e) => {
            log::debug!("Not a readable WAV header: {e}");
            return None;
        }
    };
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return None;
    }
    // duration() counts frames, i.e. samples per channel
    let duration_secs = reader.duration() as f64 / spec.sample_rate as f64;

    Some(WavInfo {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        is_float: spec.sample_format == hound::SampleFormat::Float,
        duration_secs,
    })
}
