use serde::Serialize;

const BYTES_PER_KB: f64 = 1024.0;

/// A raw throughput reading in bytes per second, as handed over by a stats
/// provider. Values may be negative or NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawStatsSample {
    pub rx_sec: f64,
    pub tx_sec: f64,
}

impl RawStatsSample {
    pub fn new(rx_sec: f64, tx_sec: f64) -> Self {
        Self { rx_sec, tx_sec }
    }
}

/// Last known throughput in kB/s, already rounded and formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    pub download: String,
    pub upload: String,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            download: "0".to_string(),
            upload: "0".to_string(),
        }
    }
}

impl From<RawStatsSample> for DisplayState {
    fn from(sample: RawStatsSample) -> Self {
        raw_to_display(sample)
    }
}

pub fn raw_to_display(sample: RawStatsSample) -> DisplayState {
    DisplayState {
        download: kilobytes_display(sample.rx_sec),
        upload: kilobytes_display(sample.tx_sec),
    }
}

fn kilobytes_display(bytes_per_sec: f64) -> String {
    let mut kb = bytes_per_sec / BYTES_PER_KB;
    if kb < 0.0 || !kb.is_finite() {
        kb = 0.0;
    }
    // `{:.0}` rounds half to even, the widget rounds half away from zero
    format!("{}", kb.round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_kilobytes() {
        let state = raw_to_display(RawStatsSample::new(2048.0, 1024.0));
        assert_eq!(state.download, "2");
        assert_eq!(state.upload, "1");
    }

    #[test]
    fn test_negative_and_nan_clamped() {
        let state = raw_to_display(RawStatsSample::new(-5.0, f64::NAN));
        assert_eq!(state, DisplayState::default());
    }

    #[test]
    fn test_rounding() {
        // 1.5 kB/s and 0.49 kB/s
        let state = raw_to_display(RawStatsSample::new(1536.0, 502.0));
        assert_eq!(state.download, "2");
        assert_eq!(state.upload, "0");

        let state = raw_to_display(RawStatsSample::new(2559.0, 1_048_576.0));
        assert_eq!(state.download, "2");
        assert_eq!(state.upload, "1024");
    }

    #[test]
    fn test_infinity_clamped() {
        let state = raw_to_display(RawStatsSample::new(f64::INFINITY, f64::NEG_INFINITY));
        assert_eq!(state.download, "0");
        assert_eq!(state.upload, "0");
    }

    #[test]
    fn test_fields_independent() {
        let state = raw_to_display(RawStatsSample::new(f64::NAN, 10240.0));
        assert_eq!(state.download, "0");
        assert_eq!(state.upload, "10");
    }

    #[test]
    fn test_default_is_zero() {
        let state = DisplayState::default();
        assert_eq!(state.download, "0");
        assert_eq!(state.upload, "0");
    }
}
