//! Domain error types.
//!
//! Only genuinely invalid input is an error: too few bars for reliable
//! indicators, malformed bar ordering, unreadable config or data files.
//! Recoverable trading conditions (ATR = 0, degenerate stop distance)
//! resolve to HOLD or a floor size inside the domain instead.

/// Top-level error type for goldtrend.
#[derive(Debug, thiserror::Error)]
pub enum GoldtrendError {
    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("invalid bar series: {reason}")]
    InvalidSeries { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&GoldtrendError> for std::process::ExitCode {
    fn from(err: &GoldtrendError) -> Self {
        let code: u8 = match err {
            GoldtrendError::Io(_) => 1,
            GoldtrendError::ConfigParse { .. } | GoldtrendError::ConfigInvalid { .. } => 2,
            GoldtrendError::Data { .. } | GoldtrendError::InvalidSeries { .. } => 3,
            GoldtrendError::NoData { .. } | GoldtrendError::InsufficientData { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
