use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("Failed to read data file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: String, column: String },

    #[error("{path}, line {line}: {message}")]
    InvalidValue {
        path: String,
        line: usize,
        message: String,
    },

    #[error("{path}, line {line}: player '{player}' is not in the roster")]
    UnknownPlayer {
        path: String,
        line: usize,
        player: String,
    },

    #[error("{path} lists player '{player}' more than once")]
    DuplicatePlayer { path: String, player: String },
}
