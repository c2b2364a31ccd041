pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("year {0} is out of range, must be between 1 and 9999")]
    YearOutOfRange(i32),

    #[error("cannot parse year specification: {0}")]
    YearSpec(String),

    #[error("environment variables could not be validated: {0:#?}")]
    Envy(#[from] envy::Error),

    #[error("cannot write calendar file: {0}")]
    Io(#[from] std::io::Error),
}
