use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

pub type Result<T> = std::result::Result<T, HwError>;

pub trait HwErrorExt {
    fn display(self);
    fn problem(self, why: String) -> Self;
}

impl<T> HwErrorExt for Result<T> {
    fn display(self) {
        if let Err(err) = self {
            err.display();
        }
    }

    fn problem(mut self, why: String) -> Self {
        if let Err(err) = self.as_mut() {
            err.why.push(why);
        }

        self
    }
}

impl HwErrorExt for HwError {
    fn display(self) {
        tracing::error!("{}", self.message());
    }

    fn problem(mut self, why: String) -> Self {
        self.why.push(why);
        self
    }
}

#[derive(Debug)]
pub struct HwError {
    kind: ErrorKind,
    why: Vec<String>,
}

impl HwError {
    pub fn because(kind: ErrorKind, reason: String) -> Self {
        HwError {
            kind,
            why: vec![reason],
        }
    }

    pub fn new(kind: ErrorKind) -> Self {
        HwError {
            kind,
            why: Vec::new(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn decode(err: serde_json::Error) -> Self {
        let problem = format!("{err}");
        HwError::new(ErrorKind::DecodeError(err)).problem(problem)
    }

    pub fn encode(err: serde_json::Error) -> Self {
        let problem = format!("{err}");
        HwError::new(ErrorKind::EncodeError(err)).problem(problem)
    }

    /// User-facing text, outermost context first.
    pub fn message(&self) -> String {
        self.why
            .iter()
            .rev()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Display for HwError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.kind)
    }
}

impl Error for HwError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            ErrorKind::IoError(err) => Some(err),
            ErrorKind::DecodeError(err) | ErrorKind::EncodeError(err) => Some(err),
            ErrorKind::ConfigError(_) => None,
        }
    }
}

#[derive(Debug)]
pub enum ErrorKind {
    IoError(std::io::Error),
    DecodeError(serde_json::Error),
    EncodeError(serde_json::Error),
    ConfigError(String),
}

impl ErrorKind {
    pub fn is_io(&self) -> bool {
        matches!(self, ErrorKind::IoError(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ErrorKind::DecodeError(_))
    }

    pub fn is_encode(&self) -> bool {
        matches!(self, ErrorKind::EncodeError(_))
    }
}

impl From<std::io::Error> for HwError {
    fn from(err: std::io::Error) -> Self {
        let problem = format!("{err}");
        HwError::new(ErrorKind::IoError(err)).problem(problem)
    }
}

impl From<ron::error::SpannedError> for HwError {
    fn from(err: ron::error::SpannedError) -> Self {
        let problem = format!("{err}");
        HwError::new(ErrorKind::ConfigError(problem.clone())).problem(problem)
    }
}

impl From<ron::Error> for HwError {
    fn from(err: ron::Error) -> Self {
        let problem = format!("{err}");
        HwError::new(ErrorKind::ConfigError(problem.clone())).problem(problem)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ErrorKind::IoError(err) => write!(f, "{err}"),
            ErrorKind::DecodeError(err) => write!(f, "Malformed dataset: {err}"),
            ErrorKind::EncodeError(err) => write!(f, "Could not encode dataset: {err}"),
            ErrorKind::ConfigError(err) => write!(f, "Bad config: {err}"),
        }
    }
}
