use std::fmt::{self, Display};

use crate::strategy::Strategy;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FactorialError {
    InvalidArgument { name: &'static str, value: i64 },
    ArithmeticOverflow { n: u64, width: u32 },
    WorkerFailed { strategy: Strategy, message: String },
    Runtime(String),
}

impl FactorialError {
    pub(crate) fn invalid(name: &'static str, value: i64) -> Self {
        Self::InvalidArgument { name, value }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    pub fn to_report(&self) -> miette::Report {
        match self {
            Self::InvalidArgument { name, value } => miette::miette!(
                help = match *name {
                    "n" => "factorials are only defined for non-negative integers",
                    "chunk_size" => "chunks must contain at least one factor",
                    _ => "use a positive value",
                },
                "Invalid argument `{}`: {}",
                name,
                value,
            ),
            Self::ArithmeticOverflow { n, width } => miette::miette!(
                help = "pick a strategy, all of them compute with arbitrary precision",
                "{}! does not fit into a {}-bit integer",
                n,
                width,
            ),
            Self::WorkerFailed { strategy, message } => miette::miette!(
                "A worker of the `{}` strategy failed: {}",
                strategy,
                message,
            ),
            Self::Runtime(message) => {
                miette::miette!("Could not start the parallel runtime: {}", message)
            }
        }
    }
}

impl Display for FactorialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { name, value } => {
                write!(f, "invalid argument `{name}`: {value}")
            }
            Self::ArithmeticOverflow { n, width } => {
                write!(f, "{n}! overflows a {width}-bit integer")
            }
            Self::WorkerFailed { strategy, message } => {
                write!(f, "worker of `{strategy}` failed: {message}")
            }
            Self::Runtime(message) => write!(f, "runtime error: {message}"),
        }
    }
}

impl std::error::Error for FactorialError {}

pub(crate) fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_owned()
    }
}
