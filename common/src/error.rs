use thiserror::Error;

/// The only reportable failures in the engine: bad scan configuration,
/// rejected before any state is touched. Everything on the protocol path is
/// total and resolves to "no response" instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanConfigError {
    #[error("unknown scan kind: {0}")]
    InvalidScanKind(String),
    #[error("target list is empty or includes the scanning host")]
    InvalidTarget,
    #[error("port list is empty")]
    InvalidPortList,
}
