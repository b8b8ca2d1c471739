//! Error types for Umwelt operations.
//!
//! Simulation and rendering are total; errors only arise when validating
//! user-supplied profiles and when driving the insight request.

use std::error::Error;
use std::fmt;

/// Result type for Umwelt operations.
pub type Result<T> = std::result::Result<T, UmweltError>;

/// Errors that can occur during Umwelt operations.
#[derive(Debug, Clone, PartialEq)]
pub enum UmweltError {
    /// Profile validation errors.
    Profile(ProfileError),
    /// Insight request state errors.
    Insight(InsightError),
}

impl fmt::Display for UmweltError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UmweltError::Profile(e) => write!(f, "Profile error: {}", e),
            UmweltError::Insight(e) => write!(f, "Insight error: {}", e),
        }
    }
}

impl Error for UmweltError {}

impl From<ProfileError> for UmweltError {
    fn from(e: ProfileError) -> Self {
        UmweltError::Profile(e)
    }
}

impl From<InsightError> for UmweltError {
    fn from(e: InsightError) -> Self {
        UmweltError::Insight(e)
    }
}

/// Species profile validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// No preset with this name.
    UnknownPreset(String),
    /// Sampling rate outside the supported range.
    InvalidSamplingRate(f64),
    /// Integration window outside 1..=capacity.
    InvalidIntegrationWindow(usize),
    /// Attention bias outside [0, 1].
    InvalidAttentionBias(f64),
    /// Color string could not be parsed.
    InvalidColor(String),
    /// Empty species name.
    EmptyName,
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::UnknownPreset(name) => write!(f, "Unknown preset: {}", name),
            ProfileError::InvalidSamplingRate(hz) => {
                write!(f, "Invalid sampling rate: {} Hz (must be 1-240)", hz)
            }
            ProfileError::InvalidIntegrationWindow(w) => {
                write!(f, "Invalid integration window: {} (must be 1-50)", w)
            }
            ProfileError::InvalidAttentionBias(b) => {
                write!(f, "Invalid attention bias: {} (must be 0.0-1.0)", b)
            }
            ProfileError::InvalidColor(s) => write!(f, "Invalid color: {}", s),
            ProfileError::EmptyName => write!(f, "Species name is empty"),
        }
    }
}

impl Error for ProfileError {}

/// Insight request state errors.
#[derive(Debug, Clone, PartialEq)]
pub enum InsightError {
    /// A request is already outstanding.
    AlreadyPending,
}

impl fmt::Display for InsightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightError::AlreadyPending => write!(f, "An insight request is already pending"),
        }
    }
}

impl Error for InsightError {}
