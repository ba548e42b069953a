use crate::error::AppError;
use subtle::ConstantTimeEq;

/// 게이트를 거치는 입구
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateSurface {
    /// `POST /` HTML 폼
    Form,
    /// `POST /api/ogiri/generate`
    Api,
}

impl GateSurface {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateSurface::Form => "form",
            GateSurface::Api => "api",
        }
    }
}

/// Shared-password gate placed in front of every generation path.
///
/// Rejections are logged and counted per surface in `access_gate_rejections_total`.
#[derive(Clone)]
pub struct AccessGate {
    expected_password: String,
}

impl AccessGate {
    pub fn new(expected_password: impl Into<String>) -> Self {
        Self {
            expected_password: expected_password.into(),
        }
    }

    /// Exact, case-sensitive comparison without trimming.
    ///
    /// `subtle` compares slices in constant time and yields false on a length mismatch.
    pub fn check(&self, entered: &str, surface: GateSurface) -> Result<(), AppError> {
        let matches: bool = self
            .expected_password
            .as_bytes()
            .ct_eq(entered.as_bytes())
            .into();

        if !matches {
            tracing::warn!(
                event = "invalid_password_attempt",
                surface = surface.as_str(),
                "Access gate rejected password"
            );
            metrics::counter!("access_gate_rejections_total", "surface" => surface.as_str())
                .increment(1);
            return Err(AppError::InvalidPassword);
        }

        tracing::debug!(surface = surface.as_str(), "Access gate passed");
        Ok(())
    }
}
