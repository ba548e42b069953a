use backoff::{future::retry, ExponentialBackoff};
use std::future::Future;
use std::time::Duration;

use crate::error::AppError;

/// 재시도 가능한 에러인지 판단
///
/// 타임아웃, 네트워크, 5xx 같은 일시적 오류만 재시도합니다.
/// 인증, API 키 누락, 요청 한도/쿼터, 잘못된 응답은 즉시 실패합니다.
fn is_retryable_error(error: &AppError) -> bool {
    matches!(error, AppError::CompletionTemporaryError)
}

/// 지수 백오프 설정 생성
fn create_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: Duration::from_millis(500),
        max_interval: Duration::from_secs(5),
        max_elapsed_time: Some(Duration::from_secs(20)),
        multiplier: 2.0,
        ..Default::default()
    }
}

/// 재시도 로직을 적용한 비동기 작업 실행
///
/// 일시적 오류 시 지수 백오프로 재시도하고,
/// 영구적 오류 시 즉시 실패를 반환합니다.
pub async fn with_retry<F, Fut, T>(operation: F) -> Result<T, AppError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let backoff = create_backoff();

    retry(backoff, || async {
        match operation().await {
            Ok(result) => Ok(result),
            Err(e) => {
                if is_retryable_error(&e) {
                    tracing::warn!(error = %e, "Retryable error, will retry...");
                    Err(backoff::Error::transient(e))
                } else {
                    tracing::error!(error = %e, "Permanent error, not retrying");
                    Err(backoff::Error::permanent(e))
                }
            }
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn temporary_error_should_be_retryable() {
        assert!(is_retryable_error(&AppError::CompletionTemporaryError));
    }

    #[test]
    fn auth_and_config_errors_should_not_be_retryable() {
        assert!(!is_retryable_error(&AppError::CompletionAuthError));
        assert!(!is_retryable_error(&AppError::MissingApiKey));
        assert!(!is_retryable_error(&AppError::InvalidPassword));
    }

    #[test]
    fn rate_limit_should_not_be_retryable() {
        assert!(!is_retryable_error(&AppError::CompletionRateLimitError));
    }

    #[test]
    fn malformed_and_request_errors_should_not_be_retryable() {
        assert!(!is_retryable_error(&AppError::CompletionMalformed("no choices".into())));
        assert!(!is_retryable_error(&AppError::CompletionError("bad request".into())));
        assert!(!is_retryable_error(&AppError::ValidationError("topic".into())));
    }

    #[test]
    fn create_backoff_should_be_bounded() {
        let backoff = create_backoff();
        assert_eq!(backoff.initial_interval, Duration::from_millis(500));
        assert_eq!(backoff.max_interval, Duration::from_secs(5));
        assert_eq!(backoff.max_elapsed_time, Some(Duration::from_secs(20)));
        assert!((backoff.multiplier - 2.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn with_retry_should_succeed_on_first_try() {
        let result = with_retry(|| async { Ok::<_, AppError>("success") }).await;

        assert_eq!(result.unwrap(), "success");
    }

    #[tokio::test]
    async fn with_retry_should_retry_on_transient_error() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = with_retry(|| {
            let attempts = Arc::clone(&attempts_clone);
            async move {
                let count = attempts.fetch_add(1, Ordering::SeqCst);
                if count < 2 {
                    Err(AppError::CompletionTemporaryError)
                } else {
                    Ok("success")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn with_retry_should_not_retry_auth_error() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = with_retry(|| {
            let attempts = Arc::clone(&attempts_clone);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(AppError::CompletionAuthError)
            }
        })
        .await;

        assert!(matches!(result, Err(AppError::CompletionAuthError)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn with_retry_should_not_retry_malformed_response() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = with_retry(|| {
            let attempts = Arc::clone(&attempts_clone);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(AppError::CompletionMalformed("no choices".into()))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
