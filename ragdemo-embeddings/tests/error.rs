use std::time::Duration;

use ragdemo_core::EmbeddingError;
use ragdemo_embeddings::EmbeddingProviderError;

#[test]
fn embedding_provider_error_maps_to_embedding_error() {
    let invalid_response: EmbeddingError =
        EmbeddingProviderError::InvalidResponse("bad payload".to_string()).into();
    assert!(matches!(
        &invalid_response,
        EmbeddingError::InvalidResponse(message) if message == "bad payload"
    ));
    assert_eq!(
        format!("{invalid_response}"),
        "Embedding invalid response: bad payload"
    );

    let request: EmbeddingError =
        EmbeddingProviderError::Request("connection refused".to_string()).into();
    assert!(matches!(
        &request,
        EmbeddingError::Provider(message) if message == "connection refused"
    ));
}

#[test]
fn timeout_and_status_errors_keep_their_category() {
    let timeout: EmbeddingError = EmbeddingProviderError::Timeout(Duration::from_secs(5)).into();
    assert!(matches!(timeout, EmbeddingError::Timeout(d) if d == Duration::from_secs(5)));

    let throttled: EmbeddingError = EmbeddingProviderError::Status {
        status: 429,
        message: "slow down".to_string(),
    }
    .into();
    assert!(matches!(throttled, EmbeddingError::RateLimited { .. }));

    let unavailable: EmbeddingError = EmbeddingProviderError::Status {
        status: 503,
        message: "loading".to_string(),
    }
    .into();
    assert!(unavailable.is_retryable());

    let missing_model: EmbeddingError = EmbeddingProviderError::Status {
        status: 404,
        message: "model not found".to_string(),
    }
    .into();
    assert!(!missing_model.is_retryable());
}
