//! Integration tests for token revocation against a mock authority.

use oauth2_token_lifecycle::{
    token_lifecycle_config, AuthenticationState, ClientAuthMethod, CycleOutcome,
    DefaultTokenRevoker, InMemoryLogger, LogLevel, MockAccessTokenSource, ReqwestHttpTransport,
    RevocationOutcome, SweepOutcome, TokenLifecycleConfig, TokenLifecycleManager, TokenSet,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> TokenLifecycleConfig {
    token_lifecycle_config()
        .authority(server.uri())
        .client_id("spa-client")
        .timeout(Duration::from_secs(5))
        .build()
        .expect("valid config")
}

fn signed_in() -> AuthenticationState {
    AuthenticationState::authenticated("alice")
}

fn manager_with_logger(
    config: TokenLifecycleConfig,
    tokens: Arc<TokenSet>,
    logger: Arc<InMemoryLogger>,
) -> TokenLifecycleManager<MockAccessTokenSource, DefaultTokenRevoker<ReqwestHttpTransport>> {
    TokenLifecycleManager::new(
        config,
        tokens,
        Arc::new(MockAccessTokenSource::with_token("current")),
    )
    .unwrap()
    .with_logger(logger)
}

/// Reads one HTTP request, answers with headers promising more body than
/// is sent, then closes the connection.
async fn serve_truncated_response(listener: TcpListener) {
    let (mut socket, _) = listener.accept().await.unwrap();
    read_request(&mut socket).await;
    socket
        .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 1000\r\n\r\npartial")
        .await
        .unwrap();
    socket.flush().await.unwrap();
}

async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                return;
            }
        }
    }
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/connect/revocat"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("token=tok1"))
        .and(body_string_contains("client_id=spa-client"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = Arc::new(TokenSet::new());
    let source = Arc::new(MockAccessTokenSource::with_token("tok1"));

    // Cycle 1: revocation not configured yet.
    let unconfigured = TokenLifecycleManager::new(
        token_lifecycle_config().build().unwrap(),
        tokens.clone(),
        source.clone(),
    )
    .unwrap();
    let outcome = unconfigured.observe(&signed_in()).await;
    assert_eq!(outcome, CycleOutcome::Recorded(SweepOutcome::BelowThreshold));
    assert_eq!(tokens.snapshot(), vec!["tok1".to_string()]);

    // Cycle 2: a fresher token with authority and client id configured.
    source.set_token(Some("tok2".to_string()));
    let manager = TokenLifecycleManager::new(config_for(&server), tokens.clone(), source.clone())
        .unwrap();
    let outcome = manager.observe(&signed_in()).await;

    match outcome {
        CycleOutcome::Recorded(SweepOutcome::Completed(report)) => {
            assert_eq!(report.candidates, 1);
            assert_eq!(report.revoked, vec!["tok1".to_string()]);
            assert!(report.failed.is_empty());
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(tokens.snapshot(), vec!["tok2".to_string()]);
}

#[tokio::test]
async fn test_rejection_keeps_token_and_logs() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/connect/revocat"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "unsupported_token_type",
            "error_description": "Reference tokens only"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = Arc::new(TokenSet::new());
    tokens.add("stale");
    let logger = Arc::new(InMemoryLogger::new());
    let manager = TokenLifecycleManager::new(
        config_for(&server),
        tokens.clone(),
        Arc::new(MockAccessTokenSource::with_token("current")),
    )
    .unwrap()
    .with_logger(logger.clone());

    let outcome = manager.observe(&signed_in()).await;

    let CycleOutcome::Recorded(SweepOutcome::Completed(report)) = outcome else {
        panic!("expected a completed sweep");
    };
    assert_eq!(
        report.failed,
        vec![(
            "stale".to_string(),
            RevocationOutcome::Rejected {
                status: Some(400),
                error_code: Some("unsupported_token_type".to_string()),
                reason: "unsupported_token_type: Reference tokens only".to_string(),
            }
        )]
    );
    assert!(tokens.contains("stale"));
    assert!(tokens.contains("current"));

    let errors = logger.get_entries_by_level(LogLevel::Error);
    assert_eq!(errors.len(), 1);
    assert!(!errors[0].message.contains("stale"));
}

#[tokio::test]
async fn test_unreachable_authority_is_transport_error() {
    let tokens = Arc::new(TokenSet::new());
    tokens.add("stale");
    let logger = Arc::new(InMemoryLogger::new());
    let config = token_lifecycle_config()
        .authority("http://127.0.0.1:9")
        .client_id("spa-client")
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let manager = TokenLifecycleManager::new(
        config,
        tokens.clone(),
        Arc::new(MockAccessTokenSource::with_token("current")),
    )
    .unwrap()
    .with_logger(logger.clone());

    let outcome = manager.observe(&signed_in()).await;

    let CycleOutcome::Recorded(SweepOutcome::Completed(report)) = outcome else {
        panic!("expected a completed sweep");
    };
    assert_eq!(report.failed.len(), 1);
    assert!(matches!(
        report.failed[0].1,
        RevocationOutcome::TransportError { .. }
    ));
    assert_eq!(tokens.len(), 2);
    assert_eq!(logger.get_entries_by_level(LogLevel::Error).len(), 1);
}

#[tokio::test]
async fn test_confidential_client_uses_basic_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant/oauth/revoke"))
        .and(header_exists("authorization"))
        .and(body_string_contains("token_type_hint=access_token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let config = token_lifecycle_config()
        .authority(format!("{}/tenant", server.uri()))
        .token_revocation_path("oauth/revoke")
        .client_id("backend")
        .client_secret("s3cret")
        .auth_method(ClientAuthMethod::ClientSecretBasic)
        .token_type_hint(oauth2_token_lifecycle::TokenTypeHint::AccessToken)
        .build()
        .unwrap();

    let tokens = Arc::new(TokenSet::new());
    tokens.add("old-1");
    tokens.add("old-2");
    let manager = TokenLifecycleManager::new(
        config,
        tokens.clone(),
        Arc::new(MockAccessTokenSource::with_token("current")),
    )
    .unwrap();

    manager.observe(&signed_in()).await;

    assert_eq!(tokens.snapshot(), vec!["current".to_string()]);
}

#[tokio::test]
async fn test_no_calls_when_only_one_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let tokens = Arc::new(TokenSet::new());
    let manager = TokenLifecycleManager::new(
        config_for(&server),
        tokens.clone(),
        Arc::new(MockAccessTokenSource::with_token("only")),
    )
    .unwrap();

    for _ in 0..3 {
        assert_eq!(
            manager.observe(&signed_in()).await,
            CycleOutcome::Recorded(SweepOutcome::BelowThreshold)
        );
    }
    assert_eq!(tokens.len(), 1);
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/connect/revocat"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .expect(1)
        .mount(&server)
        .await;

    let config = token_lifecycle_config()
        .authority(server.uri())
        .client_id("spa-client")
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let tokens = Arc::new(TokenSet::new());
    tokens.add("stale");
    let logger = Arc::new(InMemoryLogger::new());
    let manager = manager_with_logger(config, tokens.clone(), logger.clone());

    let outcome = manager.observe(&signed_in()).await;

    let CycleOutcome::Recorded(SweepOutcome::Completed(report)) = outcome else {
        panic!("expected a completed sweep");
    };
    assert_eq!(report.failed.len(), 1);
    match &report.failed[0] {
        (token, RevocationOutcome::TransportError { reason }) => {
            assert_eq!(token, "stale");
            assert!(reason.contains("timeout"), "unexpected reason: {}", reason);
        }
        other => panic!("expected a transport error, got {:?}", other),
    }
    assert!(tokens.contains("stale"));
    assert!(tokens.contains("current"));
    assert_eq!(logger.get_entries_by_level(LogLevel::Error).len(), 1);
}

#[tokio::test]
async fn test_connection_dropped_mid_body_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let authority = format!("http://{}", listener.local_addr().unwrap());
    let server = tokio::spawn(serve_truncated_response(listener));

    let config = token_lifecycle_config()
        .authority(authority)
        .client_id("spa-client")
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    let tokens = Arc::new(TokenSet::new());
    tokens.add("stale");
    let logger = Arc::new(InMemoryLogger::new());
    let manager = manager_with_logger(config, tokens.clone(), logger.clone());

    let outcome = manager.observe(&signed_in()).await;
    server.await.unwrap();

    let CycleOutcome::Recorded(SweepOutcome::Completed(report)) = outcome else {
        panic!("expected a completed sweep");
    };
    assert_eq!(report.failed.len(), 1);
    assert!(
        matches!(report.failed[0].1, RevocationOutcome::TransportError { .. }),
        "unexpected outcome: {:?}",
        report.failed[0].1
    );
    assert!(tokens.contains("stale"));
    assert_eq!(logger.get_entries_by_level(LogLevel::Error).len(), 1);
}
