//! Integration tests for the verification notifier

use serde_json::json;
use verification::composer::compose;
use verification::{
    ConfigHandle, ConfigSource, InMemorySecretStore, MockEmailProvider, ResponseOptions,
    VerificationNotifier, VerificationRequest,
};

const SECRET_ARN: &str = "arn:aws:secretsmanager:us-east-1:123456789012:secret:verify-user";

fn sns_event(message: serde_json::Value) -> serde_json::Value {
    json!({
        "Records": [{
            "EventSource": "aws:sns",
            "EventVersion": "1.0",
            "EventSubscriptionArn": "arn:aws:sns:us-east-1:123456789012:user-registered:sub",
            "Sns": {
                "Type": "Notification",
                "MessageId": "95df01b4-ee98-5cb9-9903-4c221d41eb5e",
                "TopicArn": "arn:aws:sns:us-east-1:123456789012:user-registered",
                "Subject": null,
                "Message": message.to_string(),
                "Timestamp": "2024-01-01T00:00:00.000Z",
                "SignatureVersion": "1",
                "Signature": "EXAMPLE",
                "SigningCertUrl": "https://sns.us-east-1.amazonaws.com/SimpleNotificationService-example.pem",
                "UnsubscribeUrl": "https://sns.us-east-1.amazonaws.com/?Action=Unsubscribe",
                "MessageAttributes": {}
            }
        }]
    })
}

fn env_source() -> ConfigSource {
    ConfigSource {
        sendgrid_api_key: Some("SG.env".to_string()),
        verification_link_base: Some("https://verify.example.com".to_string()),
        from_email: Some("noreply@example.com".to_string()),
        secret_id: Some(SECRET_ARN.to_string()),
    }
}

fn notifier(
    source: ConfigSource,
    secrets: InMemorySecretStore,
    provider: MockEmailProvider,
) -> VerificationNotifier<InMemorySecretStore, MockEmailProvider> {
    VerificationNotifier::new(ConfigHandle::new(source), secrets, provider).with_options(
        ResponseOptions {
            expose_error_detail: true,
        },
    )
}

mod scenarios {
    use super::*;

    #[tokio::test]
    async fn scenario_a_valid_message_sends_link() {
        let notifier = notifier(
            env_source(),
            InMemorySecretStore::new(),
            MockEmailProvider::new(),
        );

        let result = notifier
            .handle(&sns_event(json!({ "email": "a@x.com", "token": "tok123" })))
            .await;

        assert_eq!(result.status_code, 200);
        assert_eq!(result.body.message, "Verification email sent successfully.");

        let sent = notifier.provider().sent_emails().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@x.com");
        assert_eq!(sent[0].from, "noreply@example.com");
        assert_eq!(sent[0].subject, "Verify your email address");
        assert!(sent[0]
            .text
            .contains("https://verify.example.com?token=tok123"));
        assert!(sent[0].text.ends_with("This link will expire in 2 minutes."));
    }

    #[tokio::test]
    async fn scenario_b_missing_token_never_sends() {
        let notifier = notifier(
            env_source(),
            InMemorySecretStore::new(),
            MockEmailProvider::new(),
        );

        let result = notifier
            .handle(&sns_event(json!({ "email": "a@x.com" })))
            .await;

        assert_eq!(result.status_code, 500);
        assert_eq!(result.body.message, "Failed to send verification email.");
        assert_eq!(notifier.provider().attempt_count(), 0);
    }

    #[tokio::test]
    async fn scenario_c_provider_error_is_not_retried() {
        let notifier = notifier(
            env_source(),
            InMemorySecretStore::new(),
            MockEmailProvider::failing("SendGrid error (500): upstream down"),
        );

        let result = notifier
            .handle(&sns_event(json!({ "email": "a@x.com", "token": "tok123" })))
            .await;

        assert_eq!(result.status_code, 500);
        assert_eq!(
            result.body.error.as_deref(),
            Some("Failed to send verification email via SendGrid.")
        );
        assert_eq!(notifier.provider().attempt_count(), 1);
    }
}

mod config_resolution {
    use super::*;

    #[tokio::test]
    async fn test_complete_env_never_touches_secret_store() {
        let notifier = notifier(
            env_source(),
            InMemorySecretStore::new(),
            MockEmailProvider::new(),
        );

        let result = notifier
            .handle(&sns_event(json!({ "email": "a@x.com", "token": "t" })))
            .await;

        assert!(result.is_success());
        assert_eq!(notifier.secrets().fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_values_filled_from_single_secret_fetch() {
        let source = ConfigSource {
            sendgrid_api_key: None,
            verification_link_base: None,
            ..env_source()
        };
        let secrets = InMemorySecretStore::new().with_json(
            SECRET_ARN,
            json!({
                "SENDGRID_API_KEY": "SG.secret",
                "VERIFICATION_LINK_BASE": "https://secret.example.com/verify",
                "FROM_EMAIL": "secret@example.com"
            }),
        );
        let notifier = notifier(source, secrets, MockEmailProvider::new());

        let result = notifier
            .handle(&sns_event(json!({ "email": "a@x.com", "token": "abc" })))
            .await;

        assert!(result.is_success());
        assert_eq!(notifier.secrets().fetch_count(), 1);

        let sent = notifier.provider().sent_emails().await;
        assert!(sent[0]
            .text
            .contains("https://secret.example.com/verify?token=abc"));
        assert_eq!(sent[0].from, "noreply@example.com");
        assert_eq!(notifier.provider().api_keys().await, vec!["SG.secret".to_string()]);
    }

    #[tokio::test]
    async fn test_warm_invocations_reuse_cached_config() {
        let source = ConfigSource {
            sendgrid_api_key: None,
            ..env_source()
        };
        let secrets =
            InMemorySecretStore::new().with_json(SECRET_ARN, json!({ "SENDGRID_API_KEY": "SG.secret" }));
        let notifier = notifier(source, secrets, MockEmailProvider::new());

        for token in ["t1", "t2", "t3"] {
            let result = notifier
                .handle(&sns_event(json!({ "email": "a@x.com", "token": token })))
                .await;
            assert!(result.is_success());
        }

        assert_eq!(notifier.secrets().fetch_count(), 1);
        assert_eq!(notifier.provider().sent_count().await, 3);
    }

    #[tokio::test]
    async fn test_no_fallback_configured_fails_without_sending() {
        let source = ConfigSource {
            from_email: None,
            secret_id: None,
            ..env_source()
        };
        let notifier = notifier(source, InMemorySecretStore::new(), MockEmailProvider::new());

        let result = notifier
            .handle(&sns_event(json!({ "email": "a@x.com", "token": "t" })))
            .await;

        assert_eq!(result.status_code, 500);
        assert_eq!(notifier.secrets().fetch_count(), 0);
        assert_eq!(notifier.provider().attempt_count(), 0);
    }

    #[tokio::test]
    async fn test_failing_fallback_fails_without_sending() {
        let source = ConfigSource {
            sendgrid_api_key: None,
            ..env_source()
        };
        let notifier = notifier(
            source,
            InMemorySecretStore::failing("AccessDeniedException"),
            MockEmailProvider::new(),
        );

        let result = notifier
            .handle(&sns_event(json!({ "email": "a@x.com", "token": "t" })))
            .await;

        assert_eq!(result.status_code, 500);
        assert!(result
            .body
            .error
            .as_deref()
            .unwrap()
            .contains("AccessDeniedException"));
        assert_eq!(notifier.secrets().fetch_count(), 1);
        assert_eq!(notifier.provider().attempt_count(), 0);
    }

    #[tokio::test]
    async fn test_secret_without_required_field_names_it() {
        let source = ConfigSource {
            from_email: None,
            ..env_source()
        };
        let secrets =
            InMemorySecretStore::new().with_json(SECRET_ARN, json!({ "SENDGRID_API_KEY": "SG.secret" }));
        let notifier = notifier(source, secrets, MockEmailProvider::new());

        let result = notifier
            .handle(&sns_event(json!({ "email": "a@x.com", "token": "t" })))
            .await;

        assert_eq!(result.status_code, 500);
        assert_eq!(
            result.body.error.as_deref(),
            Some("Missing required environment variable: FROM_EMAIL")
        );
        assert_eq!(notifier.provider().attempt_count(), 0);
    }
}

mod boundary {
    use super::*;

    #[tokio::test]
    async fn test_malformed_events_map_to_500() {
        let notifier = notifier(
            env_source(),
            InMemorySecretStore::new(),
            MockEmailProvider::new(),
        );

        let events = [
            json!(null),
            json!({ "Records": [] }),
            json!({ "Records": [{ "Sns": { "Message": "not json" } }] }),
            sns_event(json!({ "token": "t" })),
            sns_event(json!({ "email": "a@x.com", "token": "" })),
        ];

        for event in &events {
            assert_eq!(notifier.handle(event).await.status_code, 500);
        }
        assert_eq!(notifier.provider().attempt_count(), 0);
    }

    #[tokio::test]
    async fn test_detail_hidden_when_disabled() {
        let notifier = VerificationNotifier::new(
            ConfigHandle::new(env_source()),
            InMemorySecretStore::new(),
            MockEmailProvider::new(),
        );

        let result = notifier
            .handle(&sns_event(json!({ "email": "a@x.com" })))
            .await;

        assert_eq!(result.status_code, 500);
        assert_eq!(result.body.error, None);
    }

    #[test]
    fn test_composition_is_byte_identical() {
        let config = verification::InvocationConfig {
            provider_api_key: "SG.key".to_string(),
            verification_link_base: "https://verify.example.com".to_string(),
            from_email: "noreply@example.com".to_string(),
        };
        let request = VerificationRequest {
            email: "a@x.com".to_string(),
            token: "tok123".to_string(),
        };

        let first = serde_json::to_vec(&compose(&config, &request)).unwrap();
        let second = serde_json::to_vec(&compose(&config, &request.clone())).unwrap();
        assert_eq!(first, second);
    }
}
