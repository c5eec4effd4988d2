//! Integration tests for signing and submitting posts

mod common;

use ::common::crypto::PublicKey;
use ::common::ledger::IdentityCache;
use ::common::session::SignInSession;
use ::common::signer::{ContentSigner, SignError, SubmitError};

#[test]
fn test_sign_builds_payload() {
    let session = common::signed_in_session();
    let signer = ContentSigner::new(&session);

    let payload = signer.sign("hi", &common::keys().private_pem).unwrap();
    assert_eq!(payload.post_content, "hi");
    assert_eq!(payload.public_key, common::keys().public_pem);

    let public_key = PublicKey::from_pem(&common::keys().public_pem).unwrap();
    assert!(public_key.verify(b"hi", &payload.signature).is_ok());
}

#[test]
fn test_sign_requires_session() {
    let session = SignInSession::new();
    let signer = ContentSigner::new(&session);
    assert!(matches!(
        signer.sign("hi", &common::keys().private_pem),
        Err(SignError::NotSignedIn)
    ));
}

#[test]
fn test_sign_rejects_bad_private_key() {
    let session = common::signed_in_session();
    let signer = ContentSigner::new(&session);

    assert!(matches!(
        signer.sign("hi", "not a key"),
        Err(SignError::InvalidPrivateKey(_))
    ));
    // A public key in the private key slot is unusable for signing
    assert!(matches!(
        signer.sign("hi", &common::keys().public_pem),
        Err(SignError::InvalidPrivateKey(_))
    ));
}

#[test]
fn test_payload_wire_shape() {
    let session = common::signed_in_session();
    let payload = ContentSigner::new(&session)
        .sign("hi", &common::keys().private_pem)
        .unwrap();

    let json = serde_json::to_value(&payload).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 3);
    assert_eq!(object["post_content"], "hi");
    assert!(object["public_key"]
        .as_str()
        .unwrap()
        .starts_with("-----BEGIN PUBLIC KEY-----"));
    assert!(object["signature"].is_string());
}

#[tokio::test]
async fn test_submit_refreshes_ledger() {
    let (provider, sync) = common::setup_ledger();
    let session = common::signed_in_session();
    let signer = ContentSigner::new(&session);

    let submission = signer
        .submit(&sync, "hi", &common::keys().private_pem)
        .await
        .unwrap();
    let ledger = submission.refresh.unwrap();

    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.posts()[0].content, "hi");
    assert_eq!(ledger.posts()[0].public_key, common::keys().public_pem);
    assert_eq!(provider.fetch_count(), 1);
    assert_eq!(sync.current(), ledger);
}

#[tokio::test]
async fn test_submitted_author_keeps_identity() {
    let (provider, sync) = common::setup_ledger();
    let session = common::signed_in_session();
    let signer = ContentSigner::new(&session);
    let cache = IdentityCache::new();

    let first = signer
        .submit(&sync, "hi", &common::keys().private_pem)
        .await
        .unwrap()
        .refresh
        .unwrap();
    let identity = first.render(&cache)[0].identity.clone();

    let second = signer
        .submit(&sync, "again", &common::keys().private_pem)
        .await
        .unwrap()
        .refresh
        .unwrap();
    let rendered = second.render(&cache);

    assert_eq!(rendered[0].post.content, "again");
    assert_eq!(rendered[0].identity, identity);
    assert_eq!(rendered[1].identity, identity);
    assert_eq!(cache.len(), 1);
    assert_eq!(provider.posts().len(), 2);
}

#[tokio::test]
async fn test_mismatched_private_key_is_rejected_remotely() {
    let (provider, sync) = common::setup_ledger();
    let session = common::signed_in_session();
    let signer = ContentSigner::new(&session);

    // Signing succeeds locally with someone else's key
    assert!(signer.sign("hi", &common::other_keys().private_pem).is_ok());

    let err = signer
        .submit(&sync, "hi", &common::other_keys().private_pem)
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::SubmissionFailed(_)));
    assert!(provider.posts().is_empty());
    assert_eq!(provider.fetch_count(), 0);
}

#[tokio::test]
async fn test_failed_submission_does_not_refresh() {
    let (provider, sync) = common::setup_ledger();
    let session = common::signed_in_session();
    let signer = ContentSigner::new(&session);

    provider.set_fail_submit(true);
    let content = String::from("keep me");
    let err = signer
        .submit(&sync, &content, &common::keys().private_pem)
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::SubmissionFailed(_)));
    assert_eq!(content, "keep me");
    assert_eq!(provider.fetch_count(), 0);
}

#[tokio::test]
async fn test_accepted_submission_with_failed_refresh() {
    let (provider, sync) = common::setup_ledger();
    let session = common::signed_in_session();
    let signer = ContentSigner::new(&session);

    provider.set_fail_fetch(true);
    let submission = signer
        .submit(&sync, "hi", &common::keys().private_pem)
        .await
        .unwrap();

    assert!(submission.refresh.is_err());
    assert_eq!(provider.posts().len(), 1);
    assert!(sync.current().is_empty());
}
