use super::*;

fn issuer() -> TokenIssuer {
    TokenIssuer::from_secret(b"0123456789abcdef0123456789abcdef")
}

#[test]
fn issue_then_verify_within_ttl() {
    let iss = issuer();
    let tok = iss.issue("doctor", Some(Duration::minutes(30))).unwrap();
    assert_eq!(iss.verify(&tok).unwrap(), "doctor");
}

#[test]
fn verify_fails_once_ttl_elapses() {
    let iss = issuer();
    let t0 = Utc::now();
    let tok = iss.issue_at("doctor", t0, Some(Duration::minutes(30))).unwrap();
    assert_eq!(iss.verify_at(&tok, t0 + Duration::minutes(29)).unwrap(), "doctor");
    assert_eq!(iss.verify_at(&tok, t0 + Duration::minutes(31)), Err(AuthError::Expired));
}

#[test]
fn missing_ttl_falls_back_to_fifteen_minutes() {
    let iss = issuer();
    let t0 = Utc::now();
    let tok = iss.issue_at("patient", t0, None).unwrap();
    assert!(iss.verify_at(&tok, t0 + Duration::minutes(14)).is_ok());
    assert_eq!(iss.verify_at(&tok, t0 + Duration::minutes(16)), Err(AuthError::Expired));
}

#[test]
fn already_expired_token_is_rejected_by_wall_clock() {
    let iss = issuer();
    let tok = iss.issue("doctor", Some(Duration::seconds(-5))).unwrap();
    assert_eq!(iss.verify(&tok), Err(AuthError::Expired));
}

#[test]
fn token_from_another_secret_has_invalid_signature() {
    let tok = issuer().issue("doctor", None).unwrap();
    let other = TokenIssuer::from_secret(b"ffffffffffffffffffffffffffffffff");
    assert_eq!(other.verify(&tok), Err(AuthError::InvalidSignature));
}

#[test]
fn generated_issuers_do_not_share_secrets() {
    let a = TokenIssuer::generate().unwrap();
    let b = TokenIssuer::generate().unwrap();
    let tok = a.issue("doctor", None).unwrap();
    assert!(a.verify(&tok).is_ok());
    assert_eq!(b.verify(&tok), Err(AuthError::InvalidSignature));
}

#[test]
fn garbage_is_malformed() {
    let iss = issuer();
    assert_eq!(iss.verify("not-a-token"), Err(AuthError::Malformed));
    assert_eq!(iss.verify(""), Err(AuthError::Malformed));
}

#[test]
fn ttl_past_the_calendar_is_an_error_not_a_panic() {
    let iss = issuer();
    let err = iss.issue("doctor", Some(Duration::minutes(1_000_000_000_000))).unwrap_err();
    assert!(err.to_string().contains("out of range"), "{err}");
}
