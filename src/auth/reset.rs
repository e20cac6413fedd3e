//! Password-reset code lifecycle
//!
//! ```text
//! NoResetPending --issue--> CodeIssued --check ok--> Verified
//!                               |   \--expired--> Expired
//!                               |
//!      <--- complete (new password stored, code cleared) ---
//! ```
//!
//! Issuing a new code overwrites the previous one, so at most one code is
//! valid per account. A failed check leaves the code in place.

use chrono::{DateTime, Duration, Utc};

use crate::account::ResetCode;
use crate::account::validation::generate_reset_code;
use crate::wallet::WalletError;

pub const RESET_CODE_TTL_MINUTES: i64 = 15;

pub fn issue(now: DateTime<Utc>, ttl: Duration) -> ResetCode {
    ResetCode {
        code: generate_reset_code(),
        expires_at: now + ttl,
    }
}

fn codes_match(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Accept `code` if it matches the pending reset and `now` has not passed
/// its expiry.
pub fn check(pending: Option<&ResetCode>, code: &str, now: DateTime<Utc>) -> Result<(), WalletError> {
    let pending = pending.ok_or(WalletError::InvalidCode)?;
    if !codes_match(&pending.code, code.trim()) {
        return Err(WalletError::InvalidCode);
    }
    if now > pending.expires_at {
        return Err(WalletError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn ttl() -> Duration {
        Duration::minutes(RESET_CODE_TTL_MINUTES)
    }

    #[test]
    fn test_issue_six_digits() {
        let r = issue(t0(), ttl());
        assert_eq!(r.code.len(), 6);
        assert!(r.code.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(r.expires_at, t0() + Duration::minutes(15));
    }

    #[test]
    fn test_expiry_boundary() {
        let r = issue(t0(), ttl());
        let just_before = t0() + Duration::minutes(14) + Duration::seconds(59);
        let just_after = t0() + Duration::minutes(15) + Duration::seconds(1);
        assert!(check(Some(&r), &r.code, just_before).is_ok());
        assert_eq!(check(Some(&r), &r.code, just_after), Err(WalletError::Expired));
    }

    #[test]
    fn test_wrong_or_missing_code() {
        let r = ResetCode {
            code: "123456".into(),
            expires_at: t0() + ttl(),
        };
        assert_eq!(check(Some(&r), "654321", t0()), Err(WalletError::InvalidCode));
        assert_eq!(check(Some(&r), "12345", t0()), Err(WalletError::InvalidCode));
        assert_eq!(check(None, "123456", t0()), Err(WalletError::InvalidCode));
        assert!(check(Some(&r), " 123456 ", t0()).is_ok());
    }

    #[test]
    fn test_wrong_code_reported_before_expiry() {
        let r = ResetCode {
            code: "123456".into(),
            expires_at: t0(),
        };
        let later = t0() + Duration::hours(1);
        assert_eq!(check(Some(&r), "000000", later), Err(WalletError::InvalidCode));
    }
}
