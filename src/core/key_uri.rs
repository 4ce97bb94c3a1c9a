//! Key URI handling.
//!
//! Key URIs look like `aws-kms://arn:<partition>:kms:<region>:[<path>]`.
//! They are matched by prefix only; the one piece pulled out of them is the
//! region, which the SDK needs before it can make a call.

use crate::core::constants::AWS_KMS_SCHEME;
use crate::error::{KmsError, Result};

/// Check that `uri` carries the `aws-kms://` scheme (case-insensitive).
pub fn validate(uri: &str) -> Result<()> {
    let has_scheme = uri
        .get(..AWS_KMS_SCHEME.len())
        .is_some_and(|s| s.eq_ignore_ascii_case(AWS_KMS_SCHEME));
    if !has_scheme {
        return Err(KmsError::InvalidKeyUri(format!(
            "{} (must start with {})",
            uri, AWS_KMS_SCHEME
        ))
        .into());
    }
    Ok(())
}

/// The key id sent to the service: the URI without its scheme.
pub fn key_id(uri: &str) -> &str {
    match uri.get(..AWS_KMS_SCHEME.len()) {
        Some(s) if s.eq_ignore_ascii_case(AWS_KMS_SCHEME) => &uri[AWS_KMS_SCHEME.len()..],
        _ => uri,
    }
}

/// Region named in the ARN of `uri`, if it has one.
///
/// - `aws-kms://arn:aws:kms:us-east-2:123:key/abc` → `us-east-2`
/// - `aws-kms://arn:aws-us-gov:kms:us-gov-west-1:` → `us-gov-west-1`
pub fn region(uri: &str) -> Option<&str> {
    let mut parts = key_id(uri).split(':');
    if parts.next()? != "arn" {
        return None;
    }
    let partition = parts.next()?;
    if !partition.starts_with("aws") || parts.next()? != "kms" {
        return None;
    }
    let region = parts.next()?;
    let valid = !region.is_empty()
        && region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    // the region must be followed by another segment
    if !valid || parts.next().is_none() {
        return None;
    }
    Some(region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(validate("aws-kms://arn:aws:kms:us-east-1:123:key/abc").is_ok());
        assert!(validate("AWS-KMS://arn:aws:kms:us-east-1:123:").is_ok());
        assert!(validate("gcp-kms://projects/p").is_err());
        assert!(validate("arn:aws:kms:us-east-1:123:key/abc").is_err());
        assert!(validate("").is_err());
    }

    #[test]
    fn test_key_id_strips_scheme() {
        assert_eq!(
            key_id("aws-kms://arn:aws:kms:us-east-1:123:alias/a"),
            "arn:aws:kms:us-east-1:123:alias/a"
        );
        assert_eq!(key_id("arn:aws:kms:us-east-1:123:key/a"), "arn:aws:kms:us-east-1:123:key/a");
    }

    #[test]
    fn test_region() {
        assert_eq!(
            region("aws-kms://arn:aws:kms:us-east-2:235739564943:key/3ee50705"),
            Some("us-east-2")
        );
        assert_eq!(region("aws-kms://arn:aws-us-gov:kms:us-gov-west-1:"), Some("us-gov-west-1"));
        assert_eq!(region("aws-kms://arn:aws-cn:kms:cn-north-1:1:key/x"), Some("cn-north-1"));
    }

    #[test]
    fn test_region_invalid() {
        assert_eq!(region("aws-kms://arn:aws:s3:us-east-1:1:bucket"), None);
        assert_eq!(region("aws-kms://arn:aws:kms:"), None);
        assert_eq!(region("aws-kms://arn:aws:kms:us-east-1"), None);
        assert_eq!(region("aws-kms://arn:aws:kms:US_EAST:1:key/x"), None);
        assert_eq!(region("aws-kms://not-an-arn"), None);
    }
}
