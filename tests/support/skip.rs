/// Skip a test if AWS credentials or a test key are not configured.
#[macro_export]
macro_rules! skip_without_aws {
    () => {
        if std::env::var("AWS_ACCESS_KEY_ID").is_err() {
            eprintln!("SKIPPED: AWS_ACCESS_KEY_ID not set");
            return;
        }
        if std::env::var("KMS_AEAD_TEST_KEY_URI").is_err() {
            eprintln!("SKIPPED: KMS_AEAD_TEST_KEY_URI not set (set to an aws-kms:// key URI)");
            return;
        }
    };
}
