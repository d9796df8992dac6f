/// Supplies the current bearer token. Queue operations that need one and
/// find none fail fast as fatal: there is no point retrying without re-auth.
pub trait AccessTokenProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;
}
