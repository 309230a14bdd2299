use error_stack::ResultExt;
use google_sheets4::oauth2::{self, authenticator::Authenticator};
use google_sheets4::{hyper, hyper_rustls};
use thiserror::Error;

use crate::infrastructure::config::sheets_config::SpreadsheetConfig;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Could not read the service account private key at '{0}'")]
    PrivateKeyUnreadable(String),
    #[error("Could not build the service account authenticator")]
    AuthenticatorBuild,
}

pub async fn auth(
    config: &SpreadsheetConfig,
    client: hyper::Client<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>,
) -> error_stack::Result<
    Authenticator<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>,
    AuthError,
> {
    let priv_key_path = config.priv_key.as_ref();
    let secret: oauth2::ServiceAccountKey = oauth2::read_service_account_key(priv_key_path)
        .await
        .change_context_lazy(|| AuthError::PrivateKeyUnreadable(priv_key_path.to_string()))?;

    oauth2::ServiceAccountAuthenticator::with_client(secret, client.clone())
        .build()
        .await
        .change_context(AuthError::AuthenticatorBuild)
}
