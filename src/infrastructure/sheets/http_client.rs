use google_sheets4::{hyper, hyper_rustls};

pub fn http_client() -> hyper::Client<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>> {
    hyper::Client::builder().build(
        hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .expect("could not load the native TLS root certificates")
            .https_or_http()
            .enable_http1()
            .build(),
    )
}
