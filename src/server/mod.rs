pub mod api;

use crate::cli::Args;
use std::error::Error;
use std::net::SocketAddr;
use log::{ info, error };
use self::api::AppState;

pub struct Server {
    addr: SocketAddr,
    state: AppState,
    args: Args,
}

impl Server {
    pub fn new(state: AppState, args: Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let addr = format!("{}:{}", args.host, args.port).parse::<SocketAddr>()?;
        Ok(Self { addr, state, args })
    }

    pub async fn run(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let app = api::router(self.state, &self.args.cors_origin)?;

        if self.args.enable_tls {
            let (cert_path, key_path) = match (&self.args.tls_cert_path, &self.args.tls_key_path) {
                (Some(cert), Some(key)) => (cert, key),
                _ => {
                    error!("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.");
                    return Err("TLS enabled without cert/key".into());
                }
            };
            info!("TLS enabled. Loading certificate from '{}' and key from '{}'", cert_path, key_path);
            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                cert_path,
                key_path
            ).await?;

            info!("HTTPS server listening on: https://{}", self.addr);
            axum_server::bind_rustls(self.addr, tls_config)
                .serve(app.into_make_service())
                .await?;
        } else {
            let listener = tokio::net::TcpListener::bind(self.addr).await.map_err(|e| {
                error!("Failed to bind HTTP server to {}: {}. Try a different port.", self.addr, e);
                e
            })?;
            info!("HTTP server listening on: http://{}", self.addr);
            axum::serve(listener, app.into_make_service()).await?;
        }

        Ok(())
    }
}
