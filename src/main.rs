use affinity::api;
use affinity::logger::*;
use affinity::server::*;
use affinity::settings::*;
use std::fs;
use std::sync::Arc;
use tokio::signal;

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("could not listen for SIGINT: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    info!(?project_settings);
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
        ansi: project_settings.log.ansi,
    };
    logger.reload_from_config(&logger_config)?;

    let address: std::net::SocketAddr = project_settings.http.address.parse()?;
    let tls = match (&project_settings.http.cert_path, &project_settings.http.key_path) {
        (Some(cert), Some(key)) => {
            for path in [cert, key] {
                if !fs::metadata(path)?.is_file() {
                    return Err(anyhow::anyhow!("TLS file is not a regular file: {:?}", path));
                }
            }
            Some((cert.clone(), key.clone()))
        }
        (None, None) => None,
        _ => return Err(anyhow::anyhow!("http.cert_path and http.key_path go together")),
    };

    let server = Arc::new(Server::try_new(&project_settings).await?);
    let routes = api::routes(server.clone());

    match tls {
        Some((cert, key)) => {
            info!(%address, "listening (tls)");
            warp::serve(routes)
                .tls()
                .cert_path(cert)
                .key_path(key)
                .bind_with_graceful_shutdown(address, shutdown_signal())
                .1
                .await;
        }
        None => {
            let (bound, serving) =
                warp::serve(routes).try_bind_with_graceful_shutdown(address, shutdown_signal())?;
            info!(address = %bound, "listening");
            serving.await;
        }
    }

    let shutdown_timeout = std::time::Duration::from_secs(30);
    match tokio::time::timeout(shutdown_timeout, server.shutdown()).await {
        Ok(_) => info!("server shutdown successfully"),
        Err(_) => error!("server shutdown timed out"),
    }

    Ok(())
}
