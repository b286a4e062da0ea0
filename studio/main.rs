/// netdeck Studio
///
/// A browser front end for listing, creating and deleting MNIST networks and
/// running predictions against them. Served by a synchronous tiny_http server;
/// no JavaScript required.
///
/// Run with:
///   cargo run --bin studio --release
/// Then open http://127.0.0.1:7878
///
/// Environment:
///   NETDECK_API_BASE_URL  backend to talk to (in-memory demo backend when unset)
///   NETDECK_STUDIO_ADDR   bind address, default 127.0.0.1:7878
///   NETDECK_MNIST_DIR     MNIST IDX files served as samples by the in-memory backend
///   RUST_LOG              log filter, default `info`

mod state;
mod render;
mod routes;
mod handlers;
mod util;
mod views;

use std::process::ExitCode;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tiny_http::Server;

use netdeck::{Config, FetchStatus, HttpRepository, InMemoryRepository, NetworkRepository, SampleSet};
use state::StudioState;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let (repo, backend) = match build_repository(&config) {
        Ok(r) => r,
        Err(e) => {
            error!("could not set up the backend client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let shared_state = Arc::new(StudioState::new(repo, backend));
    shared_state.networks.subscribe(|snapshot| {
        if snapshot.status == FetchStatus::Settled {
            debug!("network list now holds {} networks", snapshot.networks.len());
        }
    });
    // A failure here is retained in the list state and shown on the page.
    if shared_state.networks.fetch().is_ok() {
        info!("{} networks available", shared_state.networks.snapshot().networks.len());
    }

    let server = match Server::http(config.studio_addr) {
        Ok(s) => s,
        Err(e) => {
            error!("failed to bind {}: {e}", config.studio_addr);
            return ExitCode::FAILURE;
        }
    };
    info!("studio listening on http://{}", config.studio_addr);

    // Each request runs on its own thread so a slow backend call does not
    // stall other page loads.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
    ExitCode::SUCCESS
}

fn build_repository(config: &Config) -> netdeck::ApiResult<(Arc<dyn NetworkRepository>, String)> {
    if let Some(url) = &config.api_base_url {
        let repo = HttpRepository::new(url.clone())?;
        info!("using backend at {}", repo.base_url());
        return Ok((Arc::new(repo), url.to_string()));
    }

    let mut repo = InMemoryRepository::with_demo_networks();
    match &config.mnist_dir {
        Some(dir) => match SampleSet::load_dir(dir) {
            Ok(samples) => repo = repo.with_samples(samples),
            Err(e) => warn!("samples disabled: {e}"),
        },
        None => info!("no MNIST directory configured; sample predictions are disabled"),
    }
    info!("using the in-memory backend with demo networks");
    Ok((Arc::new(repo), "in-memory".to_owned()))
}
