mod config;
mod fetcher;
mod resolver;
mod routes;
mod sanitize;
mod structs;
mod utils;
mod workflow;
mod ytdlp;

pub struct State {
    workflow: workflow::Workflow,
    /// Submissions run one after another; concurrent ones would race on the output file
    submission_lock: tokio::sync::Mutex<()>,
    /// Files that finished downloading, by file name. Nothing else is served.
    downloads: parking_lot::Mutex<std::collections::HashMap<String, structs::Download>>,
}

impl State {
    pub fn new(workflow: workflow::Workflow) -> Self {
        Self {
            workflow,
            submission_lock: tokio::sync::Mutex::new(()),
            downloads: parking_lot::Mutex::new(std::collections::HashMap::new()),
        }
    }
}

pub fn router(state: std::sync::Arc<State>) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::get(routes::get_index).post(routes::post_index))
        .route("/files/:name", axum::routing::get(routes::get_file))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), structs::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::Config::from_env()?;
    match &config.ffmpeg {
        Some(ffmpeg) => log::info!("using ffmpeg at {}", ffmpeg.display()),
        None => log::warn!("ffmpeg not found, downloads will fail until FFMPEG_BINARY is set"),
    }

    let ytdlp = std::sync::Arc::new(ytdlp::YtDlp::new(config.ytdlp_bin.clone()));
    let workflow = workflow::Workflow::new(
        resolver::Resolver::new(ytdlp.clone()),
        fetcher::Fetcher::new(ytdlp, config.ffmpeg.clone(), config.output_dir.clone()),
    );
    let state = std::sync::Arc::new(State::new(workflow));

    log::info!("listening on http://{}", config.listen_addr);
    axum::Server::try_bind(&config.listen_addr)?.serve(router(state).into_make_service()).await?;

    Ok(())
}
