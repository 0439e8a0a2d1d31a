use std::time::{Duration, Instant};

use asistencia_tui::api::ApiClient;
use asistencia_tui::app::tasks::Tasks;
use asistencia_tui::app::App;
use asistencia_tui::config::Config;
use asistencia_tui::session::SessionStore;
use asistencia_tui::{event, keys, logging, theme, tui, ui};
use color_eyre::Result;
use tracing::info;

fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::load()?;
    theme::install(config.theme.to_theme());
    let log_file = logging::init_logging(&config.log_filter);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let client = ApiClient::new(&config.api())?;
    info!(api = client.base_url(), log = ?log_file, "starting");

    let store = SessionStore::default_location();
    let mut app = App::new(client, store, Tasks::new(runtime.handle().clone()));

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    runtime.shutdown_timeout(Duration::from_millis(500));
    info!("bye");
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        app.tick(Instant::now());
        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(key) = event::next_key_event(Duration::from_millis(100))? {
            keys::handle_key(app, key);
        }
    }
    Ok(())
}
