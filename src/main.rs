use crossterm::{
    cursor::{Hide, Show as ShowCursor},
    event::{self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::env;
use std::fs::File;
use std::io::{stdout, BufWriter, Stdout};
use std::process;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use fireworks::config::USAGE;
use fireworks::error::Error;
use fireworks::{Command, Config, Show, TerminalCanvas};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(config: &Config) -> fireworks::Result<()> {
    // stdout belongs to the alternate screen, so logs only go to a file.
    let Some(path) = &config.log_file else {
        return Ok(());
    };

    let file = File::create(path).map_err(|source| Error::LogFile {
        path: path.clone(),
        source,
    })?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn is_exit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('q')
        || key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn run_show(stdout: &mut BufWriter<Stdout>, config: &Config) -> fireworks::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut canvas = TerminalCanvas::for_terminal(cols, rows, config.scale, config.bg_color);
    let rng = config
        .seed
        .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    let mut show = Show::new(canvas.world_size(), config, rng);

    info!(cols, rows, seed = ?config.seed, "starting show");

    let fixed_dt = 1.0 / config.tick_rate as f32;
    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;

    loop {
        if event::poll(Duration::from_millis(1))? {
            match event::read()? {
                Event::Key(key) if is_exit(&key) => break,
                Event::Resize(cols, rows) => {
                    canvas.resize(cols as usize, rows as usize * 2);
                    show.resize(canvas.world_size());
                    execute!(stdout, Clear(ClearType::All))?;
                }
                Event::FocusLost => show.set_visible(false),
                Event::FocusGained => show.set_visible(true),
                _ => {}
            }
        }

        let now = Instant::now();
        accumulator += now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        if accumulator > fixed_dt * 3.0 {
            accumulator = fixed_dt * 3.0;
        }

        while accumulator >= fixed_dt {
            show.tick();
            canvas.fade(config.trail_fade);
            show.draw(Some(&mut canvas));
            accumulator -= fixed_dt;
        }

        canvas.render(stdout)?;
    }

    info!("show stopped");
    Ok(())
}

fn run(config: &Config) -> fireworks::Result<()> {
    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All), EnableFocusChange)?;

    let result = run_show(&mut stdout, config);

    execute!(stdout, DisableFocusChange, ShowCursor, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    result
}

fn main() {
    let args = env::args().skip(1);

    let config = match Config::parse(args) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            eprintln!("{USAGE}");
            return;
        }
        Err(err) => {
            eprintln!("{err}");
            eprintln!();
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    if let Err(err) = init_logging(&config).and_then(|()| run(&config)) {
        eprintln!("fireworks: {err}");
        process::exit(1);
    }
}
