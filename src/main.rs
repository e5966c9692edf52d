use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;

use chroma_pick::clipboard::{self, ClipboardProvider, MemoryClipboard, SystemClipboard};
use chroma_pick::config;
use chroma_pick::{
    parse, serialize, Action, Color, ColorFormat, Error, InputEvent, MenuEntry, Session,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVE: &str = "chroma_pick=info";

/// Sample, convert and copy colors from the terminal.
#[derive(Parser, Debug)]
#[command(name = "chroma-pick", version, about)]
struct Args {
    /// Settings file override.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a color in every format.
    Show { color: String },
    /// Copy a color to the clipboard in the given format.
    Copy {
        /// hex, hsl, rgb or lch.
        #[arg(value_parser = ColorFormat::from_str)]
        format: ColorFormat,
        color: String,
        /// Seconds to keep serving the clipboard before exiting (Linux).
        #[arg(long, default_value_t = 5)]
        linger: u64,
    },
    /// Read a color of any format from the clipboard.
    Paste,
    /// Treat a color as freshly sampled from the screen.
    Pick { color: String },
    /// List recently picked colors, newest first.
    Recent,
    /// Show what a click on the status item would do.
    Click { button: Button },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Button {
    Left,
    Right,
}

impl From<Button> for InputEvent {
    fn from(button: Button) -> Self {
        match button {
            Button::Left => InputEvent::LeftClick,
            Button::Right => InputEvent::RightClick,
        }
    }
}

fn print_formats(color: &Color) {
    for format in ColorFormat::ALL {
        println!("{:<4} {}", format.title(), serialize(color, format));
    }
}

fn describe(entry: &MenuEntry) -> String {
    match entry {
        MenuEntry::PickColor => "Pick Color".into(),
        MenuEntry::ToggleWindow => "Toggle Window".into(),
        MenuEntry::Header(title) => format!("[{title}]"),
        MenuEntry::RecentColor { label, .. } => format!("  {label}"),
        MenuEntry::Settings => "Settings…".into(),
        MenuEntry::SendFeedback => "Send Feedback…".into(),
        MenuEntry::Quit => "Quit".into(),
        MenuEntry::Separator => "--".into(),
    }
}

/// The real clipboard when there is one, otherwise a throwaway in-memory one
/// so history and click commands still work headless.
fn clipboard_or_memory() -> Box<dyn ClipboardProvider> {
    match SystemClipboard::new() {
        Ok(clipboard) => Box::new(clipboard),
        Err(e) => {
            tracing::warn!("{e}, clipboard writes will be discarded");
            Box::new(MemoryClipboard::new())
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let config_path = args.config.unwrap_or_else(config::config_path);
    let settings = config::load_or_default(&config_path);
    let preferred = settings.preferred_color_format;

    match args.command {
        Command::Show { color } => {
            print_formats(&parse(&color)?);
        }
        Command::Copy {
            format,
            color,
            linger,
        } => {
            let color = parse(&color)?;
            let mut clipboard = SystemClipboard::new()?.with_linger(Duration::from_secs(linger));
            clipboard::copy_as(&mut clipboard, &color, format);
            println!("{}", serialize(&color, format));
        }
        Command::Paste => {
            let mut session = Session::new(settings, SystemClipboard::new()?);
            match session.paste_color() {
                Some(color) => print_formats(&color),
                None => tracing::info!("clipboard holds no color"),
            }
        }
        Command::Pick { color } => {
            let sample = parse(&color)?;
            let mut session =
                Session::new(settings, clipboard_or_memory()).with_config_path(&config_path);
            if let Some(color) = session.pick_color(Some(sample)) {
                println!("{}", color.string_representation(preferred));
            }
        }
        Command::Recent => {
            let session = Session::new(settings, MemoryClipboard::new());
            for color in session.recent_colors() {
                println!("{}", color.string_representation(preferred));
            }
        }
        Command::Click { button } => {
            let session = Session::new(settings, MemoryClipboard::new());
            let action = session.handle_click(button.into());
            println!("{action:?}");
            if action == Action::ShowMenu {
                for entry in session.menu() {
                    println!("  {}", describe(&entry));
                }
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let directive = args.log_level.as_deref().unwrap_or(DEFAULT_LOG_DIRECTIVE);
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|e| {
        eprintln!("invalid log level '{directive}': {e}");
        EnvFilter::new(DEFAULT_LOG_DIRECTIVE)
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("chroma-pick: {e}");
            ExitCode::FAILURE
        }
    }
}
