use anyhow::Result;
use captioncraft::clipboard::SystemClipboard;
use captioncraft::command::{Command, DragPhase, FormatToggle, HELP};
use captioncraft::image::ImageFile;
use captioncraft::render::{render_captions, render_form, render_options};
use captioncraft::session::GenerationOutcome;
use captioncraft::studio::StudioUpdate;
use captioncraft::{logging::StudioFormatter, CaptionStudio, ConfigManager};
use owo_colors::{OwoColorize, Stream};
use std::io::IsTerminal;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Studio = CaptionStudio<SystemClipboard>;

enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "captioncraft=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .event_format(StudioFormatter::new()),
        )
        .init();

    info!("🪄 captioncraft starting up!");
    info!("{}", "=".repeat(50));

    let config_manager = ConfigManager::load()?;
    config_manager.start_watching();
    let mut config_rx = config_manager.subscribe();
    let config = config_manager.get();
    info!("✅ Configuration loaded");
    info!(
        "   Defaults: {} / {} / {}",
        config.default_platform.as_str(),
        config.default_tone.as_str(),
        config.default_mood.as_str()
    );
    info!("   Generation delay: {} ms", config.generation_delay_ms);

    let mut studio = CaptionStudio::new(&config, SystemClipboard::new());
    let use_color = std::io::stdout().is_terminal();

    println!("{}", render_form(studio.state(), use_color));
    println!("\nType 'help' for commands.");

    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin).lines();

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", err);
            return;
        }
        info!("Received SIGINT (Ctrl+C)");
        let _ = shutdown_tx.send(());
    });

    loop {
        tokio::select! {
            line = reader.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if let Flow::Quit = handle_line(&mut studio, &line, use_color).await {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        error!("Error reading input: {}", e);
                        break;
                    }
                }
            }
            event = studio.next_event() => {
                if let Some(event) = event {
                    let update = studio.apply(event);
                    report_update(&studio, update, use_color);
                }
            }
            result = config_rx.changed() => {
                match result {
                    Ok(()) => {
                        let updated = config_rx.borrow().clone();
                        studio.apply_settings(&updated);
                        info!("Configuration updated");
                    }
                    Err(_) => {
                        warn!("Configuration watcher closed");
                        break;
                    }
                }
            }
            _ = &mut shutdown_rx => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("👋 Shutting down captioncraft");
    Ok(())
}

fn report_update(studio: &Studio, update: StudioUpdate, use_color: bool) {
    match update {
        StudioUpdate::Generation(GenerationOutcome::Committed) => {
            println!("{}", render_captions(studio.state(), use_color));
        }
        StudioUpdate::Generation(GenerationOutcome::DroppedStale) => {
            println!("Inputs changed while generating; run 'generate' again.");
        }
        StudioUpdate::Generation(GenerationOutcome::Ignored) => {}
        StudioUpdate::CopiedCleared(_) => {}
    }
}

async fn handle_line(studio: &mut Studio, line: &str, use_color: bool) -> Flow {
    let command = match Command::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Flow::Continue,
        Err(err) => {
            println!(
                "{}",
                err.to_string()
                    .if_supports_color(Stream::Stdout, |text| text.yellow())
            );
            return Flow::Continue;
        }
    };

    match command {
        Command::Describe(text) => studio.state_mut().set_description(text),
        Command::ClearDescription => studio.state_mut().set_description(""),
        Command::Image(path) => {
            if let Some(file) = read_file(&path).await {
                if !studio.state_mut().select_image(&file) {
                    println!("{} is not an image; ignored.", file.name);
                }
            }
        }
        Command::Drop(path) => match read_file(&path).await {
            Some(file) => {
                if !studio.state_mut().drop_file(&file) {
                    println!("{} is not an image; ignored.", file.name);
                }
            }
            None => studio.state_mut().drag_leave(),
        },
        Command::Drag(DragPhase::Enter) => studio.state_mut().drag_enter(),
        Command::Drag(DragPhase::Over) => studio.state_mut().drag_over(),
        Command::Drag(DragPhase::Leave) => studio.state_mut().drag_leave(),
        Command::RemoveImage => studio.state_mut().remove_image(),
        Command::Platform(platform) => studio.state_mut().set_platform(platform),
        Command::Tone(tone) => studio.state_mut().set_tone(tone),
        Command::Mood(mood) => studio.state_mut().set_mood(mood),
        Command::Format(toggle, value) => {
            let state = studio.state_mut();
            match (toggle, value) {
                (FormatToggle::Hashtags, Some(on)) => state.set_include_hashtags(on),
                (FormatToggle::Hashtags, None) => {
                    state.toggle_hashtags();
                }
                (FormatToggle::Emojis, Some(on)) => state.set_include_emojis(on),
                (FormatToggle::Emojis, None) => {
                    state.toggle_emojis();
                }
                (FormatToggle::CallToAction, Some(on)) => state.set_include_cta(on),
                (FormatToggle::CallToAction, None) => {
                    state.toggle_cta();
                }
            }
        }
        Command::Generate => {
            if !studio.generate() {
                if studio.state().is_generating() {
                    println!("Still generating the previous batch...");
                } else {
                    println!("Add a description or an image first.");
                }
            }
            return Flow::Continue;
        }
        Command::Rate { number, rating } => match caption_id(studio, number) {
            Some(id) => {
                studio.state_mut().rate(&id, rating);
                println!("{}", render_captions(studio.state(), use_color));
            }
            None => println!("There is no caption #{number}."),
        },
        Command::Save(number) => match caption_id(studio, number) {
            Some(id) => {
                studio.state_mut().toggle_saved(&id);
                println!("{}", render_captions(studio.state(), use_color));
            }
            None => println!("There is no caption #{number}."),
        },
        Command::Copy(number) => match caption_id(studio, number) {
            Some(id) => {
                if studio.copy(&id) {
                    println!("✔ Copied to clipboard!");
                }
            }
            None => println!("There is no caption #{number}."),
        },
        Command::Show => {
            println!("{}", render_form(studio.state(), use_color));
            println!("{}", render_captions(studio.state(), use_color));
            return Flow::Continue;
        }
        Command::Options => {
            println!("{}", render_options());
            return Flow::Continue;
        }
        Command::Help => {
            println!("{HELP}");
            return Flow::Continue;
        }
        Command::Quit => return Flow::Quit,
    }

    Flow::Continue
}

fn caption_id(studio: &Studio, number: usize) -> Option<String> {
    studio
        .state()
        .captions()
        .get(number.checked_sub(1)?)
        .map(|caption| caption.id.clone())
}

async fn read_file(path: &Path) -> Option<ImageFile> {
    match ImageFile::read(path).await {
        Ok(file) => Some(file),
        Err(err) => {
            println!("{err}");
            None
        }
    }
}
