use std::env;
use std::io;
use std::path::PathBuf;

use crossterm::event::{self, Event, EventStream, KeyEventKind};
use futures::StreamExt;

use redstudio::bridge::extract_requests;
use redstudio::config::{ConfigEngine, Settings};
use redstudio::editor::{Editor, PendingAction};
use redstudio::render::Renderer;
use redstudio::theme::{self, Theme};
use redstudio::{input, logging, runtime};

#[tokio::main]
async fn main() -> io::Result<()> {
    // Keep the guard alive so buffered log lines are flushed on exit.
    // Without a cache directory the editor runs unlogged.
    let _log_guard = logging::init_logger().ok();

    let mut startup_message = None;
    let mut config = ConfigEngine::new();
    if let Err(e) = config.load_default() {
        tracing::warn!("config failed to load: {e}");
        startup_message = Some(format!("Error: {e}"));
    }
    let settings = config.settings();

    let theme = theme::get_builtin_theme(&settings.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %settings.theme, "unknown theme");
        startup_message.get_or_insert_with(|| {
            format!(
                "Unknown theme '{}' (available: {})",
                settings.theme,
                theme::list_builtin_themes().join(", ")
            )
        });
        Theme::default()
    });

    // Parse command line args
    let args: Vec<String> = env::args().collect();
    let mut editor = if args.len() > 1 {
        Editor::open(PathBuf::from(&args[1]))?
    } else {
        Editor::new()
    };
    editor.apply_settings(&settings);
    if let Some(msg) = startup_message {
        editor.set_message(msg);
    }
    tracing::info!(file = %editor.file_name(), "session started");

    // Set up terminal
    Renderer::setup()?;
    let mut renderer = Renderer::new(&settings)?;

    // Initial render
    editor.adjust_scroll(renderer.text_height());
    renderer.render(&editor, &theme)?;

    // Event stream for async key reading
    let mut event_stream = EventStream::new();

    // Main loop
    while editor.running {
        tokio::select! {
            item = event_stream.next() => {
                // The terminal input stream ended or failed
                let Some(event) = input::terminal_event(item) else {
                    break;
                };
                if let Event::Resize(width, height) = event {
                    renderer.resize(width, height);
                }
                input::handle_event(&mut editor, event);

                if let Some(PendingAction::Execute) = editor.take_pending() {
                    execute(&mut editor, &mut renderer, &settings, &theme).await?;
                }

                editor.adjust_scroll(renderer.text_height());
                renderer.render(&editor, &theme)?;
            }
        }
    }

    // Cleanup
    Renderer::teardown()?;
    tracing::info!("session ended");

    Ok(())
}

/// Save, build the bridge file, then hand the terminal to the runtime
async fn execute(
    editor: &mut Editor,
    renderer: &mut Renderer,
    settings: &Settings,
    theme: &Theme,
) -> io::Result<()> {
    if !extract_requests(&editor.buffer.text()).is_empty() {
        editor.set_message("Connecting to API...");
        renderer.busy = true;
        renderer.render(editor, theme)?;
    }

    let prepared = runtime::prepare(editor, settings).await;
    renderer.busy = false;
    let script = match prepared {
        Ok(script) => script,
        Err(e) => {
            tracing::error!("execution aborted: {e}");
            editor.set_message(format!("Error: {e}"));
            return Ok(());
        }
    };

    Renderer::teardown()?;
    let outcome = runtime::run(settings, &script).await;
    if outcome.is_ok() {
        println!("\n[Press any key to return to the editor]");
        wait_for_key()?;
    }
    Renderer::setup()?;

    match outcome {
        Ok(status) => editor.set_message(format!("Runtime finished ({status})")),
        Err(e) => {
            tracing::error!("runtime launch failed: {e}");
            editor.set_message(format!("Error: {e}"));
        }
    }
    Ok(())
}

fn wait_for_key() -> io::Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                break;
            }
        }
    }
    crossterm::terminal::disable_raw_mode()
}
