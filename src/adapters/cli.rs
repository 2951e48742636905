use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::thread;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::{
    adapters::{
        controllers::{SubmissionController, SubmissionOutcome},
        renderer::ResultRenderer,
    },
    application::{error_classifier::classify, services::UploadService},
    domain::models::file::SelectedFile,
};

pub const HELP: &str = "\
Commands:
  select <path>   choose an image and preview it
  submit          send the selected image for masking
  status          show the current view
  save <path>     write the masked image to disk
  help            show this message
  quit            exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(PathBuf),
    Submit,
    Status,
    Save(PathBuf),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command, type 'help' for a list")]
    Empty,

    #[error("'{0}' needs a path argument")]
    MissingPath(&'static str),

    #[error("Unknown command '{0}', type 'help' for a list")]
    Unknown(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let path = |name: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingPath(name))
            } else {
                Ok(PathBuf::from(rest))
            }
        };

        match verb.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "select" | "open" => path("select").map(Command::Select),
            "submit" | "process" => Ok(Command::Submit),
            "status" => Ok(Command::Status),
            "save" => path("save").map(Command::Save),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

enum Event {
    Input(String),
    InputClosed,
    Completed(SubmissionOutcome),
}

/// Runs the interactive session until `quit` or end of input. Input lines and
/// finished uploads arrive on one channel and are handled in order, so the
/// controller is only ever touched from this loop.
pub async fn run(mut controller: SubmissionController, upload: Arc<dyn UploadService>) {
    let (tx, mut rx) = mpsc::unbounded_channel();

    spawn_input_reader(std::io::BufReader::new(std::io::stdin()), tx.clone());

    println!("{}\n", HELP);
    println!("{}", ResultRenderer::render(&controller));

    let mut input_closed = false;
    while let Some(event) = rx.recv().await {
        match event {
            Event::Input(line) if line.trim().is_empty() => continue,
            Event::Input(line) => match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => {
                    handle(command, &mut controller, upload.as_ref(), &tx).await;
                }
                Err(e) => println!("{}", e),
            },
            Event::Completed(outcome) => {
                if controller.apply(outcome) {
                    println!("{}", ResultRenderer::render(&controller));
                }
            }
            Event::InputClosed => {
                input_closed = true;
            }
        }

        // Scripted input may end before the last upload does.
        if input_closed && !controller.state().is_submitting() {
            break;
        }
    }

    info!("Session finished in state '{}'", controller.state().name());
}

/// Forwards input lines from a plain thread. It is never joined, so a read
/// still blocked on the terminal cannot hold up shutdown after `quit`.
fn spawn_input_reader<R>(input: R, tx: mpsc::UnboundedSender<Event>)
where
    R: BufRead + Send + 'static,
{
    let spawned = thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in input.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(Event::Input(line)).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
            let _ = tx.send(Event::InputClosed);
        });

    if let Err(e) = spawned {
        error!("Failed to start input reader: {}", e);
    }
}

async fn handle(
    command: Command,
    controller: &mut SubmissionController,
    upload: &dyn UploadService,
    tx: &mpsc::UnboundedSender<Event>,
) {
    match command {
        Command::Select(path) => match SelectedFile::load(&path).await {
            Ok(file) => {
                controller.select(file);
                println!("{}", ResultRenderer::render(controller));
            }
            Err(e) => {
                warn!("Selection rejected: {}", e);
                println!("{}", e);
            }
        },
        Command::Submit => {
            if let Some(pending) = controller.begin_submit() {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let outcome = pending.run().await;
                    let _ = tx.send(Event::Completed(outcome));
                });
            }
            println!("{}", ResultRenderer::render(controller));
        }
        Command::Status => println!("{}", ResultRenderer::render(controller)),
        Command::Save(path) => save(controller, upload, &path).await,
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
}

async fn save(controller: &SubmissionController, upload: &dyn UploadService, path: &Path) {
    let Some(result) = controller.result() else {
        println!("No masked image yet, submit an image first.");
        return;
    };

    let bytes = match upload.download(result).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Download of {} failed: {}", result.display_address(), e);
            println!("{}", classify(&e));
            return;
        }
    };

    match tokio::fs::write(path, &bytes).await {
        Ok(()) => {
            info!("Saved {} bytes to {}", bytes.len(), path.display());
            println!("Saved masked image to {}", path.display());
        }
        Err(e) => {
            error!("Failed to write {}: {}", path.display(), e);
            println!("Could not write {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn input_reader_forwards_lines_then_closes() {
        let (tx, mut rx) = mpsc::unbounded_channel();

        spawn_input_reader(std::io::Cursor::new("select a.png\nquit\n"), tx);

        assert!(matches!(rx.recv().await, Some(Event::Input(line)) if line == "select a.png"));
        assert!(matches!(rx.recv().await, Some(Event::Input(line)) if line == "quit"));
        assert!(matches!(rx.recv().await, Some(Event::InputClosed)));
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            "select ./id card.png".parse(),
            Ok(Command::Select(PathBuf::from("./id card.png")))
        );
        assert_eq!("  SUBMIT ".parse(), Ok(Command::Submit));
        assert_eq!("status".parse(), Ok(Command::Status));
        assert_eq!(
            "save out.png".parse(),
            Ok(Command::Save(PathBuf::from("out.png")))
        );
        assert_eq!("?".parse(), Ok(Command::Help));
        assert_eq!("exit".parse(), Ok(Command::Quit));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "select".parse::<Command>(),
            Err(CommandError::MissingPath("select"))
        );
        assert_eq!(
            "save   ".parse::<Command>(),
            Err(CommandError::MissingPath("save"))
        );
        assert_eq!(
            "upload a.png".parse::<Command>(),
            Err(CommandError::Unknown("upload".to_string()))
        );
    }
}
