use std::io::{BufRead, Write};

use ac_ascii::matcher::{CharBrightnessIndex, MatchError};
use ac_ascii::partition::next_power_of_two;
use ac_ascii::pipeline::ConversionPipeline;
use ac_core::charset::{char_range, is_printable, parse_charset, printable};
use ac_core::config::{ConvertConfig, OutputKind};
use ac_core::frame::Image;
use ac_core::traits::AsciiOutput;
use ac_render::{ConsoleOutput, HtmlOutput};
use anyhow::Context;
use thiserror::Error;

use crate::cli::parse_output;

/// Prompt affiché avant chaque commande.
pub const PROMPT: &str = ">>> ";

/// Erreurs de commande, affichées à l'utilisateur sans quitter le shell.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Unknown command keyword.
    #[error("Did not execute due to incorrect command.")]
    InvalidCommand,
    /// Known command, malformed arguments.
    #[error("Did not {0} due to incorrect format.")]
    CommandFormat(&'static str),
    /// Resolution change would leave the valid range.
    #[error("Did not change resolution due to exceeding boundaries.")]
    ResolutionBounds,
    /// Fewer than two characters registered.
    #[error("Did not execute. Charset is too small.")]
    CharsetTooSmall,
    /// Character outside 32–126.
    #[error("Did not add due to illegal character {0:?}.")]
    IllegalChar(char),
    /// Lookup failure from the index.
    #[error(transparent)]
    Match(#[from] MatchError),
    /// Sink failure.
    #[error(transparent)]
    Output(#[from] anyhow::Error),
}

/// Sélection de caractères pour `add` / `remove`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharSpec {
    /// Every printable character.
    All,
    /// One character.
    Single(char),
    /// Inclusive range, bounds in any order.
    Range(char, char),
}

impl CharSpec {
    fn parse(arg: &str) -> Option<Self> {
        if arg == "all" {
            return Some(Self::All);
        }
        if arg == "space" {
            return Some(Self::Single(' '));
        }
        let mut chars = arg.chars();
        match (chars.next(), chars.next(), chars.next(), chars.next()) {
            (Some(c), None, _, _) => Some(Self::Single(c)),
            (Some(a), Some('-'), Some(b), None) => Some(Self::Range(a, b)),
            _ => None,
        }
    }

    fn chars(self) -> Box<dyn Iterator<Item = char>> {
        match self {
            Self::All => Box::new(printable()),
            Self::Single(c) => Box::new(std::iter::once(c)),
            Self::Range(a, b) => Box::new(char_range(a, b)),
        }
    }
}

/// Sens d'un changement de résolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResChange {
    /// Double.
    Up,
    /// Halve.
    Down,
}

/// Commande du shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Quit.
    Exit,
    /// List registered characters.
    Chars,
    /// Register characters.
    Add(CharSpec),
    /// Unregister characters.
    Remove(CharSpec),
    /// Show or change the resolution.
    Res(Option<ResChange>),
    /// Toggle the reverse flag.
    Reverse,
    /// Select the sink.
    Output(OutputKind),
    /// Convert and emit.
    AsciiArt,
}

/// Parse une ligne de commande.
///
/// # Errors
/// Returns [`ShellError::InvalidCommand`] for an unknown keyword and
/// [`ShellError::CommandFormat`] for malformed arguments.
///
pub fn parse_command(line: &str) -> Result<Command, ShellError> {
    let mut args = line.split_whitespace();
    let keyword = args.next().ok_or(ShellError::InvalidCommand)?;
    let arg = args.next();

    match keyword {
        "exit" => Ok(Command::Exit),
        "chars" => Ok(Command::Chars),
        "add" => arg
            .and_then(CharSpec::parse)
            .map(Command::Add)
            .ok_or(ShellError::CommandFormat("add")),
        "remove" => arg
            .and_then(CharSpec::parse)
            .map(Command::Remove)
            .ok_or(ShellError::CommandFormat("remove")),
        "res" => match arg {
            None => Ok(Command::Res(None)),
            Some("up") => Ok(Command::Res(Some(ResChange::Up))),
            Some("down") => Ok(Command::Res(Some(ResChange::Down))),
            Some(_) => Err(ShellError::CommandFormat("change resolution")),
        },
        "reverse" => Ok(Command::Reverse),
        "output" => arg
            .and_then(parse_output)
            .map(Command::Output)
            .ok_or(ShellError::CommandFormat("change output method")),
        "asciiArt" => Ok(Command::AsciiArt),
        _ => Err(ShellError::InvalidCommand),
    }
}

/// Suite de la boucle après une commande.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command.
    Continue,
    /// Leave the loop.
    Exit,
}

/// Shell interactif : lit des commandes sur `input`, répond sur `out`.
pub struct Shell<R, W> {
    input: R,
    out: W,
    image: Image,
    index: CharBrightnessIndex,
    pipeline: ConversionPipeline,
    resolution: u32,
    min_resolution: u32,
    max_resolution: u32,
    sink: Box<dyn AsciiOutput>,
    config: ConvertConfig,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Shell over `image`, initialised from `config`.
    pub fn new(image: Image, config: &ConvertConfig, input: R, out: W) -> Self {
        let padded_w = next_power_of_two(image.width());
        let padded_h = next_power_of_two(image.height());
        let max_resolution = padded_w;
        let min_resolution = (padded_w / padded_h).max(1);

        let resolution = config.resolution.clamp(min_resolution, max_resolution);
        if resolution != config.resolution {
            log::warn!(
                "Résolution {} hors bornes [{min_resolution}, {max_resolution}], utilisation de {resolution}",
                config.resolution
            );
        }

        let mut index = CharBrightnessIndex::new(parse_charset(&config.charset));
        index.set_reverse(config.reverse);

        Self {
            input,
            out,
            image,
            index,
            pipeline: ConversionPipeline::new().with_parallel(config.parallel),
            resolution,
            min_resolution,
            max_resolution,
            sink: make_sink(config.output, config),
            config: config.clone(),
        }
    }

    /// Replace the sink.
    #[cfg(test)]
    pub fn set_sink(&mut self, sink: Box<dyn AsciiOutput>) {
        self.sink = sink;
    }

    /// Current resolution.
    #[must_use]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Character index.
    #[must_use]
    pub fn index(&self) -> &CharBrightnessIndex {
        &self.index
    }

    /// Name of the active sink.
    #[must_use]
    pub fn sink_name(&self) -> &'static str {
        self.sink.name()
    }

    /// Boucle principale : jusqu'à `exit` ou fin d'entrée.
    ///
    /// # Errors
    /// Returns an error only if reading input or writing to `out` fails;
    /// command errors are printed and the loop continues.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let mut line = String::new();
        loop {
            write!(self.out, "{PROMPT}").context("Écriture du prompt impossible")?;
            self.out.flush()?;

            line.clear();
            if self.input.read_line(&mut line).context("Lecture impossible")? == 0 {
                return Ok(());
            }

            let result = parse_command(&line).and_then(|cmd| self.execute(cmd));
            match result {
                Ok(Flow::Exit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(e) => {
                    log::debug!("commande refusée : {e}");
                    writeln!(self.out, "{e}")?;
                }
            }
        }
    }

    /// Exécute une commande.
    ///
    /// # Errors
    /// Returns the [`ShellError`] describing why the command was refused.
    pub fn execute(&mut self, cmd: Command) -> Result<Flow, ShellError> {
        match cmd {
            Command::Exit => return Ok(Flow::Exit),
            Command::Chars => {
                let chars: Vec<String> = self.index.all_chars().iter().map(char::to_string).collect();
                writeln!(self.out, "{}", chars.join(" ")).map_err(anyhow::Error::from)?;
            }
            Command::Add(spec) => self.add(spec)?,
            Command::Remove(spec) => {
                for c in spec.chars() {
                    self.index.remove(c);
                }
            }
            Command::Res(change) => {
                if let Some(change) = change {
                    self.change_resolution(change)?;
                }
                writeln!(self.out, "Resolution set to {}.", self.resolution)
                    .map_err(anyhow::Error::from)?;
            }
            Command::Reverse => {
                let reverse = !self.index.is_reverse();
                self.index.set_reverse(reverse);
                log::debug!("reverse = {reverse}");
            }
            Command::Output(kind) => {
                self.sink = make_sink(kind, &self.config);
                log::debug!("sortie = {}", self.sink.name());
            }
            Command::AsciiArt => self.render()?,
        }
        Ok(Flow::Continue)
    }

    fn add(&mut self, spec: CharSpec) -> Result<(), ShellError> {
        let bounds = match spec {
            CharSpec::All => None,
            CharSpec::Single(c) => Some((c, c)),
            CharSpec::Range(a, b) => Some((a, b)),
        };
        if let Some((a, b)) = bounds {
            if let Some(&bad) = [a, b].iter().find(|&&c| !is_printable(c)) {
                return Err(ShellError::IllegalChar(bad));
            }
        }
        for c in spec.chars() {
            self.index.add(c);
        }
        Ok(())
    }

    fn change_resolution(&mut self, change: ResChange) -> Result<(), ShellError> {
        let next = match change {
            ResChange::Up => self.resolution.saturating_mul(2),
            ResChange::Down => self.resolution / 2,
        };
        if next < self.min_resolution || next > self.max_resolution {
            return Err(ShellError::ResolutionBounds);
        }
        self.resolution = next;
        Ok(())
    }

    fn render(&mut self) -> Result<(), ShellError> {
        if self.index.len() < 2 {
            return Err(ShellError::CharsetTooSmall);
        }
        let grid = self
            .pipeline
            .convert(&self.image, self.resolution, &self.index)?;
        self.sink.out(&grid)?;
        Ok(())
    }
}

fn make_sink(kind: OutputKind, config: &ConvertConfig) -> Box<dyn AsciiOutput> {
    match kind {
        OutputKind::Console => Box::new(ConsoleOutput::stdout()),
        OutputKind::Html => Box::new(HtmlOutput::new(&config.html_path, &config.html_font)),
    }
}
