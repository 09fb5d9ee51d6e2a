//! Line grammar for the emulator's command loop.
//!
//! A line is a verb followed by whitespace-separated arguments. Words are
//! split off with `winnow` and each one is matched by its own parser, so a
//! failure can name the argument it belongs to.

use std::fmt;

use indicator_core::config::SplitRole;
use winnow::ModalResult;
use winnow::ascii::{Caseless, dec_uint, multispace0};
use winnow::combinator::{alt, opt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_till;

use crate::device::{MAX_LAYER, ProfileLink};

/// One parsed command line.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Command<'a> {
    Battery(u8),
    Profile { index: u8, link: ProfileLink },
    Link(bool),
    Layer { layer: u8, active: bool },
    Status,
    Help(Option<&'a str>),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CommandError {
    Unknown(String),
    MissingArgument(&'static str),
    InvalidArgument { name: &'static str, value: String },
    TrailingInput(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(word) => write!(f, "unknown command `{word}`"),
            CommandError::MissingArgument(name) => write!(f, "missing {name}"),
            CommandError::InvalidArgument { name, value } => {
                write!(f, "invalid {name} `{value}`")
            }
            CommandError::TrailingInput(rest) => write!(f, "unexpected `{rest}`"),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Verb {
    Battery,
    Profile,
    Link,
    Layer,
    Status,
    Help,
}

fn verb(input: &mut &str) -> ModalResult<Verb> {
    alt((
        Caseless("battery").value(Verb::Battery),
        Caseless("profile").value(Verb::Profile),
        Caseless("link").value(Verb::Link),
        Caseless("layer").value(Verb::Layer),
        Caseless("status").value(Verb::Status),
        Caseless("help").value(Verb::Help),
    ))
    .parse_next(input)
}

fn profile_link(input: &mut &str) -> ModalResult<ProfileLink> {
    alt((
        Caseless("connected").value(ProfileLink::Connected),
        Caseless("open").value(ProfileLink::Open),
        Caseless("paired").value(ProfileLink::Paired),
    ))
    .parse_next(input)
}

fn link_state(input: &mut &str) -> ModalResult<bool> {
    alt((Caseless("up").value(true), Caseless("down").value(false))).parse_next(input)
}

fn layer_state(input: &mut &str) -> ModalResult<bool> {
    alt((Caseless("on").value(true), Caseless("off").value(false))).parse_next(input)
}

fn split_role(input: &mut &str) -> ModalResult<SplitRole> {
    alt((
        Caseless("central").value(SplitRole::Central),
        Caseless("peripheral").value(SplitRole::Peripheral),
    ))
    .parse_next(input)
}

fn decimal(input: &mut &str) -> ModalResult<u8> {
    dec_uint.parse_next(input)
}

fn word<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    preceded(multispace0, take_till(1.., char::is_whitespace)).parse_next(input)
}

/// Cursor over the words of one line.
struct Words<'a> {
    rest: &'a str,
}

impl<'a> Words<'a> {
    fn next_word(&mut self) -> Option<&'a str> {
        opt(word).parse_next(&mut self.rest).ok().flatten()
    }

    /// Parses the next word as the whole of `name`.
    fn argument<O>(
        &mut self,
        name: &'static str,
        mut parser: impl Parser<&'a str, O, ErrMode<ContextError>>,
    ) -> Result<O, CommandError> {
        let word = self.next_word().ok_or(CommandError::MissingArgument(name))?;
        parser.parse(word).map_err(|_| CommandError::InvalidArgument {
            name,
            value: word.to_string(),
        })
    }

    fn bounded(&mut self, name: &'static str, max: u8) -> Result<u8, CommandError> {
        self.argument(name, decimal.verify(move |value: &u8| *value <= max))
    }
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Result<Self, CommandError> {
        let mut words = Words { rest: line };
        let first = words
            .next_word()
            .ok_or(CommandError::MissingArgument("command"))?;
        let verb = verb
            .parse(first)
            .map_err(|_| CommandError::Unknown(first.to_string()))?;

        let command = match verb {
            Verb::Battery => Command::Battery(words.bounded("charge", 100)?),
            Verb::Profile => {
                let index = words.bounded("profile index", u8::MAX)?;
                let link = words.argument("profile state", profile_link)?;
                Command::Profile { index, link }
            }
            Verb::Link => Command::Link(words.argument("link state", link_state)?),
            Verb::Layer => {
                let layer = words.bounded("layer", MAX_LAYER)?;
                let active = words.argument("layer state", layer_state)?;
                Command::Layer { layer, active }
            }
            Verb::Status => Command::Status,
            Verb::Help => Command::Help(words.next_word()),
        };

        let rest = words.rest.trim();
        if rest.is_empty() {
            Ok(command)
        } else {
            Err(CommandError::TrailingInput(rest.to_string()))
        }
    }
}

/// Parses the `--role` value.
pub fn parse_role(tag: &str) -> Result<SplitRole, String> {
    split_role
        .parse(tag)
        .map_err(|_| format!("Unknown split role `{tag}`"))
}
