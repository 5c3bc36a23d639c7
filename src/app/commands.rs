//! Inbound commands.
//!
//! Two layers: [`MotorCommand`] is what the state machine executes;
//! [`ShadeRequest`] is a parsed command line from the hub, which the
//! [`ShadeController`](super::service::ShadeController) turns into motor
//! commands and timeout updates after checking its guards.
//!
//! Command line grammar: `"<name> <verb>[:<value>]"`.

/// Motor-level command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorCommand {
    Open,
    Close,
    Stop,
}

impl TryFrom<u8> for MotorCommand {
    type Error = u8;

    /// Wire codes used by the hub's binary channel.
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Open),
            2 => Ok(Self::Close),
            3 => Ok(Self::Stop),
            other => Err(other),
        }
    }
}

/// A parsed command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadeRequest {
    Open,
    Close,
    Stop,
    SetOpenTimeout(u32),
    SetCloseTimeout(u32),
    /// A `key:value` token with an unknown key.  Still persists the
    /// current timeouts.
    PersistTimeouts,
    /// Unrecognised verb.
    Ignored,
}

impl ShadeRequest {
    /// Parse one command line.  Never fails; unknown input is
    /// [`ShadeRequest::Ignored`].
    ///
    /// The name token is not checked here (see [`target`]).
    pub fn parse(line: &str) -> Self {
        let verb = verb(line);

        if let Some((key, value)) = verb.split_once(':') {
            if key.contains("setclosetimeout") {
                return Self::SetCloseTimeout(leading_int(value));
            }
            if key.contains("setopentimeout") {
                return Self::SetOpenTimeout(leading_int(value));
            }
            return Self::PersistTimeouts;
        }

        match verb {
            "open" => Self::Open,
            "close" => Self::Close,
            "stop" => Self::Stop,
            _ => Self::Ignored,
        }
    }
}

/// Device name a command line is addressed to (text before the first space).
/// `None` for a bare verb.
pub fn target(line: &str) -> Option<&str> {
    trim_eol(line).split_once(' ').map(|(name, _)| name)
}

/// Everything after the first space, or the whole line if there is none.
fn verb(line: &str) -> &str {
    let line = trim_eol(line);
    line.split_once(' ').map_or(line, |(_, rest)| rest)
}

fn trim_eol(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

/// Decimal prefix of `s` with an optional sign; `0` when there is none.
/// The magnitude saturates on overflow and a `-` wraps it into `u32`, so
/// `-5` becomes `u32::MAX - 4`.
fn leading_int(s: &str) -> u32 {
    let s = s.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, b| {
            acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
        });
    if negative { magnitude.wrapping_neg() } else { magnitude }
}
