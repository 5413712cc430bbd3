use std::{fmt, time::Duration};

use serde::Serialize;

use crate::{config::WorkflowConfig, error::ReplyError};

/// The states of a sheet workflow, in the only order they can run
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    AwaitForm,
    AwaitAbility,
    AwaitMoves,
    AwaitShiny,
    Render,
}

impl Step {
    pub const FIRST: Step = Step::AwaitForm;

    /// The state after this one, `None` after rendering
    pub fn next(self) -> Option<Step> {
        match self {
            Step::AwaitForm => Some(Step::AwaitAbility),
            Step::AwaitAbility => Some(Step::AwaitMoves),
            Step::AwaitMoves => Some(Step::AwaitShiny),
            Step::AwaitShiny => Some(Step::Render),
            Step::Render => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::AwaitForm => "form",
            Step::AwaitAbility => "ability",
            Step::AwaitMoves => "moves",
            Step::AwaitShiny => "shiny",
            Step::Render => "render",
        };
        f.write_str(name)
    }
}

/// What a step does when its reply is missing or unusable
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnMissing {
    /// Carry on with the step's default
    UseDefault,
    /// End the whole command
    Abort,
}

/// How long a step waits and how it treats a bad reply
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepPolicy {
    pub timeout: Duration,
    pub on_missing: OnMissing,
    /// Posted when the reply doesn't arrive in time
    pub timeout_notice: Option<&'static str>,
    /// Posted when the reply matches no option
    pub invalid_notice: Option<&'static str>,
}

impl StepPolicy {
    /// The notice matching a reply failure
    pub fn notice_for(&self, error: ReplyError) -> Option<&'static str> {
        match error {
            ReplyError::TimedOut => self.timeout_notice,
            ReplyError::Invalid => self.invalid_notice,
        }
    }
}

/// Policies of every interactive step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepPolicies {
    pub form: StepPolicy,
    pub ability: StepPolicy,
    pub moves: StepPolicy,
    pub shiny: StepPolicy,
}

impl StepPolicies {
    pub fn from_config(config: &WorkflowConfig) -> Self {
        Self {
            form: StepPolicy {
                timeout: Duration::from_secs(config.form_timeout_secs),
                on_missing: OnMissing::UseDefault,
                timeout_notice: Some("⏰ Time's up, continuing with the default form..."),
                invalid_notice: Some("❌ Invalid form, continuing with the default..."),
            },
            ability: StepPolicy {
                timeout: Duration::from_secs(config.ability_timeout_secs),
                on_missing: OnMissing::Abort,
                timeout_notice: None,
                invalid_notice: None,
            },
            moves: StepPolicy {
                timeout: Duration::from_secs(config.moves_timeout_secs),
                on_missing: OnMissing::UseDefault,
                timeout_notice: None,
                invalid_notice: None,
            },
            shiny: StepPolicy {
                timeout: Duration::from_secs(config.shiny_timeout_secs),
                on_missing: OnMissing::UseDefault,
                timeout_notice: Some("⏰ Time's up, treated as **not shiny**."),
                invalid_notice: Some("❌ Invalid answer, treated as **not shiny**."),
            },
        }
    }

    /// The policy of an interactive step, `None` for rendering
    pub fn for_step(&self, step: Step) -> Option<StepPolicy> {
        match step {
            Step::AwaitForm => Some(self.form),
            Step::AwaitAbility => Some(self.ability),
            Step::AwaitMoves => Some(self.moves),
            Step::AwaitShiny => Some(self.shiny),
            Step::Render => None,
        }
    }
}

impl Default for StepPolicies {
    fn default() -> Self {
        Self::from_config(&WorkflowConfig::default())
    }
}

/// Turns a timed out wait into a reply error
pub fn received(reply: Option<String>) -> Result<String, ReplyError> {
    reply.ok_or(ReplyError::TimedOut)
}

/// What the user picked on the form prompt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormChoice {
    /// `0`, keep the creature that was asked for
    Default,
    /// Zero-based index into the alternatives
    Variant(usize),
}

pub fn parse_form_choice(reply: &str, options: usize) -> Result<FormChoice, ReplyError> {
    match parse_index(reply)? {
        0 => Ok(FormChoice::Default),
        n if n <= options => Ok(FormChoice::Variant(n - 1)),
        _ => Err(ReplyError::Invalid),
    }
}

/// Zero-based index of the chosen ability
pub fn parse_ability_choice(reply: &str, options: usize) -> Result<usize, ReplyError> {
    match parse_index(reply)? {
        n if (1..=options).contains(&n) => Ok(n - 1),
        _ => Err(ReplyError::Invalid),
    }
}

/// Zero-based indexes of the chosen moves, in reply order
///
/// The reply is a comma separated list of option numbers. Anything that
/// isn't a listed option is skipped, as are repeats, and at most `limit`
/// moves are kept.
pub fn parse_move_choices(reply: &str, options: usize, limit: usize) -> Vec<usize> {
    let mut chosen: Vec<usize> = vec![];

    for token in reply.split(',') {
        if chosen.len() >= limit {
            break;
        }
        let Ok(n) = parse_index(token) else {
            continue;
        };
        if (1..=options).contains(&n) && !chosen.contains(&(n - 1)) {
            chosen.push(n - 1);
        }
    }

    chosen
}

/// Yes/no answer to the shiny prompt
pub fn parse_shiny(reply: &str) -> Result<bool, ReplyError> {
    match reply.trim().to_lowercase().as_str() {
        "yes" | "y" | "sim" | "s" => Ok(true),
        "no" | "n" | "não" | "nao" => Ok(false),
        _ => Err(ReplyError::Invalid),
    }
}

fn parse_index(reply: &str) -> Result<usize, ReplyError> {
    let reply = reply.trim();
    if reply.is_empty() || !reply.chars().all(|c| c.is_ascii_digit()) {
        return Err(ReplyError::Invalid);
    }
    reply.parse().map_err(|_| ReplyError::Invalid)
}
