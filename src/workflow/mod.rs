/// Workflow states, their reply policies and reply parsing
pub mod step;

use log::{info, warn};
use serde::Serialize;

use crate::{
    chat::{Conversation, OutboundMessage},
    config::WorkflowConfig,
    error::{ReplyError, SheetError, SheetResult},
    pokeapi::{
        ResourceSource,
        model::{CreatureRecord, SpeciesResource, decode},
    },
    sheet::{
        ability::{AbilityInfo, LocaleChain, fetch_abilities},
        moves::{MoveCandidate, fetch_move_candidates},
        nature::{DEFAULT_NATURE, NatureModifier},
        render::{RenderedSheet, SheetInput, move_details, render},
        stats::{Projection, project},
        title_case,
        weakness::{WeaknessEntry, fetch_weaknesses},
    },
};

use step::{
    FormChoice, OnMissing, Step, StepPolicies, StepPolicy, parse_ability_choice,
    parse_form_choice, parse_move_choices, parse_shiny, received,
};

/// Longest creature name a command accepts
const MAX_NAME_LEN: usize = 30;

/// Arguments of one sheet command
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SheetRequest {
    /// Creature name as the reference API spells it
    pub name: String,
    pub level: u32,
    pub nature: String,
}

impl SheetRequest {
    /// Checks and normalizes the raw command arguments
    pub fn new(name: &str, level: i64, nature: Option<&str>) -> SheetResult<Self> {
        let name = name.trim().to_lowercase().replace(' ', "-");

        if name.is_empty() {
            return Err(SheetError::InvalidCommand("Name cannot be empty".to_string()));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(SheetError::InvalidCommand("Name is too long".to_string()));
        }
        if !name.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(SheetError::InvalidCommand(
                "Name can only hold letters, digits and dashes".to_string(),
            ));
        }

        let level = u32::try_from(level)
            .ok()
            .filter(|level| *level >= 1)
            .ok_or_else(|| SheetError::InvalidCommand("Level must be at least 1".to_string()))?;

        let nature = nature
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_NATURE)
            .to_lowercase();

        Ok(Self {
            name,
            level,
            nature,
        })
    }
}

/// Tunables shared by every workflow run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkflowSettings {
    pub policies: StepPolicies,
    pub locales: LocaleChain,
    pub max_moves: usize,
}

impl WorkflowSettings {
    pub fn from_config(config: &WorkflowConfig) -> Self {
        Self {
            policies: StepPolicies::from_config(config),
            locales: LocaleChain::new(&config.preferred_locales),
            max_moves: config.max_moves,
        }
    }
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self::from_config(&WorkflowConfig::default())
    }
}

/// What the user has chosen so far
#[derive(Clone, Debug, PartialEq)]
pub struct WorkflowState {
    pub creature: CreatureRecord,
    pub ability: Option<AbilityInfo>,
    pub moves: Vec<MoveCandidate>,
    pub shiny: bool,
}

impl WorkflowState {
    fn new(creature: CreatureRecord) -> Self {
        Self {
            creature,
            ability: None,
            moves: vec![],
            shiny: false,
        }
    }
}

/// A rendered sheet and what went into it
#[derive(Clone, Debug, PartialEq)]
pub struct FinishedSheet {
    pub request: SheetRequest,
    pub creature: CreatureRecord,
    pub projection: Projection,
    pub weaknesses: Vec<WeaknessEntry>,
    pub ability: AbilityInfo,
    pub moves: Vec<MoveCandidate>,
    pub shiny: bool,
    pub rendered: RenderedSheet,
}

/// Fetches a creature by name
pub async fn fetch_creature<S: ResourceSource>(source: &S, name: &str) -> SheetResult<CreatureRecord> {
    let target = format!("pokemon/{}", name.to_lowercase());
    let value = source.fetch_json(&target).await?;
    CreatureRecord::from_value(&target, value)
}

/// Alternate forms of a species, empty when the species can't be fetched
pub async fn fetch_alternate_forms<S: ResourceSource>(source: &S, name: &str) -> Vec<String> {
    let target = format!("pokemon-species/{}", name.to_lowercase());

    match source.fetch_json(&target).await {
        Ok(value) => decode::<SpeciesResource>(&target, value)
            .map(|species| species.alternatives_to(name))
            .unwrap_or_else(|e| {
                warn!("Ignoring species data: {}", e);
                vec![]
            }),
        Err(e) => {
            warn!("No alternate forms for {}: {}", name, e);
            vec![]
        }
    }
}

/// One interactive sheet run: the state machine from form choice to render
///
/// Every step prompts, waits once for the invoking user within its policy's
/// timeout, then either applies the reply or the policy's fallback.
pub struct SheetWorkflow<'a, S, C> {
    source: &'a S,
    chat: &'a C,
    settings: &'a WorkflowSettings,
    request: SheetRequest,
    step: Step,
}

impl<'a, S, C> SheetWorkflow<'a, S, C>
where
    S: ResourceSource,
    C: Conversation,
{
    pub fn new(source: &'a S, chat: &'a C, settings: &'a WorkflowSettings, request: SheetRequest) -> Self {
        Self {
            source,
            chat,
            settings,
            request,
            step: Step::FIRST,
        }
    }

    /// Runs every step in order and posts the sheet
    /// Fails if the creature can't be fetched or an aborting step gets no valid reply
    pub async fn run(mut self) -> SheetResult<FinishedSheet> {
        let creature = fetch_creature(self.source, &self.request.name).await?;
        let mut state = WorkflowState::new(creature);

        while let Some(policy) = self.settings.policies.for_step(self.step) {
            info!("Sheet for {}: {} step", self.request.name, self.step);

            match self.step {
                Step::AwaitForm => self.choose_form(&policy, &mut state).await?,
                Step::AwaitAbility => self.choose_ability(&policy, &mut state).await?,
                Step::AwaitMoves => self.choose_moves(&policy, &mut state).await?,
                Step::AwaitShiny => self.choose_shiny(&policy, &mut state).await?,
                Step::Render => break,
            }

            self.step = self.step.next().unwrap_or(Step::Render);
        }

        self.render(state).await
    }

    /// Posts a prompt and waits for the answer, bounded by the step's timeout
    async fn ask(&self, policy: &StepPolicy, prompt: String) -> SheetResult<Result<String, ReplyError>> {
        self.chat.say(prompt).await?;
        Ok(received(self.chat.await_reply(policy.timeout).await))
    }

    /// Applies the step's policy to a failed reply
    /// Returns `Ok` when the step should carry on with its default
    async fn fall_back(&self, policy: &StepPolicy, error: ReplyError) -> SheetResult<()> {
        info!("Sheet for {}: {} step fell back ({})", self.request.name, self.step, error);

        match policy.on_missing {
            OnMissing::Abort => Err(SheetError::StepAborted(self.step)),
            OnMissing::UseDefault => {
                if let Some(notice) = policy.notice_for(error) {
                    self.chat.say(notice).await?;
                }
                Ok(())
            }
        }
    }

    async fn choose_form(&self, policy: &StepPolicy, state: &mut WorkflowState) -> SheetResult<()> {
        let forms = fetch_alternate_forms(self.source, &self.request.name).await;
        if forms.is_empty() {
            return Ok(());
        }

        let mut prompt =
            "**This Pokémon has alternate forms. Pick one (or 0 for the default form):**\n".to_string();
        for (i, form) in forms.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, title_case(form)));
        }

        let choice = self
            .ask(policy, prompt)
            .await?
            .and_then(|reply| parse_form_choice(&reply, forms.len()));

        match choice {
            Ok(FormChoice::Default) => Ok(()),
            Ok(FormChoice::Variant(i)) => match fetch_creature(self.source, &forms[i]).await {
                Ok(variant) => {
                    state.creature = variant;
                    Ok(())
                }
                Err(e) => {
                    warn!("Could not fetch form {}: {}", forms[i], e);
                    self.fall_back(policy, ReplyError::Invalid).await
                }
            },
            Err(e) => self.fall_back(policy, e).await,
        }
    }

    async fn choose_ability(&self, policy: &StepPolicy, state: &mut WorkflowState) -> SheetResult<()> {
        let mut abilities =
            fetch_abilities(self.source, &state.creature.abilities, &self.settings.locales).await;
        if abilities.is_empty() {
            return self.fall_back(policy, ReplyError::Invalid).await;
        }

        let mut prompt = "**Pick an ability:**\n".to_string();
        for (i, ability) in abilities.iter().enumerate() {
            let hidden = if ability.hidden { " (hidden)" } else { "" };
            prompt.push_str(&format!("{}. {}{} — {}\n", i + 1, ability.name, hidden, ability.effect));
        }

        let choice = self
            .ask(policy, prompt)
            .await?
            .and_then(|reply| parse_ability_choice(&reply, abilities.len()));

        match choice {
            Ok(i) => {
                state.ability = Some(abilities.swap_remove(i));
                Ok(())
            }
            Err(e) => self.fall_back(policy, e).await,
        }
    }

    async fn choose_moves(&self, policy: &StepPolicy, state: &mut WorkflowState) -> SheetResult<()> {
        let candidates =
            fetch_move_candidates(self.source, &state.creature.moves, self.request.level).await;

        let mut prompt = format!(
            "**Pick up to {} moves (separate them with commas):**\n",
            self.settings.max_moves
        );
        for (i, candidate) in candidates.iter().enumerate() {
            prompt.push_str(&format!(
                "{}. {} — Lv {} {}\n",
                i + 1,
                candidate.display_name(),
                candidate.level_learned,
                move_details(candidate)
            ));
        }

        let reply = self.ask(policy, prompt).await?;
        let chosen = match reply {
            Ok(reply) => parse_move_choices(&reply, candidates.len(), self.settings.max_moves),
            Err(e) => return self.fall_back(policy, e).await,
        };

        state.moves = chosen.into_iter().map(|i| candidates[i].clone()).collect();
        Ok(())
    }

    async fn choose_shiny(&self, policy: &StepPolicy, state: &mut WorkflowState) -> SheetResult<()> {
        let prompt = "✨ Is the Pokémon **shiny**? (answer `yes` or `no`)".to_string();
        let answer = self
            .ask(policy, prompt)
            .await?
            .and_then(|reply| parse_shiny(&reply));

        match answer {
            Ok(shiny) => {
                state.shiny = shiny;
                Ok(())
            }
            Err(e) => self.fall_back(policy, e).await,
        }
    }

    async fn render(&self, state: WorkflowState) -> SheetResult<FinishedSheet> {
        let WorkflowState {
            creature,
            ability,
            moves,
            shiny,
        } = state;

        let Some(ability) = ability else {
            return Err(SheetError::StepAborted(Step::AwaitAbility));
        };

        let projection = project(
            &creature.base_stats,
            self.request.level,
            NatureModifier::for_nature(&self.request.nature),
        );
        let weaknesses = fetch_weaknesses(self.source, &creature.types).await;

        let rendered = render(&SheetInput {
            creature: &creature,
            projection: &projection,
            weaknesses: &weaknesses,
            ability: &ability,
            moves: &moves,
            shiny,
            level: self.request.level,
            nature: &self.request.nature,
        });

        self.chat.say(rendered.text.clone()).await?;
        if let Some(url) = &rendered.image_url {
            self.chat.send(OutboundMessage::Image(url.clone())).await?;
        }

        Ok(FinishedSheet {
            request: self.request.clone(),
            creature,
            projection,
            weaknesses,
            ability,
            moves,
            shiny,
            rendered,
        })
    }
}

/// Runs a whole sheet command and reports any failure to the user
/// Returns the finished sheet, or `None` when the command ended early
pub async fn run_sheet_command<S, C>(
    source: &S,
    chat: &C,
    settings: &WorkflowSettings,
    request: SheetRequest,
) -> Option<FinishedSheet>
where
    S: ResourceSource,
    C: Conversation,
{
    let name = request.name.clone();

    match SheetWorkflow::new(source, chat, settings, request).run().await {
        Ok(sheet) => {
            info!("Sheet for {} done", name);
            Some(sheet)
        }
        Err(e) => {
            warn!("Sheet for {} failed: {}", name, e);
            if let Err(e) = chat.say(e.user_message()).await {
                warn!("Could not report failure: {}", e);
            }
            None
        }
    }
}
