use std::sync::Arc;

use anyhow::Context;
use portal_auth::guard::{self, AccessDecision, GuardOutcome};
use portal_auth::LogoutOutcome;
use portal_core::{FlowStep, Role};
use portal_survey::{FlowSnapshot, SurveyClient, SurveySession};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

const CONSENT_TEXT: &str =
    "This study is part of ongoing research. Do you consent to participate? [accept/decline]";
const INTRO_TEXT: &str = "Please explore each of the AI scenarios created. \
                          Be sure to interact with and rate each scenario. [Enter]";
const THANK_YOU_TEXT: &str = "Thank you for participating in this survey. [Enter to log out]";
const BROWSE_HELP: &str = "Commands: <number> select a question, rate <1-5>, finish, logout";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurveyInput {
    Accept,
    Decline,
    Continue,
    Select(usize),
    Rate(u8),
    Finish,
    Logout,
}

#[derive(Serialize)]
struct SurveyResponse {
    final_step: FlowStep,
    ratings_submitted: usize,
    logout: Option<LogoutOutcome>,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.store.refresh().await;
    match guard::evaluate(&ctx.store.current(), Some(&Role::SurveyTaker)) {
        GuardOutcome::Decided(AccessDecision::Render) => {}
        GuardOutcome::Decided(AccessDecision::RedirectLogin) => {
            anyhow::bail!("survey: not signed in; run `portal auth login` first")
        }
        GuardOutcome::Decided(AccessDecision::RedirectHome(home)) => {
            anyhow::bail!("survey: only survey takers can take the survey (your home is {home})")
        }
        GuardOutcome::Pending => anyhow::bail!("survey: session is still loading"),
    }

    let survey = ctx.config.require_survey()?;
    let client = SurveyClient::new(
        survey.api_base_url.clone(),
        &ctx.config.general.user_agent,
        ctx.config.general.request_timeout(),
    )
    .context("survey: failed to build HTTP client")?;
    let mut session = SurveySession::new(Arc::new(client), survey.phase_timeout());
    if let Err(error) = session.load_questions().await {
        eprintln!("Could not load questions: {error}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ratings_submitted = 0;
    while !session.step().is_terminal() {
        print_prompt(&session.snapshot(), flags.quiet);
        let Some(line) = lines.next_line().await.context("survey: failed to read input")? else {
            // Input closed: leave without signing out.
            return output(
                &SurveyResponse {
                    final_step: session.step(),
                    ratings_submitted,
                    logout: None,
                },
                flags.format,
            );
        };

        let input = match parse_input(session.step(), &line) {
            Ok(input) => input,
            Err(hint) => {
                eprintln!("{hint}");
                continue;
            }
        };
        match apply(&mut session, input).await {
            Ok(rated) => ratings_submitted += usize::from(rated),
            Err(error) => eprintln!("{error}"),
        }
    }

    let logout = ctx.logout_policy().run(&ctx.store).await;
    output(
        &SurveyResponse {
            final_step: session.step(),
            ratings_submitted,
            logout: Some(logout),
        },
        flags.format,
    )
}

/// Apply one input. Returns whether a rating was submitted.
async fn apply(session: &mut SurveySession<SurveyClient>, input: SurveyInput) -> anyhow::Result<bool> {
    match input {
        SurveyInput::Accept => session.accept_consent()?,
        SurveyInput::Decline => session.decline_consent()?,
        SurveyInput::Continue if session.step() == FlowStep::Finishing => {
            session.acknowledge_thank_you()?;
        }
        SurveyInput::Continue => session.acknowledge_intro()?,
        SurveyInput::Select(index) => {
            session.select_index(index)?;
            let mut shown = [false; 2];
            while session.step().is_fetching() {
                match session.next_outcome().await {
                    Some(true) => print_new_answers(&session.snapshot(), &mut shown),
                    Some(false) => {}
                    None => break,
                }
            }
        }
        SurveyInput::Rate(stars) => {
            let result = session.submit_rating(stars).await;
            if let Some(notice) = session.snapshot().notice {
                eprintln!("{notice}");
            }
            return match result {
                Ok(_) => Ok(true),
                // The notice already told the user.
                Err(portal_survey::SurveyError::Flow(error)) => Err(error.into()),
                Err(_) => Ok(false),
            };
        }
        SurveyInput::Finish => session.finish()?,
        SurveyInput::Logout => session.logout()?,
    }
    Ok(false)
}

fn parse_input(step: FlowStep, line: &str) -> Result<SurveyInput, &'static str> {
    let line = line.trim().to_ascii_lowercase();
    if line == "logout" {
        return Ok(SurveyInput::Logout);
    }
    match step {
        FlowStep::Consent => match line.as_str() {
            "accept" | "a" | "yes" | "y" => Ok(SurveyInput::Accept),
            "decline" | "d" | "no" | "n" => Ok(SurveyInput::Decline),
            _ => Err("Type 'accept' or 'decline'."),
        },
        FlowStep::ScenarioIntro | FlowStep::Finishing => Ok(SurveyInput::Continue),
        _ => {
            if line == "finish" {
                return Ok(SurveyInput::Finish);
            }
            if let Some(stars) = line.strip_prefix("rate") {
                return stars
                    .trim()
                    .parse::<u8>()
                    .map(SurveyInput::Rate)
                    .map_err(|_| "Usage: rate <1-5>");
            }
            match line.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(SurveyInput::Select(n - 1)),
                _ => Err(BROWSE_HELP),
            }
        }
    }
}

fn print_prompt(snapshot: &FlowSnapshot, quiet: bool) {
    match snapshot.step {
        FlowStep::Consent => eprintln!("{CONSENT_TEXT}"),
        FlowStep::ScenarioIntro => eprintln!("{INTRO_TEXT}"),
        FlowStep::Finishing => eprintln!("{THANK_YOU_TEXT}"),
        _ => {
            eprintln!("Questions:");
            for (i, question) in snapshot.questions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, question.text);
            }
            if let Some(selected) = &snapshot.selected {
                eprintln!("Selected: {}", selected.text);
            } else {
                eprintln!("Select a question first.");
            }
            if !quiet {
                eprintln!("{BROWSE_HELP}");
            }
        }
    }
}

/// Print answer texts as they become displayable, each once.
///
/// The pre-answer shows as soon as it resolves; the final answer only once
/// the pre-answer is in.
fn print_new_answers(snapshot: &FlowSnapshot, shown: &mut [bool; 2]) {
    let Some(answers) = &snapshot.answers else {
        return;
    };
    let displayable = [
        answers.pre_answer_message.as_deref(),
        answers
            .final_answer
            .as_deref()
            .filter(|_| snapshot.step == FlowStep::Answered),
    ];
    for (text, shown) in displayable.into_iter().zip(shown.iter_mut()) {
        if let Some(text) = text
            && !*shown
        {
            *shown = true;
            if !text.is_empty() {
                eprintln!("  {text}");
            }
        }
    }
}
