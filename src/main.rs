use clap::Parser;
use tracing_subscriber::EnvFilter;

mod chat;
mod cli;
mod config;
mod errors;
mod export;
mod gateway;
mod log;
mod parse;
mod prompt;
mod provider;
mod ux;
mod validate;
mod wire;
mod workflow;

use chat::ChatAssistant;
use gateway::LlmGateway;
use workflow::{Action, Session, Step, Workflow};

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Wizard(Action),
    Chat,
    Guide,
    CopyAll,
    Export,
    Quit,
    Unknown,
}

fn options(session: &Session) -> Vec<(&'static str, &'static str)> {
    if session.error().is_some() {
        return vec![("enter", "continue"), ("q", "quit")];
    }
    let mut opts = match session.step {
        Step::StoreUrlInput => vec![("<url>", "analyze brand")],
        Step::BrandProfileDisplay => vec![("a", "looks good, continue"), ("r", "start over")],
        Step::ProductUrlInput => vec![("<url>", "analyze product"), ("r", "start over")],
        Step::ProductAnalysisDisplay => vec![("g", "generate optimized copy"), ("b", "go back")],
        Step::ResultsDisplay => vec![
            ("a", "copy all"),
            ("s", "save to file"),
            ("g", "regenerate copy"),
            ("o", "optimize another product"),
            ("n", "analyze new brand"),
        ],
    };
    opts.extend([("chat", "assistant"), ("?", "how it works"), ("q", "quit")]);
    opts
}

fn parse_command(session: &Session, input: &str) -> Command {
    match input {
        "q" | "quit" => return Command::Quit,
        "?" => return Command::Guide,
        "chat" => return Command::Chat,
        _ => {}
    }
    if session.error().is_some() {
        return Command::Wizard(Action::DismissError);
    }
    match (session.step, input) {
        (Step::StoreUrlInput, url) => Command::Wizard(Action::SubmitStoreUrl(url.to_string())),
        (Step::BrandProfileDisplay, "a") => Command::Wizard(Action::AcceptProfile),
        (Step::BrandProfileDisplay | Step::ProductUrlInput, "r") => Command::Wizard(Action::Restart),
        (Step::ProductUrlInput, url) => Command::Wizard(Action::SubmitProductUrl(url.to_string())),
        (Step::ProductAnalysisDisplay, "g") => Command::Wizard(Action::ConfirmAnalysis),
        (Step::ProductAnalysisDisplay, "b") => Command::Wizard(Action::GoBack),
        (Step::ResultsDisplay, "a") => Command::CopyAll,
        (Step::ResultsDisplay, "s") => Command::Export,
        (Step::ResultsDisplay, "g") => Command::Wizard(Action::Regenerate),
        (Step::ResultsDisplay, "o") => Command::Wizard(Action::OptimizeAnother),
        (Step::ResultsDisplay, "n") => Command::Wizard(Action::AnalyzeNewBrand),
        _ => Command::Unknown,
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "brandvoice=debug" } else { "brandvoice=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run_chat(chat: &mut ChatAssistant, gateway: &LlmGateway) {
    ux::show_chat_intro(chat.is_available());
    for message in chat.transcript() {
        ux::show_chat_message(message);
    }
    loop {
        let Some(line) = ux::prompt_line("you:") else { break };
        match line.as_str() {
            "/back" => break,
            "" => continue,
            _ => {}
        }
        ux::chat_reply_prefix();
        let mut printer = ux::ReplyPrinter::default();
        chat.send(gateway, &line, |m| printer.update(m)).await;
        println!();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    if args.guide {
        ux::print_guide();
        return Ok(());
    }
    init_tracing(args.debug);

    let mut cfg = config::Config::load(args.config.as_deref())?;
    args.apply(&mut cfg);
    let api_key = cfg.api_key()?;
    tracing::debug!(?cfg, "configuration loaded");

    let provider = provider::make_provider(&cfg, api_key)?;
    let mut gateway = LlmGateway::new(provider, cfg.clone());
    if cfg.save_artifacts {
        let artifacts = log::ArtifactLog::new(&cfg.artifacts_dir);
        println!("Saving prompts and responses under {}", artifacts.dir().display());
        gateway = gateway.with_sink(Box::new(artifacts));
    }

    let mut chat = ChatAssistant::start(&gateway).await;
    let workflow = Workflow::new(&gateway);
    let mut session = Session::default();

    loop {
        ux::show_session(&session);
        ux::show_menu(&options(&session));
        let Some(input) = ux::prompt_line(">") else { break };

        let action = match parse_command(&session, &input) {
            Command::Wizard(action) => action,
            Command::Chat => {
                run_chat(&mut chat, &gateway).await;
                continue;
            }
            Command::Guide => {
                ux::print_guide();
                continue;
            }
            Command::CopyAll => {
                if let Some(copy) = &session.product_copy {
                    ux::show_copy_all(copy);
                }
                continue;
            }
            Command::Export => {
                if let Some(copy) = &session.product_copy {
                    match export::save(std::path::Path::new(&cfg.export_dir), copy) {
                        Ok(path) => println!("Saved to {}", path.display()),
                        Err(e) => println!("Could not save the file: {e:#}"),
                    }
                }
                continue;
            }
            Command::Quit => break,
            Command::Unknown => {
                println!("Unrecognized option: {input}");
                continue;
            }
        };

        if action == Action::AnalyzeNewBrand && !ux::confirm("Discard these results and return to the brand profile?") {
            continue;
        }

        let spinner = ux::Spinner::new();
        let result = workflow.apply(session.clone(), action, |s| spinner.observe(s)).await;
        spinner.finish();
        match result {
            Ok(next) => session = next,
            Err(e) => tracing::warn!(error = %e, "action ignored"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::Status;

    fn at(step: Step) -> Session {
        Session { step, ..Session::default() }
    }

    #[test]
    fn store_step_treats_input_as_url() {
        assert_eq!(
            parse_command(&at(Step::StoreUrlInput), "mystore.com"),
            Command::Wizard(Action::SubmitStoreUrl("mystore.com".into()))
        );
        assert_eq!(parse_command(&at(Step::StoreUrlInput), ""), Command::Wizard(Action::SubmitStoreUrl(String::new())));
    }

    #[test]
    fn any_input_dismisses_an_error() {
        let session = Session { status: Status::Failed("boom".into()), ..at(Step::ProductUrlInput) };
        assert_eq!(parse_command(&session, ""), Command::Wizard(Action::DismissError));
        assert_eq!(parse_command(&session, "q"), Command::Quit);
    }

    #[test]
    fn results_step_commands() {
        let s = at(Step::ResultsDisplay);
        assert_eq!(parse_command(&s, "g"), Command::Wizard(Action::Regenerate));
        assert_eq!(parse_command(&s, "s"), Command::Export);
        assert_eq!(parse_command(&s, "a"), Command::CopyAll);
        assert_eq!(parse_command(&s, "x"), Command::Unknown);
    }

    #[test]
    fn global_commands_win_at_every_step() {
        assert_eq!(parse_command(&at(Step::StoreUrlInput), "chat"), Command::Chat);
        assert_eq!(parse_command(&at(Step::ProductAnalysisDisplay), "?"), Command::Guide);
    }
}
