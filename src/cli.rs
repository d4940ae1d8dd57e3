// src/cli.rs
use std::{error::Error, io::Write, path::PathBuf};

use crate::{
    api::{endpoints::NO_HISTORY, ApiClient, ScrapeMethod},
    config::{consts::PREVIEW_CHARS, AppOptions},
    export::{self, FileName, SaveAs, SaveToDir},
    forms::{LoginForm, ScrapeForm, SignUpForm},
    session::SessionStore,
};

pub type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

const HELP: &str = include_str!("cli_help.txt");

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Login(LoginForm),
    Logout,
    SignUp(SignUpForm),
    Scrape { form: ScrapeForm, out: Option<PathBuf> },
    History { download: bool },
    WhoAmI,
    Help,
}

/// Parse everything after the program name.
pub fn parse_args<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(cmd) = args.next() else {
        return Ok(Command::Help);
    };

    let parsed = match cmd.as_str() {
        "-h" | "--help" | "help" => Command::Help,
        "login" => Command::Login(LoginForm {
            email: positional(&mut args, "email")?,
            password: positional(&mut args, "password")?,
        }),
        "logout" => Command::Logout,
        "whoami" => Command::WhoAmI,
        "signup" => Command::SignUp(SignUpForm {
            user_name: positional(&mut args, "username")?,
            email: positional(&mut args, "email")?,
            password: positional(&mut args, "password")?,
            confirm: positional(&mut args, "repeated password")?,
        }),
        "scrape" => return parse_scrape(args),
        "history" => {
            let mut download = false;
            for a in args {
                match a.as_str() {
                    "--download" | "-d" => download = true,
                    _ => return Err(format!("Unknown arg: {a}")),
                }
            }
            return Ok(Command::History { download });
        }
        other => return Err(format!("Unknown command: {other}")),
    };

    match args.next() {
        Some(extra) => Err(format!("Unexpected argument: {extra}")),
        None => Ok(parsed),
    }
}

fn positional(args: &mut impl Iterator<Item = String>, what: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("Missing {what}"))
}

fn parse_scrape(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    let mut form = ScrapeForm::default();
    let mut out = None;

    while let Some(a) = args.next() {
        match a.as_str() {
            "--method" | "-m" => {
                let v = args.next().ok_or("Missing value for --method")?;
                form.method = v.parse::<ScrapeMethod>()?;
            }
            "--clean" => form.clean_data = true,
            "--company" => form.company_name = args.next().ok_or("Missing value for --company")?,
            "-o" | "--out" => out = Some(PathBuf::from(args.next().ok_or("Missing output path")?)),
            flag if flag.starts_with('-') => return Err(format!("Unknown arg: {flag}")),
            url if form.url.is_empty() => form.url = s!(url),
            extra => return Err(format!("Unexpected argument: {extra}")),
        }
    }

    Ok(Command::Scrape { form, out })
}

/// Run one command against the backend. Human-readable output goes to `out`.
pub fn execute(
    cmd: Command,
    opts: &AppOptions,
    session: &mut SessionStore,
    api: &ApiClient,
    out: &mut impl Write,
) -> CliResult<()> {
    match cmd {
        Command::Help => write!(out, "{HELP}")?,

        Command::WhoAmI => {
            let state = if session.get_session().is_authenticated() { "Logged in" } else { "Not logged in" };
            writeln!(out, "{state} ({})", api.base_url())?;
        }

        Command::Logout => {
            session.clear_session()?;
            writeln!(out, "Logged out.")?;
        }

        Command::Login(form) => {
            let req = form.validate()?;
            let reply = api
                .login(&req, &session.get_session())
                .map_err(|e| e.user_message("Network error. Please try again later."))?;
            let token = reply.into_outcome()?;
            session.set_session(&token, true)?;
            writeln!(out, "Logged in.")?;
        }

        Command::SignUp(form) => {
            let req = form.validate().map_err(|problems| problems.join("\n"))?;
            let fallback = "Sign-Up failed. Please try again.";
            let reply = api
                .sign_up(&req, &session.get_session())
                .map_err(|e| e.user_message(fallback))?;
            reply.into_outcome(fallback)?;
            writeln!(out, "Account successfully created! You can now log in.")?;
        }

        Command::Scrape { form, out: target } => {
            let req = form.validate()?;
            let content = api
                .scrape(&req, &session.get_session())
                .map_err(|e| e.user_message("Failed to scrape the website. Please try again."))?
                .into_outcome()?;

            match target {
                None => writeln!(out, "{content}")?,
                Some(path) => {
                    let saved = export::export_text_file(
                        &content,
                        None,
                        &SaveAs::new(path),
                        &opts.staging_dir(),
                    )?;
                    writeln!(out, "Saved to {}", saved.display())?;
                }
            }
        }

        Command::History { download } => {
            let snapshot = session.get_session();
            if !snapshot.is_authenticated() {
                return Err("Not logged in. Run `cli login <email> <password>` first.".into());
            }
            let records = api.load_history(&snapshot)?;
            if records.is_empty() {
                writeln!(out, "{NO_HISTORY}")?;
                return Ok(());
            }

            let sink = SaveToDir::new(opts.download_dir.clone());
            for rec in &records {
                if download {
                    let saved = export::export_text_file(
                        &rec.scraped_data,
                        Some(&FileName::FromUrl(rec.url.clone())),
                        &sink,
                        &opts.staging_dir(),
                    )?;
                    writeln!(out, "Saved to {}", saved.display())?;
                } else {
                    let (preview, cut) = rec.preview(PREVIEW_CHARS.min(60));
                    let preview = preview.replace(['\n', '\r'], " ");
                    let dots = if cut { "..." } else { "" };
                    writeln!(
                        out,
                        "{}\t{}\t{}\t{preview}{dots}",
                        rec.date.as_deref().unwrap_or("-"),
                        rec.method_label(),
                        rec.url
                    )?;
                }
            }
        }
    }
    Ok(())
}

/// Entry point for the `cli` binary.
pub fn run(args: impl IntoIterator<Item = String>, opts: AppOptions) -> CliResult<()> {
    let cmd = parse_args(args)?;
    let mut session = SessionStore::open_file(opts.session_path());
    let api = ApiClient::http(&opts)?;
    let stdout = std::io::stdout();
    execute(cmd, &opts, &mut session, &api, &mut stdout.lock())
}
