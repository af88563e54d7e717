//! Line-driven loops for the review queue, the debounced gallery search and
//! the multi-view shell. Input and output are injected so the loops can be
//! driven from tests.

use crate::commands::{parse_map_filter, GalleryCommand, ReviewCommand, ShellCommand};
use crate::render;
use anyhow::Result;
use pawscout_core::debounce::run_debounced;
use pawscout_core::gallery::GallerySession;
use pawscout_core::review::{ReviewError, ReviewSession};
use pawscout_core::shell::{Shell, View};
use providers::Decision;
use std::collections::HashSet;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

const MAP_HELP: &str = "filter <all|lost|found>  retry";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

fn decided(decision: Decision) -> &'static str {
    match decision {
        Decision::Accept => "Accepted",
        Decision::Reject => "Rejected",
    }
}

pub async fn apply_review<W: Write>(
    session: &mut ReviewSession,
    cmd: ReviewCommand,
    out: &mut W,
) -> Result<Flow> {
    match cmd {
        ReviewCommand::Decide(decision) => match session.decide_current(decision).await {
            Ok(m) => writeln!(out, "{} match {}", decided(decision), m.id)?,
            Err(ReviewError::Empty) => writeln!(out, "Nothing to review.")?,
            // shown through the session notice
            Err(ReviewError::Api(e)) => debug!(error = %e, "decision failed"),
            Err(e) => writeln!(out, "{e}")?,
        },
        ReviewCommand::Move(direction) => session.advance(direction),
        ReviewCommand::Compare => {
            session.toggle_compare();
        }
        ReviewCommand::Retry => {
            if let Err(e) = session.load().await {
                debug!(error = %e, "reload failed");
            }
        }
        ReviewCommand::Help => writeln!(out, "{}", render::REVIEW_HELP)?,
        ReviewCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

pub async fn review_loop<R, W>(session: &mut ReviewSession, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if let Err(e) = session.load().await {
        debug!(error = %e, "initial load failed");
    }
    write!(out, "{}", render::review(&session.view()))?;
    out.flush()?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let cmd = match line.parse::<ReviewCommand>() {
            Ok(cmd) => cmd,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };
        if apply_review(session, cmd, out).await? == Flow::Quit {
            break;
        }
        write!(out, "{}", render::review(&session.view()))?;
        out.flush()?;
    }
    Ok(())
}

pub async fn apply_gallery(gallery: &mut GallerySession, cmd: GalleryCommand) {
    let result = match cmd {
        GalleryCommand::PetType(pet_type) => gallery.set_pet_type(pet_type).await,
        GalleryCommand::Status(report_type) => gallery.set_report_type(report_type).await,
        GalleryCommand::Search(text) => {
            gallery.set_search(text);
            gallery.refresh().await
        }
        GalleryCommand::Retry => gallery.refresh().await,
    };
    // the failure is kept in the gallery state and rendered from there
    if let Err(e) = result {
        debug!(error = %e, "gallery refresh failed");
    }
}

/// Every plain line replaces the search text; only the last one in a quiet
/// period of `delay` triggers a fetch. Lines starting with `:` are gallery
/// commands and run immediately.
pub async fn search_loop<R, W>(
    gallery: &mut GallerySession,
    input: R,
    delay: Duration,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: Write,
{
    apply_gallery(gallery, GalleryCommand::Retry).await;
    write!(out, "{}", render::gallery(gallery.state(), gallery.filter()))?;
    out.flush()?;

    let (text_tx, mut text_rx) = mpsc::channel::<String>(64);
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<String>(16);
    let (settled_tx, mut settled_rx) = mpsc::channel::<String>(8);

    let reader = tokio::spawn(async move {
        let mut lines = input.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let tx = if line.starts_with(':') { &cmd_tx } else { &text_tx };
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });
    let debouncer = tokio::spawn(async move {
        run_debounced(&mut text_rx, delay, |query| {
            let tx = settled_tx.clone();
            async move {
                let _ = tx.send(query).await;
            }
        })
        .await;
    });

    let mut commands_open = true;
    loop {
        // Commands first: the settled channel closes once input ends, and a
        // queued command must still run before the loop exits.
        tokio::select! {
            biased;
            line = cmd_rx.recv(), if commands_open => match line {
                Some(line) => {
                    let line = line.trim_start_matches(':').trim();
                    if matches!(line, "q" | "quit") {
                        break;
                    }
                    match line.parse::<GalleryCommand>() {
                        Ok(cmd) => apply_gallery(gallery, cmd).await,
                        Err(e) => {
                            writeln!(out, "{e}")?;
                            continue;
                        }
                    }
                }
                None => {
                    commands_open = false;
                    continue;
                }
            },
            settled = settled_rx.recv() => match settled {
                Some(query) => {
                    debug!(%query, "search settled");
                    apply_gallery(gallery, GalleryCommand::Search(query)).await;
                }
                None => break,
            },
        }
        write!(out, "{}", render::gallery(gallery.state(), gallery.filter()))?;
        out.flush()?;
    }

    reader.abort();
    debouncer.abort();
    Ok(())
}

async fn load_view(shell: &mut Shell, view: View) {
    let result = match view {
        View::Matches => shell.review.load().await.map(|_| ()),
        View::Gallery => shell.gallery.refresh().await.map(|_| ()),
        View::Map => shell.map.refresh().await.map(|_| ()),
        View::Dashboard | View::Upload => Ok(()),
    };
    if let Err(e) = result {
        debug!(%view, error = %e, "view load failed");
    }
}

fn render_view<W: Write>(shell: &Shell, out: &mut W) -> Result<()> {
    writeln!(out, "== {} ==", shell.current())?;
    match shell.current() {
        View::Dashboard => write!(out, "{}", render::home())?,
        View::Matches => write!(out, "{}", render::review(&shell.review.view()))?,
        View::Gallery => write!(
            out,
            "{}",
            render::gallery(shell.gallery.state(), shell.gallery.filter())
        )?,
        View::Map => {
            if let Some(error) = shell.map.error() {
                writeln!(out, "Could not load sightings: {error}")?;
            }
            write!(
                out,
                "{}",
                render::clusters(&shell.map.clusters(), shell.map.filter())
            )?
        }
        View::Upload => writeln!(out, "Run `pawscout upload --help` to report a pet.")?,
    }
    out.flush()?;
    Ok(())
}

fn help_for(view: View) -> String {
    match view {
        View::Matches => render::REVIEW_HELP.to_string(),
        View::Gallery => render::GALLERY_HELP.to_string(),
        View::Map => MAP_HELP.to_string(),
        View::Dashboard | View::Upload => render::home(),
    }
}

async fn forward<W: Write>(shell: &mut Shell, line: &str, out: &mut W) -> Result<()> {
    match shell.current() {
        View::Matches => match line.parse::<ReviewCommand>() {
            Ok(cmd) => {
                apply_review(&mut shell.review, cmd, out).await?;
            }
            Err(e) => writeln!(out, "{e}")?,
        },
        View::Gallery => match line.parse::<GalleryCommand>() {
            Ok(cmd) => apply_gallery(&mut shell.gallery, cmd).await,
            Err(e) => writeln!(out, "{e}")?,
        },
        View::Map if line.trim() == "retry" => load_view(shell, View::Map).await,
        View::Map => match parse_map_filter(line) {
            Ok(filter) => shell.map.set_filter(filter),
            Err(e) => writeln!(out, "{e}")?,
        },
        View::Dashboard | View::Upload => writeln!(out, "unknown command: {}", line.trim())?,
    }
    Ok(())
}

/// Views load on first visit only; coming back shows them as they were left.
pub async fn shell_loop<R, W>(shell: &mut Shell, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    render_view(shell, out)?;
    let mut loaded: HashSet<View> = HashSet::new();
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let cmd = match line.parse::<ShellCommand>() {
            Ok(cmd) => cmd,
            Err(_) => continue,
        };
        match cmd {
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                writeln!(out, "{}", help_for(shell.current()))?;
                continue;
            }
            ShellCommand::Open(view) => {
                shell.navigate(view);
                if loaded.insert(view) {
                    load_view(shell, view).await;
                }
            }
            ShellCommand::Forward(text) => forward(shell, &text, out).await?,
        }
        render_view(shell, out)?;
    }
    Ok(())
}
