//! Play command - An interactive terminal game against the engine

use std::{
    io::{self, BufRead, Write},
    thread,
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::warn;

use crate::{
    cli::{config::StoreArgs, output::render_board},
    engine::Nemesis,
    pacing::{MoveScheduler, ThinkingDelay, ThinkingDelayConfig},
    tictactoe::{GameResult, GameSession, Mark},
};

#[derive(Parser, Debug)]
#[command(about = "Play against the engine in the terminal")]
pub struct PlayArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Who opens the first game (`human` or `engine`)
    #[arg(long, default_value = "human")]
    pub first: String,

    /// Player name recorded with learned patterns
    #[arg(long, short = 'n', default_value = "human")]
    pub name: String,

    /// Keep the same opener every game instead of alternating
    #[arg(long)]
    pub no_alternate: bool,

    /// Skip the thinking delay
    #[arg(long)]
    pub instant: bool,
}

/// What the human typed at the prompt
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Cell(usize),
    Restart,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "q" | "quit" | "exit" => Input::Quit,
        "r" | "restart" => Input::Restart,
        other => other
            .parse::<usize>()
            .map(Input::Cell)
            .unwrap_or_else(|_| Input::Unknown(other.to_string())),
    }
}

fn parse_first(value: &str, engine: &Nemesis) -> Result<Mark> {
    match value.trim().to_ascii_lowercase().as_str() {
        "human" | "me" => Ok(engine.human()),
        "engine" | "ai" | "nemesis" => Ok(engine.ai()),
        other => bail!("Unknown opener '{other}'. Supported: human, engine"),
    }
}

fn read_line(lines: &mut impl Iterator<Item = io::Result<String>>, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush().context("Failed to flush stdout")?;
    lines.next().transpose().context("Failed to read from stdin")
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let (mut engine, config) = args.store.engine()?;
    let human = engine.human();
    let mut first = parse_first(&args.first, &engine)?;

    let delay_config = if args.instant {
        ThinkingDelayConfig::instant()
    } else {
        config.thinking_delay
    };
    let mut delay = ThinkingDelay::new(delay_config);
    let mut scheduler = MoveScheduler::new();
    let mut session = GameSession::new(first);

    println!("You are {human}. Enter a cell 0-8, 'r' to restart, 'q' to quit.");
    println!(
        "Nemesis adaptation: {}/100 ({} patterns learned)",
        engine.adaptation_level(),
        engine.store().book().len()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("\n{}\n", render_board(session.board()));

        while session.is_active() {
            if session.to_move() == engine.ai() {
                let record = engine.choose_move(&session)?;
                let ticket = scheduler.schedule(&session, record.index, engine.ai(), delay.current());
                thread::sleep(ticket.delay());
                if let Err(e) = scheduler.commit(ticket, &mut session) {
                    warn!(error = %e, "engine move dropped");
                    continue;
                }
                println!("Nemesis plays {} ({})", record.index, record.reasoning);
                println!("\n{}\n", render_board(session.board()));
                continue;
            }

            let Some(line) = read_line(&mut lines, "Your move: ")? else {
                return Ok(());
            };
            match parse_input(&line) {
                Input::Quit => return Ok(()),
                Input::Restart => {
                    scheduler.reset(&mut session, first);
                    println!("\n{}\n", render_board(session.board()));
                }
                Input::Cell(pos) => match session.play(pos, human) {
                    Ok(_) => println!("\n{}\n", render_board(session.board())),
                    Err(e) => println!("{e}"),
                },
                Input::Unknown(text) => println!("'{text}' is not a cell (0-8)"),
            }
        }

        match engine.record_result(&session, &args.name)? {
            GameResult::Loss => {
                println!("You win! Nemesis will remember that.");
                delay.on_human_win();
            }
            GameResult::Win => println!("Nemesis wins."),
            GameResult::Draw => println!("Draw."),
        }
        println!(
            "Adaptation {}/100, {} patterns learned",
            engine.adaptation_level(),
            engine.store().book().len()
        );

        match read_line(&mut lines, "Play again? [Y/n] ")? {
            None => return Ok(()),
            Some(answer) if matches!(answer.trim().to_ascii_lowercase().as_str(), "n" | "no" | "q") => {
                return Ok(());
            }
            Some(_) => {}
        }

        if !args.no_alternate {
            first = first.opponent();
        }
        delay.on_new_round();
        scheduler.reset(&mut session, first);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input(" 4 "), Input::Cell(4));
        assert_eq!(parse_input("Q"), Input::Quit);
        assert_eq!(parse_input("restart"), Input::Restart);
        assert_eq!(parse_input("x"), Input::Unknown("x".to_string()));
    }
}
