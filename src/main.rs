//! Headless Blockfall runner (default binary).
//!
//! Reads one command per stdin line, writes JSON protocol lines to stdout and
//! logs to stderr. See `blockfall::adapter` for the protocol.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use blockfall::adapter::{spawn_leaderboard, Driver, RunConfig, LEADERBOARD_SIZE};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = RunConfig::load(&args)?;

    let rt = Runtime::new().context("failed to create tokio runtime")?;
    let result = rt.block_on(run(config));

    // The stdin reader may still be parked in a blocking read.
    rt.shutdown_background();
    result
}

async fn run(config: RunConfig) -> Result<()> {
    let (leaderboard, leaderboard_task) = spawn_leaderboard(LEADERBOARD_SIZE);
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let (cmd_tx, cmd_rx) = mpsc::channel::<String>(64);

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = out_rx.recv().await {
            if stdout.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if stdout.write_all(b"\n").await.is_err() {
                break;
            }
            if stdout.flush().await.is_err() {
                break;
            }
        }
    });

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if cmd_tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    eprintln!("[Driver] stdin error: {}", e);
                    break;
                }
            }
        }
    });

    let driver = Driver::new(&config, leaderboard, out_tx);
    driver.run(cmd_rx).await?;

    // The driver owned the last output sender and leaderboard handles.
    let _ = writer.await;
    let standings = leaderboard_task
        .await
        .context("leaderboard task failed")?;

    if !standings.is_empty() {
        eprintln!("[Leaderboard] final standings:");
        for (i, entry) in standings.entries().iter().enumerate() {
            eprintln!(
                "[Leaderboard] {}. {} {} (level {}, {} lines)",
                i + 1,
                entry.player,
                entry.score,
                entry.level,
                entry.lines
            );
        }
    }
    Ok(())
}
