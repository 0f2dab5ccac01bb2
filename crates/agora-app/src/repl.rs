//! Line-oriented interactive loop shared by `chat` and `learn`.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use agora_types::{AgoraError, Result};
use crate::app::App;

pub enum Mode {
    Chat(String),
    Learn,
}

async fn write_line<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes()).await.map_err(io_error)?;
    out.write_all(b"\n").await.map_err(io_error)?;
    out.flush().await.map_err(io_error)
}

fn io_error(e: std::io::Error) -> AgoraError {
    AgoraError::Other(e.to_string())
}

/// Read lines until EOF or `/quit`. Model failures end the turn, not the
/// loop; I/O failures on either side end the loop with an error.
pub async fn repl<R, W>(app: &mut App, mode: Mode, input: R, mut out: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let banner = match &mode {
        Mode::Chat(session) => format!("session {} (/memory, /reset, /quit)", session),
        Mode::Learn => "learning mode (/lessons, /quit)".to_string(),
    };
    write_line(&mut out, &banner).await?;

    loop {
        out.write_all(b"> ").await.map_err(io_error)?;
        out.flush().await.map_err(io_error)?;
        let line = match lines.next_line().await.map_err(io_error)? {
            Some(line) => line,
            None => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "/quit" {
            break;
        }

        let reply = match (&mode, input) {
            (Mode::Chat(session), "/memory") => Ok(app.memory(session)),
            (Mode::Chat(session), "/reset") => {
                app.reset(session);
                Ok("memory cleared".to_string())
            }
            (Mode::Chat(session), _) => app.ask(session, input).await,
            (Mode::Learn, "/lessons") => Ok(app.lessons().join("\n")),
            (Mode::Learn, _) => app.learn(input).await,
        };

        match reply {
            Ok(text) => write_line(&mut out, &text).await?,
            Err(e) => write_line(&mut out, &format!("error: {}", e)).await?,
        }
    }
    Ok(())
}
