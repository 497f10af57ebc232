//! Headless Mode
//!
//! Drives the widget from JSON messages, one per line, without a terminal.
//! Each dispatched message is followed by one line holding the state snapshot
//! as JSON. `SubmitLookupRequested` goes through the widget's submit path, so
//! it also starts a real lookup; its completion is dispatched (and printed)
//! when it arrives. At end of input, outstanding lookups are awaited.
//!
//! ```text
//! $ printf '%s\n' '{"kind":"TextInputChanged","text":"Paris"}' '{"kind":"SubmitLookupRequested"}' \
//!     | skycast --headless
//! ```

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use skycast_core::{Completions, Message, RetainedTree, State, WeatherLookup, WeatherWidget};

/// Run a headless session over `input`, writing snapshots to `output`
///
/// Returns the final state.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails. Lines that are
/// not valid messages are logged and skipped.
pub async fn run<L, R, W>(lookup: L, initial: State, input: R, output: &mut W) -> anyhow::Result<State>
where
    L: WeatherLookup + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (widget, completions) = WeatherWidget::new(lookup, initial, RetainedTree::new());
    run_widget(widget, completions, input, output).await
}

/// Run a headless session on an already mounted widget
///
/// # Errors
///
/// Same as [`run`].
pub async fn run_widget<L, R, W>(
    mut widget: WeatherWidget<L, RetainedTree>,
    mut completions: Completions,
    input: R,
    output: &mut W,
) -> anyhow::Result<State>
where
    L: WeatherLookup + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut outstanding = 0usize;
    let mut line_number = 0usize;

    loop {
        tokio::select! {
            biased;

            Some(message) = completions.recv(), if outstanding > 0 => {
                outstanding -= 1;
                widget.dispatch(message);
                write_snapshot(widget.state(), output).await?;
            }

            line = lines.next_line() => {
                let Some(line) = line? else { break };
                line_number += 1;
                if line.trim().is_empty() {
                    continue;
                }
                match Message::from_json(&line) {
                    Ok(Message::SubmitLookupRequested) => {
                        if widget.submit() {
                            outstanding += 1;
                        } else {
                            tracing::warn!(line = line_number, "No submit control rendered; lookup not started");
                        }
                    }
                    Ok(message) => widget.dispatch(message),
                    Err(e) => {
                        tracing::warn!(line = line_number, error = %e, "Skipping invalid message");
                        continue;
                    }
                }
                write_snapshot(widget.state(), output).await?;
            }
        }
    }

    drain(&mut widget, &mut completions, outstanding, output).await?;
    output.flush().await?;
    Ok(widget.state().clone())
}

async fn drain<L, W>(
    widget: &mut WeatherWidget<L, RetainedTree>,
    completions: &mut Completions,
    mut outstanding: usize,
    output: &mut W,
) -> anyhow::Result<()>
where
    L: WeatherLookup + 'static,
    W: AsyncWrite + Unpin,
{
    while outstanding > 0 {
        let Some(message) = completions.recv().await else {
            break;
        };
        outstanding -= 1;
        widget.dispatch(message);
        write_snapshot(widget.state(), output).await?;
    }
    Ok(())
}

async fn write_snapshot<W: AsyncWrite + Unpin>(state: &State, output: &mut W) -> anyhow::Result<()> {
    let mut line = serde_json::to_vec(state)?;
    line.push(b'\n');
    output.write_all(&line).await?;
    Ok(())
}
