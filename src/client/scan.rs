use futures::StreamExt;

use crate::common::value;
use crate::error::{Error, Result, TransportError};
use crate::proto;
use crate::read::scan::ScanOutput;
use crate::transport::ScanStream;

/// Progress of one scan call.
#[derive(Debug)]
enum State {
    Idle,
    Receiving(ScanOutput),
}

impl State {
    fn accumulated(self) -> ScanOutput {
        match self {
            Self::Idle => ScanOutput::default(),
            Self::Receiving(output) => output,
        }
    }
}

/// Drain `stream` into one output, failing on the first error chunk.
///
/// Items are kept in arrival order. On failure nothing accumulated so far is
/// returned.
pub(crate) async fn aggregate(mut stream: ScanStream) -> Result<ScanOutput> {
    let mut state = State::Idle;
    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(error) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(%error, "scan stream failed");
                return Err(error);
            }
        };
        state = receive(state, chunk)?;
    }
    Ok(state.accumulated())
}

fn receive(state: State, chunk: proto::ScanResponse) -> Result<State> {
    if let Some(message) = chunk.error.filter(|message| !message.is_empty()) {
        #[cfg(feature = "tracing")]
        tracing::warn!(error = %message, "scan chunk reported an error");
        return Err(Error::Stream { message });
    }
    #[cfg(feature = "tracing")]
    tracing::debug!(items = chunk.items.len(), "scan chunk received");
    let mut output = state.accumulated();
    output.items.extend(value::from_proto_items(chunk.items)?);
    output.count = add_count("count", output.count, chunk.count)?;
    output.scanned_count = add_count("scanned count", output.scanned_count, chunk.scanned_count)?;
    if let Some(key) = chunk.last_evaluated_key {
        output.last_evaluated_key = Some(key.into());
    }
    Ok(State::Receiving(output))
}

fn add_count(what: &str, total: u32, chunk: u32) -> Result<u32> {
    total.checked_add(chunk).ok_or_else(|| {
        TransportError::Malformed(format!("scan {what} overflows: {total} + {chunk}")).into()
    })
}
