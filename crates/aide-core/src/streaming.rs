//! Aggregation of streamed response fragments.

use futures::{pin_mut, Stream, StreamExt};

use crate::error::{AggregationError, UpstreamError};

/// Consumes a finite stream of text fragments, concatenating each onto an
/// accumulator. After every fragment `on_partial` is invoked with the full
/// accumulated text, which is what progressive rendering wants. Returns the
/// final concatenation once the stream ends.
///
/// Consumption is strictly sequential; the stream is not restartable. If a
/// fragment fails to produce, aggregation stops and the error carries the
/// text accumulated so far. Callers must not record a turn from that
/// partial text.
pub async fn aggregate<S, F>(fragments: S, mut on_partial: F) -> Result<String, AggregationError>
where
    S: Stream<Item = Result<String, UpstreamError>>,
    F: FnMut(&str),
{
    pin_mut!(fragments);

    let mut accumulated = String::new();
    while let Some(next) = fragments.next().await {
        match next {
            Ok(fragment) => {
                accumulated.push_str(&fragment);
                on_partial(&accumulated);
            }
            Err(cause) => {
                return Err(AggregationError {
                    partial: accumulated,
                    cause,
                })
            }
        }
    }
    Ok(accumulated)
}
