//! Incremental deflate compression of the fragment sequence

use crate::errors::InsightsResult;
use async_stream::try_stream;
use bytes::Bytes;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use futures::{pin_mut, Stream, StreamExt};
use std::io::Write;

/// Compress fragments with the default compression level.
pub fn compress<'a, S>(fragments: S) -> impl Stream<Item = InsightsResult<Bytes>> + Send + 'a
where
    S: Stream<Item = InsightsResult<String>> + Send + 'a,
{
    compress_with(fragments, Compression::default())
}

/// Compress fragments into zlib-wrapped deflate chunks.
///
/// Every fragment is fed to the encoder as it arrives and whatever output the
/// encoder has produced so far is yielded. Only when the fragments are exhausted
/// is the final block written, so the concatenated chunks form one complete
/// stream. If a fragment fails, the failure is yielded and the stream ends
/// there: the final block and checksum are never yielded. Whatever the encoder
/// writes while being dropped goes into its discarded buffer.
pub fn compress_with<'a, S>(fragments: S, level: Compression) -> impl Stream<Item = InsightsResult<Bytes>> + Send + 'a
where
    S: Stream<Item = InsightsResult<String>> + Send + 'a,
{
    try_stream! {
        pin_mut!(fragments);
        let mut encoder = ZlibEncoder::new(Vec::new(), level);

        while let Some(fragment) = fragments.next().await {
            let fragment = fragment?;
            encoder.write_all(fragment.as_bytes())?;

            let output = std::mem::take(encoder.get_mut());
            if !output.is_empty() {
                yield Bytes::from(output);
            }
        }

        let output = encoder.finish()?;
        if !output.is_empty() {
            yield Bytes::from(output);
        }
    }
}
