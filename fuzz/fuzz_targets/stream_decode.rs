//! Random byte streams through the decoder.
//!
//! The first input byte picks a chunk size; the rest is the stream. Checks that
//! nothing panics, that every yielded packet re-encodes to a frame the decoder
//! accepts, and that chunking does not change the result.

#![no_main]

use feiyu_proto::StreamDecoder;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&chunk_size, stream)) = data.split_first() else {
        return;
    };
    let chunk_size = usize::from(chunk_size).max(1);

    let mut whole = StreamDecoder::new();
    let expected: Vec<_> = whole.feed(stream).collect();

    let mut chunked = StreamDecoder::new();
    let mut actual = Vec::new();
    for chunk in stream.chunks(chunk_size) {
        actual.extend(chunked.feed(chunk));
    }

    assert_eq!(expected, actual, "chunking changed the decoded packets");
    assert_eq!(whole.stats(), chunked.stats());
    assert_eq!(whole.buffered(), chunked.buffered());

    for packet in &expected {
        let wire = packet.encode();
        let again: Vec<_> = StreamDecoder::new().feed(&wire).collect();
        assert_eq!(again.as_slice(), std::slice::from_ref(packet));
    }
});
