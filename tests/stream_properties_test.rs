//! End-to-end properties of the streamed-reply pipeline.

mod common;

use bytes::Bytes;
use common::*;
use streamchat::error::ChatError;
use streamchat::models::TurnRole;
use streamchat::stream::{run_stream, CompletionReason, StreamState};
use streamchat::transcript::{Transcript, TranscriptEvent};
use tokio_util::sync::CancellationToken;

/// Run `chunks` through a fresh transcript and return each turn's content.
async fn assemble(chunks: Vec<Bytes>) -> Vec<String> {
    let mut transcript = Transcript::new();
    let cancel = CancellationToken::new();
    run_stream(&mut transcript, body_stream(chunks), &cancel)
        .await
        .unwrap();
    transcript.turns().iter().map(|t| t.content.clone()).collect()
}

fn mixed_body() -> String {
    let mut body = String::from(": keep-alive\n\n");
    body.push_str(&delta_line("Grüße"));
    body.push_str("\r\n");
    body.push_str(&delta_line(", 世界 "));
    body.push_str(": ping\n");
    body.push_str(&delta_line("🦀!"));
    body.push('\n');
    body.push_str(DONE_LINE);
    body
}

#[tokio::test]
async fn test_chunking_invariance_two_reads() {
    let body = mixed_body();
    let bytes = body.as_bytes();
    let expected = assemble(vec![Bytes::copy_from_slice(bytes)]).await;
    assert_eq!(expected, vec!["Grüße, 世界 🦀!".to_string()]);

    for offset in 0..=bytes.len() {
        let result = assemble(split_at_offsets(bytes, &[offset])).await;
        assert_eq!(result, expected, "split at byte {}", offset);
    }
}

#[tokio::test]
async fn test_chunking_invariance_single_bytes_and_triples() {
    let body = mixed_body();
    let bytes = body.as_bytes();
    let expected = vec!["Grüße, 世界 🦀!".to_string()];

    let every_byte: Vec<usize> = (1..bytes.len()).collect();
    assert_eq!(assemble(split_at_offsets(bytes, &every_byte)).await, expected);

    for step in 2..8 {
        for phase in 0..step {
            let offsets: Vec<usize> = (1..bytes.len()).filter(|o| o % step == phase).collect();
            assert_eq!(
                assemble(split_at_offsets(bytes, &offsets)).await,
                expected,
                "step {} phase {}",
                step,
                phase
            );
        }
    }
}

#[tokio::test]
async fn test_payload_split_inside_json_yields_delta_once() {
    let line = delta_line("exactly once");
    let json_start = line.find('{').unwrap();
    let json_end = line.rfind('}').unwrap();

    for offset in json_start..=json_end {
        let mut transcript = Transcript::new();
        let mut events = transcript.subscribe();
        let chunks = split_at_offsets(line.as_bytes(), &[offset]);
        run_stream(&mut transcript, body_stream(chunks), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.turns()[0].content, "exactly once");

        let mut appended = 0;
        let mut updated = 0;
        while let Ok(event) = events.try_recv() {
            match event {
                TranscriptEvent::TurnAppended { .. } => appended += 1,
                TranscriptEvent::TurnUpdated { .. } => updated += 1,
                _ => {}
            }
        }
        assert_eq!((appended, updated), (1, 0), "split at byte {}", offset);
    }
}

#[tokio::test]
async fn test_comments_and_blank_lines_do_not_alter_transcript() {
    let chunks = vec![Bytes::from(": keep-alive\n\n:\n   \n\r\n: another comment\n")];
    assert!(assemble(chunks).await.is_empty());

    let with_noise = format!(
        ": keep-alive\n{}\n: ping\n\n{}\n{}",
        delta_line("a").trim_end(),
        delta_line("b").trim_end(),
        DONE_LINE
    );
    let without_noise = format!("{}{}{}", delta_line("a"), delta_line("b"), DONE_LINE);
    assert_eq!(
        assemble(vec![Bytes::from(with_noise)]).await,
        assemble(vec![Bytes::from(without_noise)]).await
    );
}

#[tokio::test]
async fn test_done_ignores_trailing_bytes() {
    let body = format!(
        "{}{}{}: more\n",
        delta_line("kept"),
        DONE_LINE,
        delta_line("ignored")
    );
    let mut transcript = Transcript::new();
    let completion = run_stream(
        &mut transcript,
        body_stream(vec![Bytes::from(body)]),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(completion.reason, CompletionReason::Sentinel);
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript.turns()[0].content, "kept");
}

#[tokio::test]
async fn test_done_completes_without_further_reads() {
    let client = MockHttpClient::new();
    client.set_response(
        TEST_URL,
        MockResponse::StreamThenHang(vec![Bytes::from(sse_body(&["done"]))]),
    );
    let mut conv = mock_conversation(&client);

    let completion = conv
        .send("hi", &[], &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(completion.text, "done");
    assert_eq!(conv.state(), StreamState::Completed);
}

#[tokio::test]
async fn test_hello_example() {
    let client = MockHttpClient::new();
    client.set_response(
        TEST_URL,
        MockResponse::chunks([
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n",
            "data: [DONE]\n",
        ]),
    );
    let mut conv = mock_conversation(&client);

    conv.send("greet me", &[], &CancellationToken::new())
        .await
        .unwrap();

    let turns = conv.transcript().turns();
    assert_eq!(turns.len(), 2);
    let assistant: Vec<_> = turns
        .iter()
        .filter(|t| t.role == TurnRole::Assistant)
        .collect();
    assert_eq!(assistant.len(), 1);
    assert_eq!(assistant[0].content, "Hello");
    assert!(!assistant[0].is_error);
}

#[tokio::test]
async fn test_http_500_rate_limited_example() {
    let client = MockHttpClient::new();
    client.set_response(TEST_URL, MockResponse::status(500, r#"{"error":"rate limited"}"#));
    let mut conv = mock_conversation(&client);

    let err = conv
        .send("hi", &[], &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::HttpStatus { status: 500, .. }));
    assert_eq!(err.to_string(), "rate limited");
    assert_eq!(conv.state(), StreamState::Failed);
    assert!(conv
        .transcript()
        .turns()
        .iter()
        .all(|t| t.role == TurnRole::User));
}

#[tokio::test]
async fn test_cancel_after_two_deltas() {
    let client = MockHttpClient::new();
    client.set_response(
        TEST_URL,
        MockResponse::StreamThenHang(vec![
            Bytes::from(delta_line("first ")),
            Bytes::from(delta_line("second")),
        ]),
    );
    let mut conv = mock_conversation(&client);
    let mut events = conv.subscribe();
    let cancel = CancellationToken::new();

    let canceller = async {
        let mut deltas = 0;
        while let Some(event) = events.recv().await {
            if let TranscriptEvent::TurnAppended { turn, .. } | TranscriptEvent::TurnUpdated { turn, .. } =
                &event
            {
                if turn.role == TurnRole::Assistant {
                    deltas += 1;
                }
            }
            if deltas == 2 {
                cancel.cancel();
                break;
            }
        }
    };
    let (result, _) = tokio::join!(conv.send("hi", &[], &cancel), canceller);

    let err = result.unwrap_err();
    assert_eq!(err, ChatError::Cancelled);
    assert_eq!(err.to_string(), "cancelled");
    assert_eq!(conv.state(), StreamState::Failed);

    let turns = conv.transcript().turns();
    assert_eq!(turns[1].content, "first second");
    assert!(!turns[1].is_streaming);
    assert!(turns[2].is_error);
}

#[tokio::test]
async fn test_body_error_preserves_partial_reply() {
    let client = MockHttpClient::new();
    client.set_response(
        TEST_URL,
        MockResponse::StreamThenError(
            vec![Bytes::from(delta_line("partial"))],
            streamchat::traits::HttpError::Io("connection reset".to_string()),
        ),
    );
    let mut conv = mock_conversation(&client);

    let err = conv
        .send("hi", &[], &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "connection problem");
    let turns = conv.transcript().turns();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[1].content, "partial");
    assert_eq!(turns[2].content, "connection problem");
}
