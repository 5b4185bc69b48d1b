//! Property tests for event synthesis
//!
//! Every synthesized payload must be a complete event whose value lies in
//! the requested range and whose id is unique.

use chrono::Utc;
use event_maker::application::{MemorySink, Synthesizer};
use event_maker::domain::{MetricName, SourceId, TelemetryEvent, ValueRange};
use proptest::prelude::*;
use rstest::rstest;
use std::collections::HashSet;
use std::sync::Arc;

fn synthesizer() -> (Synthesizer, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    (Synthesizer::new(sink.clone()), sink)
}

fn device() -> SourceId {
    SourceId::try_new("device1".to_string()).unwrap()
}

#[rstest]
#[case::temperature(MetricName::temperature(), ValueRange::TEMPERATURE)]
#[case::vibration(MetricName::vibration(), ValueRange::VIBRATION)]
#[case::degenerate(MetricName::temperature(), ValueRange::new(20.5, 20.5))]
fn values_stay_inside_range(#[case] metric: MetricName, #[case] range: ValueRange) {
    let (synth, _) = synthesizer();
    let source = device();

    for _ in 0..10_000 {
        let payload = synth.synthesize(&source, &metric, range);
        let event = TelemetryEvent::from_payload(&payload).unwrap();
        assert!(
            range.min() <= event.value && event.value <= range.max(),
            "{} outside [{}, {}]",
            event.value,
            range.min(),
            range.max()
        );
    }
}

#[test]
fn degenerate_range_always_yields_min() {
    let (synth, _) = synthesizer();
    let range = ValueRange::new(3.25, 3.25);

    for _ in 0..100 {
        let event = synth.event(&device(), &MetricName::vibration(), range);
        assert_eq!(event.value, 3.25);
    }
}

#[test]
fn event_ids_are_unique() {
    let (synth, _) = synthesizer();
    let source = device();

    let ids: HashSet<String> = (0..10_000)
        .map(|_| {
            synth
                .event(&source, &MetricName::temperature(), ValueRange::TEMPERATURE)
                .event_id
                .to_string()
        })
        .collect();

    assert_eq!(ids.len(), 10_000);
}

#[test]
fn payload_has_exactly_the_five_fields() {
    let (synth, _) = synthesizer();
    let payload = synth.synthesize(&device(), &MetricName::vibration(), ValueRange::VIBRATION);

    let json: serde_json::Value = serde_json::from_slice(&payload).unwrap();
    let object = json.as_object().unwrap();

    assert_eq!(object.len(), 5);
    assert!(object["source_id"].is_string());
    assert!(object["event_id"].is_string());
    assert!(object["event_time"].is_i64());
    assert!(object["metric"].is_string());
    assert!(object["value"].is_f64());
}

#[test]
fn event_time_never_decreases() {
    let (synth, _) = synthesizer();
    let source = device();

    let times: Vec<i64> = (0..1_000)
        .map(|_| {
            synth
                .event(&source, &MetricName::temperature(), ValueRange::TEMPERATURE)
                .event_time
        })
        .collect();

    assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn temperature_event_for_device1() {
    let (synth, sink) = synthesizer();
    let before = Utc::now().timestamp();

    let payload = synth.synthesize(&device(), &MetricName::temperature(), ValueRange::TEMPERATURE);
    let json: serde_json::Value = serde_json::from_slice(&payload).unwrap();

    let id_pattern = regex::Regex::new(r"^eid-[0-9a-f-]{36}$").unwrap();
    assert_eq!(json["source_id"], "device1");
    assert_eq!(json["metric"], "temperature");
    assert!(id_pattern.is_match(json["event_id"].as_str().unwrap()));

    let value = json["value"].as_f64().unwrap();
    assert!((15.0..=39.9).contains(&value));

    let event_time = json["event_time"].as_i64().unwrap();
    assert!((before - 2..=Utc::now().timestamp() + 2).contains(&event_time));

    // The exact payload handed back is the one that was recorded.
    let recorded = sink.synthesized_payloads();
    assert_eq!(recorded, vec![String::from_utf8(payload.to_vec()).unwrap()]);
}

proptest! {
    #[test]
    fn any_finite_range_is_respected(
        min in -1.0e6f64..1.0e6,
        width in 0.0f64..1.0e6,
    ) {
        let range = ValueRange::try_new(min, min + width).unwrap();
        let (synth, _) = synthesizer();

        for _ in 0..32 {
            let event = synth.event(&device(), &MetricName::temperature(), range);
            prop_assert!(range.contains(event.value));
        }
    }

    #[test]
    fn inverted_ranges_are_rejected(min in -1.0e6f64..1.0e6, gap in 0.001f64..1.0e3) {
        prop_assert!(ValueRange::try_new(min, min - gap).is_err());
    }
}
